//! Azure Resource Manager resource identifiers
//!
//! Parses fully-qualified resource paths such as
//! `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.OperationalInsights/workspaces/{ws}/providers/Microsoft.SecurityInsights/incidents/{id}`
//! so commands can accept either a bare name or a full resource ID.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A parsed ARM resource ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    raw: String,
    subscription_id: Option<String>,
    resource_group: Option<String>,
    /// Provider namespaces in the order they appear
    namespaces: Vec<String>,
    /// `(type, name)` pairs in the order they appear
    segments: Vec<(String, String)>,
}

impl ResourceId {
    /// Parse a resource ID
    pub fn parse(id: &str) -> Result<Self> {
        let trimmed = id.trim();
        if !trimmed.starts_with('/') {
            return Err(Error::invalid_resource_id(id, "must start with '/'"));
        }

        let parts: Vec<&str> = trimmed.split('/').filter(|p| !p.is_empty()).collect();
        let mut subscription_id = None;
        let mut resource_group = None;
        let mut namespaces = Vec::new();
        let mut segments = Vec::new();

        let mut i = 0;
        while i < parts.len() {
            let key = parts[i];
            let Some(value) = parts.get(i + 1).copied() else {
                return Err(Error::invalid_resource_id(
                    id,
                    format!("segment '{key}' has no value"),
                ));
            };

            if key.eq_ignore_ascii_case("subscriptions") && i == 0 {
                subscription_id = Some(value.to_string());
            } else if key.eq_ignore_ascii_case("resourceGroups") {
                resource_group = Some(value.to_string());
            } else if key.eq_ignore_ascii_case("providers") {
                namespaces.push(value.to_string());
            } else {
                segments.push((key.to_string(), value.to_string()));
            }
            i += 2;
        }

        if segments.is_empty() && resource_group.is_none() && subscription_id.is_none() {
            return Err(Error::invalid_resource_id(id, "no resource segments"));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            subscription_id,
            resource_group,
            namespaces,
            segments,
        })
    }

    /// Subscription the resource lives in
    pub fn subscription_id(&self) -> Option<&str> {
        self.subscription_id.as_deref()
    }

    /// Resource group the resource lives in
    pub fn resource_group(&self) -> Option<&str> {
        self.resource_group.as_deref()
    }

    /// Innermost provider namespace, e.g. `Microsoft.SecurityInsights`
    pub fn namespace(&self) -> Option<&str> {
        self.namespaces.last().map(String::as_str)
    }

    /// Innermost resource type, e.g. `incidents`
    pub fn resource_type(&self) -> Option<&str> {
        self.segments.last().map(|(t, _)| t.as_str())
    }

    /// Name of the resource (last segment)
    pub fn name(&self) -> &str {
        if let Some((_, name)) = self.segments.last() {
            return name;
        }
        self.resource_group
            .as_deref()
            .or(self.subscription_id.as_deref())
            .unwrap_or_default()
    }

    /// Name of the first segment with the given type (case-insensitive)
    pub fn child(&self, resource_type: &str) -> Option<&str> {
        self.segments
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(resource_type))
            .map(|(_, n)| n.as_str())
    }

    /// Log Analytics workspace name, when the resource is workspace-scoped
    pub fn workspace_name(&self) -> Option<&str> {
        self.child("workspaces")
    }

    /// The ID as given (trimmed)
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for ResourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Resolve a bare name or a full resource ID to the resource name
pub fn resource_name(id_or_name: &str) -> Result<String> {
    let trimmed = id_or_name.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_resource_id(id_or_name, "empty identifier"));
    }
    if trimmed.starts_with('/') {
        return Ok(ResourceId::parse(trimmed)?.name().to_string());
    }
    Ok(trimmed.to_string())
}
