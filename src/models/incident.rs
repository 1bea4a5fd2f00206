//! Microsoft Sentinel incidents (`Microsoft.SecurityInsights/incidents`)

use crate::error::{Error, Result};
use crate::materialize::{coerce, FieldKind, FieldPath, Materialize, Schema};
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// API version used for incident requests
pub const INCIDENTS_API_VERSION: &str = "2023-02-01";

/// Collection path of the incidents in one Sentinel workspace
pub fn incidents_path(subscription_id: &str, resource_group: &str, workspace: &str) -> String {
    format!(
        "/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/Microsoft.OperationalInsights/workspaces/{workspace}/providers/Microsoft.SecurityInsights/incidents"
    )
}

// ============================================================================
// Enumerations
// ============================================================================

/// Incident severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncidentSeverity {
    High,
    Medium,
    Low,
    Informational,
}

impl IncidentSeverity {
    fn parse(value: &JsonValue, path: &FieldPath) -> Result<Self> {
        let raw = coerce::to_string(value, path)?;
        match raw.to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "informational" => Ok(Self::Informational),
            _ => Err(Error::mismatch(
                path.to_string(),
                "IncidentSeverity",
                format!("string {raw:?}"),
            )),
        }
    }
}

impl fmt::Display for IncidentSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Incident lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncidentStatus {
    New,
    Active,
    Closed,
}

impl IncidentStatus {
    fn parse(value: &JsonValue, path: &FieldPath) -> Result<Self> {
        let raw = coerce::to_string(value, path)?;
        match raw.to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            _ => Err(Error::mismatch(
                path.to_string(),
                "IncidentStatus",
                format!("string {raw:?}"),
            )),
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ============================================================================
// Incident
// ============================================================================

/// A Sentinel incident
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IncidentProperties>,
}

impl Incident {
    /// Incident title, if present
    pub fn title(&self) -> Option<&str> {
        self.properties.as_ref()?.title.as_deref()
    }
}

impl Materialize for Incident {
    const TYPE_NAME: &'static str = "Incident";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<Incident>> = LazyLock::new(|| {
            Schema::<Incident>::builder(Incident::TYPE_NAME)
                .string("id", |i| &mut i.id)
                .string("name", |i| &mut i.name)
                .string("type", |i| &mut i.resource_type)
                .string("etag", |i| &mut i.etag)
                .object::<IncidentProperties>("properties", |i| &mut i.properties)
                .build()
        });
        &SCHEMA
    }
}

/// Incident properties
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<IncidentSeverity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time_utc: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_time_utc: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_activity_time_utc: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_time_utc: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_incident_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<IncidentLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<IncidentOwner>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_analytic_rule_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<IncidentAdditionalData>,
}

impl Materialize for IncidentProperties {
    const TYPE_NAME: &'static str = "IncidentProperties";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<IncidentProperties>> = LazyLock::new(|| {
            Schema::<IncidentProperties>::builder(IncidentProperties::TYPE_NAME)
                .string("title", |p| &mut p.title)
                .string("description", |p| &mut p.description)
                .scalar(
                    "severity",
                    FieldKind::Scalar("IncidentSeverity"),
                    IncidentSeverity::parse,
                    |p| &mut p.severity,
                )
                .scalar(
                    "status",
                    FieldKind::Scalar("IncidentStatus"),
                    IncidentStatus::parse,
                    |p| &mut p.status,
                )
                .string("classification", |p| &mut p.classification)
                .string("classificationComment", |p| &mut p.classification_comment)
                .string("classificationReason", |p| &mut p.classification_reason)
                .datetime("createdTimeUtc", |p| &mut p.created_time_utc)
                .datetime("lastModifiedTimeUtc", |p| &mut p.last_modified_time_utc)
                .datetime("firstActivityTimeUtc", |p| &mut p.first_activity_time_utc)
                .datetime("lastActivityTimeUtc", |p| &mut p.last_activity_time_utc)
                .integer("incidentNumber", |p| &mut p.incident_number)
                .string("incidentUrl", |p| &mut p.incident_url)
                .string("providerName", |p| &mut p.provider_name)
                .string("providerIncidentId", |p| &mut p.provider_incident_id)
                .objects::<IncidentLabel>("labels", |p| &mut p.labels)
                .object::<IncidentOwner>("owner", |p| &mut p.owner)
                .strings("relatedAnalyticRuleIds", |p| &mut p.related_analytic_rule_ids)
                .object::<IncidentAdditionalData>("additionalData", |p| &mut p.additional_data)
                .build()
        });
        &SCHEMA
    }
}

/// A label attached to an incident
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentLabel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_type: Option<String>,
}

impl Materialize for IncidentLabel {
    const TYPE_NAME: &'static str = "IncidentLabel";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<IncidentLabel>> = LazyLock::new(|| {
            Schema::<IncidentLabel>::builder(IncidentLabel::TYPE_NAME)
                .string("labelName", |l| &mut l.label_name)
                .string("labelType", |l| &mut l.label_type)
                .build()
        });
        &SCHEMA
    }
}

/// The user or group an incident is assigned to
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentOwner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_type: Option<String>,
}

impl Materialize for IncidentOwner {
    const TYPE_NAME: &'static str = "IncidentOwner";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<IncidentOwner>> = LazyLock::new(|| {
            Schema::<IncidentOwner>::builder(IncidentOwner::TYPE_NAME)
                .string("objectId", |o| &mut o.object_id)
                .string("email", |o| &mut o.email)
                .string("assignedTo", |o| &mut o.assigned_to)
                .string("userPrincipalName", |o| &mut o.user_principal_name)
                .string("ownerType", |o| &mut o.owner_type)
                .build()
        });
        &SCHEMA
    }
}

/// Counters and product names computed by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentAdditionalData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerts_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmarks_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alert_product_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tactics: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub techniques: Vec<String>,
}

impl Materialize for IncidentAdditionalData {
    const TYPE_NAME: &'static str = "IncidentAdditionalData";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<IncidentAdditionalData>> = LazyLock::new(|| {
            Schema::<IncidentAdditionalData>::builder(IncidentAdditionalData::TYPE_NAME)
                .integer("alertsCount", |d| &mut d.alerts_count)
                .integer("bookmarksCount", |d| &mut d.bookmarks_count)
                .integer("commentsCount", |d| &mut d.comments_count)
                .strings("alertProductNames", |d| &mut d.alert_product_names)
                .strings("tactics", |d| &mut d.tactics)
                .strings("techniques", |d| &mut d.techniques)
                .build()
        });
        &SCHEMA
    }
}
