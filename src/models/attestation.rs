//! Attestation providers (`Microsoft.Attestation/attestationProviders`)

use crate::error::{Error, Result};
use crate::materialize::{coerce, FieldKind, FieldPath, Materialize, Schema};
use crate::types::{describe_value, JsonValue};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// API version used for attestation requests
pub const ATTESTATION_API_VERSION: &str = "2020-10-01";

/// Collection path of the attestation providers in a subscription, or in
/// one resource group when given
pub fn attestation_providers_path(subscription_id: &str, resource_group: Option<&str>) -> String {
    match resource_group {
        Some(rg) => format!(
            "/subscriptions/{subscription_id}/resourceGroups/{rg}/providers/Microsoft.Attestation/attestationProviders"
        ),
        None => format!(
            "/subscriptions/{subscription_id}/providers/Microsoft.Attestation/attestationProviders"
        ),
    }
}

/// Collection path of the shared default providers
pub const DEFAULT_PROVIDERS_PATH: &str = "/providers/Microsoft.Attestation/defaultProviders";

/// An attestation provider
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationProvider {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<AttestationProviderProperties>,
}

impl AttestationProvider {
    /// Attestation endpoint, if provisioned
    pub fn attest_uri(&self) -> Option<&str> {
        self.properties.as_ref()?.attest_uri.as_deref()
    }
}

impl Materialize for AttestationProvider {
    const TYPE_NAME: &'static str = "AttestationProvider";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<AttestationProvider>> = LazyLock::new(|| {
            Schema::<AttestationProvider>::builder(AttestationProvider::TYPE_NAME)
                .string("id", |p| &mut p.id)
                .string("name", |p| &mut p.name)
                .string("type", |p| &mut p.resource_type)
                .string("location", |p| &mut p.location)
                .scalar("tags", FieldKind::Scalar("map of string"), to_tags, |p| &mut p.tags)
                .object::<AttestationProviderProperties>("properties", |p| &mut p.properties)
                .build()
        });
        &SCHEMA
    }
}

/// Resource tags: a flat object of text values
fn to_tags(value: &JsonValue, path: &FieldPath) -> Result<BTreeMap<String, String>> {
    let JsonValue::Object(map) = value else {
        return Err(Error::mismatch(
            path.to_string(),
            "map of string",
            describe_value(value),
        ));
    };
    map.iter()
        .map(|(key, v)| -> Result<(String, String)> {
            Ok((key.clone(), coerce::to_string(v, &path.key(key))?))
        })
        .collect()
}

/// Attestation provider properties
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationProviderProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attest_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_network_access: Option<String>,
}

impl Materialize for AttestationProviderProperties {
    const TYPE_NAME: &'static str = "AttestationProviderProperties";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<AttestationProviderProperties>> = LazyLock::new(|| {
            Schema::<AttestationProviderProperties>::builder(
                AttestationProviderProperties::TYPE_NAME,
            )
            .string("trustModel", |p| &mut p.trust_model)
            .string("status", |p| &mut p.status)
            .string("attestUri", |p| &mut p.attest_uri)
            .string("publicNetworkAccess", |p| &mut p.public_network_access)
            .build()
        });
        &SCHEMA
    }
}
