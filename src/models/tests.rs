//! Tests for domain models

use super::*;
use crate::error::{Error, Result};
use crate::materialize::materialize;
use crate::pagination::{ListOptions, Page, PageCursor, PageFetcher};
use crate::types::{JsonValue, Record};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;
use test_case::test_case;

fn record(value: JsonValue) -> Record {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("Expected object, got {other}"),
    }
}

fn mismatch_path(err: Error) -> String {
    match err {
        Error::SchemaMismatch { path, .. } => path,
        other => panic!("Expected SchemaMismatch, got {other:?}"),
    }
}

// ============================================================================
// Incident Tests
// ============================================================================

fn incident_json() -> JsonValue {
    json!({
        "id": "/subscriptions/sub-1/resourceGroups/soc-rg/providers/Microsoft.OperationalInsights/workspaces/soc-ws/providers/Microsoft.SecurityInsights/incidents/73e01a99",
        "name": "73e01a99",
        "type": "Microsoft.SecurityInsights/Incidents",
        "etag": "\"0300bf09-0000-0000-0000-5c37296e0000\"",
        "properties": {
            "title": "Suspicious sign-in from unfamiliar location",
            "description": "Multiple failed sign-ins followed by a success",
            "severity": "High",
            "status": "Active",
            "createdTimeUtc": "2024-03-01T10:00:00Z",
            "lastModifiedTimeUtc": "2024-03-02T08:30:00Z",
            "incidentNumber": 3177,
            "incidentUrl": "https://portal.azure.com/#asset/Microsoft_Azure_Security_Insights/Incident/73e01a99",
            "providerName": "Azure Sentinel",
            "labels": [
                {"labelName": "phishing", "labelType": "User"},
                {"labelName": "vip", "labelType": "AutoAssigned"}
            ],
            "owner": {
                "objectId": "2046feea-040d-4a46-9e2b-91c2941bfa70",
                "email": "analyst@contoso.com",
                "assignedTo": "Soc Analyst",
                "userPrincipalName": "analyst@contoso.com"
            },
            "relatedAnalyticRuleIds": ["rule-1", "rule-2"],
            "additionalData": {
                "alertsCount": 2,
                "bookmarksCount": 0,
                "commentsCount": 1,
                "alertProductNames": ["Azure Active Directory Identity Protection"],
                "tactics": ["InitialAccess"]
            },
            "firstActivityTimeUtc": null,
            "someFutureField": {"nested": true}
        }
    })
}

#[test]
fn test_incident_from_arm_record() {
    let incident: Incident = materialize(record(incident_json())).unwrap();

    assert_eq!(incident.name.as_deref(), Some("73e01a99"));
    assert_eq!(
        incident.resource_type.as_deref(),
        Some("Microsoft.SecurityInsights/Incidents")
    );
    assert_eq!(
        incident.title(),
        Some("Suspicious sign-in from unfamiliar location")
    );

    let props = incident.properties.unwrap();
    assert_eq!(props.severity, Some(IncidentSeverity::High));
    assert_eq!(props.status, Some(IncidentStatus::Active));
    assert_eq!(props.incident_number, Some(3177));
    assert_eq!(
        props.created_time_utc,
        Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
    );
    assert!(props.first_activity_time_utc.is_none());
    assert!(props.classification.is_none());
    assert_eq!(props.labels.len(), 2);
    assert_eq!(props.labels[1].label_name.as_deref(), Some("vip"));
    assert_eq!(
        props.owner.unwrap().assigned_to.as_deref(),
        Some("Soc Analyst")
    );
    assert_eq!(props.related_analytic_rule_ids, vec!["rule-1", "rule-2"]);

    let extra = props.additional_data.unwrap();
    assert_eq!(extra.alerts_count, Some(2));
    assert_eq!(extra.tactics, vec!["InitialAccess"]);
    assert!(extra.techniques.is_empty());
}

#[test]
fn test_incident_round_trip() {
    let incident = Incident {
        id: Some("/subscriptions/s/resourceGroups/rg/providers/Microsoft.OperationalInsights/workspaces/ws/providers/Microsoft.SecurityInsights/incidents/inc-1".to_string()),
        name: Some("inc-1".to_string()),
        resource_type: Some("Microsoft.SecurityInsights/Incidents".to_string()),
        etag: None,
        properties: Some(IncidentProperties {
            title: Some("Mass download".to_string()),
            severity: Some(IncidentSeverity::Medium),
            status: Some(IncidentStatus::Closed),
            classification: Some("TruePositive".to_string()),
            created_time_utc: Some(Utc.with_ymd_and_hms(2023, 11, 5, 23, 59, 1).unwrap()),
            incident_number: Some(12),
            labels: vec![IncidentLabel {
                label_name: Some("exfil".to_string()),
                label_type: Some("User".to_string()),
            }],
            owner: Some(IncidentOwner {
                email: Some("a@contoso.com".to_string()),
                ..IncidentOwner::default()
            }),
            related_analytic_rule_ids: vec!["rule-9".to_string()],
            ..IncidentProperties::default()
        }),
    };

    let wire = serde_json::to_value(&incident).unwrap();
    let back: Incident = materialize(record(wire)).unwrap();

    assert_eq!(back, incident);
}

#[test_case("high", IncidentSeverity::High ; "lowercase")]
#[test_case("Informational", IncidentSeverity::Informational ; "informational")]
#[test_case("MEDIUM", IncidentSeverity::Medium ; "uppercase")]
fn test_incident_severity_parsing(raw: &str, expected: IncidentSeverity) {
    let incident: Incident =
        materialize(record(json!({"properties": {"severity": raw}}))).unwrap();
    assert_eq!(incident.properties.unwrap().severity, Some(expected));
}

#[test]
fn test_incident_unknown_severity_is_mismatch() {
    let err = materialize::<Incident>(record(json!({"properties": {"severity": "Critical"}})))
        .unwrap_err();
    match err {
        Error::SchemaMismatch {
            path,
            expected,
            found,
        } => {
            assert_eq!(path, "properties.severity");
            assert_eq!(expected, "IncidentSeverity");
            assert_eq!(found, "string \"Critical\"");
        }
        other => panic!("Expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn test_incident_nested_mismatch_path() {
    let err = materialize::<Incident>(record(json!({
        "properties": {
            "labels": [
                {"labelName": "ok"},
                {"labelName": {"bad": 1}}
            ]
        }
    })))
    .unwrap_err();

    assert_eq!(mismatch_path(err), "properties.labels[1].labelName");
}

#[test]
fn test_incident_number_from_string() {
    let incident: Incident =
        materialize(record(json!({"properties": {"incidentNumber": "88"}}))).unwrap();
    assert_eq!(incident.properties.unwrap().incident_number, Some(88));

    let err = materialize::<Incident>(record(json!({"properties": {"incidentNumber": "n/a"}})))
        .unwrap_err();
    assert_eq!(mismatch_path(err), "properties.incidentNumber");
}

#[test]
fn test_incident_empty_record() {
    let incident: Incident = materialize(Record::new()).unwrap();
    assert_eq!(incident, Incident::default());
    assert!(incident.title().is_none());
}

#[test]
fn test_incident_serializes_camel_case() {
    let incident: Incident = materialize(record(json!({
        "name": "inc-1",
        "type": "Microsoft.SecurityInsights/Incidents",
        "properties": {"incidentNumber": 5, "severity": "Low"}
    })))
    .unwrap();

    assert_eq!(
        serde_json::to_value(&incident).unwrap(),
        json!({
            "name": "inc-1",
            "type": "Microsoft.SecurityInsights/Incidents",
            "properties": {"severity": "Low", "incidentNumber": 5}
        })
    );
}

#[test]
fn test_incidents_path() {
    assert_eq!(
        incidents_path("sub-1", "soc-rg", "soc-ws"),
        "/subscriptions/sub-1/resourceGroups/soc-rg/providers/Microsoft.OperationalInsights/workspaces/soc-ws/providers/Microsoft.SecurityInsights/incidents"
    );
}

// ============================================================================
// Operation Tests
// ============================================================================

fn operation_json() -> JsonValue {
    json!({
        "name": "Microsoft.Web/sites/Read",
        "isDataAction": false,
        "origin": "user,system",
        "display": {
            "provider": "Microsoft Web Apps",
            "resource": "Web App",
            "operation": "Get Web App",
            "description": "Get the properties of a Web App"
        },
        "properties": {
            "serviceSpecification": {
                "metricSpecifications": [
                    {
                        "name": "CpuTime",
                        "displayName": "CPU Time",
                        "unit": "Seconds",
                        "aggregationType": "Total",
                        "supportsInstanceLevelAggregation": true,
                        "dimensions": [{"name": "Instance", "displayName": "Instance", "toBeExportedForShoebox": true}],
                        "availabilities": [{"timeGrain": "PT1M", "blobDuration": "PT6H"}],
                        "supportedTimeGrainTypes": ["PT1M", "PT1H"]
                    }
                ]
            }
        }
    })
}

#[test_case("2019-04-01", ApiVersion::V2019_04_01 ; "older")]
#[test_case("2022-03-01", ApiVersion::V2022_03_01 ; "newer")]
#[test_case(" 2022-03-01 ", ApiVersion::V2022_03_01 ; "padded")]
fn test_api_version_parse(raw: &str, expected: ApiVersion) {
    let version: ApiVersion = raw.parse().unwrap();
    assert_eq!(version, expected);
    assert_eq!(version.to_string(), raw.trim());
}

#[test]
fn test_api_version_rejects_unknown() {
    assert!(matches!(
        "2015-08-01".parse::<ApiVersion>(),
        Err(Error::Config { .. })
    ));
    assert_eq!(ApiVersion::default(), ApiVersion::V2022_03_01);
}

#[test]
fn test_operation_versions_differ() {
    let old = Operation::materialize(ApiVersion::V2019_04_01, record(operation_json())).unwrap();
    let new = Operation::materialize(ApiVersion::V2022_03_01, record(operation_json())).unwrap();

    assert_eq!(old.api_version(), ApiVersion::V2019_04_01);
    assert_eq!(new.api_version(), ApiVersion::V2022_03_01);
    assert_eq!(old.name(), Some("Microsoft.Web/sites/Read"));
    assert_eq!(old.display(), new.display());

    let Operation::V2022_03_01(op) = &new else {
        panic!("Expected 2022-03-01 operation");
    };
    assert_eq!(op.is_data_action, Some(false));

    // isDataAction is not part of the older shape
    let old_wire = serde_json::to_value(&old).unwrap();
    assert!(old_wire.get("isDataAction").is_none());
    assert_eq!(serde_json::to_value(&new).unwrap()["isDataAction"], json!(false));
}

#[test]
fn test_operation_metric_specifications() {
    let op: OperationV2022_03_01 = materialize(record(operation_json())).unwrap();

    let spec = op
        .properties
        .and_then(|p| p.service_specification)
        .unwrap();
    assert_eq!(spec.metric_specifications.len(), 1);
    assert!(spec.log_specifications.is_empty());

    let metric = &spec.metric_specifications[0];
    assert_eq!(metric.name.as_deref(), Some("CpuTime"));
    assert_eq!(metric.supports_instance_level_aggregation, Some(true));
    assert_eq!(metric.dimensions[0].to_be_exported_for_shoebox, Some(true));
    assert_eq!(metric.availabilities[0].blob_duration.as_deref(), Some("PT6H"));
    assert_eq!(metric.supported_time_grain_types, vec!["PT1M", "PT1H"]);
}

#[test]
fn test_operation_metric_mismatch_path() {
    let err = materialize::<OperationV2019_04_01>(record(json!({
        "properties": {
            "serviceSpecification": {
                "metricSpecifications": [
                    {"name": "ok"},
                    {"dimensions": [{"toBeExportedForShoebox": "maybe"}]}
                ]
            }
        }
    })))
    .unwrap_err();

    assert_eq!(
        mismatch_path(err),
        "properties.serviceSpecification.metricSpecifications[1].dimensions[0].toBeExportedForShoebox"
    );
}

struct SinglePage(Vec<Record>);

#[async_trait]
impl PageFetcher for SinglePage {
    async fn fetch(&self, _cursor: &PageCursor) -> Result<Page> {
        Ok(Page::last(self.0.clone()))
    }
}

#[tokio::test]
async fn test_list_operations_by_version() {
    let fetcher = SinglePage(vec![
        record(operation_json()),
        record(json!({"name": "Microsoft.Web/sites/Write"})),
    ]);

    let ops: Vec<Operation> = list_operations(&fetcher, ApiVersion::V2019_04_01, ListOptions::new())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ops.len(), 2);
    assert!(ops.iter().all(|op| op.api_version() == ApiVersion::V2019_04_01));
    assert_eq!(ops[1].name(), Some("Microsoft.Web/sites/Write"));
}

// ============================================================================
// Attestation Tests
// ============================================================================

#[test]
fn test_attestation_provider_from_arm_record() {
    let provider: AttestationProvider = materialize(record(json!({
        "id": "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Attestation/attestationProviders/myprovider",
        "name": "myprovider",
        "type": "Microsoft.Attestation/attestationProviders",
        "location": "eastus",
        "tags": {"env": "prod", "tier": 2},
        "properties": {
            "trustModel": "Isolated",
            "status": "Ready",
            "attestUri": "https://myprovider.eus.attest.azure.net",
            "publicNetworkAccess": "Enabled"
        }
    })))
    .unwrap();

    assert_eq!(provider.location.as_deref(), Some("eastus"));
    assert_eq!(
        provider.attest_uri(),
        Some("https://myprovider.eus.attest.azure.net")
    );
    assert_eq!(
        provider.tags,
        Some(BTreeMap::from([
            ("env".to_string(), "prod".to_string()),
            ("tier".to_string(), "2".to_string()),
        ]))
    );
    assert_eq!(
        provider.properties.unwrap().trust_model.as_deref(),
        Some("Isolated")
    );
}

#[test]
fn test_attestation_tags_mismatch() {
    let err = materialize::<AttestationProvider>(record(json!({"tags": ["prod"]}))).unwrap_err();
    assert_eq!(mismatch_path(err), "tags");

    let err =
        materialize::<AttestationProvider>(record(json!({"tags": {"env": ["a"]}}))).unwrap_err();
    assert_eq!(mismatch_path(err), "tags.env");
}

#[test]
fn test_attestation_round_trip() {
    let provider = AttestationProvider {
        name: Some("shared".to_string()),
        location: Some("westeurope".to_string()),
        tags: Some(BTreeMap::from([("owner".to_string(), "sec".to_string())])),
        properties: Some(AttestationProviderProperties {
            status: Some("Ready".to_string()),
            ..AttestationProviderProperties::default()
        }),
        ..AttestationProvider::default()
    };

    let back: AttestationProvider =
        materialize(record(serde_json::to_value(&provider).unwrap())).unwrap();

    assert_eq!(back, provider);
}

#[test]
fn test_attestation_paths() {
    assert_eq!(
        attestation_providers_path("sub-1", None),
        "/subscriptions/sub-1/providers/Microsoft.Attestation/attestationProviders"
    );
    assert_eq!(
        attestation_providers_path("sub-1", Some("rg")),
        "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Attestation/attestationProviders"
    );
    assert_eq!(
        DEFAULT_PROVIDERS_PATH,
        "/providers/Microsoft.Attestation/defaultProviders"
    );
}
