//! Resource provider operations (`Microsoft.Web/operations`)
//!
//! The operation shape differs between API versions, so each version gets its
//! own struct and `Operation` selects between them by version.

use crate::error::{Error, Result};
use crate::materialize::{materialize, Materialize, Schema};
use crate::pagination::{list, ListOptions, PageFetcher};
use crate::types::Record;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Collection path of the `Microsoft.Web` operations
pub const OPERATIONS_PATH: &str = "/providers/Microsoft.Web/operations";

// ============================================================================
// API Versions
// ============================================================================

/// Supported API versions of the operations endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiVersion {
    V2019_04_01,
    #[default]
    V2022_03_01,
}

impl ApiVersion {
    /// All supported versions, oldest first
    pub const ALL: [ApiVersion; 2] = [ApiVersion::V2019_04_01, ApiVersion::V2022_03_01];

    /// Wire form, e.g. `2022-03-01`
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V2019_04_01 => "2019-04-01",
            ApiVersion::V2022_03_01 => "2022-03-01",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| {
                Error::config(format!(
                    "unsupported api version '{s}', expected one of: 2019-04-01, 2022-03-01"
                ))
            })
    }
}

// ============================================================================
// Versioned Operation
// ============================================================================

/// An operation in the shape of one API version
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operation {
    V2019_04_01(OperationV2019_04_01),
    V2022_03_01(OperationV2022_03_01),
}

impl Operation {
    /// Build the operation for the given version from a record
    pub fn materialize(version: ApiVersion, record: Record) -> Result<Self> {
        match version {
            ApiVersion::V2019_04_01 => materialize(record).map(Operation::V2019_04_01),
            ApiVersion::V2022_03_01 => materialize(record).map(Operation::V2022_03_01),
        }
    }

    /// Version this operation was built for
    pub fn api_version(&self) -> ApiVersion {
        match self {
            Operation::V2019_04_01(_) => ApiVersion::V2019_04_01,
            Operation::V2022_03_01(_) => ApiVersion::V2022_03_01,
        }
    }

    /// Operation name, e.g. `Microsoft.Web/sites/Read`
    pub fn name(&self) -> Option<&str> {
        match self {
            Operation::V2019_04_01(op) => op.name.as_deref(),
            Operation::V2022_03_01(op) => op.name.as_deref(),
        }
    }

    /// Localized display information
    pub fn display(&self) -> Option<&OperationDisplay> {
        match self {
            Operation::V2019_04_01(op) => op.display.as_ref(),
            Operation::V2022_03_01(op) => op.display.as_ref(),
        }
    }
}

/// Stream operations in the shape of the given version
pub fn list_operations<'a, F>(
    fetcher: &'a F,
    version: ApiVersion,
    options: ListOptions,
) -> BoxStream<'a, Result<Operation>>
where
    F: PageFetcher + ?Sized,
{
    match version {
        ApiVersion::V2019_04_01 => list::<OperationV2019_04_01, _>(fetcher, options)
            .map_ok(Operation::V2019_04_01)
            .boxed(),
        ApiVersion::V2022_03_01 => list::<OperationV2022_03_01, _>(fetcher, options)
            .map_ok(Operation::V2022_03_01)
            .boxed(),
    }
}

/// Operation as returned by API version 2019-04-01
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationV2019_04_01 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<OperationDisplay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<OperationProperties>,
}

impl Materialize for OperationV2019_04_01 {
    const TYPE_NAME: &'static str = "Operation(2019-04-01)";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<OperationV2019_04_01>> = LazyLock::new(|| {
            Schema::<OperationV2019_04_01>::builder(OperationV2019_04_01::TYPE_NAME)
                .string("name", |o| &mut o.name)
                .object::<OperationDisplay>("display", |o| &mut o.display)
                .string("origin", |o| &mut o.origin)
                .object::<OperationProperties>("properties", |o| &mut o.properties)
                .build()
        });
        &SCHEMA
    }
}

/// Operation as returned by API version 2022-03-01
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationV2022_03_01 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_data_action: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<OperationDisplay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<OperationProperties>,
}

impl Materialize for OperationV2022_03_01 {
    const TYPE_NAME: &'static str = "Operation(2022-03-01)";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<OperationV2022_03_01>> = LazyLock::new(|| {
            Schema::<OperationV2022_03_01>::builder(OperationV2022_03_01::TYPE_NAME)
                .string("name", |o| &mut o.name)
                .boolean("isDataAction", |o| &mut o.is_data_action)
                .object::<OperationDisplay>("display", |o| &mut o.display)
                .string("origin", |o| &mut o.origin)
                .object::<OperationProperties>("properties", |o| &mut o.properties)
                .build()
        });
        &SCHEMA
    }
}

// ============================================================================
// Shared Nested Types
// ============================================================================

/// Localized display information for an operation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationDisplay {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Materialize for OperationDisplay {
    const TYPE_NAME: &'static str = "OperationDisplay";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<OperationDisplay>> = LazyLock::new(|| {
            Schema::<OperationDisplay>::builder(OperationDisplay::TYPE_NAME)
                .string("provider", |d| &mut d.provider)
                .string("resource", |d| &mut d.resource)
                .string("operation", |d| &mut d.operation)
                .string("description", |d| &mut d.description)
                .build()
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_specification: Option<ServiceSpecification>,
}

impl Materialize for OperationProperties {
    const TYPE_NAME: &'static str = "OperationProperties";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<OperationProperties>> = LazyLock::new(|| {
            Schema::<OperationProperties>::builder(OperationProperties::TYPE_NAME)
                .object::<ServiceSpecification>("serviceSpecification", |p| {
                    &mut p.service_specification
                })
                .build()
        });
        &SCHEMA
    }
}

/// Metrics and logs a resource type emits
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpecification {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metric_specifications: Vec<MetricSpecification>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub log_specifications: Vec<LogSpecification>,
}

impl Materialize for ServiceSpecification {
    const TYPE_NAME: &'static str = "ServiceSpecification";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<ServiceSpecification>> = LazyLock::new(|| {
            Schema::<ServiceSpecification>::builder(ServiceSpecification::TYPE_NAME)
                .objects::<MetricSpecification>("metricSpecifications", |s| {
                    &mut s.metric_specifications
                })
                .objects::<LogSpecification>("logSpecifications", |s| &mut s.log_specifications)
                .build()
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSpecification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_instance_level_aggregation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_regional_mdm_account: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_mdm_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_mdm_namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_filter_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_gap_with_zero: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_internal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<MetricDimension>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub availabilities: Vec<MetricAvailability>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supported_time_grain_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supported_aggregation_types: Vec<String>,
}

impl Materialize for MetricSpecification {
    const TYPE_NAME: &'static str = "MetricSpecification";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<MetricSpecification>> = LazyLock::new(|| {
            Schema::<MetricSpecification>::builder(MetricSpecification::TYPE_NAME)
                .string("name", |m| &mut m.name)
                .string("displayName", |m| &mut m.display_name)
                .string("displayDescription", |m| &mut m.display_description)
                .string("unit", |m| &mut m.unit)
                .string("aggregationType", |m| &mut m.aggregation_type)
                .boolean("supportsInstanceLevelAggregation", |m| {
                    &mut m.supports_instance_level_aggregation
                })
                .boolean("enableRegionalMdmAccount", |m| &mut m.enable_regional_mdm_account)
                .string("sourceMdmAccount", |m| &mut m.source_mdm_account)
                .string("sourceMdmNamespace", |m| &mut m.source_mdm_namespace)
                .string("metricFilterPattern", |m| &mut m.metric_filter_pattern)
                .boolean("fillGapWithZero", |m| &mut m.fill_gap_with_zero)
                .boolean("isInternal", |m| &mut m.is_internal)
                .string("category", |m| &mut m.category)
                .objects::<MetricDimension>("dimensions", |m| &mut m.dimensions)
                .objects::<MetricAvailability>("availabilities", |m| &mut m.availabilities)
                .strings("supportedTimeGrainTypes", |m| &mut m.supported_time_grain_types)
                .strings("supportedAggregationTypes", |m| {
                    &mut m.supported_aggregation_types
                })
                .build()
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDimension {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_be_exported_for_shoebox: Option<bool>,
}

impl Materialize for MetricDimension {
    const TYPE_NAME: &'static str = "MetricDimension";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<MetricDimension>> = LazyLock::new(|| {
            Schema::<MetricDimension>::builder(MetricDimension::TYPE_NAME)
                .string("name", |d| &mut d.name)
                .string("displayName", |d| &mut d.display_name)
                .string("internalName", |d| &mut d.internal_name)
                .boolean("toBeExportedForShoebox", |d| &mut d.to_be_exported_for_shoebox)
                .build()
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricAvailability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_grain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob_duration: Option<String>,
}

impl Materialize for MetricAvailability {
    const TYPE_NAME: &'static str = "MetricAvailability";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<MetricAvailability>> = LazyLock::new(|| {
            Schema::<MetricAvailability>::builder(MetricAvailability::TYPE_NAME)
                .string("timeGrain", |a| &mut a.time_grain)
                .string("blobDuration", |a| &mut a.blob_duration)
                .build()
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSpecification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter_pattern: Option<String>,
}

impl Materialize for LogSpecification {
    const TYPE_NAME: &'static str = "LogSpecification";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<LogSpecification>> = LazyLock::new(|| {
            Schema::<LogSpecification>::builder(LogSpecification::TYPE_NAME)
                .string("name", |l| &mut l.name)
                .string("displayName", |l| &mut l.display_name)
                .string("blobDuration", |l| &mut l.blob_duration)
                .string("logFilterPattern", |l| &mut l.log_filter_pattern)
                .build()
        });
        &SCHEMA
    }
}
