//! Domain models
//!
//! Typed views of the ARM resources this crate lists and looks up. Each type
//! implements `Materialize` with a static schema and serializes back to the
//! service's camelCase wire names.

mod attestation;
mod incident;
mod operation;

pub use attestation::{
    attestation_providers_path, AttestationProvider, AttestationProviderProperties,
    ATTESTATION_API_VERSION, DEFAULT_PROVIDERS_PATH,
};
pub use incident::{
    incidents_path, Incident, IncidentAdditionalData, IncidentLabel, IncidentOwner,
    IncidentProperties, IncidentSeverity, IncidentStatus, INCIDENTS_API_VERSION,
};
pub use operation::{
    list_operations, ApiVersion, LogSpecification, MetricAvailability, MetricDimension,
    MetricSpecification, Operation, OperationDisplay, OperationProperties, OperationV2019_04_01,
    OperationV2022_03_01, ServiceSpecification, OPERATIONS_PATH,
};

#[cfg(test)]
mod tests;
