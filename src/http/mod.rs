//! HTTP module
//!
//! Talks to Azure Resource Manager collection endpoints.
//!
//! # Features
//!
//! - **Bearer Tokens**: An already issued access token is sent on every request
//! - **Error Classification**: 5xx and transport failures are unavailable,
//!   other failures are rejected with the ARM error code and message
//! - **Collections**: `ArmCollection` implements `PageFetcher` and
//!   `RecordLookup` over `{ "value": [...], "nextLink": "..." }` envelopes

mod client;
mod collection;

pub use client::{ArmClient, ArmClientConfig, ArmClientConfigBuilder, DEFAULT_ENDPOINT};
pub use collection::ArmCollection;
