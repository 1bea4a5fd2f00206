// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # arm-pager
//!
//! Paginated listing and typed materialization of Azure Resource Manager
//! resources.
//!
//! ## Features
//!
//! - **List Until Max**: Follows `nextLink` tokens lazily and stops after at
//!   least `max` records, never truncating a page
//! - **Point Lookups**: By bare name or full resource ID; no match is `NotFound`
//! - **Typed Records**: Static per-type schemas turn raw JSON maps into domain
//!   objects, reporting the full field path on mismatches
//! - **Versioned Models**: One enum per resource, one variant per API version
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use arm_pager::http::{ArmClient, ArmCollection};
//! use arm_pager::models::{incidents_path, Incident, INCIDENTS_API_VERSION};
//! use arm_pager::pagination::{list, ListOptions, ListQuery};
//! use futures::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> arm_pager::Result<()> {
//!     let client = ArmClient::new()?;
//!     let incidents = ArmCollection::new(
//!         client,
//!         incidents_path("sub-id", "soc-rg", "soc-ws"),
//!         INCIDENTS_API_VERSION,
//!     );
//!
//!     let options = ListOptions::new()
//!         .with_max(Some(200))
//!         .with_query(ListQuery::new().with_filter("properties/severity eq 'High'"));
//!
//!     let mut stream = list::<Incident, _>(&incidents, options);
//!     while let Some(incident) = stream.try_next().await? {
//!         println!("{:?}", incident.title());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CLI (incidents, ...)                   │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴──────────┬───────────────────┐
//! │     HTTP     │        Pagination        │    Materialize    │
//! ├──────────────┼──────────────────────────┼───────────────────┤
//! │ ArmClient    │ PageFetcher              │ Schema<T>         │
//! │ ArmCollection│ list / get               │ Hooks<T>          │
//! │ nextLink     │ stop after max           │ field paths       │
//! └──────────────┴──────────────────────────┴───────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Record to domain object conversion
pub mod materialize;

/// List-until-max driver and point lookups
pub mod pagination;

/// ARM HTTP client and collections
pub mod http;

/// ARM resource identifiers
pub mod resource_id;

/// Domain models
pub mod models;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use materialize::{materialize, Materialize, Materializer, Schema};
pub use pagination::{collect_all, get, list, ListOptions, ListQuery, PageFetcher, RecordLookup};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
