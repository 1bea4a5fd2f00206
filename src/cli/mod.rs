//! CLI module
//!
//! Command-line interface for listing and looking up ARM resources.
//!
//! # Commands
//!
//! - `incidents list|get` - Microsoft Sentinel incidents
//! - `operations list` - Microsoft.Web operations, per API version
//! - `attestation list|get` - Attestation providers

mod commands;
mod output;
mod runner;

pub use commands::{
    AttestationCommands, Cli, Commands, IncidentCommands, ListArgs, OperationCommands,
    OutputFormat, WorkspaceArgs,
};
pub use output::Emitter;
pub use runner::Runner;
