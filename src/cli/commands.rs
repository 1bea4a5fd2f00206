//! CLI commands and argument parsing

use crate::models::ApiVersion;
use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// List and look up Azure Resource Manager resources
#[derive(Parser, Debug)]
#[command(name = "arm-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Management endpoint (overrides config and ARM_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Subscription ID (overrides config and AZURE_SUBSCRIPTION_ID)
    #[arg(short, long, global = true)]
    pub subscription: Option<String>,

    /// Bearer token (overrides config and AZURE_ACCESS_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Microsoft Sentinel incidents
    Incidents {
        #[command(subcommand)]
        command: IncidentCommands,
    },

    /// Microsoft.Web resource provider operations
    Operations {
        #[command(subcommand)]
        command: OperationCommands,
    },

    /// Attestation providers
    Attestation {
        #[command(subcommand)]
        command: AttestationCommands,
    },
}

/// Incident subcommands
#[derive(Subcommand, Debug)]
pub enum IncidentCommands {
    /// List incidents in a workspace
    List {
        #[command(flatten)]
        workspace: WorkspaceArgs,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Get one incident by ID or full resource ID
    Get {
        /// Resource group of the workspace
        #[arg(short = 'g', long)]
        resource_group: Option<String>,

        /// Log Analytics workspace name
        #[arg(short, long)]
        workspace: Option<String>,

        /// Incident ID (name)
        #[arg(long, required_unless_present = "resource_id", conflicts_with = "resource_id")]
        incident_id: Option<String>,

        /// Full incident resource ID
        #[arg(long)]
        resource_id: Option<String>,
    },
}

/// Operation subcommands
#[derive(Subcommand, Debug)]
pub enum OperationCommands {
    /// List the operations of the Microsoft.Web provider
    List {
        /// API version selecting the operation shape
        #[arg(long, default_value = "2022-03-01")]
        api_version: ApiVersion,

        #[command(flatten)]
        list: ListArgs,
    },
}

/// Attestation subcommands
#[derive(Subcommand, Debug)]
pub enum AttestationCommands {
    /// List attestation providers in the subscription or a resource group
    List {
        /// Restrict to one resource group
        #[arg(short = 'g', long)]
        resource_group: Option<String>,

        /// List the shared default providers instead
        #[arg(long, conflicts_with = "resource_group")]
        default: bool,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Get one attestation provider
    Get {
        /// Resource group of the provider
        #[arg(short = 'g', long)]
        resource_group: Option<String>,

        /// Provider name
        #[arg(short, long, required_unless_present = "resource_id", conflicts_with = "resource_id")]
        name: Option<String>,

        /// Full provider resource ID
        #[arg(long)]
        resource_id: Option<String>,
    },
}

/// Sentinel workspace scope
#[derive(Args, Debug, Clone)]
pub struct WorkspaceArgs {
    /// Resource group of the workspace
    #[arg(short = 'g', long)]
    pub resource_group: String,

    /// Log Analytics workspace name
    #[arg(short, long)]
    pub workspace: String,
}

/// Options shared by list commands
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// OData filter, sent with the first request
    #[arg(long)]
    pub filter: Option<String>,

    /// OData ordering, sent with the first request
    #[arg(long)]
    pub order_by: Option<String>,

    /// Page size hint
    #[arg(long)]
    pub top: Option<u32>,

    /// Stop after at least this many records
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub max: Option<usize>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one object per line)
    Json,
    /// Indented JSON
    Pretty,
}
