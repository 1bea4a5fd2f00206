//! CLI runner - executes commands

use super::commands::{
    AttestationCommands, Cli, Commands, IncidentCommands, ListArgs, OperationCommands,
};
use super::output::Emitter;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{ArmClient, ArmCollection};
use crate::models::{
    attestation_providers_path, incidents_path, list_operations, ApiVersion, AttestationProvider,
    Incident, ATTESTATION_API_VERSION, DEFAULT_PROVIDERS_PATH, INCIDENTS_API_VERSION,
    OPERATIONS_PATH,
};
use crate::pagination::{get, list, ListOptions, ListQuery};
use crate::resource_id::ResourceId;
use futures::stream::BoxStream;
use futures::TryStreamExt;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing objects to stdout
    pub async fn run(&self) -> Result<()> {
        let mut stdout = std::io::stdout();
        self.run_with(&mut stdout).await
    }

    /// Run the CLI command, writing objects to `out`
    pub async fn run_with<W: Write>(&self, out: &mut W) -> Result<()> {
        let config = self.config()?;
        let client = ArmClient::with_config(config.client_config())?;
        let mut emitter = Emitter::new(out, self.cli.format);
        debug!("Using {config:?}");

        match &self.cli.command {
            Commands::Incidents { command } => {
                self.incidents(command, &config, client, &mut emitter).await
            }
            Commands::Operations { command } => {
                self.operations(command, &config, client, &mut emitter)
                    .await
            }
            Commands::Attestation { command } => {
                self.attestation(command, &config, client, &mut emitter)
                    .await
            }
        }
    }

    /// Resolve settings: file, then environment, then flags
    pub fn config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::resolve(self.cli.config.as_deref())?;
        if let Some(endpoint) = &self.cli.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(subscription) = &self.cli.subscription {
            config.subscription_id = Some(subscription.clone());
        }
        if let Some(token) = &self.cli.token {
            config.access_token = Some(token.clone());
        }
        config.validate()?;
        Ok(config)
    }

    // ========================================================================
    // Incidents
    // ========================================================================

    async fn incidents<W: Write>(
        &self,
        command: &IncidentCommands,
        config: &ClientConfig,
        client: ArmClient,
        emitter: &mut Emitter<'_, W>,
    ) -> Result<()> {
        match command {
            IncidentCommands::List { workspace, list: args } => {
                let path = incidents_path(
                    config.require_subscription()?,
                    &workspace.resource_group,
                    &workspace.workspace,
                );
                let collection = ArmCollection::new(client, path, INCIDENTS_API_VERSION);
                let stream = list::<Incident, _>(&collection, list_options(args, config));
                let count = emit_all(stream, emitter).await?;
                info!("Listed {count} incidents");
                Ok(())
            }
            IncidentCommands::Get {
                resource_group,
                workspace,
                incident_id,
                resource_id,
            } => {
                let id = lookup_id(incident_id.as_deref(), resource_id.as_deref(), "incidents")?;
                let scope = Scope::resolve(
                    resource_id.as_deref(),
                    config,
                    resource_group.as_deref(),
                    workspace.as_deref(),
                )?;
                let path = incidents_path(
                    &scope.subscription_id,
                    &scope.resource_group()?,
                    &scope.workspace()?,
                );
                let collection = ArmCollection::new(client, path, INCIDENTS_API_VERSION);
                let incident: Incident = get(&collection, id).await?;
                emitter.emit(&incident)
            }
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    async fn operations<W: Write>(
        &self,
        command: &OperationCommands,
        config: &ClientConfig,
        client: ArmClient,
        emitter: &mut Emitter<'_, W>,
    ) -> Result<()> {
        let OperationCommands::List {
            api_version,
            list: args,
        } = command;
        let version: ApiVersion = *api_version;

        let collection = ArmCollection::new(client, OPERATIONS_PATH, version.as_str());
        let stream = list_operations(&collection, version, list_options(args, config));
        let count = emit_all(stream, emitter).await?;
        info!("Listed {count} operations ({version})");
        Ok(())
    }

    // ========================================================================
    // Attestation
    // ========================================================================

    async fn attestation<W: Write>(
        &self,
        command: &AttestationCommands,
        config: &ClientConfig,
        client: ArmClient,
        emitter: &mut Emitter<'_, W>,
    ) -> Result<()> {
        match command {
            AttestationCommands::List {
                resource_group,
                default,
                list: args,
            } => {
                let path = if *default {
                    DEFAULT_PROVIDERS_PATH.to_string()
                } else {
                    attestation_providers_path(
                        config.require_subscription()?,
                        resource_group.as_deref(),
                    )
                };
                let collection = ArmCollection::new(client, path, ATTESTATION_API_VERSION);
                let stream =
                    list::<AttestationProvider, _>(&collection, list_options(args, config));
                let count = emit_all(stream, emitter).await?;
                info!("Listed {count} attestation providers");
                Ok(())
            }
            AttestationCommands::Get {
                resource_group,
                name,
                resource_id,
            } => {
                let id = lookup_id(name.as_deref(), resource_id.as_deref(), "attestationProviders")?;
                let scope =
                    Scope::resolve(resource_id.as_deref(), config, resource_group.as_deref(), None)?;
                let path = attestation_providers_path(
                    &scope.subscription_id,
                    Some(&scope.resource_group()?),
                );
                let collection = ArmCollection::new(client, path, ATTESTATION_API_VERSION);
                let provider: AttestationProvider = get(&collection, id).await?;
                emitter.emit(&provider)
            }
        }
    }
}

/// Subscription, resource group and workspace of a point lookup
///
/// Values embedded in a full resource ID win over flags and configuration.
#[derive(Debug)]
struct Scope {
    subscription_id: String,
    resource_group: Option<String>,
    workspace: Option<String>,
}

impl Scope {
    fn resolve(
        resource_id: Option<&str>,
        config: &ClientConfig,
        resource_group: Option<&str>,
        workspace: Option<&str>,
    ) -> Result<Self> {
        let parsed = resource_id.map(ResourceId::parse).transpose()?;
        let from_id = |pick: fn(&ResourceId) -> Option<&str>| {
            parsed.as_ref().and_then(pick).map(String::from)
        };

        let subscription_id = match from_id(ResourceId::subscription_id) {
            Some(sub) => sub,
            None => config.require_subscription()?.to_string(),
        };

        Ok(Self {
            subscription_id,
            resource_group: from_id(ResourceId::resource_group)
                .or_else(|| resource_group.map(String::from)),
            workspace: from_id(ResourceId::workspace_name).or_else(|| workspace.map(String::from)),
        })
    }

    fn resource_group(&self) -> Result<String> {
        self.resource_group
            .clone()
            .ok_or_else(|| Error::missing_field("resource_group"))
    }

    fn workspace(&self) -> Result<String> {
        self.workspace
            .clone()
            .ok_or_else(|| Error::missing_field("workspace"))
    }
}

/// The identifier passed to a point lookup: a name, or a full resource ID
/// whose innermost type is `resource_type`
fn lookup_id<'a>(
    name: Option<&'a str>,
    resource_id: Option<&'a str>,
    resource_type: &str,
) -> Result<&'a str> {
    if let Some(name) = name {
        return Ok(name);
    }
    let id = resource_id.ok_or_else(|| Error::missing_field("name or resource_id"))?;
    match ResourceId::parse(id)?.resource_type() {
        Some(found) if found.eq_ignore_ascii_case(resource_type) => Ok(id),
        Some(found) => Err(Error::invalid_resource_id(
            id,
            format!("expected a {resource_type} resource, found {found}"),
        )),
        None => Err(Error::invalid_resource_id(
            id,
            format!("expected a {resource_type} resource"),
        )),
    }
}

/// Build list options from flags, falling back to the configured maximum
fn list_options(args: &ListArgs, config: &ClientConfig) -> ListOptions {
    let mut query = ListQuery::new();
    if let Some(filter) = &args.filter {
        query = query.with_filter(filter.as_str());
    }
    if let Some(order_by) = &args.order_by {
        query = query.with_order_by(order_by.as_str());
    }
    if let Some(top) = args.top {
        query = query.with_top(top);
    }

    ListOptions::new()
        .with_max(Some(args.max.unwrap_or(config.default_max)))
        .with_query(query)
}

/// Write every object of a stream as it arrives
async fn emit_all<T: Serialize, W: Write>(
    mut stream: BoxStream<'_, Result<T>>,
    emitter: &mut Emitter<'_, W>,
) -> Result<usize> {
    while let Some(item) = stream.try_next().await? {
        emitter.emit(&item)?;
    }
    Ok(emitter.count())
}
