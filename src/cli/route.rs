//! CLI route: single route table and run context. Dispatches to the snapshot
//! command service and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::{Cli, Commands, ConfigCommands, OutputFormat, SnapshotCommands};
use crate::cli::presentation::{
    format_config_path, format_config_show, format_snapshot_created,
    format_snapshot_delete_cancelled, format_snapshot_deleted,
    format_snapshot_detail, format_snapshot_list, format_snapshot_tenants, format_snapshot_vms,
    OutputOptions,
};
use crate::cli::prompt::{DialoguerPrompter, Prompter};
use crate::client::VergeClient;
use crate::config::{ConfigLoader, ProfileOverrides, VrgConfig};
use crate::error::VrgError;
use crate::snapshot::{
    CreateSnapshotOptions, SnapshotCommandService, SnapshotManager, SnapshotRef, WaitPolicy,
};
use crate::table;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Runtime context for CLI execution: effective config, connection overrides,
/// output options, and the snapshot collaborator (built lazily from the
/// selected profile unless injected).
pub struct RunContext {
    config: VrgConfig,
    config_path: Option<PathBuf>,
    profile: Option<String>,
    overrides: ProfileOverrides,
    manager: Option<Arc<dyn SnapshotManager>>,
    prompter: Box<dyn Prompter>,
    output: OutputOptions,
    wait: WaitPolicy,
}

impl RunContext {
    /// Build from parsed flags and loaded config. No network access happens
    /// here.
    pub fn from_cli(cli: &Cli, config: VrgConfig) -> Result<Self, VrgError> {
        let format = match cli.output {
            Some(format) => format,
            None => OutputFormat::parse_config(&config.output.format).ok_or_else(|| {
                VrgError::ConfigError(format!(
                    "invalid output.format '{}'",
                    config.output.format
                ))
            })?,
        };
        let output = OutputOptions {
            format,
            color: table::should_color(cli.no_color || !config.output.color),
        };
        let overrides = ProfileOverrides {
            host: cli.host.clone(),
            username: cli.username.clone(),
            password: cli.password.clone(),
            token: cli.token.clone(),
            insecure: cli.insecure,
        };
        let config_path = cli
            .config
            .clone()
            .or_else(ConfigLoader::global_config_path);
        let wait = config.wait.policy();

        Ok(Self {
            config,
            config_path,
            profile: cli.profile.clone(),
            overrides,
            manager: None,
            prompter: Box::new(DialoguerPrompter),
            output,
            wait,
        })
    }

    /// Context with an injected snapshot collaborator.
    pub fn with_manager(config: VrgConfig, manager: Arc<dyn SnapshotManager>) -> Self {
        let wait = config.wait.policy();
        Self {
            config,
            config_path: None,
            profile: None,
            overrides: ProfileOverrides::default(),
            manager: Some(manager),
            prompter: Box::new(DialoguerPrompter),
            output: OutputOptions::default(),
            wait,
        }
    }

    pub fn with_prompter(mut self, prompter: Box<dyn Prompter>) -> Self {
        self.prompter = prompter;
        self
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    pub fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    pub fn output(&self) -> &OutputOptions {
        &self.output
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, VrgError> {
        let started = Instant::now();
        let name = command_name(command);
        debug!(command = %name, "Command started");

        let result = match command {
            Commands::Snapshot { command } => self.run_async(self.handle_snapshot_command(command)),
            Commands::Config { command } => self.handle_config_command(command),
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        info!(command = %name, duration_ms, ok = result.is_ok(), "Command finished");
        result
    }

    fn run_async<F>(&self, future: F) -> Result<String, VrgError>
    where
        F: std::future::Future<Output = Result<String, VrgError>>,
    {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        rt.block_on(future)
    }

    fn manager(&self) -> Result<Arc<dyn SnapshotManager>, VrgError> {
        if let Some(manager) = &self.manager {
            return Ok(Arc::clone(manager));
        }
        let mut profile = self.config.select_profile(self.profile.as_deref())?;
        profile.apply(&self.overrides);
        let client = VergeClient::from_profile(&profile)?;
        debug!(base_url = client.base_url(), "Connecting to VergeOS");
        Ok(Arc::new(client))
    }

    async fn handle_snapshot_command(&self, command: &SnapshotCommands) -> Result<String, VrgError> {
        match command {
            SnapshotCommands::List { include_expired } => {
                let manager = self.manager()?;
                let service = SnapshotCommandService::new(manager.as_ref(), self.wait);
                let now = chrono::Utc::now().timestamp();
                let snapshots = service.list(*include_expired, now).await?;
                Ok(format_snapshot_list(&snapshots, &self.output))
            }
            SnapshotCommands::Get { snapshot } => {
                let reference: SnapshotRef = snapshot.parse()?;
                let manager = self.manager()?;
                let service = SnapshotCommandService::new(manager.as_ref(), self.wait);
                let found = service.get(&reference).await?;
                Ok(format_snapshot_detail(&found, &self.output))
            }
            SnapshotCommands::Create {
                name,
                retention,
                never_expire,
                immutable,
                private,
                wait,
            } => {
                let options = CreateSnapshotOptions::from_flags(
                    name.as_deref(),
                    *retention,
                    *never_expire,
                    *immutable,
                    *private,
                    *wait,
                )?;
                let manager = self.manager()?;
                let service = SnapshotCommandService::new(manager.as_ref(), self.wait);
                let created = service.create(&options).await?;
                Ok(format_snapshot_created(&created, &self.output))
            }
            SnapshotCommands::Delete { snapshot, yes } => {
                let reference: SnapshotRef = snapshot.parse()?;
                let manager = self.manager()?;
                let service = SnapshotCommandService::new(manager.as_ref(), self.wait);
                let target = service.resolve(&reference).await?;
                if !*yes {
                    let confirmed = self.prompter.confirm(&format!(
                        "Delete cloud snapshot '{}' (key {})?",
                        target.name, target.key
                    ))?;
                    if !confirmed {
                        return Ok(format_snapshot_delete_cancelled(
                            &target,
                            &self.output,
                        ));
                    }
                }
                service.delete(&target).await?;
                Ok(format_snapshot_deleted(&target, &self.output))
            }
            SnapshotCommands::Vms { snapshot } => {
                let reference: SnapshotRef = snapshot.parse()?;
                let manager = self.manager()?;
                let service = SnapshotCommandService::new(manager.as_ref(), self.wait);
                let (found, vms) = service.vms(&reference).await?;
                Ok(format_snapshot_vms(&found, &vms, &self.output))
            }
            SnapshotCommands::Tenants { snapshot } => {
                let reference: SnapshotRef = snapshot.parse()?;
                let manager = self.manager()?;
                let service = SnapshotCommandService::new(manager.as_ref(), self.wait);
                let (found, tenants) = service.tenants(&reference).await?;
                Ok(format_snapshot_tenants(&found, &tenants, &self.output))
            }
        }
    }

    fn handle_config_command(&self, command: &ConfigCommands) -> Result<String, VrgError> {
        match command {
            ConfigCommands::Show => format_config_show(&self.config),
            ConfigCommands::Path => Ok(format_config_path(self.config_path.as_deref())),
        }
    }
}
