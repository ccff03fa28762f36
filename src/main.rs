use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lifecycle_actions::clients::ClientError;
use lifecycle_actions::lifecycle::tracing::setup_tracing;
use lifecycle_actions::lifecycle::{ClientConfig, ContentManagementSystem};
use lifecycle_actions::model::{
    BuildRequest, FilterEntity, FilterProperties, FilterRule, ProjectProperties, PromoteRequest,
};
use serde_json::Value;
use tracing::{debug, warn, Instrument};

#[derive(Parser, Debug)]
#[command(version, about = "Run content lifecycle actions against a management server")]
struct Cli {
    /// TOML configuration file (defaults to ./lifecycle.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Server URL, overriding the configuration.
    #[arg(long, global = true)]
    server: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    CreateProject {
        #[arg(long)]
        label: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    DeleteProject {
        #[arg(long)]
        label: String,
    },
    Build {
        #[arg(long)]
        project: String,
        #[arg(long)]
        message: Option<String>,
    },
    Promote {
        #[arg(long)]
        project: String,
        /// Environment whose content is promoted to its successor.
        #[arg(long)]
        environment: String,
    },
    CreateFilter {
        #[arg(long)]
        name: String,
        #[arg(long)]
        entity: FilterEntity,
        #[arg(long)]
        rule: FilterRule,
        #[arg(long, default_value = "contains")]
        matcher: String,
        #[arg(long)]
        key: String,
        #[arg(long)]
        value: String,
        /// Attach the new filter to this project.
        #[arg(long)]
        project: Option<String>,
    },
}

async fn run_command(
    system: &ContentManagementSystem,
    command: Command,
) -> Result<Value, ClientError> {
    match command {
        Command::CreateProject {
            label,
            name,
            description,
        } => {
            let mut project = ProjectProperties::new(label.clone(), name);
            project.description = description;
            let outcome = system.projects.create_project(&project).await;
            system.notify_outcome(outcome, format!("Project '{label}' created"))
        }
        Command::DeleteProject { label } => {
            let outcome = system.projects.delete_project(&label).await;
            system.notify_outcome(outcome, format!("Project '{label}' deleted"))
        }
        Command::Build { project, message } => {
            let request = BuildRequest {
                project_label: project.clone(),
                message,
            };
            let outcome = system.builds.build(&request).await;
            system.notify_outcome(outcome, format!("Build of '{project}' started"))
        }
        Command::Promote {
            project,
            environment,
        } => {
            let request = PromoteRequest {
                project_label: project,
                environment_promote_label: environment.clone(),
            };
            let outcome = system.promotions.promote(&request).await;
            system.notify_outcome(outcome, format!("Promotion of '{environment}' started"))
        }
        Command::CreateFilter {
            name,
            entity,
            rule,
            matcher,
            key,
            value,
            project,
        } => {
            let filter = FilterProperties {
                project_label: project,
                name: name.clone(),
                entity_type: entity,
                rule,
                matcher,
                criteria_key: key,
                criteria_value: value,
            };
            let outcome = system.filters.create_filter(&filter).await;
            system.notify_outcome(outcome, format!("Filter '{name}' created"))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();
    setup_tracing();

    let config = ClientConfig::load_with_server(cli.config.as_deref(), cli.server)
        .map_err(|e| e.to_string())?;

    let system = ContentManagementSystem::new(&config).map_err(|e| e.to_string())?;
    debug!(command = ?cli.command, "Running command");

    let span = tracing::info_span!("command");
    let run = run_command(&system, cli.command).instrument(span);
    tokio::pin!(run);

    let outcome = tokio::select! {
        outcome = &mut run => outcome,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling in-flight requests");
            system.cancel_all();
            run.await
        }
    };

    match outcome {
        Ok(Value::Null) => Ok(()),
        Ok(data) => {
            let pretty = serde_json::to_string_pretty(&data).map_err(|e| e.to_string())?;
            println!("{pretty}");
            Ok(())
        }
        Err(e) => Err(e.to_string()),
    }
}
