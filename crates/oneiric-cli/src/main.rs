// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The Oneiric CLI: a thin `clap` front end over the runtime aggregate
//! (§4.11). Every subcommand either inspects the registry/resolver/
//! lifecycle state directly or boots the full [`Runtime`] and drives it.

mod commands;
mod exit_error;
mod output;
mod workflows;

use clap::{Parser, Subcommand};
use exit_error::ExitError;
use oneiric_core::Domain;
use oneiric_remote::FactoryRegistry;
use oneiric_runtime::{Profile, Runtime, RuntimeConfig};
use output::OutputFormat;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "oneiric", version, about = "Resolve, activate, and orchestrate Oneiric's provider candidates")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered candidates.
    List {
        #[arg(long)]
        domain: Option<Domain>,
        #[arg(long)]
        shadowed: bool,
        #[arg(long)]
        json: bool,
    },
    /// Lifecycle entries for every bound slot in a domain.
    Status {
        #[arg(long)]
        domain: Domain,
        #[arg(long)]
        json: bool,
    },
    /// The resolver's audit trail for one (domain, key).
    Explain {
        #[arg(long)]
        domain: Domain,
        #[arg(long)]
        key: String,
        #[arg(long)]
        json: bool,
    },
    /// The last readiness snapshot.
    Health {
        #[arg(long)]
        probe: bool,
        #[arg(long)]
        json: bool,
    },
    /// Declared pause/drain intent across every slot.
    Activity {
        #[arg(long)]
        json: bool,
    },
    /// Boot the runtime (or inspect its static shape without running it).
    Orchestrate {
        #[arg(long)]
        profile: Option<Profile>,
        #[arg(long)]
        no_remote: bool,
        #[arg(long)]
        health_path: Option<PathBuf>,
        #[arg(long)]
        print_dag: bool,
        #[arg(long)]
        workflow: Option<String>,
        #[arg(long)]
        events: bool,
        #[arg(long)]
        inspect_json: bool,
        #[arg(long)]
        topic: Option<String>,
    },
    /// Emit an event onto the event domain.
    Event {
        #[command(subcommand)]
        action: EventCommand,
    },
    /// Run or enqueue a workflow.
    Workflow {
        #[command(subcommand)]
        action: WorkflowCommand,
    },
    /// Invoke a task-domain candidate directly, outside any workflow.
    ActionInvoke {
        name: String,
        #[arg(long)]
        payload: String,
        #[arg(long)]
        workflow: Option<String>,
        #[arg(long)]
        send_notification: bool,
        #[arg(long)]
        notify_adapter: Option<String>,
        #[arg(long)]
        notify_target: Option<String>,
    },
    /// Static facts about the supervisor.
    SupervisorInfo {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum EventCommand {
    Emit {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        payload: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WorkflowCommand {
    Run {
        key: String,
        #[arg(long)]
        context: String,
        #[arg(long)]
        json: bool,
    },
    Enqueue {
        key: String,
        #[arg(long)]
        queue_category: Option<String>,
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

fn parse_json(raw: &str) -> Result<serde_json::Value, ExitError> {
    serde_json::from_str(raw).map_err(|error| ExitError::new(2, format!("invalid JSON: {error}")))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("ONEIRIC_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let code = match run().await {
        Ok(()) => 0,
        Err(error) => {
            if !error.message.is_empty() {
                eprintln!("error: {error}");
            }
            error.code
        }
    };
    std::process::exit(code);
}

async fn run() -> Result<(), ExitError> {
    let cli = Cli::parse();
    let mut config = RuntimeConfig::load().map_err(ExitError::from)?;
    let state_dir = oneiric_runtime::config::state_dir().map_err(ExitError::from)?;

    if let Command::Orchestrate { profile, no_remote, health_path, .. } = &cli.command {
        if let Some(profile) = profile {
            config.profile = *profile;
        }
        if *no_remote {
            config.remote.manifests.clear();
        }
        if let Some(health_path) = health_path {
            config.runtime_paths.readiness = Some(health_path.clone());
        }
    }

    match cli.command {
        Command::List { domain, shadowed, json } => {
            let runtime = bootstrap(config).await?;
            let result = commands::list::handle(&runtime, domain, shadowed, OutputFormat::from_json_flag(json)).await;
            runtime.shutdown().await;
            result
        }
        Command::Status { domain, json } => {
            let runtime = bootstrap(config).await?;
            let result = commands::status::handle(&runtime, domain, OutputFormat::from_json_flag(json)).await;
            runtime.shutdown().await;
            result
        }
        Command::Explain { domain, key, json } => {
            let runtime = bootstrap(config).await?;
            let result = commands::explain::handle(&runtime, domain, &key, OutputFormat::from_json_flag(json)).await;
            runtime.shutdown().await;
            result
        }
        Command::Health { probe, json } => {
            let readiness_path = config.runtime_paths.readiness_path(&state_dir);
            let runtime = bootstrap(config).await?;
            let result = commands::health::handle(&runtime, &readiness_path, probe, OutputFormat::from_json_flag(json)).await;
            runtime.shutdown().await;
            result
        }
        Command::Activity { json } => {
            let runtime = bootstrap(config).await?;
            let result = commands::activity::handle(&runtime, OutputFormat::from_json_flag(json)).await;
            runtime.shutdown().await;
            result
        }
        Command::Orchestrate { print_dag, workflow, events, inspect_json, topic, .. } => {
            let definitions_dir = config.workflows.definitions_dir(&state_dir);
            if print_dag {
                let workflow_key =
                    workflow.ok_or_else(|| ExitError::new(2, "--print-dag requires --workflow".to_string()))?;
                return commands::orchestrate::print_dag(&definitions_dir, &workflow_key).await;
            }

            let runtime = bootstrap(config).await?;
            if events && inspect_json {
                let result = commands::orchestrate::inspect_events(&runtime, topic.as_deref());
                runtime.shutdown().await;
                return result;
            }
            commands::orchestrate::run(runtime).await
        }
        Command::Event { action: EventCommand::Emit { topic, payload, json } } => {
            let payload = parse_json(&payload)?;
            let runtime = bootstrap(config).await?;
            let result =
                commands::event::handle_emit(&runtime, &topic, payload, OutputFormat::from_json_flag(json)).await;
            runtime.shutdown().await;
            result
        }
        Command::Workflow { action: WorkflowCommand::Run { key, context, json } } => {
            let definitions_dir = config.workflows.definitions_dir(&state_dir);
            let context = parse_json(&context)?;
            let runtime = bootstrap(config).await?;
            let result = commands::workflow::handle_run(
                &runtime,
                &definitions_dir,
                &key,
                context,
                OutputFormat::from_json_flag(json),
            )
            .await;
            runtime.shutdown().await;
            result
        }
        Command::Workflow { action: WorkflowCommand::Enqueue { key, queue_category, provider, json } } => {
            let definitions_dir = config.workflows.definitions_dir(&state_dir);
            let runtime = bootstrap(config).await?;
            let result = commands::workflow::handle_enqueue(
                &runtime,
                &definitions_dir,
                &key,
                queue_category.as_deref(),
                provider.as_deref(),
                OutputFormat::from_json_flag(json),
            )
            .await;
            runtime.shutdown().await;
            result
        }
        Command::ActionInvoke { name, payload, workflow, send_notification, notify_adapter, notify_target } => {
            let payload = parse_json(&payload)?;
            let runtime = bootstrap(config).await?;
            let result = commands::action_invoke::handle(
                &runtime,
                &name,
                payload,
                workflow.as_deref(),
                send_notification,
                notify_adapter.as_deref(),
                notify_target.as_deref(),
            )
            .await;
            runtime.shutdown().await;
            result
        }
        Command::SupervisorInfo { json } => {
            let profile = config.profile;
            let runtime = bootstrap(config).await?;
            let result = commands::supervisor_info::handle(&runtime, profile, OutputFormat::from_json_flag(json)).await;
            runtime.shutdown().await;
            result
        }
    }
}

async fn bootstrap(config: RuntimeConfig) -> Result<Runtime, ExitError> {
    let factories = Arc::new(FactoryRegistry::new());
    Runtime::bootstrap(config, factories).await.map_err(ExitError::from)
}
