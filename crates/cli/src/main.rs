//! TripleO Actions CLI - run TripleO workflow actions from the command line

mod config;
mod logging;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tabled::{Table, Tabled};

use config::Settings;
use tripleo_actions_core::application::ActionName;
use tripleo_actions_core::domain::{ActionResult, Kwargs};

#[derive(Parser)]
#[command(name = "tripleo-actions")]
#[command(about = "TripleO workflow actions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    settings: Settings,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a registered action and print its result as JSON
    Run {
        /// Action name (e.g., tripleo.ansible-playbook)
        action: String,

        /// Keyword arguments as a JSON object
        #[arg(long, conflicts_with = "input_file")]
        input: Option<String>,

        /// Read keyword arguments from a JSON file
        #[arg(long)]
        input_file: Option<PathBuf>,
    },

    /// List registered actions
    Actions,

    /// Create a plan container
    CreateContainer {
        /// Container name
        name: String,
    },

    /// Create a plan from a container holding a capabilities map
    CreatePlan {
        /// Container name
        name: String,
    },

    /// List plans
    ListPlans,
}

#[derive(Tabled)]
struct ActionRow {
    action: &'static str,
}

#[derive(Tabled)]
struct PlanRow {
    plan: String,
}

fn read_kwargs(input: Option<String>, input_file: Option<PathBuf>) -> Result<Kwargs> {
    let raw = match (input, input_file) {
        (Some(input), _) => input,
        (None, Some(path)) => {
            let path = shellexpand::tilde(&path.to_string_lossy()).into_owned();
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read input file {}", path))?
        }
        (None, None) => return Ok(Map::new()),
    };

    match serde_json::from_str(&raw).context("Invalid JSON input")? {
        Value::Object(kwargs) => Ok(kwargs),
        other => bail!("Input must be a JSON object, got {}", other),
    }
}

fn container_kwargs(name: String) -> Kwargs {
    let mut kwargs = Map::new();
    kwargs.insert("container".to_string(), Value::String(name));
    kwargs
}

/// Print a result; returns whether it was a success
fn report(result: &ActionResult<Value>, success: impl FnOnce(&Value)) -> bool {
    match result {
        ActionResult::Data(data) => {
            success(data);
            true
        }
        ActionResult::Error(message) => {
            eprintln!("{} {}", "✗".red().bold(), message);
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.settings.log_format)?;

    if let Commands::Actions = cli.command {
        println!("{}", Table::new(ActionName::ALL.map(|name| ActionRow { action: name.as_str() })));
        return Ok(());
    }

    let registry = cli.settings.registry()?;
    let ctx = cli.settings.context();

    let ok = match cli.command {
        Commands::Run {
            action,
            input,
            input_file,
        } => {
            let name: ActionName = action.parse()?;
            let kwargs = read_kwargs(input, input_file)?;

            let result = registry.run(name, kwargs, &ctx).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            !result.is_error()
        }

        Commands::CreateContainer { name } => {
            let result = registry
                .run(ActionName::CreateContainer, container_kwargs(name.clone()), &ctx)
                .await?;
            report(&result, |_| {
                println!("{}", format!("✓ Container {} created", name).green().bold())
            })
        }

        Commands::CreatePlan { name } => {
            let result = registry
                .run(ActionName::CreatePlan, container_kwargs(name.clone()), &ctx)
                .await?;
            report(&result, |_| {
                println!("{}", format!("✓ Plan {} created", name).green().bold())
            })
        }

        Commands::ListPlans => {
            let result = registry.run(ActionName::ListPlans, Map::new(), &ctx).await?;
            report(&result, |data| {
                let rows: Vec<PlanRow> = data
                    .as_array()
                    .map(|plans| {
                        plans
                            .iter()
                            .filter_map(Value::as_str)
                            .map(|plan| PlanRow {
                                plan: plan.to_string(),
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                if rows.is_empty() {
                    println!("{}", "No plans found".yellow());
                } else {
                    println!("{}", Table::new(rows));
                }
            })
        }

        Commands::Actions => true,
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
