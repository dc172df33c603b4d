// Godot Gateway - Main Entry Point
//
// Command-line caller for the execution gateway:
// - exec: validate a request and run it through the engine
// - operations: list the whitelist
// - check-path: run the path validator on its own
// - version: probe the engine version

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use godot_gateway::config::Config;
use godot_gateway::engine;
use godot_gateway::gateway::path::validate as validate_path;
use godot_gateway::gateway::{ExecutionGateway, Operation, TokioInvoker, ValidatedPath};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Godot Gateway: hardened headless engine invocation
#[derive(Parser, Debug)]
#[command(name = "godot-gateway")]
#[command(author = "Godot Gateway Contributors")]
#[command(version)]
#[command(about = "Hardened gateway for headless Godot engine operations", long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (default: ~/.config/godot-gateway/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a whitelisted operation against a project
    Exec {
        /// Operation identifier (see `operations`)
        operation: String,

        /// Project directory containing project.godot
        #[arg(long)]
        project: String,

        /// Operation parameters as a JSON object
        #[arg(long, default_value = "{}")]
        params: String,

        /// Engine binary (overrides config and GODOT_PATH)
        #[arg(long)]
        engine: Option<PathBuf>,

        /// Print the full result as JSON instead of relaying the streams
        #[arg(long)]
        json: bool,
    },
    /// List whitelisted operations
    Operations,
    /// Check whether a path would be accepted
    CheckPath {
        path: String,
    },
    /// Print the engine version
    Version {
        /// Engine binary (overrides config and GODOT_PATH)
        #[arg(long)]
        engine: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match args.config {
        Some(ref path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    godot_gateway::logging::init(&config.logging, args.verbose)?;

    match args.command {
        Commands::Exec {
            operation,
            project,
            params,
            engine,
            json,
        } => exec(&config, operation, project, params, engine, json).await,
        Commands::Operations => {
            for op in Operation::ALL {
                println!("{}", op);
            }
            Ok(())
        }
        Commands::CheckPath { path } => {
            if validate_path(&path) {
                println!("valid");
                Ok(())
            } else {
                println!("invalid");
                std::process::exit(1);
            }
        }
        Commands::Version { engine } => {
            let engine = resolve_engine(&config, engine)?;
            let version = engine::probe_version(&TokioInvoker::new(), &engine).await?;
            println!("{}", version);
            Ok(())
        }
    }
}

/// Validate and run a single operation
async fn exec(
    config: &Config,
    operation: String,
    project: String,
    params: String,
    engine: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let parameters: Map<String, Value> =
        serde_json::from_str(&params).context("--params must be a JSON object")?;

    // Fail on untrusted input before touching the filesystem or the engine
    let op = Operation::parse(&operation)?;
    let validated = ValidatedPath::new(&project)?;
    let project_dir = engine::ensure_project(&validated)?;

    let engine_path = resolve_engine(config, engine)?;
    if op.min_engine_version().is_some() {
        let version = engine::probe_version(&TokioInvoker::new(), &engine_path).await?;
        engine::ensure_supported(op, version)?;
    }

    info!(operation = %op, project = %validated, "Executing operation");
    let gateway = ExecutionGateway::for_project(&config.engine, project_dir);
    let output = gateway
        .execute(&operation, parameters, &project, &engine_path)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        std::io::stdout().write_all(output.stdout.as_bytes())?;
        std::io::stderr().write_all(output.stderr.as_bytes())?;
    }

    Ok(())
}

/// The engine runs from the project directory, so a relative `--engine` is
/// anchored to the caller's directory first
fn resolve_engine(config: &Config, explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        // Bare names like `godot` are still looked up on PATH
        Some(path) if path.is_relative() && path.components().count() > 1 => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            Ok(cwd.join(path))
        }
        Some(path) => Ok(path),
        None => engine::locate_engine(&config.engine),
    }
}
