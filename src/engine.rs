//! Engine discovery and probing
//!
//! Helpers the CLI runs around the gateway: finding the engine binary,
//! asking it for its version, and checking that a project directory really
//! is a Godot project. None of this is part of the validation boundary.

use crate::config::EngineConfig;
use crate::gateway::{ArgVector, EngineVersion, Operation, ProcessInvoker, ValidatedPath};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Marker file present at the root of every Godot project
pub const PROJECT_FILE: &str = "project.godot";

/// Binary name searched for on `PATH`
const ENGINE_BINARY_NAME: &str = "godot";

/// Find the engine binary
///
/// An explicitly configured path (config file or `GODOT_PATH`) must exist;
/// otherwise well-known install locations are tried, then `godot` on `PATH`.
pub fn locate_engine(config: &EngineConfig) -> Result<PathBuf> {
    if let Some(ref configured) = config.path {
        let path = PathBuf::from(configured);
        if path.is_file() {
            debug!("Using configured engine at {:?}", path);
            return Ok(path);
        }
        anyhow::bail!("Configured engine path does not exist: {}", configured);
    }

    let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    if let Some(found) = candidate_paths(home.as_deref())
        .into_iter()
        .find(|candidate| candidate.is_file())
    {
        info!("Found engine at {:?}", found);
        return Ok(found);
    }

    which::which(ENGINE_BINARY_NAME).with_context(|| {
        format!(
            "Could not find the Godot engine. Set {} or [engine].path in the config file",
            crate::config::ENGINE_PATH_ENV
        )
    })
}

/// Well-known install locations for the current platform
fn candidate_paths(home: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    if cfg!(target_os = "macos") {
        candidates.push("/Applications/Godot.app/Contents/MacOS/Godot".into());
        candidates.push("/Applications/Godot_4.app/Contents/MacOS/Godot".into());
        if let Some(home) = home {
            candidates.push(home.join("Applications/Godot.app/Contents/MacOS/Godot"));
        }
    } else if cfg!(windows) {
        candidates.push(r"C:\Program Files\Godot\Godot.exe".into());
        candidates.push(r"C:\Program Files (x86)\Godot\Godot.exe".into());
        if let Some(home) = home {
            candidates.push(home.join(r"Godot\Godot.exe"));
        }
    } else {
        candidates.push("/usr/bin/godot".into());
        candidates.push("/usr/local/bin/godot".into());
        candidates.push("/snap/bin/godot".into());
        if let Some(home) = home {
            candidates.push(home.join(".local/bin/godot"));
        }
    }

    candidates
}

/// Ask the engine for its version via `<engine> --version`
pub async fn probe_version<I: ProcessInvoker>(invoker: &I, engine: &Path) -> Result<EngineVersion> {
    let argv: ArgVector = ["--version"].into_iter().collect();
    let output = invoker
        .invoke(engine, &argv)
        .await
        .context("Failed to run engine version probe")?;

    let reported = if output.stdout.trim().is_empty() {
        output.stderr.trim()
    } else {
        output.stdout.trim()
    };

    EngineVersion::parse(reported)
        .with_context(|| format!("Unrecognised engine version output: {:?}", reported))
}

/// Refuse operations the engine is too old to run
pub fn ensure_supported(operation: Operation, version: EngineVersion) -> Result<()> {
    if let Some(required) = operation.min_engine_version() {
        if !version.at_least(required) {
            warn!(%operation, %version, %required, "Engine too old for operation");
            anyhow::bail!(
                "Operation '{}' requires Godot {} or newer (found {})",
                operation,
                required,
                version
            );
        }
    }
    Ok(())
}

/// Check that a validated path is a Godot project directory
pub fn ensure_project(project: &ValidatedPath) -> Result<PathBuf> {
    let dir = PathBuf::from(project.normalize());
    let marker = dir.join(PROJECT_FILE);
    if !marker.is_file() {
        anyhow::bail!(
            "Not a valid Godot project: {} (missing {})",
            project,
            PROJECT_FILE
        );
    }
    Ok(dir)
}
