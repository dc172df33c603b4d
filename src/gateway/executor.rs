//! Execution Gateway
//!
//! Single entry point that turns an untrusted `(operation, parameters,
//! project path)` request into one engine invocation:
//!
//! 1. whitelist check on the operation
//! 2. traversal validation, then separator normalization, of the project path
//! 3. camelCase -> snake_case rewrite of parameter keys
//! 4. canonical JSON serialization of the parameters
//! 5. fixed-order argument vector
//! 6. one call to the [`ProcessInvoker`]
//!
//! Steps 1 and 2 fail before anything is spawned. There are no retries.

use super::error::GatewayError;
use super::invoker::{ArgVector, InvocationOutput, ProcessInvoker, TokioInvoker};
use super::operation::Operation;
use super::params::normalize_keys;
use super::path::ValidatedPath;
use crate::config::EngineConfig;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Run the engine without a window
pub const HEADLESS_FLAG: &str = "--headless";

/// Followed by the project directory
pub const PATH_FLAG: &str = "--path";

/// Followed by the dispatch script
pub const SCRIPT_FLAG: &str = "--script";

/// Appended last when debug output is enabled
pub const DEBUG_FLAG: &str = "--debug-godot";

/// Orchestrates validation and invocation of engine operations
#[derive(Debug, Clone)]
pub struct ExecutionGateway<I = TokioInvoker> {
    invoker: I,

    /// Engine-side script that dispatches operations
    script_path: String,

    /// Whether to append [`DEBUG_FLAG`]
    debug: bool,
}

impl ExecutionGateway<TokioInvoker> {
    /// Create a gateway that spawns real processes
    pub fn new(script_path: impl Into<String>, debug: bool) -> Self {
        Self::with_invoker(TokioInvoker::new(), script_path, debug)
    }

    /// Create a gateway from the `[engine]` configuration section
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.script_path.clone(), config.debug)
    }

    /// Like [`Self::from_config`], running the engine from `project_dir`
    ///
    /// Relative paths the engine script writes or reports then resolve
    /// inside the project rather than the caller's directory.
    pub fn for_project(config: &EngineConfig, project_dir: impl Into<PathBuf>) -> Self {
        Self::with_invoker(
            TokioInvoker::with_working_dir(project_dir),
            config.script_path.clone(),
            config.debug,
        )
    }
}

impl<I: ProcessInvoker> ExecutionGateway<I> {
    /// Create a gateway with a custom invoker
    pub fn with_invoker(invoker: I, script_path: impl Into<String>, debug: bool) -> Self {
        Self {
            invoker,
            script_path: script_path.into(),
            debug,
        }
    }

    pub fn script_path(&self) -> &str {
        &self.script_path
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Validate a request and run it through the engine
    ///
    /// # Errors
    ///
    /// - [`GatewayError::InvalidOperation`] if `operation` is not whitelisted
    /// - [`GatewayError::InvalidPath`] if `project_path` fails validation
    /// - [`GatewayError::Spawn`] if the engine binary cannot be launched
    ///
    /// A non-zero engine exit is returned as `Ok` with the captured output.
    pub async fn execute(
        &self,
        operation: &str,
        parameters: Map<String, Value>,
        project_path: &str,
        engine_path: impl AsRef<Path>,
    ) -> Result<InvocationOutput, GatewayError> {
        let operation = Operation::parse(operation).inspect_err(|_| {
            warn!(operation, "Rejected operation outside the whitelist");
        })?;

        let project = ValidatedPath::new(project_path).inspect_err(|_| {
            warn!(project_path = ?project_path, "Rejected project path");
        })?;

        let params = normalize_keys(Value::Object(parameters));
        let argv = self.build_args(operation, &project, &params);
        debug!(%operation, "Request validated");

        self.invoker.invoke(engine_path.as_ref(), &argv).await
    }

    /// Build the engine argument vector
    ///
    /// `--headless --path <project> --script <script> <operation> <json> [--debug-godot]`
    pub fn build_args(
        &self,
        operation: Operation,
        project: &ValidatedPath,
        params: &Value,
    ) -> ArgVector {
        let mut argv = ArgVector::new();
        argv.push(HEADLESS_FLAG)
            .push(PATH_FLAG)
            .push(project.normalize())
            .push(SCRIPT_FLAG)
            .push(self.script_path.as_str())
            .push(operation.as_str())
            .push(params.to_string());

        if self.debug {
            argv.push(DEBUG_FLAG);
        }

        argv
    }
}
