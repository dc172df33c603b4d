//! Engine Execution Gateway
//!
//! This module is the security boundary between untrusted agent requests and
//! the headless engine binary.
//!
//! # Security Features
//!
//! - **Operation Whitelisting**: Only the nine engine operations in [`Operation::ALL`] are forwarded
//! - **Raw Path Validation**: Traversal markers are matched on the undecoded string, including
//!   single, double and mixed percent-encoding
//! - **List Invocation**: The engine is spawned with a discrete argument vector, never through a shell
//! - **Opaque Values**: Parameter values are serialized as one JSON argument and never interpreted here
//!
//! # Architecture
//!
//! - `path.rs`: Traversal validation and separator normalization
//! - `operation.rs`: The operation whitelist
//! - `params.rs`: Parameter key normalization
//! - `invoker.rs`: Subprocess execution and output capture
//! - `executor.rs`: The gateway sequencing all of the above
//! - `version.rs`: Engine version parsing and gating
//!
//! # Known Gaps
//!
//! Spawned processes have no timeout, are not cancelled when the caller
//! stops waiting, and there is no cap on how many run concurrently.
//!
//! # Example
//!
//! ```no_run
//! use godot_gateway::gateway::ExecutionGateway;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let gateway = ExecutionGateway::new("/opt/godot-gateway/godot_operations.gd", false);
//!
//!     let params = json!({"sceneName": "Main"});
//!     let output = gateway
//!         .execute(
//!             "scene-create",
//!             params.as_object().cloned().unwrap_or_default(),
//!             "/home/user/proj",
//!             "/usr/bin/godot",
//!         )
//!         .await?;
//!
//!     println!("Stdout: {}", output.stdout);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod executor;
pub mod invoker;
pub mod operation;
pub mod params;
pub mod path;
pub mod version;

pub use error::GatewayError;
pub use executor::{ExecutionGateway, DEBUG_FLAG, HEADLESS_FLAG, PATH_FLAG, SCRIPT_FLAG};
pub use invoker::{ArgVector, InvocationOutput, ProcessInvoker, TokioInvoker};
pub use operation::Operation;
pub use path::ValidatedPath;
pub use version::EngineVersion;
