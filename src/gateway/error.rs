//! Gateway error taxonomy

use std::path::PathBuf;

/// Errors surfaced by the execution gateway
///
/// A non-zero exit from the engine is not an error: the engine reports
/// operation failures on stdout/stderr and the call still resolves with them.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Operation identifier is not whitelisted
    #[error("Operation '{0}' is not in the allowed whitelist")]
    InvalidOperation(String),

    /// Path failed traversal validation
    #[error("Path '{0}' failed validation")]
    InvalidPath(String),

    /// Engine binary could not be launched
    #[error("Failed to spawn process: {binary:?}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading output from a spawned process failed
    #[error("IO error while collecting process output: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Whether the error was raised before any process was spawned
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidOperation(_) | Self::InvalidPath(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GatewayError::InvalidOperation("rm-rf".to_string());
        assert!(err.to_string().contains("not in the allowed whitelist"));

        let err = GatewayError::InvalidPath("../etc".to_string());
        assert!(err.to_string().contains("../etc"));
    }

    #[test]
    fn test_is_rejection() {
        assert!(GatewayError::InvalidOperation("x".into()).is_rejection());
        assert!(GatewayError::InvalidPath("x".into()).is_rejection());

        let spawn = GatewayError::Spawn {
            binary: PathBuf::from("/missing"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(!spawn.is_rejection());
        assert!(spawn.to_string().contains("Failed to spawn"));
    }
}
