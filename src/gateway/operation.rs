//! Operation Whitelist
//!
//! The fixed set of engine operations the gateway will forward. The set is
//! an enum plus a `const` table: there is no runtime registration, and an
//! [`Operation`] can only be obtained by parsing one of the listed
//! identifiers.

use super::error::GatewayError;
use super::version::EngineVersion;
use std::fmt;

/// Whitelisted engine operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SceneCreate,
    NodeAdd,
    NodeEdit,
    NodeRemove,
    SpriteLoad,
    MeshLibraryExport,
    SceneSave,
    UidGet,
    ResourcesResave,
}

impl Operation {
    /// Every whitelisted operation, in declaration order
    pub const ALL: [Operation; 9] = [
        Operation::SceneCreate,
        Operation::NodeAdd,
        Operation::NodeEdit,
        Operation::NodeRemove,
        Operation::SpriteLoad,
        Operation::MeshLibraryExport,
        Operation::SceneSave,
        Operation::UidGet,
        Operation::ResourcesResave,
    ];

    /// The identifier passed to the engine script
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::SceneCreate => "scene-create",
            Operation::NodeAdd => "node-add",
            Operation::NodeEdit => "node-edit",
            Operation::NodeRemove => "node-remove",
            Operation::SpriteLoad => "sprite-load",
            Operation::MeshLibraryExport => "mesh-library-export",
            Operation::SceneSave => "scene-save",
            Operation::UidGet => "uid-get",
            Operation::ResourcesResave => "resources-resave",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn parse(op: &str) -> Result<Self, GatewayError> {
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == op)
            .ok_or_else(|| GatewayError::InvalidOperation(op.to_string()))
    }

    /// Oldest engine release that implements this operation
    ///
    /// Resource UIDs only exist from 4.4 onwards.
    pub const fn min_engine_version(self) -> Option<EngineVersion> {
        match self {
            Operation::UidGet | Operation::ResourcesResave => Some(EngineVersion::new(4, 4)),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether an identifier is whitelisted
pub fn is_valid(op: &str) -> bool {
    Operation::parse(op).is_ok()
}
