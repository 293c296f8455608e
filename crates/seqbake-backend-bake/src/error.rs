//! Error types for the bake backend.

use std::path::PathBuf;

use seqbake_spec::{BackendError, PassType};
use thiserror::Error;

use crate::graph::NodeId;

/// Result type for bake operations.
pub type BakeResult<T> = Result<T, BakeError>;

/// Errors that can occur while planning or running a sequenced bake.
#[derive(Debug, Error)]
pub enum BakeError {
    /// No bake output directory is configured.
    #[error("No output path specified")]
    MissingOutputPath,

    /// The host has no active object with an active material.
    #[error("Active object with material required")]
    NoActiveMaterial,

    /// Bake mode selected no material.
    #[error("No materials found or selected to bake")]
    NoMaterials,

    /// The material lacks the principled shader or the material output.
    #[error("Material '{material}' needs a principled shader and a material output for a metallic bake")]
    MissingShaderNodes { material: String },

    /// A node id does not exist in the graph.
    #[error("Node {0} does not exist")]
    UnknownNode(NodeId),

    /// A socket name does not exist on a node.
    #[error("Node '{node}' has no {direction} socket '{socket}'")]
    UnknownSocket {
        node: String,
        socket: String,
        direction: &'static str,
    },

    /// The host does not know the material.
    #[error("Material '{material}' not found")]
    MissingMaterial { material: String },

    /// The host could not allocate a bake image.
    #[error("Failed to create image '{name}': {message}")]
    CreateImage { name: String, message: String },

    /// The host bake call failed.
    #[error("Baking {pass} at frame {frame} failed: {message}")]
    BakeFailed {
        pass: PassType,
        frame: i32,
        message: String,
    },

    /// The baked image could not be written.
    #[error("Failed to save {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// A pass directory could not be created.
    #[error("Cannot create output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The host reported an error.
    #[error("Host error: {0}")]
    Host(String),

    /// Bake settings failed validation.
    #[error("Bake settings invalid: {0} error(s)")]
    InvalidSettings(usize),
}

impl BakeError {
    /// Creates a bake failure for a pass and frame.
    pub fn bake_failed(pass: PassType, frame: i32, message: impl Into<String>) -> Self {
        Self::BakeFailed {
            pass,
            frame,
            message: message.into(),
        }
    }

    /// Creates a save failure.
    pub fn save_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::SaveFailed {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl BackendError for BakeError {
    fn code(&self) -> &'static str {
        match self {
            BakeError::MissingOutputPath => "BAKE_001",
            BakeError::NoActiveMaterial => "BAKE_002",
            BakeError::NoMaterials => "BAKE_003",
            BakeError::MissingShaderNodes { .. } => "BAKE_004",
            BakeError::UnknownNode(_) => "BAKE_005",
            BakeError::UnknownSocket { .. } => "BAKE_006",
            BakeError::MissingMaterial { .. } => "BAKE_007",
            BakeError::CreateImage { .. } => "BAKE_008",
            BakeError::BakeFailed { .. } => "BAKE_009",
            BakeError::SaveFailed { .. } => "BAKE_010",
            BakeError::CreateOutputDir { .. } => "BAKE_011",
            BakeError::Host(_) => "BAKE_012",
            BakeError::InvalidSettings(_) => "BAKE_013",
        }
    }

    fn category(&self) -> &'static str {
        "bake"
    }
}
