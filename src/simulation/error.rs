//! Error types for track loading, network topology and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the simulation.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures while turning track data into a collision field.
#[derive(Debug, Error)]
pub enum TrackLoadError {
    /// The track file could not be read.
    #[error("failed to read track file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The track data is not a valid list of segment descriptors.
    #[error("malformed track data: {0}")]
    Parse(#[from] serde_json::Error),
    /// The track has no segments at all.
    #[error("track contains no segments")]
    Empty,
    /// A segment descriptor has unusable geometry.
    #[error("segment {index} is invalid: {reason}")]
    InvalidSegment {
        /// Position of the descriptor in the input list.
        index: usize,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Top-level simulation error.
#[derive(Debug, Error)]
pub enum Error {
    /// Track data was missing or malformed.
    #[error("track load failed: {0}")]
    TrackLoad(#[from] TrackLoadError),
    /// Weight vectors or layer sizes do not line up.
    ///
    /// The engine runs a single fixed topology, so this is never recoverable.
    #[error("topology mismatch in {what}: expected {expected}, found {found}")]
    TopologyMismatch {
        /// Which quantity disagreed.
        what: &'static str,
        /// Value implied by the topology.
        expected: usize,
        /// Value actually supplied.
        found: usize,
    },
    /// A parameter value cannot be used.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    /// Reading or writing a parameter file failed.
    #[error("parameter file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// A parameter file could not be (de)serialized.
    #[error("malformed parameter file: {0}")]
    Serde(#[from] serde_json::Error),
}
