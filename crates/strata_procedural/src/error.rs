//! # World Error Types
//!
//! All errors that can occur while building or querying a world.

use thiserror::Error;

use crate::blocks::BlockId;

/// Errors that can occur in the world system.
#[derive(Error, Debug)]
pub enum WorldError {
    /// A block the terrain generator relies on is missing from the block table.
    #[error("block table is missing required block \"{0}\"")]
    MissingBlock(&'static str),

    /// A block was registered with a zero or negative identifier.
    #[error("block \"{name}\" has identifier {id}, identifiers must be positive")]
    InvalidBlockId {
        /// Name of the offending block.
        name: String,
        /// The rejected identifier.
        id: BlockId,
    },

    /// Two block names share one identifier.
    #[error("blocks \"{first}\" and \"{second}\" share identifier {id}")]
    DuplicateBlockId {
        /// First block with the identifier.
        first: String,
        /// Second block with the identifier.
        second: String,
        /// The shared identifier.
        id: BlockId,
    },

    /// A viewport was requested whose end lies before its start.
    #[error("viewport end ({end_x}, {end_y}) precedes start ({start_x}, {start_y})")]
    InvertedViewport {
        /// Start X in blocks.
        start_x: i32,
        /// Start Y in blocks.
        start_y: i32,
        /// End X in blocks.
        end_x: i32,
        /// End Y in blocks.
        end_y: i32,
    },

    /// Camera tuning cannot produce a usable view.
    #[error("invalid camera {field}: {reason}")]
    InvalidCamera {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A configured seed is NaN or infinite.
    #[error("world seed must be finite, got {0}")]
    NonFiniteSeed(f64),

    /// Reading or writing a configuration file failed.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
