//! # World Error Types
//!
//! The engine itself never fails at runtime: declined actions come back as
//! `bool` or `Option`. Errors only exist at the edges, when loading
//! configuration or parsing names supplied by the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up a world.
#[derive(Error, Debug)]
pub enum WorldError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for `WorldConfig`.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration parsed but holds values the engine cannot use.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A block kind name did not match any known kind.
    #[error("unknown block kind: {0}")]
    UnknownBlockKind(String),
}

/// Result type for world setup operations.
pub type WorldResult<T> = Result<T, WorldError>;
