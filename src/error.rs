//! Error types for the simulation core and its configuration.

use thiserror::Error;

use crate::entities::EntityId;

/// Errors surfaced by a tick. None of them are recoverable inside the core:
/// they either come from the asset layer or mean the world was wired wrong.
#[derive(Debug, Error)]
pub enum GameError {
    /// An appearance key was requested that was never registered.
    #[error("Asset `{0}` not loaded")]
    AssetNotLoaded(String),

    /// A throw or drop was requested while the item axis is empty.
    #[error("Cannot release an item: nothing is being held")]
    NotHoldingItem,

    /// A state refers to an entity that is no longer in the world.
    #[error("Entity {0} is not in the world")]
    UnknownEntity(EntityId),

    /// The decision tree needs a platform and the world has none.
    #[error("No platform in the world")]
    MissingPlatform,
}

/// Errors that can occur when loading match tuning.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },

    /// Values parsed but make no sense for a match.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
