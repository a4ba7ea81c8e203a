//! Error types for wdbot

use crate::id::ItemId;
use thiserror::Error;

/// The main error type for wdbot operations
#[derive(Debug, Error)]
pub enum WdbotError {
    #[error("Invalid item ID: expected format Q###, got '{0}'")]
    InvalidItemId(String),

    #[error("Invalid property ID: expected format P###, got '{0}'")]
    InvalidPropertyId(String),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("{id} is not a {expected} (instance of: {found})")]
    TypeMismatch {
        id: ItemId,
        expected: String,
        found: String,
    },

    #[error("{0} has no 'instance of' property")]
    MissingInstanceOf(ItemId),

    #[error("Unsupported item {id} with instance IDs {instances}")]
    UnsupportedInstance { id: ItemId, instances: String },

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Wire format error: {0}")]
    Wire(String),

    #[error("Rule load error: {0}")]
    RuleLoadError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Titles with uncommon characters, check them or confirm:\n{0}")]
    SuspiciousTitles(String),

    #[error("Bot has already run; create a new bot for another pass")]
    AlreadyRun,
}

/// Result type alias for wdbot operations
pub type Result<T> = std::result::Result<T, WdbotError>;

impl From<toml::de::Error> for WdbotError {
    fn from(err: toml::de::Error) -> Self {
        WdbotError::TomlParseError(err.to_string())
    }
}
