use std::path::PathBuf;

use crate::board::Side;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors that can occur while two agents play a game.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("{agent} ({side:?}) chose illegal column {column:?} (legal: {legal:?})")]
    IllegalMove {
        agent: String,
        side: Side,
        column: Option<usize>,
        legal: Vec<usize>,
    },

    #[error("both agents play {0:?}")]
    SameSide(Side),
}
