use std::path::PathBuf;

/// Rejected game operations. None of these are fatal: the operation is
/// refused and the game state is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("position (column {column}, row {row}) is outside the board")]
    InvalidPosition { column: usize, row: usize },

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("the game is already over")]
    GameAlreadyOver,
}

/// Errors that can occur while loading or saving win/loss statistics.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("failed to read stats from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write stats to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

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
