use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MakesError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("Invalid timestamp for target {target}: {value:?} - {message}")]
    InvalidTimestamp {
        target: String,
        value: String,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File error: {path:?} - {message}")]
    FileError {
        path: PathBuf,
        message: String,
    },

    #[error("External tool error: {tool} - {message}")]
    ExternalToolError {
        tool: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("No targets found")]
    NoTargets,

    #[error("Interactive selection requires a terminal")]
    NotATerminal,

    #[error("Selection cancelled")]
    Cancelled,

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl From<anyhow::Error> for MakesError {
    fn from(error: anyhow::Error) -> Self {
        MakesError::UnexpectedError(format!("{:#}", error))
    }
}

pub type MakesResult<T> = std::result::Result<T, MakesError>;
