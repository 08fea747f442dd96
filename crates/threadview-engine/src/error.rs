use thiserror::Error;
use threadview_types::ThreadId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    #[error("Thread not found: {0}")]
    UnknownThread(ThreadId),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("No archive loaded")]
    NoArchive,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::MalformedArchive(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
