use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error in {operation}: {source}")]
    SerializationError {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Request failed in {operation}: {message}")]
    RequestFailed {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("Decode error in {operation}: {message}")]
    DecodeError {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} failed with status {status}: {body}")]
    SaveFailed {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("File error in {operation} ({}): {source}", path.display())]
    FileError {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AvatarError {
    /// HTTP status attached to the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            AvatarError::RequestFailed { status, .. } => *status,
            AvatarError::SaveFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn request(operation: &'static str, error: reqwest::Error) -> Self {
        AvatarError::RequestFailed {
            operation,
            status: error.status().map(|s| s.as_u16()),
            message: error.to_string(),
        }
    }

    pub(crate) fn file(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        AvatarError::FileError {
            operation,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AvatarError>;
