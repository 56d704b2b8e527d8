use dashboard::{UnknownViewError, ViewId};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    UnknownView(#[from] UnknownViewError),

    #[error("no {view} series stored for user {user:?}")]
    SeriesNotFound { user: String, view: ViewId },

    #[error("malformed {view} series for user {user:?}: {reason}")]
    MalformedSeries {
        user: String,
        view: ViewId,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    pub fn configuration<T: std::fmt::Display>(message: T) -> Self {
        Self::Configuration(message.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
