use std::{io, path};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An error occurred accessing {path}: {error}")]
    Io { path: path::PathBuf, error: io::Error },

    #[error("Invalid JSON in {path}: {error}")]
    Json {
        path: path::PathBuf,
        error: serde_json::Error,
    },

    #[error("Configuration path {path} must be a directory")]
    NotADirectory { path: path::PathBuf },

    #[error("{0}")]
    Value(#[from] nestkit_value::Error),
}

impl Error {
    pub(crate) fn io(path: &path::Path, error: io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            error,
        }
    }

    pub(crate) fn json(path: &path::Path, error: serde_json::Error) -> Self {
        Error::Json {
            path: path.to_path_buf(),
            error,
        }
    }
}
