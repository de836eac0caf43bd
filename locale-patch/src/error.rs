use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid utf-8 (looks like {detected})", path.display())]
    Encoding { path: PathBuf, detected: String },

    #[error("invalid json in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid key path {0:?}")]
    InvalidKeyPath(String),

    #[error("key {missing} not found (looking up {key_path})")]
    MissingKey { key_path: String, missing: String },

    #[error("value at {at} is not an object")]
    NotAnObject { at: String },

    #[error("value at {key_path} is not a string")]
    NotAString { key_path: String },

    #[error("config: {0}")]
    Config(String),
}

impl LocaleError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
