use std::path::PathBuf;

use thiserror::Error;

/// Failures of the input front ends and config loading.
/// Plain-text extraction itself cannot fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid editor JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a `doc` root node, found `{found}`")]
    UnexpectedRoot { found: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
