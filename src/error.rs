//! Errors raised while optimizing one asset type.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad `resopt.toml` or groups document. Always fatal.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A resolved image could not be decoded or re-encoded.
    #[error("failed to inline image `{}`", path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The minifier rejected a group. `status` is `None` for the built-in
    /// backend or a signal-terminated process.
    #[error("minifier failed for group `{group}` ({}): {detail}", display_status(*status))]
    Minifier {
        group: String,
        status: Option<i32>,
        detail: String,
    },

    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}")]
    Unexpected {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Configuration problems stop the whole run regardless of policy.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

fn display_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "no exit status".to_string(),
    }
}
