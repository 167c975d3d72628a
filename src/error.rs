use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a network or producing its reports.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or structurally invalid network description.
    #[error("format error: {0}")]
    Format(String),

    /// The requested input adapter was not compiled into this build.
    #[error("capability unavailable: {0}")]
    Capability(String),

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cancellation signal was observed at a matching phase boundary.
    #[error("analysis cancelled")]
    Cancelled,
}

impl Error {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
