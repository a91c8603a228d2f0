use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the assert plumbing (sinks, config loading).
///
/// An assertion failure itself is never an `AssertError`: it is a report handed to the
/// installed handler. These errors only describe problems around it.
#[derive(Debug, Error)]
pub enum AssertError {
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("assert config parse failed (toml): path={path:?} err={source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("assert sink busy for {timeout_ms} ms")]
    SinkBusy { timeout_ms: u64 },
}

impl AssertError {
    #[inline]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[inline]
    pub fn invalid(key: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
        }
    }
}

pub type AssertResult<T> = Result<T, AssertError>;
