//! Error types for the I/O and parsing edge of the crate.
//!
//! Validation findings are never reported through this type; they are data
//! in [`crate::dsl::QueryValidationResult`]. `HeronError` covers input that
//! does not even satisfy the type shapes, plus file and config failures.

use std::path::PathBuf;

use crate::config::SettingsError;

/// Result type for fallible heron operations.
pub type HeronResult<T> = Result<T, HeronError>;

#[derive(Debug, thiserror::Error)]
pub enum HeronError {
    /// Input JSON did not match the expected shape.
    #[error("Malformed {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl HeronError {
    pub(crate) fn json(what: &'static str, source: serde_json::Error) -> Self {
        HeronError::Json { what, source }
    }
}

/// Read a file and deserialize its JSON content.
pub fn read_json<T, P>(path: P, what: &'static str) -> HeronResult<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<std::path::Path>,
{
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| HeronError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| HeronError::json(what, source))
}
