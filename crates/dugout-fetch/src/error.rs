//! Error types for dugout-fetch.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Failure of one resource fetch. Always resource-local: the batch
/// coordinator records these per key and keeps going.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// Business error signaled inside an otherwise-successful response body.
    #[error("upstream error: {message}")]
    Upstream { message: String },

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// A cache file that exists but cannot be used, or a write that failed.
///
/// A missing file is not an error; `CacheStore::get` reports that as
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cache file {path} holds malformed JSON: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cache file {path} has no readable modification time: {source}")]
    Timestamp {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode payload for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A payload that decoded as JSON but does not have the required shape.
#[derive(Debug, Error)]
#[error("payload failed validation: {}", list_fields(.errors))]
pub struct SchemaError {
    pub errors: Vec<FieldError>,
}

fn list_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub problem: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            problem: problem.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}
