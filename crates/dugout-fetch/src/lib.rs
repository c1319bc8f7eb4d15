//! Rate-limited JSON fetching with file-per-resource caching.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`] - Pure transformations
//! - [`effects`] - I/O operations with trait abstraction
//!
//! # Key Features
//!
//! - **Read-Through Cache**: Fresh entries are served from disk with zero
//!   network calls; refreshes replace the cache file atomically
//! - **Bounded Concurrency**: A single shared semaphore caps in-flight
//!   requests across the whole batch
//! - **Explicit Retry**: Only timeouts are retried, with a bounded attempt
//!   counter; every other failure escalates immediately
//! - **Partial-Failure Batches**: One failed resource never aborts the rest

mod core;
mod data;
mod effects;
mod error;

pub use self::core::{DomainSignal, Freshness, FreshnessPolicy, extract_signal, retry_delay, validate};
pub use data::{CacheEntry, FetchOptions, FetchOutcome, ResourceClass, ResourceKey, ResourceSpec};
pub use effects::{CacheStore, Fetcher, HttpClient, HttpError, Transport};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{CacheError, FetchError, FieldError, Result, SchemaError};
