//! I/O operations: HTTP transport behind a trait, the on-disk cache, and
//! the per-resource and batch orchestration built on both.

mod batch;
mod fetcher;
mod http;
mod store;
mod transport;

pub use fetcher::Fetcher;
pub use http::{HttpClient, HttpError};
pub use store::CacheStore;
pub use transport::Transport;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
