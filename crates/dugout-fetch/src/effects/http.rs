use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Classified outcome of a single HTTP attempt.
///
/// The retry loop in [`Transport`](crate::Transport) branches on this:
/// only [`HttpError::Timeout`] is retried, everything else escalates on
/// the first attempt.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Asynchronous HTTP client abstraction.
///
/// This trait provides the minimal interface the fetcher needs: a single
/// read-style request that decodes its body as JSON. Implementations own
/// their timeout configuration and map their failures into [`HttpError`].
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Issue a GET to `path` under the client's base host and decode the
    /// response body as JSON.
    fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<Value, HttpError>> + Send;
}

/// A shared client delegates to the inner implementation, so the caller
/// can keep a handle on the client it hands to the fetcher.
impl<C: HttpClient> HttpClient for Arc<C> {
    fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<Value, HttpError>> + Send {
        (**self).get_json(path, query, headers)
    }
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use super::*;

    /// Production HTTP client implementation using reqwest.
    ///
    /// Holds the process-wide network session. Dropping it closes pooled
    /// connections and aborts in-flight requests, which is what makes a
    /// cancelled run exit cleanly.
    pub struct ReqwestClient {
        client: reqwest::Client,
        base_url: String,
    }

    impl ReqwestClient {
        /// Build a session against `base_url` with a per-request timeout.
        pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HttpError> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| HttpError::Transport(e.to_string()))?;
            Ok(Self {
                client,
                base_url: base_url.into(),
            })
        }

        fn classify(e: reqwest::Error) -> HttpError {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Transport(e.to_string())
            }
        }
    }

    impl HttpClient for ReqwestClient {
        async fn get_json(
            &self,
            path: &str,
            query: &[(String, String)],
            headers: &[(String, String)],
        ) -> Result<Value, HttpError> {
            let url = format!("{}{}", self.base_url, path);
            let mut request = self.client.get(&url).query(query);
            for (key, value) in headers {
                request = request.header(key, value);
            }

            let response = request.send().await.map_err(Self::classify)?;
            let status = response.status();
            if !status.is_success() {
                return Err(HttpError::Status(status.as_u16()));
            }
            response.json::<Value>().await.map_err(Self::classify)
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
