use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::core::retry_delay;
use crate::data::FetchOptions;
use crate::effects::http::{HttpClient, HttpError};
use crate::error::{FetchError, Result};

/// Default headers when the caller supplies none.
const DEFAULT_HEADERS: [(&str, &str); 2] = [
    ("accept", "application/json"),
    ("Content-Type", "application/json"),
];

/// One logical request under the global request budget.
///
/// The semaphore is owned here and shared by every call issued during a
/// batch run; it is the single place where the concurrency ceiling is
/// enforced. A permit is acquired before the first network attempt and
/// held across the retry loop, so retries of one call cannot multiply the
/// number of in-flight requests.
pub struct Transport<C> {
    client: C,
    budget: Semaphore,
    max_attempts: u32,
    retry_backoff: std::time::Duration,
}

impl<C: HttpClient> Transport<C> {
    pub fn new(client: C, options: &FetchOptions) -> Self {
        Self {
            client,
            budget: Semaphore::new(options.max_concurrent.max(1)),
            max_attempts: options.max_attempts.max(1),
            retry_backoff: options.retry_backoff,
        }
    }

    /// Issue one logical GET, retrying timeouts up to the attempt ceiling.
    ///
    /// Failure taxonomy:
    /// - timeout on every attempt: [`FetchError::RetriesExhausted`]
    /// - non-2xx status: [`FetchError::Status`], no retry
    /// - other transport failure: [`FetchError::Network`], no retry
    /// - decoded body carrying an `error` field: [`FetchError::Upstream`],
    ///   no retry - the upstream API signals business errors inside
    ///   200-status bodies
    pub async fn call(
        &self,
        path: &str,
        query: &[(String, String)],
        headers: &[(String, String)],
    ) -> Result<Value> {
        let _permit = self
            .budget
            .acquire()
            .await
            .map_err(|_| FetchError::Network("request budget closed".to_string()))?;

        let headers: Vec<(String, String)> = if headers.is_empty() {
            DEFAULT_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        } else {
            headers.to_vec()
        };

        let mut attempts = 0;
        while attempts < self.max_attempts {
            if attempts > 0 {
                tokio::time::sleep(retry_delay(attempts - 1, self.retry_backoff)).await;
            }
            attempts += 1;
            debug!(path, attempt = attempts, "sending request");

            match self.client.get_json(path, query, &headers).await {
                Ok(body) => {
                    if let Some(message) = body.get("error") {
                        let message = message
                            .as_str()
                            .map(str::to_owned)
                            .unwrap_or_else(|| message.to_string());
                        return Err(FetchError::Upstream { message });
                    }
                    return Ok(body);
                }
                // Timeouts are the only transient class; the upstream can
                // be slow, so the first attempt is not trusted.
                Err(HttpError::Timeout) => {
                    warn!(path, attempt = attempts, "request timed out");
                }
                Err(HttpError::Status(status)) => return Err(FetchError::Status { status }),
                Err(HttpError::Transport(message)) => return Err(FetchError::Network(message)),
            }
        }

        Err(FetchError::RetriesExhausted {
            attempts: self.max_attempts,
        })
    }
}
