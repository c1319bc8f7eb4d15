use std::time::SystemTime;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{Freshness, FreshnessPolicy, extract_signal};
use crate::data::{FetchOptions, FetchOutcome, ResourceSpec};
use crate::effects::http::HttpClient;
use crate::effects::store::CacheStore;
use crate::effects::transport::Transport;
use crate::error::Result;

/// Per-resource orchestration: cache read, freshness judgment, refresh
/// through the transport, validated write-through.
pub struct Fetcher<C> {
    transport: Transport<C>,
    store: CacheStore,
    policy: FreshnessPolicy,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C, store: CacheStore, options: &FetchOptions) -> Self {
        Self {
            transport: Transport::new(client, options),
            store,
            policy: FreshnessPolicy::new(options.ttl, options.concluded_grace_days),
        }
    }

    /// Fetch one resource, serving from cache when the entry is fresh.
    ///
    /// A stale-but-present entry is not a fallback: once a refresh is
    /// attempted, its failure is the outcome, and the old entry stays on
    /// disk untouched for the next run's freshness judgment.
    pub async fn fetch(&self, spec: &ResourceSpec) -> FetchOutcome {
        match self.store.get(&spec.key) {
            Ok(entry) => {
                let signal = entry.as_ref().and_then(|e| {
                    extract_signal(
                        spec.class,
                        &e.payload,
                        self.policy.concluded_grace_days(),
                        Utc::now().date_naive(),
                    )
                });
                let freshness = self.policy.evaluate(entry.as_ref(), signal, SystemTime::now());
                if freshness == Freshness::Fresh {
                    debug!(key = %spec.key, ?signal, "serving from cache");
                    // entry is Some whenever the policy says Fresh
                    if let Some(entry) = entry {
                        return FetchOutcome::CacheHit(entry.payload);
                    }
                }
            }
            Err(e) => {
                warn!(key = %spec.key, error = %e, "unreadable cache entry, treating as absent");
            }
        }

        match self.refresh(spec).await {
            Ok(payload) => FetchOutcome::Success(payload),
            Err(e) => FetchOutcome::Failure(e),
        }
    }

    async fn refresh(&self, spec: &ResourceSpec) -> Result<Value> {
        let payload = self.transport.call(&spec.path, &spec.query, &[]).await?;
        // put validates the shape before anything touches the disk
        self.store.put(&spec.key, spec.class, &payload)?;
        Ok(payload)
    }
}
