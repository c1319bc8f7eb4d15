//! Batch fan-out across many resources.
//!
//! Every requested resource becomes one logical task; the only shared
//! bottleneck is the request budget inside [`Transport`](crate::Transport),
//! so cache hits never wait on a concurrency slot.

use std::collections::{HashMap, HashSet};

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tracing::debug;

use crate::data::{FetchOutcome, ResourceKey, ResourceSpec};
use crate::effects::fetcher::Fetcher;
use crate::effects::http::HttpClient;

impl<C: HttpClient> Fetcher<C> {
    /// Fetch every resource concurrently and collect one outcome per key.
    ///
    /// Failures settle in place: a resource that times out, fails
    /// validation, or hits an upstream error is recorded as
    /// [`FetchOutcome::Failure`] while the rest proceed. The map is
    /// returned only once all outcomes have settled.
    ///
    /// Duplicate keys are fetched once - a key is never refreshed
    /// concurrently within one run.
    pub async fn fetch_all(
        &self,
        specs: Vec<ResourceSpec>,
    ) -> HashMap<ResourceKey, FetchOutcome> {
        let mut seen = HashSet::new();
        let mut tasks: FuturesUnordered<_> = specs
            .into_iter()
            .filter(|spec| seen.insert(spec.key.clone()))
            .map(|spec| async move {
                let outcome = self.fetch(&spec).await;
                (spec.key, outcome)
            })
            .collect();

        debug!(resources = tasks.len(), "starting batch");
        let mut results = HashMap::with_capacity(tasks.len());
        while let Some((key, outcome)) = tasks.next().await {
            results.insert(key, outcome);
        }
        results
    }
}
