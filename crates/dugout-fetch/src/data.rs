//! Immutable configuration and types.

use std::fmt;
use std::time::{Duration, SystemTime};

use serde_json::Value;

use crate::error::FetchError;

/// Identifier for one fetchable/cacheable unit of data.
///
/// Doubles as the cache file stem and the per-resource accounting unit in
/// batch results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Fixed key for the single player-directory resource.
    pub fn player_directory() -> Self {
        Self("player_data".to_string())
    }

    /// Key for one league's info record.
    pub fn league(league_id: &str) -> Self {
        Self(format!("league_info_{league_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which schema a resource's payload must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    /// The full player directory (`getPlayerIds`).
    PlayerDirectory,
    /// One league's configuration record (`getLeagueInfo`).
    LeagueInfo,
}

/// One resource to fetch: cache key, schema class, and upstream endpoint.
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    pub key: ResourceKey,
    pub class: ResourceClass,
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl ResourceSpec {
    /// The player directory for a sport (the one required resource).
    pub fn player_directory(sport: &str) -> Self {
        Self {
            key: ResourceKey::player_directory(),
            class: ResourceClass::PlayerDirectory,
            path: "/fxea/general/getPlayerIds".to_string(),
            query: vec![("sport".to_string(), sport.to_string())],
        }
    }

    /// The info record for one league id.
    pub fn league(league_id: &str) -> Self {
        Self {
            key: ResourceKey::league(league_id),
            class: ResourceClass::LeagueInfo,
            path: "/fxea/general/getLeagueInfo".to_string(),
            query: vec![("leagueId".to_string(), league_id.to_string())],
        }
    }
}

/// One cached resource: the validated payload plus the time it was last
/// refreshed.
///
/// The refresh time is the cache file's modification time, stamped by the
/// atomic rename in `CacheStore::put` - a clock fact, not a content fact.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: Value,
    pub last_refreshed: SystemTime,
}

impl CacheEntry {
    /// Entry age relative to `now`. Clock skew collapses to zero age.
    pub fn age(&self, now: SystemTime) -> Duration {
        now.duration_since(self.last_refreshed).unwrap_or_default()
    }
}

/// Per-resource result of one batch run.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Refreshed over the network, validated, and written through.
    Success(Value),
    /// Served from a fresh cache entry with zero transport calls.
    CacheHit(Value),
    /// Transport or validation failed; the cache was not touched.
    Failure(FetchError),
}

impl FetchOutcome {
    /// The payload, when the fetch produced one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            FetchOutcome::Success(v) | FetchOutcome::CacheHit(v) => Some(v),
            FetchOutcome::Failure(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FetchOutcome::Failure(_))
    }
}

/// Configuration for fetching operations.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use dugout_fetch::FetchOptions;
///
/// let options = FetchOptions::default()
///     .ttl(Duration::from_secs(3600))
///     .max_concurrent(2)
///     .max_attempts(5);
/// ```
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Freshness window for cached entries.
    ///
    /// Default: 86400 seconds (one day).
    pub ttl: Duration,

    /// Days past a league's end date before it counts as concluded and
    /// its cached record becomes permanently fresh.
    ///
    /// Default: 14
    pub concluded_grace_days: u64,

    /// Global ceiling on simultaneous in-flight requests, enforced at the
    /// transport boundary. Cache hits consume no slot.
    ///
    /// Default: 5
    pub max_concurrent: usize,

    /// Total attempts per call, counting the first.
    ///
    /// Only timeouts are retried; everything else escalates on the first
    /// attempt.
    ///
    /// Default: 3
    pub max_attempts: u32,

    /// Base delay for exponential backoff between timeout retries.
    ///
    /// The delay before re-attempt N is `retry_backoff * 2^(N-1)`.
    ///
    /// Default: 250ms
    pub retry_backoff: Duration,

    /// Per-call timeout, applied by the HTTP client.
    ///
    /// Default: 10 seconds
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(86_400),
            concluded_grace_days: 14,
            max_concurrent: 5,
            max_attempts: 3,
            retry_backoff: Duration::from_millis(250),
            timeout: Duration::from_secs(10),
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn concluded_grace_days(mut self, days: u64) -> Self {
        self.concluded_grace_days = days;
        self
    }

    #[must_use]
    pub fn max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    #[must_use]
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
