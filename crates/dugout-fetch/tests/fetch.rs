//! End-to-end behavior of the fetcher and batch coordinator against a
//! scripted in-memory HTTP client.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{Value, json};
use tempfile::TempDir;

use dugout_fetch::{
    CacheStore, FetchError, FetchOptions, FetchOutcome, Fetcher, HttpClient, HttpError,
    ResourceClass, ResourceKey, ResourceSpec,
};

type Script = dyn Fn(u32, &str, &[(String, String)]) -> Result<Value, HttpError> + Send + Sync;

/// Scripted client: counts calls, tracks the in-flight high-water mark,
/// and answers attempt N for a path from the script.
struct MockClient {
    calls: AtomicU32,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
    script: Box<Script>,
}

impl MockClient {
    fn new(
        script: impl Fn(u32, &str, &[(String, String)]) -> Result<Value, HttpError>
        + Send
        + Sync
        + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay: Duration::ZERO,
            script: Box::new(script),
        })
    }

    fn with_delay(
        delay: Duration,
        script: impl Fn(u32, &str, &[(String, String)]) -> Result<Value, HttpError>
        + Send
        + Sync
        + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay,
            script: Box::new(script),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HttpClient for MockClient {
    async fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
        _headers: &[(String, String)],
    ) -> Result<Value, HttpError> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        (self.script)(attempt, path, query)
    }
}

fn players_payload() -> Value {
    json!({
        "p001": { "name": "Mantle, Mickey", "team": "NYY", "position": "OF" },
        "p002": { "name": "Medwick, Joe", "team": "STL", "position": "OF" },
    })
}

fn league_payload(name: &str) -> Value {
    json!({ "leagueName": name, "matchups": [] })
}

fn test_options() -> FetchOptions {
    FetchOptions::default().retry_backoff(Duration::ZERO)
}

fn fetcher_in(
    dir: &TempDir,
    client: Arc<MockClient>,
    options: &FetchOptions,
) -> Fetcher<Arc<MockClient>> {
    let store = CacheStore::open(dir.path()).unwrap();
    Fetcher::new(client, store, options)
}

#[tokio::test]
async fn fresh_entry_is_served_without_transport_calls() {
    let dir = TempDir::new().unwrap();
    let store = CacheStore::open(dir.path()).unwrap();
    let key = ResourceKey::league("abc");
    store
        .put(&key, ResourceClass::LeagueInfo, &league_payload("Champs League"))
        .unwrap();

    let client = MockClient::new(|_, _, _| panic!("no network call expected"));
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &test_options());

    let outcome = fetcher.fetch(&ResourceSpec::league("abc")).await;
    assert!(matches!(outcome, FetchOutcome::CacheHit(_)));
    assert_eq!(outcome.payload(), Some(&league_payload("Champs League")));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn stale_entry_triggers_exactly_one_call() {
    let dir = TempDir::new().unwrap();
    let store = CacheStore::open(dir.path()).unwrap();
    let key = ResourceKey::league("abc");
    store
        .put(&key, ResourceClass::LeagueInfo, &league_payload("Old Name"))
        .unwrap();

    let client = MockClient::new(|_, _, _| Ok(league_payload("New Name")));
    // zero TTL: any entry already written is past its window
    let options = test_options().ttl(Duration::ZERO);
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &options);

    let outcome = fetcher.fetch(&ResourceSpec::league("abc")).await;
    assert!(matches!(outcome, FetchOutcome::Success(_)));
    assert_eq!(client.calls(), 1);

    // write-through replaced the entry
    let store = CacheStore::open(dir.path()).unwrap();
    let entry = store.get(&key).unwrap().unwrap();
    assert_eq!(entry.payload, league_payload("New Name"));
}

#[tokio::test]
async fn concluded_season_is_fresh_past_ttl() {
    let dir = TempDir::new().unwrap();
    let store = CacheStore::open(dir.path()).unwrap();
    let key = ResourceKey::league("old");
    let concluded = json!({ "leagueName": "Bonds League", "endDate": "2021-10-03" });
    store.put(&key, ResourceClass::LeagueInfo, &concluded).unwrap();

    let client = MockClient::new(|_, _, _| panic!("concluded league must not be refreshed"));
    let options = test_options().ttl(Duration::ZERO);
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &options);

    let outcome = fetcher.fetch(&ResourceSpec::league("old")).await;
    assert!(matches!(outcome, FetchOutcome::CacheHit(_)));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn timeouts_retry_up_to_the_attempt_ceiling() {
    let dir = TempDir::new().unwrap();
    let client = MockClient::new(|_, _, _| Err(HttpError::Timeout));
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &test_options());

    let outcome = fetcher.fetch(&ResourceSpec::league("abc")).await;
    match outcome {
        FetchOutcome::Failure(FetchError::RetriesExhausted { attempts }) => {
            assert_eq!(attempts, 3)
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(client.calls(), 3);
}

#[tokio::test]
async fn stale_entry_is_not_served_after_failed_refresh() {
    let dir = TempDir::new().unwrap();
    let store = CacheStore::open(dir.path()).unwrap();
    let key = ResourceKey::league("abc");
    let old = league_payload("Martinez League");
    store.put(&key, ResourceClass::LeagueInfo, &old).unwrap();

    let client = MockClient::new(|_, _, _| Err(HttpError::Timeout));
    let options = test_options().ttl(Duration::ZERO);
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &options);

    // The stale entry is not a fallback: the refresh failure is the outcome.
    let outcome = fetcher.fetch(&ResourceSpec::league("abc")).await;
    assert!(matches!(
        outcome,
        FetchOutcome::Failure(FetchError::RetriesExhausted { attempts: 3 })
    ));
    assert!(outcome.payload().is_none());

    // The old entry stays on disk untouched for the next run.
    let store = CacheStore::open(dir.path()).unwrap();
    let entry = store.get(&key).unwrap().unwrap();
    assert_eq!(entry.payload, old);
}

#[tokio::test]
async fn single_attempt_timeout_reports_exhaustion() {
    let dir = TempDir::new().unwrap();
    let client = MockClient::new(|_, _, _| Err(HttpError::Timeout));
    let options = test_options().max_attempts(1);
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &options);

    let outcome = fetcher.fetch(&ResourceSpec::league("abc")).await;
    assert!(matches!(
        outcome,
        FetchOutcome::Failure(FetchError::RetriesExhausted { attempts: 1 })
    ));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn zero_concurrency_ceiling_still_makes_progress() {
    let dir = TempDir::new().unwrap();
    let client = MockClient::new(|_, _, _| Ok(league_payload("Griffey League")));
    // A nonsensical ceiling of zero is clamped rather than deadlocking.
    let options = test_options().max_concurrent(0);
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &options);

    let results = fetcher
        .fetch_all(vec![ResourceSpec::league("a"), ResourceSpec::league("b")])
        .await;
    assert_eq!(results.len(), 2);
    assert!(results.values().all(|o| !o.is_failure()));
}

#[tokio::test]
async fn success_on_second_attempt_stops_retrying() {
    let dir = TempDir::new().unwrap();
    let client = MockClient::new(|attempt, _, _| {
        if attempt == 1 {
            Err(HttpError::Timeout)
        } else {
            Ok(league_payload("Koufax League"))
        }
    });
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &test_options());

    let outcome = fetcher.fetch(&ResourceSpec::league("abc")).await;
    assert!(matches!(outcome, FetchOutcome::Success(_)));
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn business_error_fails_once_and_skips_the_cache() {
    let dir = TempDir::new().unwrap();
    let client = MockClient::new(|_, _, _| Ok(json!({ "error": "League not found" })));
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &test_options());

    let outcome = fetcher.fetch(&ResourceSpec::league("abc")).await;
    match outcome {
        FetchOutcome::Failure(FetchError::Upstream { message }) => {
            assert_eq!(message, "League not found")
        }
        other => panic!("expected Upstream failure, got {other:?}"),
    }
    assert_eq!(client.calls(), 1);

    let store = CacheStore::open(dir.path()).unwrap();
    assert!(store.get(&ResourceKey::league("abc")).unwrap().is_none());
}

#[tokio::test]
async fn http_error_status_is_not_retried() {
    let dir = TempDir::new().unwrap();
    let client = MockClient::new(|_, _, _| Err(HttpError::Status(503)));
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &test_options());

    let outcome = fetcher.fetch(&ResourceSpec::league("abc")).await;
    assert!(matches!(
        outcome,
        FetchOutcome::Failure(FetchError::Status { status: 503 })
    ));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn schema_failure_is_resource_local_and_unwritten() {
    let dir = TempDir::new().unwrap();
    let client = MockClient::new(|_, _, _| Ok(json!({ "unexpected": true })));
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &test_options());

    let outcome = fetcher.fetch(&ResourceSpec::league("abc")).await;
    assert!(matches!(
        outcome,
        FetchOutcome::Failure(FetchError::Schema(_))
    ));

    let store = CacheStore::open(dir.path()).unwrap();
    assert!(store.get(&ResourceKey::league("abc")).unwrap().is_none());
}

#[tokio::test]
async fn batch_never_exceeds_the_request_budget() {
    let dir = TempDir::new().unwrap();
    let client = MockClient::with_delay(Duration::from_millis(25), |_, _, query| {
        let id = &query[0].1;
        Ok(league_payload(&format!("League {id}")))
    });
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &test_options());

    let specs: Vec<_> = (0..12)
        .map(|i| ResourceSpec::league(&format!("lg{i:02}")))
        .collect();
    let results = fetcher.fetch_all(specs).await;

    assert_eq!(results.len(), 12);
    assert!(results.values().all(|o| !o.is_failure()));
    assert_eq!(client.calls(), 12);
    assert!(client.max_in_flight.load(Ordering::SeqCst) <= 5);
}

#[tokio::test]
async fn one_bad_resource_does_not_sink_the_batch() {
    let dir = TempDir::new().unwrap();
    let client = MockClient::new(|_, path, query| {
        if path.ends_with("getPlayerIds") {
            return Ok(players_payload());
        }
        match query[0].1.as_str() {
            "bad" => Ok(json!({ "garbage": [] })),
            id => Ok(league_payload(&format!("League {id}"))),
        }
    });
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &test_options());

    let results: HashMap<_, _> = fetcher
        .fetch_all(vec![
            ResourceSpec::player_directory("MLB"),
            ResourceSpec::league("bad"),
            ResourceSpec::league("good"),
        ])
        .await;

    assert_eq!(results.len(), 3);
    assert!(matches!(
        results[&ResourceKey::player_directory()],
        FetchOutcome::Success(_)
    ));
    assert!(matches!(
        results[&ResourceKey::league("bad")],
        FetchOutcome::Failure(FetchError::Schema(_))
    ));
    assert!(matches!(
        results[&ResourceKey::league("good")],
        FetchOutcome::Success(_)
    ));
}

#[tokio::test]
async fn duplicate_keys_are_fetched_once() {
    let dir = TempDir::new().unwrap();
    let client = MockClient::new(|_, _, _| Ok(league_payload("Ryan League")));
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &test_options());

    let results = fetcher
        .fetch_all(vec![ResourceSpec::league("dup"), ResourceSpec::league("dup")])
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn corrupt_cache_entry_falls_back_to_refresh() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("league_info_abc.json"), b"{ torn").unwrap();

    let client = MockClient::new(|_, _, _| Ok(league_payload("Maddux League")));
    let fetcher = fetcher_in(&dir, Arc::clone(&client), &test_options());

    let outcome = fetcher.fetch(&ResourceSpec::league("abc")).await;
    assert!(matches!(outcome, FetchOutcome::Success(_)));
    assert_eq!(client.calls(), 1);

    // the refresh repaired the entry on disk
    let store = CacheStore::open(dir.path()).unwrap();
    let entry = store.get(&ResourceKey::league("abc")).unwrap().unwrap();
    assert_eq!(entry.payload, league_payload("Maddux League"));
}
