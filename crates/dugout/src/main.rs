//! Sync the Fantrax player directory and known league records into the
//! local cache, skipping anything still fresh.

use std::process::ExitCode;

use anyhow::{Context, anyhow};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use dugout_fetch::{
    CacheStore, FetchOutcome, Fetcher, ReqwestClient, ResourceKey, ResourceSpec,
};

mod config;

use config::Config;

// Exit statuses: 0 = player directory synced (league failures degrade but
// do not fail the run), 1 = error, 130 = interrupted by the user.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::default();

    tokio::select! {
        result = run(&config) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        },
        // Dropping the run future aborts in-flight requests and closes
        // the session; atomic cache writes leave nothing torn.
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Process interrupted by user.");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}

async fn run(config: &Config) -> anyhow::Result<()> {
    let client = ReqwestClient::new(&config.base_url, config.options.timeout)
        .context("failed to establish network session")?;
    let store = CacheStore::open(&config.cache_dir)
        .with_context(|| format!("failed to open cache at {}", config.cache_dir.display()))?;
    let fetcher = Fetcher::new(client, store, &config.options);

    let mut specs = vec![ResourceSpec::player_directory(&config.sport)];
    specs.extend(config.leagues.iter().map(|id| ResourceSpec::league(id)));

    println!("Fetching league info for {} leagues...", config.leagues.len());
    let mut outcomes = fetcher.fetch_all(specs).await;

    // The player directory is the one required resource.
    let players = outcomes
        .remove(&ResourceKey::player_directory())
        .ok_or_else(|| anyhow!("player directory missing from batch results"))?;
    match players {
        FetchOutcome::Success(payload) | FetchOutcome::CacheHit(payload) => {
            let count = payload.as_object().map(|m| m.len()).unwrap_or(0);
            println!("Fetched {count} players.");
        }
        FetchOutcome::Failure(e) => {
            return Err(anyhow::Error::new(e).context("failed to fetch player data"));
        }
    }

    let mut fetched = 0usize;
    let mut cached = 0usize;
    let mut failed = 0usize;
    for (key, outcome) in &outcomes {
        match outcome {
            FetchOutcome::Success(_) => fetched += 1,
            FetchOutcome::CacheHit(_) => cached += 1,
            FetchOutcome::Failure(e) => {
                failed += 1;
                warn!(key = %key, error = %e, "league fetch failed");
            }
        }
    }
    println!(
        "League info: {fetched} fetched, {cached} from cache, {failed} failed (of {}).",
        outcomes.len()
    );

    Ok(())
}
