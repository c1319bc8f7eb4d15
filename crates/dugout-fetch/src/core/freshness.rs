use std::time::{Duration, SystemTime};

use chrono::{Days, NaiveDate};
use serde_json::Value;

use crate::data::{CacheEntry, ResourceClass};

/// Read-time judgment of a cache entry. Staleness never evicts; it only
/// decides whether a refresh is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
    Absent,
}

/// Domain knowledge that can override the TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainSignal {
    /// The season this record describes is over; the record will not
    /// change again.
    SeasonConcluded,
}

/// Stateless freshness policy: TTL window plus a domain override.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessPolicy {
    ttl: Duration,
    concluded_grace_days: u64,
}

impl FreshnessPolicy {
    pub fn new(ttl: Duration, concluded_grace_days: u64) -> Self {
        Self {
            ttl,
            concluded_grace_days,
        }
    }

    pub fn concluded_grace_days(&self) -> u64 {
        self.concluded_grace_days
    }

    /// Judge an entry at time `now`.
    ///
    /// A concluded season is permanently fresh regardless of how long ago
    /// the entry was written. Otherwise an entry is fresh while its age is
    /// strictly inside the TTL window.
    pub fn evaluate(
        &self,
        entry: Option<&CacheEntry>,
        signal: Option<DomainSignal>,
        now: SystemTime,
    ) -> Freshness {
        let Some(entry) = entry else {
            return Freshness::Absent;
        };
        if matches!(signal, Some(DomainSignal::SeasonConcluded)) {
            return Freshness::Fresh;
        }
        if entry.age(now) < self.ttl {
            Freshness::Fresh
        } else {
            Freshness::Stale
        }
    }
}

/// Extract the domain signal, if any, from a cached payload.
///
/// Only league records carry one: an `endDate` (ISO `YYYY-MM-DD`) more
/// than `grace_days` in the past means the season concluded. A missing or
/// unparseable date yields no signal, so the TTL applies as usual.
pub fn extract_signal(
    class: ResourceClass,
    payload: &Value,
    grace_days: u64,
    today: NaiveDate,
) -> Option<DomainSignal> {
    if class != ResourceClass::LeagueInfo {
        return None;
    }
    let end = payload.get("endDate")?.as_str()?;
    let end = NaiveDate::parse_from_str(end, "%Y-%m-%d").ok()?;
    let cutoff = end.checked_add_days(Days::new(grace_days))?;
    (cutoff < today).then_some(DomainSignal::SeasonConcluded)
}
