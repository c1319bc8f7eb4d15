//! Pure transformations: freshness judgments, schema validation, retry
//! arithmetic. Nothing here performs I/O.

mod freshness;
mod retry;
mod schema;

pub use freshness::{DomainSignal, Freshness, FreshnessPolicy, extract_signal};
pub use retry::retry_delay;
pub use schema::validate;
