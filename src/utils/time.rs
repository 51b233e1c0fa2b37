use chrono::{DateTime, Duration, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// A moment up to `max_days` in the past, used for seeded timestamps.
pub fn days_ago(max_days: i64, fraction: f64) -> DateTime<Utc> {
    let span = Duration::seconds((max_days as f64 * 86_400.0 * fraction.clamp(0.0, 1.0)) as i64);
    Utc::now() - span
}
