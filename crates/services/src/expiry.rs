//! # Expiry Policy
//!
//! Two different mechanisms are in play:
//!
//! * Recruitment posts and party requests are *filtered* at read time. A
//!   record older than [`LISTING_TTL_MS`] drops out of listings but stays in
//!   storage until it is removed by id or replaced by its owner.
//! * Battle sessions are *purged*. Nothing hides them on read; an explicit
//!   sweep deletes the ones idle for longer than [`SESSION_IDLE_TTL_MS`].

use domains::Timestamp;

/// Listing window for recruitment posts and party requests (30 minutes).
pub const LISTING_TTL_MS: i64 = 30 * 60 * 1000;

/// Idle time after which a battle session may be purged (60 minutes).
pub const SESSION_IDLE_TTL_MS: i64 = 60 * 60 * 1000;

/// Listings include records with `created_at` strictly greater than this.
pub fn listing_cutoff(now: Timestamp) -> Timestamp {
    now.saturating_sub(LISTING_TTL_MS)
}

/// Sessions with `updated_at` strictly below this are purgeable.
pub fn session_purge_cutoff(now: Timestamp) -> Timestamp {
    now.saturating_sub(SESSION_IDLE_TTL_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: i64 = 60 * 1000;

    #[test]
    fn listing_cutoff_reaches_creation_time_at_thirty_minutes() {
        let t0 = 1_700_000_000_000;
        assert_eq!(listing_cutoff(t0 + 29 * MINUTE), t0 - MINUTE);
        assert_eq!(listing_cutoff(t0 + 30 * MINUTE), t0);
    }

    #[test]
    fn purge_cutoff_trails_now_by_an_hour() {
        let t0 = 1_700_000_000_000;
        assert_eq!(session_purge_cutoff(t0 + 60 * MINUTE), t0);
        assert_eq!(session_purge_cutoff(t0 + 61 * MINUTE), t0 + MINUTE);
    }

    #[test]
    fn cutoffs_do_not_overflow_near_min() {
        assert_eq!(listing_cutoff(i64::MIN), i64::MIN);
        assert_eq!(session_purge_cutoff(i64::MIN + 5), i64::MIN);
    }
}
