//! # Handlers
//!
//! Each handler captures "now" once, at request time, and passes it down.
//! Services never read the clock themselves.

pub mod health;
pub mod players;
pub mod recruitment;
pub mod sessions;

use domains::Timestamp;

pub(crate) fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}
