//! Wall-clock helper. Room operations take `now_ms` explicitly (see
//! `domain::room::timeout`) so tests can drive timeouts deterministically
//! without sleeping; this is the only place that reads the real clock.

use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_millis() as u64
}
