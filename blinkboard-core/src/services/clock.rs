use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Milliseconds since the Unix epoch.
///
/// Never returns less than a value previously handed out in this process,
/// even if the wall clock is stepped backwards.
pub fn now_millis() -> u64 {
    let wall = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let previous = LAST_MILLIS.fetch_max(wall, Ordering::Relaxed);
    previous.max(wall)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_goes_backwards() {
        let mut last = now_millis();
        for _ in 0..1_000 {
            let next = now_millis();
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn holds_after_clock_step_back() {
        let ahead = now_millis() + 60_000;
        LAST_MILLIS.fetch_max(ahead, Ordering::Relaxed);

        assert!(now_millis() >= ahead);
    }
}
