//! Fake platform implementation for testing.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::pal::Platform;

#[derive(Debug)]
struct FakePlatformState {
    monotonic_origin: Instant,
    wall_origin: NaiveDateTime,
    elapsed: Duration,
}

/// Fake implementation of the platform abstraction for testing.
///
/// Time stands still until a test calls [`advance()`](Self::advance). Clones share the same
/// underlying state, so a test can keep one clone and move time forward while the code under
/// test holds another, including from inside an instrumented call.
#[derive(Clone, Debug)]
pub(crate) struct FakePlatform {
    state: Rc<RefCell<FakePlatformState>>,
}

impl FakePlatform {
    /// Creates a fake platform whose wall clock reads 2024-01-02 03:04:05.
    pub(crate) fn new() -> Self {
        let wall_origin = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|date| date.and_hms_opt(3, 4, 5))
            .expect("hardcoded date is valid");

        Self {
            state: Rc::new(RefCell::new(FakePlatformState {
                monotonic_origin: Instant::now(),
                wall_origin,
                elapsed: Duration::ZERO,
            })),
        }
    }

    /// Moves both clocks forward by `by`.
    pub(crate) fn advance(&self, by: Duration) {
        let mut state = self.state.borrow_mut();
        state.elapsed = state
            .elapsed
            .checked_add(by)
            .expect("fake time overflows Duration - this indicates an unrealistic test");
    }
}

impl Platform for FakePlatform {
    fn now(&self) -> Instant {
        let state = self.state.borrow();
        state
            .monotonic_origin
            .checked_add(state.elapsed)
            .expect("fake time overflows Instant - this indicates an unrealistic test")
    }

    fn local_time(&self) -> NaiveDateTime {
        let state = self.state.borrow();
        let delta = TimeDelta::from_std(state.elapsed)
            .expect("fake time overflows TimeDelta - this indicates an unrealistic test");
        state
            .wall_origin
            .checked_add_signed(delta)
            .expect("fake time overflows NaiveDateTime - this indicates an unrealistic test")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn time_stands_still_until_advanced() {
        let platform = FakePlatform::new();

        assert_eq!(platform.now(), platform.now());
        assert_eq!(platform.local_time(), platform.local_time());
    }

    #[test]
    fn advance_moves_both_clocks() {
        let platform = FakePlatform::new();
        let instant_before = platform.now();
        let wall_before = platform.local_time();

        platform.advance(Duration::from_millis(1500));

        assert_eq!(
            platform.now().duration_since(instant_before),
            Duration::from_millis(1500)
        );
        assert_eq!(
            platform.local_time().signed_duration_since(wall_before),
            TimeDelta::milliseconds(1500)
        );
    }

    #[test]
    fn shared_state_between_clones() {
        let platform1 = FakePlatform::new();
        let platform2 = platform1.clone();
        let before = platform2.now();

        platform1.advance(Duration::from_secs(2));

        assert_eq!(platform2.now().duration_since(before), Duration::from_secs(2));
    }
}
