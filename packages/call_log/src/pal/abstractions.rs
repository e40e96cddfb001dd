//! Platform abstraction trait definitions.

use std::fmt::Debug;
use std::time::Instant;

use chrono::NaiveDateTime;

/// Provides the clocks that instrumented calls are measured against.
///
/// Durations are always measured on the monotonic clock. The wall clock is only used to
/// produce a human-readable timestamp for the start of each call.
pub(crate) trait Platform: Debug + 'static {
    /// Gets the current reading of the monotonic clock.
    fn now(&self) -> Instant;

    /// Gets the current local wall-clock time.
    fn local_time(&self) -> NaiveDateTime;
}
