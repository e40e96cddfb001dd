use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::format::{Item, StrftimeItems};

use crate::pal::{Platform, PlatformFacade};

/// Timestamp format used for the start of each call unless configured otherwise.
pub(crate) const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// The time source of an [`EventStore`][crate::EventStore].
///
/// Elapsed durations come from the monotonic clock. Timestamps come from the local wall clock,
/// rendered with a `strftime` format that was validated when the clock was created.
#[derive(Clone, Debug)]
pub(crate) struct Clock {
    platform: PlatformFacade,
    timestamp_format: Rc<str>,
}

impl Clock {
    /// # Panics
    ///
    /// Panics if `timestamp_format` is not a valid `strftime` format string.
    pub(crate) fn new(platform: PlatformFacade, timestamp_format: &str) -> Self {
        assert!(
            is_valid_timestamp_format(timestamp_format),
            "invalid timestamp format: {timestamp_format}"
        );

        Self {
            platform,
            timestamp_format: timestamp_format.into(),
        }
    }

    pub(crate) fn real() -> Self {
        Self::new(PlatformFacade::real(), DEFAULT_TIMESTAMP_FORMAT)
    }

    pub(crate) fn now(&self) -> Instant {
        self.platform.now()
    }

    pub(crate) fn elapsed_since(&self, started: Instant) -> Duration {
        self.now().saturating_duration_since(started)
    }

    pub(crate) fn timestamp(&self) -> String {
        self.platform
            .local_time()
            .format(&self.timestamp_format)
            .to_string()
    }
}

pub(crate) fn is_valid_timestamp_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
