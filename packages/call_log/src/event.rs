use std::fmt;
use std::time::Duration;

/// One entry in an [`EventStore`][crate::EventStore].
///
/// Every instrumented callable produces one `Registered` entry when it is wrapped and then, per
/// invocation, one `Called` entry followed by exactly one `Returned` or `Raised` entry.
///
/// The text of results and errors is kept in full. Very large values therefore grow the log
/// (and the report) without bound.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// The callable was wrapped.
    Registered,

    /// An invocation started.
    Called {
        /// Number of positional arguments passed.
        positional: usize,

        /// Number of keyword arguments passed.
        keyword: usize,

        /// Local wall-clock time at which the invocation started.
        timestamp: String,
    },

    /// An invocation completed normally.
    Returned {
        /// Time between the start and the end of the invocation.
        elapsed: Duration,

        /// Textual form of the returned value.
        result: String,
    },

    /// An invocation failed.
    Raised {
        /// Time between the start and the end of the invocation.
        elapsed: Duration,

        /// Textual form of the failure.
        error: String,
    },
}

impl Event {
    /// Whether this event marks the start of an invocation.
    #[must_use]
    pub fn is_start(&self) -> bool {
        matches!(self, Self::Called { .. })
    }

    /// Whether this event marks the end of an invocation, successful or not.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Returned { .. } | Self::Raised { .. })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered => write!(f, "registered for logging"),
            Self::Called {
                positional,
                keyword,
                timestamp,
            } => write!(
                f,
                "called with {positional} args and {keyword} kwargs ({timestamp})"
            ),
            Self::Returned { elapsed, result } => {
                write!(f, "returning after {elapsed:?} with result: {result}")
            }
            Self::Raised { elapsed, error } => write!(f, "raised \"{error}\" after {elapsed:?}"),
        }
    }
}
