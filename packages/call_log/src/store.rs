use std::cell::RefCell;
use std::fmt;

use foldhash::{HashMap, HashMapExt};

use crate::clock::Clock;
use crate::{CallableId, Event};

/// Append-only log of [`Event`]s, grouped by the identity of the callable they describe.
///
/// The log for a callable comes into existence when the first event for it is recorded and
/// from then on only grows. Callables are listed in the order their first event arrived.
///
/// Stores are shared between a [`Facility`][crate::Facility] and the instrumented callables
/// that report into it via `Rc<EventStore>`, so all operations take `&self`.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
///
/// use call_log::{EventStore, wrap};
///
/// let store = Rc::new(EventStore::new());
/// let double = wrap("double", |x: i32| x * 2, &store);
///
/// assert_eq!(double.call((21,)), 42);
///
/// // [double]
/// //     registered for logging
/// //     called with 1 args and 0 kwargs (...)
/// //     returning after ... with result: 42
/// store.render(None);
/// ```
#[derive(Debug)]
pub struct EventStore {
    logs: RefCell<Logs>,
    clock: Clock,
}

#[derive(Debug)]
struct Logs {
    /// Keys in the order of their first recorded event.
    order: Vec<CallableId>,
    events: HashMap<CallableId, Vec<Event>>,
}

impl EventStore {
    /// Creates an empty store that stamps events with the real system clocks.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Clock::real())
    }

    pub(crate) fn with_clock(clock: Clock) -> Self {
        Self {
            logs: RefCell::new(Logs {
                order: Vec::new(),
                events: HashMap::new(),
            }),
            clock,
        }
    }

    pub(crate) fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Appends `event` to the log of `key`, creating the log if this is its first event.
    pub fn record(&self, key: &CallableId, event: Event) {
        tracing::trace!(callable = %key, serial = key.serial(), %event, "recording call event");

        let mut logs = self.logs.borrow_mut();
        if let Some(events) = logs.events.get_mut(key) {
            events.push(event);
        } else {
            logs.order.push(key.clone());
            logs.events.insert(key.clone(), vec![event]);
        }
    }

    /// Returns a copy of the events recorded for `key`, oldest first.
    ///
    /// Returns an empty list if nothing was ever recorded for `key`.
    #[must_use]
    pub fn events(&self, key: &CallableId) -> Vec<Event> {
        self.logs
            .borrow()
            .events
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether any event was ever recorded for `key`.
    #[must_use]
    pub fn contains(&self, key: &CallableId) -> bool {
        self.logs.borrow().events.contains_key(key)
    }

    /// Returns the identities that have events, in the order of their first event.
    #[must_use]
    pub fn keys(&self) -> Vec<CallableId> {
        self.logs.borrow().order.clone()
    }

    /// Number of distinct callables that have events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.logs.borrow().order.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logs.borrow().order.is_empty()
    }

    /// Prints the events of `key`, or of every callable if `key` is `None`, to stdout.
    ///
    /// Each callable gets a `[name]` header line followed by its events, one per line and
    /// indented by a tab. Prints nothing for a key that has no events.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - covered via render_to().
    pub fn render(&self, key: Option<&CallableId>) {
        let mut text = String::new();
        self.render_to(&mut text, key)
            .expect("writing to a String cannot fail");
        print!("{text}");
    }

    /// Writes the same text as [`render()`](Self::render) into `out`.
    ///
    /// # Errors
    ///
    /// Returns an error only if `out` fails to accept the text.
    pub fn render_to(&self, out: &mut impl fmt::Write, key: Option<&CallableId>) -> fmt::Result {
        let logs = self.logs.borrow();

        match key {
            Some(key) => {
                if let Some(events) = logs.events.get(key) {
                    write_section(out, key, events)?;
                }
            }
            None => {
                for key in &logs.order {
                    if let Some(events) = logs.events.get(key) {
                        write_section(out, key, events)?;
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render_to(f, None)
    }
}

fn write_section(out: &mut impl fmt::Write, key: &CallableId, events: &[Event]) -> fmt::Result {
    writeln!(out, "[{}]", key.name())?;
    for event in events {
        writeln!(out, "\t{event}")?;
    }
    Ok(())
}
