//! Wrapping of individual callables.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use crate::{
    Args, Arguments, CallError, CallableId, Event, EventStore, Invoke, Method, Object, Outcome,
    Value,
};

/// A callable wrapped so that every invocation is recorded in an [`EventStore`].
///
/// Calling it calls the original exactly once and hands back exactly what the original
/// returned. Around the call, the store receives a `Called` event followed by a `Returned` or
/// `Raised` event, keyed by [`id()`](Self::id).
///
/// Failures are never altered. An `Err` result is recorded as raised and returned as-is. A
/// panic is recorded as raised with its message and then resumed with the original payload.
///
/// The wrapper only holds a weak reference to its store. If the store has been dropped, calls
/// still go through to the original but nothing is recorded.
///
/// Clones share the identity of the original wrapper and report into the same log.
///
/// # Examples
///
/// ```
/// use call_log::Facility;
///
/// let facility = Facility::new();
/// let add = facility.log_function("add", |a: i32, b: i32| a + b);
///
/// assert_eq!(add.call((2, 3)), 5);
///
/// let events = facility.function_log().events(add.id());
/// assert_eq!(events.len(), 3); // registered, called, returning
/// ```
#[derive(Clone)]
pub struct Instrumented<F> {
    original: F,
    id: CallableId,
    store: Weak<EventStore>,
}

/// Wraps `callable` so that its invocations are recorded in `store` under the name `name`.
///
/// A `Registered` event is recorded immediately, before the callable is ever invoked.
pub fn wrap<F>(name: impl Into<Rc<str>>, callable: F, store: &Rc<EventStore>) -> Instrumented<F> {
    let id = CallableId::new(name);
    store.record(&id, Event::Registered);

    tracing::debug!(callable = %id, serial = id.serial(), "registered for logging");

    Instrumented {
        original: callable,
        id,
        store: Rc::downgrade(store),
    }
}

impl<F> Instrumented<F> {
    /// The identity under which this callable's events are recorded.
    #[must_use]
    pub fn id(&self) -> &CallableId {
        &self.id
    }

    /// The exact callable that was passed in when wrapping.
    #[must_use]
    pub fn original(&self) -> &F {
        &self.original
    }

    /// Unwraps the original callable. Later calls to it are no longer recorded.
    #[must_use]
    pub fn into_original(self) -> F {
        self.original
    }

    /// Invokes the original callable with `args`, recording the invocation.
    ///
    /// Typed closures take a tuple of their parameters; `Fn(Args)` callables take [`Args`].
    pub fn call<A>(&self, args: A) -> F::Output
    where
        A: Arguments,
        F: Invoke<A>,
        F::Output: Outcome,
    {
        let positional = args.positional_count();
        let keyword = args.keyword_count();

        self.observe(positional, keyword, || self.original.invoke(args))
    }

    pub(crate) fn observe<R>(&self, positional: usize, keyword: usize, call: impl FnOnce() -> R) -> R
    where
        R: Outcome,
    {
        let Some(store) = self.store.upgrade() else {
            return call();
        };

        let clock = store.clock().clone();
        let started = clock.now();

        store.record(
            &self.id,
            Event::Called {
                positional,
                keyword,
                timestamp: clock.timestamp(),
            },
        );

        // No borrow of the store is held here, so the call may re-enter this or any other
        // instrumented callable.
        match panic::catch_unwind(AssertUnwindSafe(call)) {
            Ok(result) => {
                let elapsed = clock.elapsed_since(started);
                store.record(&self.id, result.completion().into_event(elapsed));
                result
            }
            Err(payload) => {
                let elapsed = clock.elapsed_since(started);
                store.record(
                    &self.id,
                    Event::Raised {
                        elapsed,
                        error: panic_message(payload.as_ref()),
                    },
                );
                panic::resume_unwind(payload)
            }
        }
    }
}

impl<T> Instrumented<Method<T>> {
    /// Invokes the original method on `this`, recording the invocation.
    ///
    /// The receiver is not counted as an argument.
    ///
    /// # Errors
    ///
    /// Returns whatever error the original method returns, unchanged.
    pub fn call_method(&self, this: &Object<T>, args: Args) -> Result<Value, CallError> {
        let positional = args.positional_count();
        let keyword = args.keyword_count();

        self.observe(positional, keyword, || (self.original)(this, args))
    }
}

impl<F> fmt::Debug for Instrumented<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumented")
            .field("id", &self.id)
            .field("store_alive", &(self.store.strong_count() > 0))
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
