#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Attachable call tracing for functions and class methods.
//!
//! This package records every invocation of the callables you register with it: when each call
//! started, how many arguments it received, how long it took and what it returned or failed
//! with. The callables themselves behave exactly as before; the tracing is purely observational.
//!
//! The core functionality includes:
//! - [`Facility`] - Registers callables for tracing and reports what they did
//! - [`Instrumented`] - A wrapped callable that records each invocation
//! - [`EventStore`] - The per-callable log of recorded [`Event`]s
//! - [`Class`] and [`Object`] - Method dispatch tables whose entries can be instrumented in place
//! - [`MethodBinder`] - Instruments a chosen set of methods on a class
//!
//! This package is not meant for use in production, serving only as a debugging and testing aid.
//!
//! # Tracing functions
//!
//! ```
//! use call_log::Facility;
//!
//! let facility = Facility::new();
//!
//! let add = facility.log_function("add", |a: i32, b: i32| a + b);
//! assert_eq!(add.call((2, 3)), 5);
//!
//! // [add]
//! //     registered for logging
//! //     called with 2 args and 0 kwargs (2025-01-01 12:00:00.000000)
//! //     returning after 1.2µs with result: 5
//! facility.report();
//! ```
//!
//! # Tracing methods
//!
//! Methods live in the dispatch table of a [`Class`]. Instrumenting a method replaces its table
//! entry, so every later call through the table is recorded, including calls that one method
//! makes to another on the same object.
//!
//! ```
//! use call_log::{Args, Class, Facility, Object, Value};
//!
//! let facility = Facility::new();
//!
//! let class = Class::<()>::builder("TestClass")
//!     .method("foo", |_, _| Ok(Value::from(1)))
//!     .method("bar", |this, args| {
//!         let foo = i64::try_from(this.call("foo", args)?)?;
//!         Ok(Value::from(foo * 2))
//!     })
//!     .method("baz", |this, args| {
//!         let bar = i64::try_from(this.call("bar", args)?)?;
//!         Ok(Value::from(bar * 2))
//!     })
//!     .build();
//!
//! facility.log_methods(["foo", "baz"]).apply(&class).unwrap();
//!
//! let object = Object::new(&class, ());
//! assert_eq!(object.call("baz", Args::new()), Ok(Value::from(4)));
//!
//! // Reports `foo` and `baz`, but not `bar`.
//! facility.report();
//! ```
//!
//! # Failures
//!
//! A callable fails either by returning `Err` or by panicking. Both are recorded as raised and
//! then passed on to the caller unchanged: the `Err` value is returned as-is and the panic is
//! resumed with its original payload.
//!
//! # Threading
//!
//! All types in this package are single-threaded. Each thread that wants to trace calls needs
//! its own [`Facility`].
//!
//! # Diagnostics
//!
//! Registrations and bindings are emitted as `tracing` events at the `debug` level and every
//! recorded event at the `trace` level, under the `call_log` target.

mod bind;
mod class;
mod clock;
mod error;
mod event;
mod facility;
mod identity;
mod instrument;
mod outcome;
mod pal;
mod store;
mod value;

pub use bind::{Selector, bind};
pub use class::{Class, ClassBuilder, Method, Object};
pub use error::{BindError, CallError};
pub use event::Event;
pub use facility::{Facility, FacilityBuilder, MethodBinder};
pub use identity::CallableId;
pub use instrument::{Instrumented, wrap};
pub use outcome::{Arguments, Completion, Invoke, Outcome};
pub use store::EventStore;
pub use value::{Args, Value};
