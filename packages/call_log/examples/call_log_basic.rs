//! Basic example of tracing the methods of a class with `call_log`.
//!
//! Two of three methods are instrumented. Calling the outermost method runs all three, but only
//! the instrumented ones show up in the report.
//!
//! Run with: `cargo run --example call_log_basic`.
//! Set `RUST_LOG=call_log=debug` to also see registrations as `tracing` events.
#![expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division,
    clippy::modulo_arithmetic,
    reason = "this is example code that does not need production-level safety"
)]

use call_log::{Args, CallError, Class, Facility, Object, Value};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let facility = Facility::new();

    let class = Class::<()>::builder("TestClass")
        .method("foo", |_, _| Ok(Value::from(1)))
        .method("bar", |this, args| {
            let foo = i64::try_from(this.call("foo", args)?)?;
            Ok(Value::from(foo * 2))
        })
        .method("baz", |this, args| {
            let bar = i64::try_from(this.call("bar", args)?)?;
            Ok(Value::from(bar * 2))
        })
        .build();

    if let Err(error) = facility.log_methods(["foo", "baz"]).apply(&class) {
        eprintln!("failed to instrument methods: {error}");
        return;
    }

    let object = Object::new(&class, ());
    match object.call("baz", Args::new()) {
        Ok(value) => println!("baz() = {value}"),
        Err(error) => println!("baz() failed: {error}"),
    }

    let halve = facility.log_function("halve", |x: i64| {
        if x % 2 == 0 {
            Ok(x / 2)
        } else {
            Err(CallError::raised(format!("{x} is odd")))
        }
    });
    println!("halve(10) = {:?}", halve.call((10,)));
    println!("halve(7) = {:?}", halve.call((7,)));

    println!();
    facility.report();
}
