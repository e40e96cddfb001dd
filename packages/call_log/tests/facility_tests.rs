//! Integration tests for `call_log` against the real system clocks.
//!
//! These tests exercise the public API the way a debugging session would: register callables,
//! call them, then inspect the recorded events. Timestamps and durations come from the real
//! platform, so only their presence and shape are verified.

use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use call_log::{
    Args, BindError, CallError, Class, Event, EventStore, Facility, Object, Selector, Value, bind,
    wrap,
};

fn test_class() -> Rc<Class<()>> {
    Class::builder("TestClass")
        .method("foo", |_, _| Ok(Value::from(1)))
        .method("bar", |this, args| {
            let foo = i64::try_from(this.call("foo", args)?)?;
            Ok(Value::from(foo * 2))
        })
        .method("baz", |this, args| {
            let bar = i64::try_from(this.call("bar", args)?)?;
            Ok(Value::from(bar * 2))
        })
        .build()
}

fn results(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Returned { result, .. } => Some(result.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn selected_methods_are_logged_and_unselected_are_not() {
    let facility = Facility::new();
    let class = facility
        .log_methods(["foo", "baz"])
        .apply(&test_class())
        .unwrap();

    let result = Object::new(&class, ()).call("baz", Args::new());

    assert_eq!(result, Ok(Value::Int(4)));

    let log = facility.class_log();
    let foo = class.callable_id("foo").unwrap();
    let baz = class.callable_id("baz").unwrap();
    assert_eq!(log.keys(), vec![foo.clone(), baz.clone()]);
    assert_eq!(results(&log.events(&foo)), vec!["1"]);
    assert_eq!(results(&log.events(&baz)), vec!["4"]);

    let report = facility.to_string();
    assert!(report.contains("[foo]"));
    assert!(report.contains("[baz]"));
    assert!(!report.contains("[bar]"));
}

#[test]
fn call_event_carries_counts_and_timestamp() {
    let facility = Facility::builder().timestamp_format("%Y").build();
    let joined = facility.log_function("joined", |args: Args| {
        args.positional()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    });

    let result = joined.call(Args::new().with(1).with("two").keyword("sep", ","));

    assert_eq!(result, "1,two");

    let events = facility.function_log().events(joined.id());
    let Some(Event::Called {
        positional,
        keyword,
        timestamp,
    }) = events.get(1)
    else {
        panic!("expected a call event, got {events:?}");
    };
    assert_eq!(*positional, 2);
    assert_eq!(*keyword, 1);
    assert_eq!(timestamp.len(), 4);
    assert!(timestamp.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn failures_are_logged_and_propagated() {
    let facility = Facility::new();
    let checked = facility.log_function("checked", |x: i64| {
        if x < 0 {
            Err(CallError::raised("bad"))
        } else {
            Ok(x)
        }
    });
    let exploding = facility.log_function("exploding", || -> i64 { panic!("boom") });

    assert_eq!(checked.call((1,)), Ok(1));
    assert_eq!(checked.call((-1,)), Err(CallError::raised("bad")));
    let payload = panic::catch_unwind(AssertUnwindSafe(|| exploding.call(()))).unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"boom"));

    let checked_events = facility.function_log().events(checked.id());
    assert_eq!(checked_events.len(), 5);
    assert!(matches!(checked_events.get(2), Some(Event::Returned { result, .. }) if result == "1"));
    assert!(matches!(checked_events.get(4), Some(Event::Raised { error, .. }) if error == "bad"));

    let exploding_events = facility.function_log().events(exploding.id());
    assert!(
        matches!(exploding_events.last(), Some(Event::Raised { error, .. }) if error == "boom")
    );

    let report = facility.to_string();
    assert!(report.contains("\traised \"bad\" after "));
    assert!(report.contains("\traised \"boom\" after "));
}

#[test]
fn every_call_has_exactly_one_start_and_one_end() {
    let facility = Facility::new();
    let class = facility.log_class(&test_class());
    let object = Object::new(&class, ());

    for _ in 0..3 {
        object.call("baz", Args::new()).unwrap();
    }

    for id in facility.class_log().keys() {
        let events = facility.class_log().events(&id);
        assert_eq!(events.first(), Some(&Event::Registered));
        assert_eq!(events.len(), 7, "{id} should have three start/end pairs");

        let starts = events.iter().filter(|event| event.is_start()).count();
        let ends = events.iter().filter(|event| event.is_terminal()).count();
        assert_eq!(starts, 3);
        assert_eq!(ends, 3);
    }
}

#[test]
fn same_name_different_callables_have_separate_logs() {
    let facility = Facility::new();
    let first = facility.log_function("helper", || 1);
    let second = facility.log_function("helper", || 2);

    first.call(());

    assert_ne!(first.id(), second.id());
    assert_eq!(facility.function_log().events(first.id()).len(), 3);
    assert_eq!(facility.function_log().events(second.id()).len(), 1);
    assert_eq!(
        facility.to_string().matches("[helper]").count(),
        2,
        "both callables are listed under their shared name"
    );
}

#[test]
fn missing_method_is_reported_by_name() {
    let store = Rc::new(EventStore::new());

    let error = bind(&test_class(), &Selector::names(["qux"]), &store).unwrap_err();

    assert_eq!(
        error.to_string(),
        "class 'TestClass' has no method named 'qux'"
    );
    assert!(matches!(error, BindError::MissingMethod { .. }));
}

#[test]
fn wrapped_callables_are_reusable_values() {
    let store = Rc::new(EventStore::new());
    let square = wrap("square", |x: i64| x * x, &store);

    let squares: Vec<i64> = (1..=4).map(|x| square.call((x,))).collect();

    assert_eq!(squares, vec![1, 4, 9, 16]);
    assert_eq!(results(&store.events(square.id())), vec!["1", "4", "9", "16"]);
}
