//! Batch instrumentation of class methods.

use std::rc::Rc;

use crate::{BindError, Class, EventStore, wrap};

/// Chooses which methods of a [`Class`] to instrument.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Selector {
    /// Every method declared directly on the class, in declaration order. Inherited methods
    /// are excluded.
    Declared,

    /// The named methods, in the given order. Inherited methods may be named; the
    /// instrumented version is installed on the class itself. A name listed more than once is
    /// instrumented once, at its first position.
    Names(Vec<String>),
}

impl Selector {
    /// Selects the given method names.
    #[must_use]
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Names(names.into_iter().map(Into::into).collect())
    }
}

/// Instruments the methods of `class` chosen by `selector`, recording their calls in `store`.
///
/// Each selected method is resolved, wrapped and installed in the class's dispatch table one
/// after another. The class is changed in place, so existing objects are affected too.
///
/// # Errors
///
/// Returns [`BindError::MissingMethod`] if a named method cannot be resolved. Methods
/// processed before the missing one stay instrumented.
pub fn bind<T: 'static>(
    class: &Rc<Class<T>>,
    selector: &Selector,
    store: &Rc<EventStore>,
) -> Result<Rc<Class<T>>, BindError> {
    let names = match selector {
        Selector::Declared => class.declared_methods(),
        Selector::Names(names) => {
            let mut unique: Vec<String> = Vec::with_capacity(names.len());
            for name in names {
                if !unique.contains(name) {
                    unique.push(name.clone());
                }
            }
            unique
        }
    };

    tracing::debug!(class = class.name(), methods = ?names, "binding methods for logging");

    for name in &names {
        let current = class
            .method(name)
            .ok_or_else(|| BindError::MissingMethod {
                class: class.name().to_string(),
                method: name.clone(),
            })?;

        let instrumented = wrap(name.as_str(), current, store);
        class.install(name, Rc::new(instrumented));
    }

    Ok(Rc::clone(class))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{Args, CallError, Event, Object, Value};

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

    fn terminal_results(store: &EventStore, class: &Class<()>, name: &str) -> Vec<String> {
        let id = class.callable_id(name).unwrap();
        store
            .events(&id)
            .into_iter()
            .filter_map(|event| match event {
                Event::Returned { result, .. } => Some(result),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn declared_selector_instruments_every_own_method() {
        let class = test_class();
        let store = Rc::new(EventStore::new());

        bind(&class, &Selector::Declared, &store).unwrap();

        for name in ["foo", "bar", "baz"] {
            assert!(class.instrumented(name).is_some(), "{name} should be instrumented");
        }
        assert_eq!(store.len(), 3);
        assert_eq!(
            store
                .keys()
                .iter()
                .map(|id| id.name().to_string())
                .collect::<Vec<_>>(),
            vec!["foo", "bar", "baz"]
        );
    }

    #[test]
    fn declared_selector_excludes_inherited_methods() {
        let parent = test_class();
        let child = Class::builder("Child")
            .extends(&parent)
            .method("qux", |_, _| Ok(Value::None))
            .build();
        let store = Rc::new(EventStore::new());

        bind(&child, &Selector::Declared, &store).unwrap();

        assert!(child.instrumented("qux").is_some());
        assert!(child.instrumented("foo").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn named_selector_skips_unselected_methods() {
        let class = test_class();
        let store = Rc::new(EventStore::new());
        bind(&class, &Selector::names(["foo", "baz"]), &store).unwrap();

        let result = Object::new(&class, ()).call("baz", Args::new());

        assert_eq!(result, Ok(Value::Int(4)));
        assert!(class.instrumented("bar").is_none());
        assert_eq!(terminal_results(&store, &class, "foo"), vec!["1"]);
        assert_eq!(terminal_results(&store, &class, "baz"), vec!["4"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn named_selector_can_instrument_inherited_method() {
        let parent = test_class();
        let child = Class::builder("Child").extends(&parent).build();
        let store = Rc::new(EventStore::new());

        bind(&child, &Selector::names(["foo"]), &store).unwrap();

        let child_object = Object::new(&child, ());
        let parent_object = Object::new(&parent, ());
        child_object.call("foo", Args::new()).unwrap();
        parent_object.call("foo", Args::new()).unwrap();

        assert_eq!(child.declared_methods(), vec!["foo".to_string()]);
        assert_eq!(terminal_results(&store, &child, "foo"), vec!["1"]);
    }

    #[test]
    fn missing_method_fails_after_earlier_names() {
        let class = test_class();
        let store = Rc::new(EventStore::new());

        let result = bind(&class, &Selector::names(["foo", "missing", "baz"]), &store);

        assert_eq!(
            result.unwrap_err(),
            BindError::MissingMethod {
                class: "TestClass".to_string(),
                method: "missing".to_string()
            }
        );
        assert!(class.instrumented("foo").is_some());
        assert!(class.instrumented("baz").is_none());
    }

    #[test]
    fn errors_pass_through_instrumented_methods() {
        let class = Class::<()>::builder("Failing")
            .method("fail", |_, _| Err(CallError::raised("bad")))
            .build();
        let store = Rc::new(EventStore::new());
        bind(&class, &Selector::Declared, &store).unwrap();

        let result = Object::new(&class, ()).call("fail", Args::new());

        assert_eq!(result, Err(CallError::raised("bad")));
        let id = class.callable_id("fail").unwrap();
        assert!(matches!(
            store.events(&id).last(),
            Some(Event::Raised { error, .. }) if error == "bad"
        ));
    }

    #[test]
    fn binding_twice_wraps_the_wrapper() {
        let class = test_class();
        let store = Rc::new(EventStore::new());

        bind(&class, &Selector::names(["foo"]), &store).unwrap();
        let first = class.callable_id("foo").unwrap();
        bind(&class, &Selector::names(["foo"]), &store).unwrap();
        let second = class.callable_id("foo").unwrap();

        Object::new(&class, ()).call("foo", Args::new()).unwrap();

        assert_ne!(first, second);
        assert_eq!(store.events(&first).len(), 3);
        assert_eq!(store.events(&second).len(), 3);
    }

    #[test]
    fn repeated_name_is_instrumented_once() {
        let class = test_class();
        let store = Rc::new(EventStore::new());

        bind(&class, &Selector::names(["foo", "baz", "foo"]), &store).unwrap();
        Object::new(&class, ()).call("foo", Args::new()).unwrap();

        assert_eq!(store.len(), 2);
        let foo = class.callable_id("foo").unwrap();
        let starts = store
            .events(&foo)
            .iter()
            .filter(|event| event.is_start())
            .count();
        assert_eq!(starts, 1);
        assert_eq!(store.keys(), vec![foo, class.callable_id("baz").unwrap()]);
    }

    #[test]
    fn returns_the_same_class() {
        let class = test_class();
        let store = Rc::new(EventStore::new());

        let returned = bind(&class, &Selector::Declared, &store).unwrap();

        assert!(Rc::ptr_eq(&returned, &class));
    }
}
