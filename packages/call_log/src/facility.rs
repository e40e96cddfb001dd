use std::fmt;
use std::rc::Rc;

use crate::bind::{Selector, bind};
use crate::clock::{Clock, DEFAULT_TIMESTAMP_FORMAT, is_valid_timestamp_format};
use crate::pal::PlatformFacade;
use crate::{BindError, CallableId, Class, EventStore, Instrumented, wrap};

/// Records the calls of registered functions and class methods and reports on them.
///
/// A facility keeps two logs: one for free functions registered with
/// [`log_function()`](Self::log_function) and one for class methods registered with
/// [`log_class()`](Self::log_class) or [`log_methods()`](Self::log_methods).
///
/// # Examples
///
/// ```
/// use call_log::{Args, Class, Facility, Object, Value};
///
/// let facility = Facility::new();
///
/// let square = facility.log_function("square", |x: i64| x * x);
/// assert_eq!(square.call((7,)), 49);
///
/// let class = Class::<()>::builder("Greeter")
///     .method("hello", |_, _| Ok(Value::from("hello")))
///     .build();
/// facility.log_class(&class);
///
/// let greeter = Object::new(&class, ());
/// assert_eq!(greeter.call("hello", Args::new()), Ok(Value::from("hello")));
///
/// facility.report();
/// ```
#[derive(Debug)]
pub struct Facility {
    functions: Rc<EventStore>,
    classes: Rc<EventStore>,
}

impl Facility {
    /// Creates a facility with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts configuring a facility.
    #[must_use]
    pub fn builder() -> FacilityBuilder {
        FacilityBuilder::new()
    }

    /// Wraps `function` so that its calls are recorded in the function log under `name`.
    pub fn log_function<F>(&self, name: impl Into<Rc<str>>, function: F) -> Instrumented<F> {
        wrap(name, function, &self.functions)
    }

    /// Instruments every method declared directly on `class`, in place.
    ///
    /// Returns the same class so the call can be chained onto a class definition.
    pub fn log_class<T: 'static>(&self, class: &Rc<Class<T>>) -> Rc<Class<T>> {
        match bind(class, &Selector::Declared, &self.classes) {
            Ok(class) => class,
            Err(error) => unreachable!("every declared method resolves on its own class: {error}"),
        }
    }

    /// Prepares to instrument the named methods of a class that is provided later.
    ///
    /// # Examples
    ///
    /// ```
    /// use call_log::{Class, Facility, Value};
    ///
    /// let facility = Facility::new();
    /// let binder = facility.log_methods(["foo", "baz"]);
    ///
    /// let class = Class::<()>::builder("TestClass")
    ///     .method("foo", |_, _| Ok(Value::from(1)))
    ///     .method("bar", |_, _| Ok(Value::from(2)))
    ///     .method("baz", |_, _| Ok(Value::from(3)))
    ///     .build();
    ///
    /// binder.apply(&class).unwrap();
    /// assert!(class.instrumented("foo").is_some());
    /// assert!(class.instrumented("bar").is_none());
    /// ```
    #[must_use]
    pub fn log_methods<I, S>(&self, names: I) -> MethodBinder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MethodBinder {
            selector: Selector::names(names),
            store: Rc::clone(&self.classes),
        }
    }

    /// Prints the function log followed by the class log to stdout.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - covered via Display.
    pub fn report(&self) {
        self.functions.render(None);
        self.classes.render(None);
    }

    /// Prints only the events recorded for `id` to stdout, from whichever log holds them.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - covered via write_callable().
    pub fn report_callable(&self, id: &CallableId) {
        let mut text = String::new();
        self.write_callable(&mut text, id)
            .expect("writing to a String cannot fail");
        print!("{text}");
    }

    fn write_callable(&self, out: &mut impl fmt::Write, id: &CallableId) -> fmt::Result {
        self.functions.render_to(out, Some(id))?;
        self.classes.render_to(out, Some(id))
    }

    /// The log of free functions.
    #[must_use]
    pub fn function_log(&self) -> &Rc<EventStore> {
        &self.functions
    }

    /// The log of class methods.
    #[must_use]
    pub fn class_log(&self) -> &Rc<EventStore> {
        &self.classes
    }
}

impl Default for Facility {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.functions.render_to(f, None)?;
        self.classes.render_to(f, None)
    }
}

/// Instruments a chosen set of methods on whichever class it is applied to.
///
/// Created by [`Facility::log_methods()`].
#[derive(Debug)]
#[must_use = "the methods are only instrumented once the binder is applied to a class"]
pub struct MethodBinder {
    selector: Selector,
    store: Rc<EventStore>,
}

impl MethodBinder {
    /// Instruments the selected methods of `class` in place and returns the class.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::MissingMethod`] if a selected method does not exist on the class.
    /// Methods selected before the missing one stay instrumented.
    pub fn apply<T: 'static>(&self, class: &Rc<Class<T>>) -> Result<Rc<Class<T>>, BindError> {
        bind(class, &self.selector, &self.store)
    }
}

/// Creates instances of [`Facility`].
///
/// Use `Facility::builder()` to create a new instance of this builder.
#[derive(Debug)]
pub struct FacilityBuilder {
    timestamp_format: String,
    platform: PlatformFacade,
}

impl FacilityBuilder {
    fn new() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            platform: PlatformFacade::real(),
        }
    }

    /// Sets the `strftime` format of the timestamp recorded when a call starts.
    ///
    /// The default is `%Y-%m-%d %H:%M:%S%.6f`.
    ///
    /// # Example
    ///
    /// ```
    /// use call_log::Facility;
    ///
    /// let facility = Facility::builder().timestamp_format("%H:%M:%S").build();
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `format` is not a valid `strftime` format string.
    #[must_use]
    pub fn timestamp_format(self, format: impl Into<String>) -> Self {
        let format = format.into();

        assert!(
            is_valid_timestamp_format(&format),
            "invalid timestamp format: {format}"
        );

        Self {
            timestamp_format: format,
            ..self
        }
    }

    #[cfg(test)]
    pub(crate) fn platform(self, platform: PlatformFacade) -> Self {
        Self { platform, ..self }
    }

    /// Creates the facility.
    #[must_use]
    pub fn build(self) -> Facility {
        let clock = Clock::new(self.platform, &self.timestamp_format);

        Facility {
            functions: Rc::new(EventStore::with_clock(clock.clone())),
            classes: Rc::new(EventStore::with_clock(clock)),
        }
    }
}
