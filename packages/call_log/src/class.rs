//! Per-type method dispatch tables.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{Args, CallError, CallableId, Instrumented, Value};

/// A method implementation in a [`Class`] dispatch table.
///
/// The receiver is the object the method was called on; methods call their siblings through
/// [`Object::call()`] so that the call goes through the current dispatch table.
pub type Method<T> = Rc<dyn Fn(&Object<T>, Args) -> Result<Value, CallError>>;

/// A named type whose methods are dispatched through a table built at definition time.
///
/// The table maps method names to implementations. Instrumentation replaces table entries in
/// place, which every existing and future [`Object`] of the class observes because objects
/// dispatch through the shared `Rc<Class<T>>`.
///
/// A class may extend a parent class. Lookups that miss the class's own table continue in the
/// parent. Only methods in the class's own table count as declared on it.
///
/// # Examples
///
/// ```
/// use call_log::{Args, Class, Object, Value};
///
/// let counter = Class::<i64>::builder("Counter")
///     .method("get", |this, _args| Ok(Value::from(*this.state())))
///     .method("twice", |this, args| {
///         let value = i64::try_from(this.call("get", args)?)?;
///         Ok(Value::from(value * 2))
///     })
///     .build();
///
/// let object = Object::new(&counter, 21);
/// assert_eq!(object.call("twice", Args::new()), Ok(Value::Int(42)));
/// ```
pub struct Class<T> {
    name: Rc<str>,
    parent: Option<Rc<Self>>,

    /// Declared methods in declaration order.
    table: RefCell<Vec<(String, Entry<T>)>>,
}

enum Entry<T> {
    Plain(Method<T>),
    Instrumented(Rc<Instrumented<Method<T>>>),
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Plain(method) => Self::Plain(Rc::clone(method)),
            Self::Instrumented(instrumented) => Self::Instrumented(Rc::clone(instrumented)),
        }
    }
}

impl<T: 'static> Entry<T> {
    fn invoke(&self, this: &Object<T>, args: Args) -> Result<Value, CallError> {
        match self {
            Self::Plain(method) => method(this, args),
            Self::Instrumented(instrumented) => instrumented.call_method(this, args),
        }
    }

    /// The entry as a plain method. For an instrumented entry this is a new method that calls
    /// through the instrumentation.
    fn to_method(&self) -> Method<T> {
        match self {
            Self::Plain(method) => Rc::clone(method),
            Self::Instrumented(instrumented) => {
                let instrumented = Rc::clone(instrumented);
                Rc::new(move |this: &Object<T>, args: Args| {
                    instrumented.call_method(this, args)
                })
            }
        }
    }
}

impl<T: 'static> Class<T> {
    /// Starts defining a class called `name`.
    #[must_use]
    pub fn builder(name: impl Into<Rc<str>>) -> ClassBuilder<T> {
        ClassBuilder::new(name.into())
    }

    /// The name of the class.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The class this one extends, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    /// Names of the methods in this class's own table, in declaration order.
    ///
    /// Inherited methods are not included unless this class has its own entry for them.
    #[must_use]
    pub fn declared_methods(&self) -> Vec<String> {
        self.table
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Whether `name` resolves to a method on this class or one of its ancestors.
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// The current implementation of `name`, resolved through the ancestor chain.
    ///
    /// For a method that has not been instrumented, this is the exact implementation that was
    /// registered with the builder.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<Method<T>> {
        self.lookup(name).map(|entry| entry.to_method())
    }

    /// The instrumentation currently installed for `name`, resolved through the ancestor chain.
    ///
    /// Returns `None` if the method does not exist or is not instrumented.
    #[must_use]
    pub fn instrumented(&self, name: &str) -> Option<Rc<Instrumented<Method<T>>>> {
        match self.lookup(name)? {
            Entry::Instrumented(instrumented) => Some(instrumented),
            Entry::Plain(_) => None,
        }
    }

    /// The identity under which calls to `name` are recorded, if `name` is instrumented.
    #[must_use]
    pub fn callable_id(&self, name: &str) -> Option<CallableId> {
        self.instrumented(name)
            .map(|instrumented| instrumented.id().clone())
    }

    /// Installs `instrumented` as this class's own entry for `name`.
    ///
    /// An existing own entry is replaced in its position; otherwise the entry is appended,
    /// shadowing any inherited method of the same name.
    pub(crate) fn install(&self, name: &str, instrumented: Rc<Instrumented<Method<T>>>) {
        let entry = Entry::Instrumented(instrumented);
        let mut table = self.table.borrow_mut();

        if let Some(slot) = table.iter_mut().find(|(existing, _)| existing == name) {
            slot.1 = entry;
        } else {
            table.push((name.to_string(), entry));
        }
    }

    /// Resolves `name`, releasing every table borrow before returning so that the caller may
    /// invoke the entry, which may in turn look up or replace entries.
    fn lookup(&self, name: &str) -> Option<Entry<T>> {
        let own = self
            .table
            .borrow()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, entry)| entry.clone());

        own.or_else(|| self.parent.as_ref()?.lookup(name))
    }
}

impl<T> fmt::Debug for Class<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let methods: Vec<String> = self
            .table
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect();

        f.debug_struct("Class")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|parent| &parent.name))
            .field("methods", &methods)
            .finish()
    }
}

/// Defines the methods of a [`Class`].
///
/// Use `Class::builder()` to create a new instance of this builder.
pub struct ClassBuilder<T> {
    name: Rc<str>,
    parent: Option<Rc<Class<T>>>,
    table: Vec<(String, Entry<T>)>,
}

impl<T: 'static> ClassBuilder<T> {
    fn new(name: Rc<str>) -> Self {
        Self {
            name,
            parent: None,
            table: Vec::new(),
        }
    }

    /// Makes the class extend `parent`, inheriting every method it does not declare itself.
    #[must_use]
    pub fn extends(self, parent: &Rc<Class<T>>) -> Self {
        Self {
            parent: Some(Rc::clone(parent)),
            ..self
        }
    }

    /// Declares a method.
    ///
    /// Declaring the same name twice keeps the first position and the last implementation.
    #[must_use]
    pub fn method<M>(self, name: impl Into<String>, method: M) -> Self
    where
        M: Fn(&Object<T>, Args) -> Result<Value, CallError> + 'static,
    {
        self.method_rc(name, Rc::new(method))
    }

    /// Declares a method from an existing shared implementation.
    #[must_use]
    pub fn method_rc(mut self, name: impl Into<String>, method: Method<T>) -> Self {
        let name = name.into();
        let entry = Entry::Plain(method);

        if let Some(slot) = self.table.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = entry;
        } else {
            self.table.push((name, entry));
        }

        self
    }

    /// Finishes the definition.
    #[must_use]
    pub fn build(self) -> Rc<Class<T>> {
        Rc::new(Class {
            name: self.name,
            parent: self.parent,
            table: RefCell::new(self.table),
        })
    }
}

impl<T> fmt::Debug for ClassBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassBuilder")
            .field("name", &self.name)
            .field("methods", &self.table.len())
            .finish_non_exhaustive()
    }
}

/// An instance of a [`Class`], carrying per-instance state of type `T`.
#[derive(Debug)]
pub struct Object<T> {
    class: Rc<Class<T>>,
    state: T,
}

impl<T: 'static> Object<T> {
    /// Creates an instance of `class` with the given state.
    #[must_use]
    pub fn new(class: &Rc<Class<T>>, state: T) -> Self {
        Self {
            class: Rc::clone(class),
            state,
        }
    }

    /// The class of this object.
    #[must_use]
    pub fn class(&self) -> &Rc<Class<T>> {
        &self.class
    }

    /// The per-instance state.
    #[must_use]
    pub fn state(&self) -> &T {
        &self.state
    }

    /// Calls `method` on this object through the class's current dispatch table.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::UnknownMethod`] if the class has no such method, otherwise whatever
    /// the method returns.
    pub fn call(&self, method: &str, args: Args) -> Result<Value, CallError> {
        let entry = self
            .class
            .lookup(method)
            .ok_or_else(|| CallError::UnknownMethod {
                class: self.class.name().to_string(),
                method: method.to_string(),
            })?;

        entry.invoke(self, args)
    }
}
