//! Dynamically typed values passed to and returned from dispatch-table methods.

use std::fmt;

use crate::CallError;

/// A value passed to or returned from a method of a [`Class`][crate::Class].
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// The absence of a value.
    #[default]
    None,

    /// A boolean.
    Bool(bool),

    /// A signed integer.
    Int(i64),

    /// A floating-point number.
    Float(f64),

    /// A string.
    Str(String),

    /// An ordered list of values.
    List(Vec<Value>),
}

impl Value {
    /// Short name of the type of this value, as used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
        }
    }

    /// Returns the integer if this is an [`Value::Int`].
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string if this is a [`Value::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    fn mismatch(&self, expected: &'static str) -> CallError {
        CallError::TypeMismatch {
            expected,
            actual: self.type_name(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "{value}"),
            Self::List(values) => {
                write!(f, "[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(values: Vec<Self>) -> Self {
        Self::List(values)
    }
}

impl TryFrom<Value> for i64 {
    type Error = CallError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_int().ok_or_else(|| value.mismatch("int"))
    }
}

impl TryFrom<Value> for bool {
    type Error = CallError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(inner) => Ok(inner),
            other => Err(other.mismatch("bool")),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = CallError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Str(inner) => Ok(inner),
            other => Err(other.mismatch("str")),
        }
    }
}

/// The arguments of one method invocation: positional values plus named keyword values.
///
/// # Examples
///
/// ```
/// use call_log::{Args, Value};
///
/// let args = Args::new().with(3).keyword("scale", 2);
///
/// assert_eq!(args.positional(), &[Value::Int(3)]);
/// assert_eq!(args.keyword_value("scale"), Some(&Value::Int(2)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

impl Args {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Sets a keyword argument, replacing any earlier value with the same name.
    #[must_use]
    pub fn keyword(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();

        if let Some(slot) = self.keywords.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = value;
        } else {
            self.keywords.push((name, value));
        }

        self
    }

    /// The positional arguments, in order.
    #[must_use]
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// The keyword arguments, in the order they were first set.
    #[must_use]
    pub fn keywords(&self) -> &[(String, Value)] {
        &self.keywords
    }

    /// Returns the positional argument at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::MissingArgument`] if fewer than `index + 1` positional arguments
    /// were supplied.
    pub fn require(&self, index: usize) -> Result<&Value, CallError> {
        self.positional
            .get(index)
            .ok_or(CallError::MissingArgument { index })
    }

    /// Returns the keyword argument called `name`, if supplied.
    #[must_use]
    pub fn keyword_value(&self, name: &str) -> Option<&Value> {
        self.keywords
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }
}
