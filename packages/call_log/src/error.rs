use thiserror::Error;

/// Errors that can occur when instrumenting the methods of a [`Class`][crate::Class].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BindError {
    /// A method selected by name does not exist on the class or any of its ancestors.
    ///
    /// Methods selected before this one remain instrumented.
    #[error("class '{class}' has no method named '{method}'")]
    MissingMethod {
        /// Name of the class that was being instrumented.
        class: String,

        /// The method name that could not be resolved.
        method: String,
    },
}

/// Errors returned by methods invoked through a [`Class`][crate::Class] dispatch table.
///
/// Method bodies report their own failures as [`CallError::Raised`]. Instrumentation passes
/// every error through unchanged, so a caller cannot tell an instrumented method from the
/// original by the error it returns.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CallError {
    /// The object's class has no method with the requested name.
    #[error("'{class}' object has no method '{method}'")]
    UnknownMethod {
        /// Name of the class of the object that was called.
        class: String,

        /// The method name that was requested.
        method: String,
    },

    /// A positional argument the method requires was not supplied.
    #[error("missing positional argument {index}")]
    MissingArgument {
        /// Zero-based position of the missing argument.
        index: usize,
    },

    /// A value did not have the type the method expected.
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        /// Name of the expected value type.
        expected: &'static str,

        /// Name of the type that was supplied.
        actual: &'static str,
    },

    /// The method body reported a failure.
    #[error("{message}")]
    Raised {
        /// Human-readable description of the failure.
        message: String,
    },
}

impl CallError {
    /// Creates a [`CallError::Raised`] with the given message.
    #[must_use]
    pub fn raised(message: impl Into<String>) -> Self {
        Self::Raised {
            message: message.into(),
        }
    }
}
