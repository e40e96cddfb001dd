//! How invocations are counted and how their results are classified.

use std::fmt::{Debug, Display};
use std::rc::Rc;
use std::time::Duration;

use crate::{Args, Event, Value};

/// How an invocation ended, with the text that describes its result or failure.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Completion {
    /// The callable completed normally.
    Returned(String),

    /// The callable reported a failure.
    Raised(String),
}

impl Completion {
    pub(crate) fn into_event(self, elapsed: Duration) -> Event {
        match self {
            Self::Returned(result) => Event::Returned { elapsed, result },
            Self::Raised(error) => Event::Raised { elapsed, error },
        }
    }
}

/// A value returned by an instrumented callable.
///
/// The implementation decides whether the value counts as a normal return or as a failure and
/// how it is described in the log. `Result::Err` is a failure described by its `Display` form;
/// everything else implemented here is a normal return.
///
/// Implement this for your own return types. Describing a value should not fail.
///
/// # Examples
///
/// ```
/// use call_log::{Completion, Outcome};
///
/// #[derive(Debug)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Outcome for Point {
///     fn completion(&self) -> Completion {
///         Completion::Returned(format!("({}, {})", self.x, self.y))
///     }
/// }
/// ```
pub trait Outcome {
    /// Classifies and describes this value.
    fn completion(&self) -> Completion;
}

impl<T, E> Outcome for Result<T, E>
where
    T: Outcome,
    E: Display,
{
    fn completion(&self) -> Completion {
        match self {
            Ok(value) => value.completion(),
            Err(error) => Completion::Raised(error.to_string()),
        }
    }
}

impl<T> Outcome for Option<T>
where
    T: Outcome,
{
    fn completion(&self) -> Completion {
        match self {
            Some(value) => value.completion(),
            None => Completion::Returned("None".to_string()),
        }
    }
}

impl<T> Outcome for Vec<T>
where
    T: Debug,
{
    fn completion(&self) -> Completion {
        Completion::Returned(format!("{self:?}"))
    }
}

impl Outcome for () {
    fn completion(&self) -> Completion {
        Completion::Returned("None".to_string())
    }
}

impl<T> Outcome for &T
where
    T: Outcome + ?Sized,
{
    fn completion(&self) -> Completion {
        (**self).completion()
    }
}

impl<T> Outcome for Box<T>
where
    T: Outcome + ?Sized,
{
    fn completion(&self) -> Completion {
        (**self).completion()
    }
}

impl<T> Outcome for Rc<T>
where
    T: Outcome + ?Sized,
{
    fn completion(&self) -> Completion {
        (**self).completion()
    }
}

macro_rules! displayed_outcome {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Outcome for $ty {
                fn completion(&self) -> Completion {
                    Completion::Returned(self.to_string())
                }
            }
        )*
    };
}

displayed_outcome!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, str,
    String, Value,
);

/// A bundle of arguments for one invocation.
///
/// Implemented for tuples of up to eight values, which are passed positionally to typed
/// closures, and for [`Args`], which carries both positional and keyword arguments.
pub trait Arguments {
    /// Number of positional arguments in the bundle.
    fn positional_count(&self) -> usize;

    /// Number of keyword arguments in the bundle.
    fn keyword_count(&self) -> usize {
        0
    }
}

/// A callable that can be invoked with the argument bundle `A`.
///
/// Implemented for every `Fn` closure or function item whose parameters match the tuple `A`,
/// and for every `Fn(Args)` callable.
pub trait Invoke<A> {
    /// What the callable returns.
    type Output;

    /// Calls the callable with the arguments unpacked from `args`.
    fn invoke(&self, args: A) -> Self::Output;
}

macro_rules! tuple_arguments {
    ($count:literal; $($ty:ident $arg:ident),*) => {
        impl<$($ty,)*> Arguments for ($($ty,)*) {
            fn positional_count(&self) -> usize {
                $count
            }
        }

        impl<Func, Ret, $($ty,)*> Invoke<($($ty,)*)> for Func
        where
            Func: Fn($($ty,)*) -> Ret,
        {
            type Output = Ret;

            fn invoke(&self, ($($arg,)*): ($($ty,)*)) -> Ret {
                self($($arg,)*)
            }
        }
    };
}

tuple_arguments!(0;);
tuple_arguments!(1; A1 a1);
tuple_arguments!(2; A1 a1, A2 a2);
tuple_arguments!(3; A1 a1, A2 a2, A3 a3);
tuple_arguments!(4; A1 a1, A2 a2, A3 a3, A4 a4);
tuple_arguments!(5; A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
tuple_arguments!(6; A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
tuple_arguments!(7; A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7);
tuple_arguments!(8; A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8);

impl Arguments for Args {
    fn positional_count(&self) -> usize {
        self.positional().len()
    }

    fn keyword_count(&self) -> usize {
        self.keywords().len()
    }
}

impl<Func, Ret> Invoke<Args> for Func
where
    Func: Fn(Args) -> Ret,
{
    type Output = Ret;

    fn invoke(&self, args: Args) -> Ret {
        self(args)
    }
}
