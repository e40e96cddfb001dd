use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{self, AtomicU64};

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(0);

/// Identifies one instrumented callable.
///
/// A new identity is assigned every time a callable is wrapped, so wrapping the same function
/// twice yields two identities, and two different callables that share a name never collide.
/// Equality, ordering and hashing only consider the serial number; the name is carried along
/// so reports can print a header for the callable.
#[derive(Clone, Debug)]
pub struct CallableId {
    serial: u64,
    name: Rc<str>,
}

impl CallableId {
    pub(crate) fn new(name: impl Into<Rc<str>>) -> Self {
        Self {
            serial: NEXT_SERIAL.fetch_add(1, atomic::Ordering::Relaxed),
            name: name.into(),
        }
    }

    /// The declared name of the callable, as given when it was registered.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The process-unique serial number of this identity.
    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }
}

impl PartialEq for CallableId {
    fn eq(&self, other: &Self) -> bool {
        self.serial == other.serial
    }
}

impl Eq for CallableId {}

impl Hash for CallableId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.serial.hash(state);
    }
}

impl PartialOrd for CallableId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CallableId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.serial.cmp(&other.serial)
    }
}

impl fmt::Display for CallableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
