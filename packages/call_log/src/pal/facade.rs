use std::fmt::{self, Debug};
#[cfg(test)]
use std::rc::Rc;
use std::time::Instant;

use chrono::NaiveDateTime;

#[cfg(test)]
use crate::pal::FakePlatform;
use crate::pal::{Platform, REAL_PLATFORM, RealPlatform};

#[derive(Clone)]
pub(crate) enum PlatformFacade {
    Real(&'static RealPlatform),

    #[cfg(test)]
    Fake(Rc<FakePlatform>),
}

impl PlatformFacade {
    pub(crate) fn real() -> Self {
        Self::Real(&REAL_PLATFORM)
    }

    #[cfg(test)]
    pub(crate) fn fake(fake: FakePlatform) -> Self {
        Self::Fake(Rc::new(fake))
    }
}

impl Platform for PlatformFacade {
    fn now(&self) -> Instant {
        match self {
            Self::Real(p) => p.now(),
            #[cfg(test)]
            Self::Fake(p) => p.now(),
        }
    }

    fn local_time(&self) -> NaiveDateTime {
        match self {
            Self::Real(p) => p.local_time(),
            #[cfg(test)]
            Self::Fake(p) => p.local_time(),
        }
    }
}

impl Debug for PlatformFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(p) => p.fmt(f),
            #[cfg(test)]
            Self::Fake(p) => p.fmt(f),
        }
    }
}
