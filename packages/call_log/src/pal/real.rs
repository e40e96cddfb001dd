use std::time::Instant;

use chrono::{Local, NaiveDateTime};

use crate::pal::Platform;

/// The operating system clocks, as exposed by the Rust standard library and `chrono`.
#[derive(Debug, Default)]
pub(crate) struct RealPlatform;

pub(crate) static REAL_PLATFORM: RealPlatform = RealPlatform;

impl Platform for RealPlatform {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn local_time(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
