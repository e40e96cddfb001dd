//! Platform abstraction layer for the clocks used to stamp recorded calls.
//!
//! This module allows switching between the real operating system clocks and a fake
//! implementation whose time only moves when a test says so.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::Platform;
pub(crate) use facade::PlatformFacade;
#[cfg(test)]
pub(crate) use fake::FakePlatform;
pub(crate) use real::{REAL_PLATFORM, RealPlatform};
