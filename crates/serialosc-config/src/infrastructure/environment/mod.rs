//! Environment adapters.
//!
//! [`SystemEnvironment`] reads the real process environment; the `mock`
//! module provides a fixed map for tests.

pub mod mock;

use std::ffi::OsString;

use crate::application::environment::Environment;

/// Reads variables from the current process via [`std::env::var_os`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}
