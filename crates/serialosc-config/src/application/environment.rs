//! Environment port: read access to process environment variables.
//!
//! Config directory resolution depends on `HOME` and `XDG_CONFIG_HOME`.
//! Routing those reads through a trait keeps resolution a pure function of
//! its input, so tests can exercise every platform branch without mutating
//! the real process environment (which is shared by all test threads).
//!
//! The production implementation is
//! `infrastructure::environment::SystemEnvironment`; tests use
//! `infrastructure::environment::mock::StaticEnvironment`.

use std::ffi::OsString;

/// User's home directory.
pub const HOME: &str = "HOME";
/// XDG base-directory override for per-user configuration.
pub const XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";

/// Source of environment variables.
pub trait Environment {
    /// Returns the value of `key`, or `None` if it is not set.
    fn var_os(&self, key: &str) -> Option<OsString>;

    /// Like [`Environment::var_os`] but treats an empty value as unset.
    fn non_empty_var_os(&self, key: &str) -> Option<OsString> {
        self.var_os(key).filter(|value| !value.is_empty())
    }
}
