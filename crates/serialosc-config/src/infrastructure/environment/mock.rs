//! Fixed-map environment for tests.
//!
//! Mutating the real process environment from tests is racy because every
//! test thread shares it.  `StaticEnvironment` answers lookups from its own
//! map instead:
//!
//! ```
//! use serialosc_config::application::environment::Environment;
//! use serialosc_config::infrastructure::environment::mock::StaticEnvironment;
//!
//! let env = StaticEnvironment::new().with("HOME", "/home/grid");
//! assert_eq!(env.var_os("HOME").unwrap(), "/home/grid");
//! assert!(env.var_os("XDG_CONFIG_HOME").is_none());
//! ```

use std::collections::HashMap;
use std::ffi::OsString;

use crate::application::environment::Environment;

/// An environment backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    vars: HashMap<String, OsString>,
}

impl StaticEnvironment {
    /// Creates an environment with no variables set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `self` with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl Environment for StaticEnvironment {
    fn var_os(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).cloned()
    }
}
