//! Storage infrastructure: per-device config file persistence.
//!
//! Each device gets its own file, named after its serial, in the platform
//! config directory (see [`paths`]).  The pieces are:
//!
//! - [`paths`] – base directory and file path resolution.
//! - [`provision`] – creates the base directory on first run.
//! - [`format`] – text codec for the brace-section file format.
//! - [`schema`] – on-disk sections, fields and defaults.
//! - [`reader`] – file → settings, never failing on bad content.
//! - [`writer`] – settings → file.
//!
//! [`ConfigStore`] ties them to an [`Environment`] and is what callers use.
//! The free functions [`ensure_config_directory`], [`read_config`] and
//! [`write_config`] do the same against the real process environment.

pub mod error;
pub mod format;
pub mod paths;
pub mod provision;
pub mod reader;
pub mod schema;
pub mod writer;

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::application::environment::Environment;
use crate::domain::{DeviceSerial, SettingsRecord};
use crate::infrastructure::environment::SystemEnvironment;

pub use error::ConfigError;
pub use provision::Provisioned;
pub use reader::{LoadedSettings, ReadSource};

/// Entry point for config directory and file operations.
///
/// Holds the environment used for path resolution and an optional base
/// directory override (the CLI's `--config-dir`, or a temp dir in tests).
/// The base directory is resolved again on every call.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore<E = SystemEnvironment> {
    env: E,
    base_dir: Option<PathBuf>,
}

impl ConfigStore<SystemEnvironment> {
    /// A store backed by the real process environment.
    pub fn system() -> Self {
        Self::new(SystemEnvironment)
    }
}

impl<E: Environment> ConfigStore<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            base_dir: None,
        }
    }

    /// Uses `dir` instead of the platform config directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// The directory config files live in.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoPlatformConfigDir`] when there is no override and the
    /// environment lacks the variables the platform needs.
    pub fn config_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.base_dir {
            Some(dir) => Ok(dir.clone()),
            None => paths::config_dir(&self.env),
        }
    }

    /// Full path of the config file for `serial`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidSerial`] or [`ConfigError::NoPlatformConfigDir`].
    pub fn path_for_serial(&self, serial: &str) -> Result<PathBuf, ConfigError> {
        let serial = DeviceSerial::new(serial)?;
        Ok(paths::config_file_in(&self.config_dir()?, &serial))
    }

    /// Creates the config directory if nothing exists at its path yet.
    ///
    /// With the default XDG layout `$HOME/.config` is created first when
    /// missing.  An override directory is created as a single level.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoPlatformConfigDir`] or [`ConfigError::CreateDir`].
    pub fn ensure_directory(&self) -> Result<Provisioned, ConfigError> {
        let dir = self.config_dir()?;
        let parent = match self.base_dir {
            Some(_) => None,
            None => paths::implicit_parent_dir(&self.env),
        };
        provision::ensure_directory(&dir, parent.as_deref())
    }

    /// Loads the settings for `serial`.
    ///
    /// Only an invalid serial is an error.  Missing, unreadable or malformed
    /// files (and an unresolvable config directory) yield defaults, with
    /// [`LoadedSettings::source`] saying which case applied.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidSerial`]; no file access is attempted.
    pub fn read(&self, serial: &str) -> Result<LoadedSettings, ConfigError> {
        let serial = DeviceSerial::new(serial)?;
        let dir = match self.config_dir() {
            Ok(dir) => dir,
            Err(e) => {
                warn!(%serial, error = %e, "cannot locate saved configuration");
                return Ok(LoadedSettings::defaulted(e.to_string()));
            }
        };
        let path = paths::config_file_in(&dir, &serial);
        Ok(reader::read_from(&path, &serial))
    }

    /// Saves `settings` for `serial`, replacing any previous file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidSerial`] before any I/O, then
    /// [`ConfigError::NoPlatformConfigDir`], [`ConfigError::Io`] (for example
    /// when the directory was never provisioned) or
    /// [`ConfigError::Serialize`].
    pub fn write(&self, serial: &str, settings: &SettingsRecord) -> Result<(), ConfigError> {
        let serial = DeviceSerial::new(serial)?;
        let path = paths::config_file_in(&self.config_dir()?, &serial);
        debug!(%serial, path = %path.display(), "writing configuration");
        writer::write_to(&path, settings)
    }
}

/// [`ConfigStore::ensure_directory`] against the process environment.
pub fn ensure_config_directory() -> Result<Provisioned, ConfigError> {
    ConfigStore::system().ensure_directory()
}

/// [`ConfigStore::read`] against the process environment.
pub fn read_config(serial: &str) -> Result<LoadedSettings, ConfigError> {
    ConfigStore::system().read(serial)
}

/// [`ConfigStore::write`] against the process environment.
pub fn write_config(serial: &str, settings: &SettingsRecord) -> Result<(), ConfigError> {
    ConfigStore::system().write(serial, settings)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::environment::{HOME, XDG_CONFIG_HOME};
    use crate::domain::{Port, Rotation, SerialError};
    use crate::infrastructure::environment::mock::StaticEnvironment;

    #[cfg(not(target_os = "macos"))]
    fn xdg_store(root: &std::path::Path) -> ConfigStore<StaticEnvironment> {
        ConfigStore::new(StaticEnvironment::new().with(XDG_CONFIG_HOME, root.as_os_str()))
    }

    fn dir_store(root: &std::path::Path) -> ConfigStore<StaticEnvironment> {
        ConfigStore::new(StaticEnvironment::new()).with_base_dir(root.join("serialosc"))
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_path_for_serial_under_xdg_override() {
        let root = tempfile::tempdir().unwrap();
        let store = xdg_store(root.path());

        let path = store.path_for_serial("m1000123").unwrap();

        assert_eq!(path, root.path().join("serialosc").join("m1000123.conf"));
    }

    #[test]
    fn test_base_dir_override_wins_over_environment() {
        let store = ConfigStore::new(StaticEnvironment::new().with(HOME, "/home/grid"))
            .with_base_dir("/srv/serialosc");

        assert_eq!(store.config_dir().unwrap(), PathBuf::from("/srv/serialosc"));
    }

    #[test]
    fn test_read_rejects_empty_serial() {
        let store = ConfigStore::new(StaticEnvironment::new());

        let result = store.read("");

        assert!(matches!(
            result,
            Err(ConfigError::InvalidSerial(SerialError::Empty))
        ));
    }

    #[test]
    fn test_write_rejects_empty_serial_without_touching_disk() {
        // Arrange
        let root = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(StaticEnvironment::new()).with_base_dir(root.path());

        // Act
        let result = store.write("", &SettingsRecord::default());

        // Assert
        assert!(matches!(result, Err(ConfigError::InvalidSerial(_))));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_read_without_home_is_degraded_not_an_error() {
        let store = ConfigStore::new(StaticEnvironment::new());

        let loaded = store.read("m1000123").unwrap();

        assert!(loaded.source.is_degraded());
        assert_eq!(loaded.settings, SettingsRecord::default());
    }

    #[test]
    fn test_write_without_home_is_an_error() {
        let store = ConfigStore::new(StaticEnvironment::new());

        let result = store.write("m1000123", &SettingsRecord::default());

        assert!(matches!(result, Err(ConfigError::NoPlatformConfigDir)));
    }

    #[test]
    fn test_write_before_provisioning_fails() {
        let root = tempfile::tempdir().unwrap();
        let store = dir_store(root.path());

        let result = store.write("m1000123", &SettingsRecord::default());

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_provision_write_read_round_trip() {
        // Arrange
        let root = tempfile::tempdir().unwrap();
        let store = dir_store(root.path());
        let mut record = SettingsRecord::default();
        record.server.port = Port::new(12002);
        record.application.osc_prefix = "/grid".to_string();
        record.device.rotation = Rotation::Deg270;

        // Act
        assert_eq!(store.ensure_directory().unwrap(), Provisioned::Created);
        store.write("m1000123", &record).unwrap();
        let loaded = store.read("m1000123").unwrap();

        // Assert
        assert_eq!(loaded.source, ReadSource::Parsed);
        assert_eq!(loaded.settings, record);
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_ensure_directory_creates_home_dot_config() {
        // Arrange: HOME exists but has no .config yet
        let home = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(StaticEnvironment::new().with(HOME, home.path().as_os_str()));

        // Act
        let first = store.ensure_directory().unwrap();
        let second = store.ensure_directory().unwrap();

        // Assert
        assert_eq!(first, Provisioned::Created);
        assert_eq!(second, Provisioned::AlreadyPresent);
        assert!(home.path().join(".config").join("serialosc").is_dir());
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_ensure_directory_with_xdg_override_does_not_create_home_config() {
        let home = tempfile::tempdir().unwrap();
        let xdg = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(
            StaticEnvironment::new()
                .with(HOME, home.path().as_os_str())
                .with(XDG_CONFIG_HOME, xdg.path().as_os_str()),
        );

        store.ensure_directory().unwrap();

        assert!(xdg.path().join("serialosc").is_dir());
        assert!(!home.path().join(".config").exists());
    }
}
