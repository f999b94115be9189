use std::path::PathBuf;

use thiserror::Error;

use crate::domain::SerialError;

/// Error type for config directory and config file operations.
///
/// A malformed config file is deliberately *not* represented here: the
/// reader logs it and falls back to defaults (see `ReadSource::Defaulted`).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The serial cannot be used as a config file name.  No I/O was attempted.
    #[error("invalid device serial: {0}")]
    InvalidSerial(#[from] SerialError),

    /// Neither `XDG_CONFIG_HOME` nor `HOME` (as required by the platform) is set.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// The config directory or its parent could not be created.
    #[error("could not create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file could not be opened or written.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings could not be converted into the file's value model.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
