//! Config writer: [`SettingsRecord`] → file.
//!
//! The file is truncated and rewritten in place.  There is no temp-file and
//! rename step, so a crash mid-write can leave a partial file; the reader's
//! tolerance for malformed files absorbs that on the next start.
//!
//! The writer never creates directories.  Run the provisioner first on a
//! fresh install or opening the file fails with [`ConfigError::Io`].

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::domain::SettingsRecord;

use super::error::ConfigError;
use super::format;
use super::schema::ConfigDocument;

/// Serializes `settings` and writes them to `path`.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be opened or written,
/// [`ConfigError::Serialize`] if the document cannot be serialized.
pub fn write_to(path: &Path, settings: &SettingsRecord) -> Result<(), ConfigError> {
    let content = render(settings)?;

    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;

    debug!(path = %path.display(), "saved configuration");
    Ok(())
}

/// Renders `settings` as the text of a config file.
pub fn render(settings: &SettingsRecord) -> Result<String, ConfigError> {
    let value = toml::Value::try_from(ConfigDocument::from(settings))?;
    // A struct always serializes to a table.
    Ok(value.as_table().map(format::render).unwrap_or_default())
}
