//! Config reader: file → [`SettingsRecord`].
//!
//! Reading never fails once the serial is valid.  A user who hand-edits a
//! config file and breaks it should still get a working device, so every
//! problem degrades to defaults and is reported two ways:
//!
//! - a `warn!` naming the device serial, and
//! - [`ReadSource::Defaulted`] in the returned [`LoadedSettings`].
//!
//! # Pipeline
//!
//! ```text
//! read_to_string ──► format::parse ──► fold names ──► per-field
//!   │ NotFound          │ syntax error    │ duplicate   deserialize
//!   ▼                   ▼                 ▼             │ wrong type
//! Absent            Defaulted         Defaulted         ▼
//!                   (whole file)      (later wins)  Defaulted (that field)
//!                                    ──► normalize ──► SettingsRecord
//! ```
//!
//! Section and key names match case-insensitively (`Server {`, `PORT = 1`).
//! Names that differ only in case count as duplicates.  Unknown sections
//! and keys are ignored.

use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::{
    normalize_osc_prefix, ApplicationSettings, DeviceSerial, DeviceSettings, Port, Rotation,
    ServerSettings, SettingsRecord,
};

use super::format::{self, Entry, Node};
use super::schema::{ConfigDocument, APPLICATION_SECTION, DEVICE_SECTION, SERVER_SECTION};

/// Where the values in a [`LoadedSettings`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadSource {
    /// No config file exists yet; every field is a default.
    Absent,
    /// The file existed but some or all of it could not be used.
    Defaulted {
        /// Human-readable description of what was discarded.
        reason: String,
    },
    /// Every section in the file was read successfully.
    Parsed,
}

impl ReadSource {
    pub fn is_degraded(&self) -> bool {
        matches!(self, ReadSource::Defaulted { .. })
    }
}

/// Result of a config read: always a complete record plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSettings {
    pub settings: SettingsRecord,
    pub source: ReadSource,
}

impl LoadedSettings {
    /// Defaults tagged as degraded, for when the file cannot even be located.
    pub(crate) fn defaulted(reason: impl Into<String>) -> Self {
        Self {
            settings: SettingsRecord::default(),
            source: ReadSource::Defaulted {
                reason: reason.into(),
            },
        }
    }
}

/// Reads and normalizes the config file at `path` for `serial`.
pub fn read_from(path: &Path, serial: &DeviceSerial) -> LoadedSettings {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(%serial, path = %path.display(), "no saved configuration, using defaults");
            return LoadedSettings {
                settings: SettingsRecord::default(),
                source: ReadSource::Absent,
            };
        }
        Err(e) => {
            warn!(%serial, path = %path.display(), error = %e, "could not read saved configuration");
            return LoadedSettings::defaulted(format!("could not read {}: {e}", path.display()));
        }
    };

    let mut problems = Vec::new();
    let document = parse_document(&content, &mut problems);
    let settings = normalize(document, &mut problems);

    let source = if problems.is_empty() {
        debug!(%serial, path = %path.display(), "loaded saved configuration");
        ReadSource::Parsed
    } else {
        let reason = problems.join("; ");
        warn!(%serial, path = %path.display(), %reason, "parse error in saved configuration");
        ReadSource::Defaulted { reason }
    };

    LoadedSettings { settings, source }
}

/// Parses `content`, substituting defaults for anything unusable.
///
/// A syntax error discards the whole file.  A wrongly typed value (e.g.
/// `port = "eight thousand"`) discards only that field.
pub(crate) fn parse_document(content: &str, problems: &mut Vec<String>) -> ConfigDocument {
    let entries = match format::parse(content) {
        Ok(entries) => entries,
        Err(e) => {
            problems.push(format!("syntax error at {e}"));
            return ConfigDocument::default();
        }
    };
    let mut table = fold_names(entries, None, problems);

    ConfigDocument {
        server: take_section(&mut table, SERVER_SECTION, problems),
        application: take_section(&mut table, APPLICATION_SECTION, problems),
        device: take_section(&mut table, DEVICE_SECTION, problems),
    }
}

/// Lower-cases section and key names into a table.  A name seen twice,
/// in any case, is reported and the later entry wins.
fn fold_names(
    entries: Vec<Entry>,
    scope: Option<&str>,
    problems: &mut Vec<String>,
) -> toml::Table {
    let mut table = toml::Table::new();
    for Entry { name, line, node } in entries {
        let key = name.to_ascii_lowercase();
        let qualified = match scope {
            Some(scope) => format!("{scope}.{key}"),
            None => key.clone(),
        };
        let value = match node {
            Node::Value(value) => value,
            Node::Section(inner) => {
                toml::Value::Table(fold_names(inner, Some(&qualified), problems))
            }
        };
        if table.insert(key, value).is_some() {
            problems.push(format!("{qualified} is set more than once, using line {line}"));
        }
    }
    table
}

/// Deserializes one section field by field, dropping fields whose value
/// does not fit so the rest of the section survives.
fn take_section<T>(table: &mut toml::Table, name: &str, problems: &mut Vec<String>) -> T
where
    T: DeserializeOwned + Default,
{
    let fields = match table.remove(name) {
        None => return T::default(),
        Some(toml::Value::Table(fields)) => fields,
        Some(_) => {
            problems.push(format!("{name} is not a section"));
            return T::default();
        }
    };

    let usable: toml::Table = fields
        .into_iter()
        .filter(|(key, value)| {
            let mut single = toml::Table::new();
            single.insert(key.clone(), value.clone());
            match toml::Value::Table(single).try_into::<T>() {
                Ok(_) => true,
                Err(e) => {
                    problems.push(format!("{name}.{key}: {}", e.message().trim()));
                    false
                }
            }
        })
        .collect();

    toml::Value::Table(usable)
        .try_into()
        .unwrap_or_else(|e: toml::de::Error| {
            problems.push(format!("{name}: {}", e.message().trim()));
            T::default()
        })
}

/// Converts file-level values into the in-memory record.
///
/// - prefix gains a leading `/` if it lacks one
/// - ports outside `0..=65535` become `0`
/// - degrees become a quadrant index
pub(crate) fn normalize(document: ConfigDocument, problems: &mut Vec<String>) -> SettingsRecord {
    let ConfigDocument {
        server,
        application,
        device,
    } = document;

    SettingsRecord {
        server: ServerSettings {
            port: port_or_zero(server.port, "server.port", problems),
        },
        application: ApplicationSettings {
            osc_prefix: normalize_osc_prefix(&application.osc_prefix),
            host: application.host,
            port: port_or_zero(application.port, "application.port", problems),
        },
        device: DeviceSettings {
            rotation: Rotation::from_degrees(device.rotation),
        },
    }
}

fn port_or_zero(raw: i64, field: &str, problems: &mut Vec<String>) -> Port {
    match u16::try_from(raw) {
        Ok(port) => Port::new(port),
        Err(_) => {
            problems.push(format!("{field} {raw} is not a valid port"));
            Port::new(0)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
