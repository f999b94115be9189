//! SettingsUpdate: partial edits applied to a loaded settings record.
//!
//! The device-management layer (and the `serialosc-config set` command)
//! usually changes one or two fields at a time, for example when an
//! application sends `/sys/rotation 90` or `/sys/prefix /grid`.  A
//! [`SettingsUpdate`] collects those edits and applies them to a record that
//! was read from disk, leaving every other field untouched.

use crate::domain::{normalize_osc_prefix, Port, Rotation, SettingsRecord};

/// A set of optional field changes.  `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub server_port: Option<Port>,
    pub osc_prefix: Option<String>,
    pub host: Option<String>,
    pub app_port: Option<Port>,
    pub rotation: Option<Rotation>,
}

impl SettingsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when applying this update would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies every present change to `record`.
    ///
    /// The OSC prefix is normalized on the way in so the record keeps its
    /// leading-separator invariant.  Returns `true` if any field changed.
    pub fn apply(&self, record: &mut SettingsRecord) -> bool {
        let before = record.clone();

        if let Some(port) = self.server_port {
            record.server.port = port;
        }
        if let Some(prefix) = &self.osc_prefix {
            record.application.osc_prefix = normalize_osc_prefix(prefix);
        }
        if let Some(host) = &self.host {
            record.application.host = host.clone();
        }
        if let Some(port) = self.app_port {
            record.application.port = port;
        }
        if let Some(rotation) = self.rotation {
            record.device.rotation = rotation;
        }

        *record != before
    }
}
