//! On-disk schema of a device config file.
//!
//! ```text
//! server {
//!   port = 0
//! }
//! application {
//!   osc_prefix = "/monome"
//!   host = "127.0.0.1"
//!   port = 8000
//! }
//! device {
//!   rotation = 0
//! }
//! ```
//!
//! Fields are stored as the file format sees them: ports and rotation are
//! plain integers and rotation is in degrees.  Conversion to the in-memory
//! [`SettingsRecord`] happens in the reader (`normalize`) and here
//! (`From<&SettingsRecord>`) for the writer.
//!
//! Every field carries a `#[serde(default = ...)]`, so a file that omits a
//! key or a whole section still deserializes.  Unknown keys are ignored.
//! Declaration order is the order sections and keys are written in.

use serde::{Deserialize, Serialize};

use crate::domain::settings::{
    DEFAULT_APP_HOST, DEFAULT_APP_PORT, DEFAULT_OSC_PREFIX, DEFAULT_SERVER_PORT,
};
use crate::domain::SettingsRecord;

pub const SERVER_SECTION: &str = "server";
pub const APPLICATION_SECTION: &str = "application";
pub const DEVICE_SECTION: &str = "device";

/// Whole config file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub application: ApplicationSection,
    #[serde(default)]
    pub device: DeviceSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_server_port")]
    pub port: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSection {
    #[serde(default = "default_osc_prefix")]
    pub osc_prefix: String,
    #[serde(default = "default_app_host")]
    pub host: String,
    #[serde(default = "default_app_port")]
    pub port: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceSection {
    /// Degrees clockwise: 0, 90, 180 or 270.
    #[serde(default)]
    pub rotation: i64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_server_port() -> i64 {
    i64::from(DEFAULT_SERVER_PORT)
}
fn default_osc_prefix() -> String {
    DEFAULT_OSC_PREFIX.to_string()
}
fn default_app_host() -> String {
    DEFAULT_APP_HOST.to_string()
}
fn default_app_port() -> i64 {
    i64::from(DEFAULT_APP_PORT)
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_server_port(),
        }
    }
}

impl Default for ApplicationSection {
    fn default() -> Self {
        Self {
            osc_prefix: default_osc_prefix(),
            host: default_app_host(),
            port: default_app_port(),
        }
    }
}

impl From<&SettingsRecord> for ConfigDocument {
    /// Shapes an in-memory record for writing.  Prefix and host are copied
    /// verbatim; rotation becomes degrees.
    fn from(record: &SettingsRecord) -> Self {
        Self {
            server: ServerSection {
                port: i64::from(record.server.port.get()),
            },
            application: ApplicationSection {
                osc_prefix: record.application.osc_prefix.clone(),
                host: record.application.host.clone(),
                port: i64::from(record.application.port.get()),
            },
            device: DeviceSection {
                rotation: record.device.rotation.degrees(),
            },
        }
    }
}
