//! Domain layer: the settings record and device identity.
//!
//! Nothing in here touches the file system or the process environment.

pub mod serial;
pub mod settings;

pub use serial::{DeviceSerial, SerialError};
pub use settings::{
    normalize_osc_prefix, ApplicationSettings, DeviceSettings, Port, Rotation, ServerSettings,
    SettingsRecord,
};
