//! # serialosc-config
//!
//! Per-device settings persistence for serialosc, the OSC server for monome
//! grids and arcs.
//!
//! Every device is identified by its serial (e.g. `m1000123`) and gets its
//! own config file in the platform config directory:
//!
//! - Linux and other Unix: `$XDG_CONFIG_HOME/serialosc/<serial>.conf`, or
//!   `~/.config/serialosc/<serial>.conf`
//! - macOS: `~/Library/Preferences/org.monome.serialosc/<serial>.conf`
//!
//! # Usage
//!
//! ```no_run
//! use serialosc_config::{ensure_config_directory, read_config, write_config, Rotation};
//!
//! let mut loaded = read_config("m1000123")?;
//! loaded.settings.device.rotation = Rotation::Deg90;
//!
//! ensure_config_directory()?;
//! write_config("m1000123", &loaded.settings)?;
//! # Ok::<(), serialosc_config::ConfigError>(())
//! ```
//!
//! # Layers
//!
//! - **`domain`** – the settings record, ports, rotation and device serials.
//! - **`application`** – the `Environment` port and partial settings edits.
//! - **`infrastructure`** – environment adapters and file storage.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::environment::Environment;
pub use application::manage_settings::SettingsUpdate;
pub use domain::{
    ApplicationSettings, DeviceSerial, DeviceSettings, Port, Rotation, SerialError,
    ServerSettings, SettingsRecord,
};
pub use infrastructure::environment::SystemEnvironment;
pub use infrastructure::storage::{
    ensure_config_directory, read_config, write_config, ConfigError, ConfigStore, LoadedSettings,
    Provisioned, ReadSource,
};
