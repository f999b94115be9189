//! In-memory settings record for one device session.
//!
//! A [`SettingsRecord`] is what the device-management layer works with after
//! a device is plugged in: the OSC server port, the application the device
//! talks to, and the physical rotation of the grid.  It is produced by the
//! config reader, mutated by the caller, and handed back to the writer.
//!
//! # Units (for beginners)
//!
//! Two fields are held in a different unit than the one stored on disk:
//!
//! - Ports are validated 16-bit integers in memory ([`Port`]).  They are only
//!   rendered to text at the boundary where a downstream consumer wants a
//!   string (e.g. `format!("{port}")` when opening an OSC socket).
//! - Rotation is a quadrant index 0–3 in memory ([`Rotation`]) but degrees
//!   (0/90/180/270) in the config file.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator every OSC address prefix must start with.
pub const OSC_SEPARATOR: char = '/';

/// `0` asks the OS to pick a free port for the device's OSC server.
pub const DEFAULT_SERVER_PORT: u16 = 0;
pub const DEFAULT_OSC_PREFIX: &str = "/monome";
pub const DEFAULT_APP_HOST: &str = "127.0.0.1";
pub const DEFAULT_APP_PORT: u16 = 8000;

// ── Port ──────────────────────────────────────────────────────────────────────

/// A UDP port number.
///
/// `Display` produces the canonical decimal form consumed by the OSC layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    pub const fn new(port: u16) -> Self {
        Self(port)
    }

    pub const fn get(self) -> u16 {
        self.0
    }

    /// `true` when the OS should choose the port.
    pub const fn is_auto(self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for Port {
    fn from(port: u16) -> Self {
        Self(port)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Port {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u16>().map(Self)
    }
}

// ── Rotation ──────────────────────────────────────────────────────────────────

/// Physical rotation of a device, in steps of 90 degrees clockwise.
///
/// Serialized (e.g. in JSON output) as its quadrant index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Quadrant index in `0..=3`.
    pub const fn quadrant(self) -> u8 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    pub const fn degrees(self) -> i64 {
        self.quadrant() as i64 * 90
    }

    /// Returns `None` for indices outside `0..=3`.
    pub const fn from_quadrant(quadrant: u8) -> Option<Self> {
        match quadrant {
            0 => Some(Rotation::Deg0),
            1 => Some(Rotation::Deg90),
            2 => Some(Rotation::Deg180),
            3 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Converts a stored angle into a rotation.
    ///
    /// Uses floored division and a non-negative modulo, so every input lands
    /// in a valid quadrant: `45` → `Deg0`, `-90` → `Deg270`, `450` → `Deg90`.
    pub fn from_degrees(degrees: i64) -> Self {
        let quadrant = degrees.div_euclid(90).rem_euclid(4);
        match quadrant {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.quadrant()
    }
}

impl TryFrom<u8> for Rotation {
    type Error = String;

    fn try_from(quadrant: u8) -> Result<Self, Self::Error> {
        Rotation::from_quadrant(quadrant)
            .ok_or_else(|| format!("rotation quadrant must be 0-3, got {quadrant}"))
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

// ── OSC prefix ────────────────────────────────────────────────────────────────

/// Ensures `prefix` starts with [`OSC_SEPARATOR`].
///
/// Idempotent: normalizing an already-normalized prefix returns it unchanged.
pub fn normalize_osc_prefix(prefix: &str) -> String {
    if prefix.starts_with(OSC_SEPARATOR) {
        prefix.to_string()
    } else {
        format!("{OSC_SEPARATOR}{prefix}")
    }
}

// ── Settings record ───────────────────────────────────────────────────────────

/// All persisted settings for a single device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub server: ServerSettings,
    pub application: ApplicationSettings,
    pub device: DeviceSettings,
}

/// The device's own OSC server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub port: Port,
}

/// The application the device sends its OSC messages to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSettings {
    /// Address prefix prepended to every outgoing OSC path, e.g. `/monome`.
    pub osc_prefix: String,
    pub host: String,
    pub port: Port,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceSettings {
    pub rotation: Rotation,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: Port::new(DEFAULT_SERVER_PORT),
        }
    }
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            osc_prefix: DEFAULT_OSC_PREFIX.to_string(),
            host: DEFAULT_APP_HOST.to_string(),
            port: Port::new(DEFAULT_APP_PORT),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
