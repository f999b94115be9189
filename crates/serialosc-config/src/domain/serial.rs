//! Device serial numbers.
//!
//! The serial is the only thing that ties a physical device to its config
//! file: `m1000123` is stored as `m1000123.conf`.  Because it becomes a file
//! name, [`DeviceSerial`] refuses values that would escape the config
//! directory.

use std::fmt;

use thiserror::Error;

/// Reasons a serial cannot be used as a config file name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerialError {
    #[error("device serial must not be empty")]
    Empty,

    #[error("device serial {0:?} contains a path separator or NUL byte")]
    IllegalCharacter(String),

    #[error("device serial {0:?} is a reserved path component")]
    Reserved(String),
}

/// A validated, non-empty device serial.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceSerial(String);

impl DeviceSerial {
    /// Validates `serial`.
    ///
    /// # Errors
    ///
    /// - [`SerialError::Empty`] for `""`.
    /// - [`SerialError::IllegalCharacter`] when it contains `/`, `\` or NUL.
    /// - [`SerialError::Reserved`] for `.` and `..`.
    pub fn new(serial: impl Into<String>) -> Result<Self, SerialError> {
        let serial = serial.into();
        if serial.is_empty() {
            return Err(SerialError::Empty);
        }
        if serial.contains(['/', '\\', '\0']) {
            return Err(SerialError::IllegalCharacter(serial));
        }
        if serial == "." || serial == ".." {
            return Err(SerialError::Reserved(serial));
        }
        Ok(Self(serial))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DeviceSerial {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_typical_serials() {
        for serial in ["m1000123", "m0000001", "a40h-001", "m64-0042"] {
            assert!(DeviceSerial::new(serial).is_ok(), "{serial} must be accepted");
        }
    }

    #[test]
    fn test_rejects_empty_serial() {
        assert_eq!(DeviceSerial::new(""), Err(SerialError::Empty));
    }

    #[test]
    fn test_rejects_path_separators() {
        assert!(matches!(
            DeviceSerial::new("../etc/passwd"),
            Err(SerialError::IllegalCharacter(_))
        ));
        assert!(matches!(
            DeviceSerial::new("a\\b"),
            Err(SerialError::IllegalCharacter(_))
        ));
        assert!(matches!(
            DeviceSerial::new("m1\0"),
            Err(SerialError::IllegalCharacter(_))
        ));
    }

    #[test]
    fn test_rejects_dot_components() {
        assert!(matches!(DeviceSerial::new("."), Err(SerialError::Reserved(_))));
        assert!(matches!(DeviceSerial::new(".."), Err(SerialError::Reserved(_))));
    }

    #[test]
    fn test_display_is_the_raw_serial() {
        let serial = DeviceSerial::new("m1000123").unwrap();
        assert_eq!(serial.to_string(), "m1000123");
        assert_eq!(serial.as_str(), "m1000123");
    }
}
