//! Config directory and per-device file path resolution.
//!
//! | Platform              | Base directory                                   |
//! |-----------------------|--------------------------------------------------|
//! | macOS                 | `$HOME/Library/Preferences/org.monome.serialosc` |
//! | other, XDG override   | `$XDG_CONFIG_HOME/serialosc`                     |
//! | other, no override    | `$HOME/.config/serialosc`                        |
//!
//! The base directory is recomputed on every call, never cached, so a change
//! to the environment source is picked up immediately.  Both platform
//! resolvers are compiled everywhere; [`config_dir`] picks one with `cfg`.

use std::path::{Path, PathBuf};

use crate::application::environment::{Environment, HOME, XDG_CONFIG_HOME};
use crate::domain::DeviceSerial;

use super::error::ConfigError;

/// Directory name used below `$XDG_CONFIG_HOME` or `$HOME/.config`.
pub const XDG_DIR_NAME: &str = "serialosc";
/// Bundle-style directory name used below `~/Library/Preferences` on macOS.
pub const MACOS_DIR_NAME: &str = "org.monome.serialosc";
pub const CONFIG_FILE_EXTENSION: &str = "conf";

/// Resolves the platform config directory from `env`.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the variables the
/// platform needs are unset or empty.
pub fn config_dir<E: Environment + ?Sized>(env: &E) -> Result<PathBuf, ConfigError> {
    #[cfg(target_os = "macos")]
    let dir = macos_config_dir(env);

    #[cfg(not(target_os = "macos"))]
    let dir = xdg_config_dir(env);

    dir.ok_or(ConfigError::NoPlatformConfigDir)
}

/// `$HOME/Library/Preferences/org.monome.serialosc`.
pub fn macos_config_dir<E: Environment + ?Sized>(env: &E) -> Option<PathBuf> {
    let home = env.non_empty_var_os(HOME)?;
    Some(
        PathBuf::from(home)
            .join("Library")
            .join("Preferences")
            .join(MACOS_DIR_NAME),
    )
}

/// `$XDG_CONFIG_HOME/serialosc`, falling back to `$HOME/.config/serialosc`.
pub fn xdg_config_dir<E: Environment + ?Sized>(env: &E) -> Option<PathBuf> {
    let base = match env.non_empty_var_os(XDG_CONFIG_HOME) {
        Some(xdg) => PathBuf::from(xdg),
        None => home_dot_config(env)?,
    };
    Some(base.join(XDG_DIR_NAME))
}

/// The parent directory the provisioner must create before the config
/// directory itself, if any.
///
/// Only the XDG layout without an override has one (`$HOME/.config`); macOS
/// always has `~/Library/Preferences`, and an explicit `XDG_CONFIG_HOME` is
/// the user's responsibility.
pub fn implicit_parent_dir<E: Environment + ?Sized>(env: &E) -> Option<PathBuf> {
    if cfg!(target_os = "macos") || env.non_empty_var_os(XDG_CONFIG_HOME).is_some() {
        return None;
    }
    home_dot_config(env)
}

/// `<dir>/<serial>.conf`.  Purely textual; the file need not exist.
pub fn config_file_in(dir: &Path, serial: &DeviceSerial) -> PathBuf {
    dir.join(format!("{serial}.{CONFIG_FILE_EXTENSION}"))
}

fn home_dot_config<E: Environment + ?Sized>(env: &E) -> Option<PathBuf> {
    env.non_empty_var_os(HOME)
        .map(|home| PathBuf::from(home).join(".config"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
