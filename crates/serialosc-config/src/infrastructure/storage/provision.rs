//! Config directory provisioning.
//!
//! On a fresh install the config directory does not exist yet, and the
//! writer never creates directories.  [`ensure_directory`] must therefore run
//! once before the first write.  Reading never needs it: a missing directory
//! simply means "no saved settings".
//!
//! Directories are created with mode `0700` on Unix so other local users
//! cannot read a device's host/port settings.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use super::error::ConfigError;

/// What [`ensure_directory`] found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    /// Something already existed at the path; nothing was touched.
    AlreadyPresent,
    /// The directory was created by this call.
    Created,
}

/// Makes sure `dir` exists, creating `parent` first when given.
///
/// Any existing entry at `dir` counts as success, whatever its type.  An
/// already-existing `parent` is fine; any other failure to create it, or to
/// create `dir`, is returned as [`ConfigError::CreateDir`].
pub fn ensure_directory(dir: &Path, parent: Option<&Path>) -> Result<Provisioned, ConfigError> {
    if fs::metadata(dir).is_ok() {
        debug!(dir = %dir.display(), "config directory already present");
        return Ok(Provisioned::AlreadyPresent);
    }

    if let Some(parent) = parent {
        match create_private_dir(parent) {
            Ok(()) => info!(dir = %parent.display(), "created parent config directory"),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(source) => {
                return Err(ConfigError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })
            }
        }
    }

    create_private_dir(dir).map_err(|source| ConfigError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    info!(dir = %dir.display(), "created config directory");
    Ok(Provisioned::Created)
}

/// Single-level `mkdir` with owner-only permissions.
fn create_private_dir(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_missing_directory() {
        // Arrange
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("serialosc");

        // Act
        let result = ensure_directory(&dir, None).unwrap();

        // Assert
        assert_eq!(result, Provisioned::Created);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_second_call_reports_already_present() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("serialosc");

        assert_eq!(ensure_directory(&dir, None).unwrap(), Provisioned::Created);
        assert_eq!(
            ensure_directory(&dir, None).unwrap(),
            Provisioned::AlreadyPresent
        );
    }

    #[test]
    fn test_existing_file_counts_as_present() {
        // Arrange: a regular file where the directory would go
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("serialosc");
        fs::write(&dir, b"not a directory").unwrap();

        // Act / Assert
        assert_eq!(
            ensure_directory(&dir, None).unwrap(),
            Provisioned::AlreadyPresent
        );
    }

    #[test]
    fn test_creates_parent_first() {
        let root = tempfile::tempdir().unwrap();
        let parent = root.path().join(".config");
        let dir = parent.join("serialosc");

        let result = ensure_directory(&dir, Some(&parent)).unwrap();

        assert_eq!(result, Provisioned::Created);
        assert!(parent.is_dir());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_existing_parent_is_accepted() {
        let root = tempfile::tempdir().unwrap();
        let parent = root.path().join(".config");
        fs::create_dir(&parent).unwrap();
        let dir = parent.join("serialosc");

        assert_eq!(
            ensure_directory(&dir, Some(&parent)).unwrap(),
            Provisioned::Created
        );
    }

    #[test]
    fn test_missing_grandparent_is_an_error() {
        // Arrange: only one level is created, so a deeper path must fail
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("a").join("b").join("serialosc");

        // Act
        let result = ensure_directory(&dir, None);

        // Assert
        assert!(matches!(result, Err(ConfigError::CreateDir { .. })));
    }

    #[test]
    fn test_parent_failure_is_reported_with_parent_path() {
        let root = tempfile::tempdir().unwrap();
        let parent = root.path().join("missing").join(".config");
        let dir = parent.join("serialosc");

        match ensure_directory(&dir, Some(&parent)) {
            Err(ConfigError::CreateDir { path, .. }) => assert_eq!(path, parent),
            other => panic!("expected CreateDir error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_created_directory_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("serialosc");

        ensure_directory(&dir, None).unwrap();

        // umask can only remove bits, so group/other must be empty
        let mode = fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
        assert_eq!(mode & 0o700, 0o700);
    }
}
