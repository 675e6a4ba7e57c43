// Working directory staging for ansible inputs
//
// Inputs given as an existing path are used in place. Inline content is
// written into a per-invocation temporary directory.

use crate::constants::{SSH_PRIVATE_KEY_FILE_NAME, WORK_DIR_PREFIX};
use crate::domain::options::{is_present, render_scalar};
use crate::error::Result;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Per-invocation working directory
///
/// Removed on drop unless created with `keep`.
#[derive(Debug)]
pub struct WorkDir {
    dir: TempDir,
    keep: bool,
}

impl WorkDir {
    /// Create a fresh directory in the system temp dir
    ///
    /// # Arguments
    /// * `keep` - Leave the directory behind when dropped
    pub fn create(keep: bool) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORK_DIR_PREFIX)
            .disable_cleanup(keep)
            .tempdir()?;

        debug!(path = %dir.path().display(), keep = %keep, "Created working directory");

        Ok(Self { dir, keep })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn is_kept(&self) -> bool {
        self.keep
    }

    /// Use `value` as a path if it names an existing file, otherwise write it
    /// out as YAML under `file_name`
    pub fn resolve_yaml(&self, value: &Value, file_name: &str) -> Result<Option<PathBuf>> {
        if !is_present(value) {
            return Ok(None);
        }

        if let Some(path) = existing_path(value) {
            debug!(path = %path.display(), "Using existing file");
            return Ok(Some(path));
        }

        let contents = serde_yaml::to_string(value)?;
        let path = self.path().join(file_name);
        fs::write(&path, contents)?;

        debug!(path = %path.display(), "Staged inline content as YAML");
        Ok(Some(path))
    }

    /// Use `value` as a key path if it exists, otherwise write the key
    /// material to an owner-only file
    pub fn resolve_private_key(&self, value: &Value) -> Result<Option<PathBuf>> {
        if !is_present(value) {
            return Ok(None);
        }

        if let Some(path) = existing_path(value) {
            debug!(path = %path.display(), "Using existing private key");
            return Ok(Some(path));
        }

        let path = self.path().join(SSH_PRIVATE_KEY_FILE_NAME);
        write_private(&path, render_scalar(value).as_bytes())?;

        debug!(path = %path.display(), "Staged inline private key");
        Ok(Some(path))
    }
}

fn existing_path(value: &Value) -> Option<PathBuf> {
    match value {
        Value::String(s) if Path::new(s).exists() => Some(PathBuf::from(s)),
        _ => None,
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use crate::constants::SSH_PRIVATE_KEY_MODE;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(SSH_PRIVATE_KEY_MODE)
        .open(path)?;
    file.write_all(contents)?;

    // umask may have narrowed the creation mode; pin it
    fs::set_permissions(path, fs::Permissions::from_mode(SSH_PRIVATE_KEY_MODE))
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents)
}
