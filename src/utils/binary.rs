//! Node binary path resolution and validation utilities.
//!
//! Devnet binaries are built from the node checkout configured in the
//! topology settings and live below `target/debug` or `target/release`.

use crate::settings::TopologySettings;
use std::path::{Path, PathBuf};
use std::os::unix::fs::PermissionsExt;

/// Errors that can occur during binary validation
#[derive(Debug, thiserror::Error)]
pub enum BinaryError {
    #[error("Binary not found: {path}")]
    NotFound { path: String },

    #[error("Binary is not executable: {path}")]
    NotExecutable { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },
}

/// Cargo profile directory the binaries are taken from
pub fn profile_dir(release: bool) -> &'static str {
    if release {
        "release"
    } else {
        "debug"
    }
}

/// Resolve the path of a devnet binary.
///
/// # Examples
///
/// ```ignore
/// // nimiq_dir = /opt/nimiq, release = false
/// resolve_binary_path(&settings, "nimiq-client") -> /opt/nimiq/target/debug/nimiq-client
/// ```
pub fn resolve_binary_path(settings: &TopologySettings, binary: &str) -> PathBuf {
    settings
        .nimiq_dir()
        .join("target")
        .join(profile_dir(settings.release()))
        .join(binary)
}

/// Validate that a binary exists and is executable.
///
/// Generation does not require built binaries; this is used by the CLI to
/// warn early when a topology points at a checkout that was not built.
pub fn validate_binary(path: &Path) -> Result<(), BinaryError> {
    if !path.exists() {
        return Err(BinaryError::NotFound {
            path: path.display().to_string(),
        });
    }

    let metadata = path.metadata().map_err(|_| BinaryError::InvalidPath {
        path: path.display().to_string(),
    })?;

    // Check if file is executable (any execute bit set)
    let mode = metadata.permissions().mode();
    if mode & 0o111 == 0 {
        return Err(BinaryError::NotExecutable {
            path: path.display().to_string(),
        });
    }

    Ok(())
}
