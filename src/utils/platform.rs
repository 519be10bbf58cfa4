//! Platform helpers: path normalisation and the privilege guard.

use anyhow::Result;
use std::path::Path;

use crate::core::DepsError;

/// Normalizes a path for storage in generated files by converting all
/// separators to forward slashes.
///
/// Paths written into the sidecar file are consumed by `flatpak-builder` on
/// Linux, so they must use `/` regardless of the host the updater ran on.
///
/// # Examples
///
/// ```rust
/// use flatpak_maven_deps::utils::platform::normalize_path_for_storage;
/// use std::path::Path;
///
/// let dest = normalize_path_for_storage(Path::new(".m2\\repository\\foo"));
/// assert_eq!(dest, ".m2/repository/foo");
/// ```
#[must_use]
pub fn normalize_path_for_storage<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// Returns true when the process runs with an effective user id of 0.
#[must_use]
pub fn is_running_as_root() -> bool {
    nix::unistd::Uid::effective().is_root()
}

/// Refuses to continue when running as root.
///
/// The build executes arbitrary code from the upstream repository and the
/// sandbox install writes to the user installation, neither of which may run
/// privileged.
pub fn ensure_not_root() -> Result<()> {
    check_privileges(is_running_as_root())
}

fn check_privileges(is_root: bool) -> Result<()> {
    if is_root {
        return Err(DepsError::RunningAsRoot.into());
    }
    Ok(())
}
