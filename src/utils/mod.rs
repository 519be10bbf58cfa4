//! Supporting utilities: file system, logging and platform helpers.

pub mod fs;
pub mod logging;
pub mod platform;

pub use fs::{atomic_write, ensure_dir, safe_write};
pub use platform::{ensure_not_root, normalize_path_for_storage};
