//! Maven artifact discovery.
//!
//! Maven cannot dump the resolved dependency closure in a structured form, so
//! the updater builds the project against an empty local repository and mines
//! the build log instead:
//!
//! 1. [`log_scan`] extracts every `Downloaded from <repo>: <url>` line.
//! 2. [`repository`] classifies each URL against the known repositories.
//! 3. [`source`] turns each classified artifact plus its cached file into a
//!    Flatpak `file` source with a SHA-512 checksum.

pub mod log_scan;
pub mod repository;
pub mod source;

pub use log_scan::extract_downloaded_artifacts;
pub use repository::{ArtifactReference, REPO_BASES};
pub use source::{PackagedArtifactSource, compute_sha512, create_flatpak_source};
