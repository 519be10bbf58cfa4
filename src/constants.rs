//! Fixed names and paths used throughout the updater.
//!
//! Values that mirror conventions of external tools (Maven's local repository
//! layout, the Flatpak OpenJDK SDK extension) live here so they are easy to find
//! when those conventions change.

/// Manifest used when none is given on the command line.
pub const DEFAULT_MANIFEST: &str = "de.mediathekview.MediathekView.yaml";

/// Module whose git source is built.
pub const DEFAULT_MODULE: &str = "mediathekview";

/// Name of the generated sidecar file, written next to the manifest.
pub const OUTPUT_FILE_NAME: &str = "maven-dependencies.json";

/// Prefix of the ephemeral working directory.
pub const WORKDIR_PREFIX: &str = "de.mediathekview.MediathekView-dependencies-";

/// Where the packaged build expects its Maven local repository, relative to
/// the build directory.
pub const LOCAL_REPOSITORY_PREFIX: &str = ".m2/repository";

/// Generic group metadata file name published by Maven repositories.
pub const MAVEN_METADATA_FILE: &str = "maven-metadata.xml";

/// Versioned variants of [`MAVEN_METADATA_FILE`] stored alongside it.
pub const MAVEN_METADATA_VARIANT_PATTERN: &str = "maven-metadata-*.xml";

/// Maven wrapper script at the root of the upstream checkout.
pub const MAVEN_WRAPPER: &str = "mvnw";

/// SDK extension providing the JDK inside the Flatpak sandbox.
pub const OPENJDK_EXTENSION: &str = "org.freedesktop.Sdk.Extension.openjdk";

/// Script that puts the OpenJDK extension on `PATH` inside the sandbox.
pub const OPENJDK_ENABLE_SCRIPT: &str = "/usr/lib/sdk/openjdk/enable.sh";

/// Number of trailing stdout lines kept in a failed command's diagnostic when
/// it wrote nothing to stderr.
pub const FAILURE_OUTPUT_TAIL_LINES: usize = 20;
