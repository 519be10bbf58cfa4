//! Re-running the updater inside the Flatpak SDK.
//!
//! `--flatpak` makes the build happen with the same SDK and JDK extension the
//! packaged build uses, so Maven resolves exactly the dependency set the
//! offline build will need. The host only has to provide `flatpak`.
//!
//! The re-entry is two commands:
//!
//! ```text
//! flatpak install --user --noninteractive --assumeyes <sdk>//<ver> <openjdk>//<ver>
//! flatpak run --share=network --command=/bin/bash --filesystem=<dir> --cwd=<dir> \
//!     <sdk>//<ver> -c "source enable.sh; <this executable> --manifest ... --module ..."
//! ```
//!
//! Inside the sandbox the executable runs the direct pipeline and writes the
//! sidecar into the bind-mounted manifest directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::constants::OPENJDK_EXTENSION;
use crate::core::DepsError;
use crate::manifest::FlatpakManifest;
use crate::process::{CommandRunner, ProcessCommand, shell_quote};

/// Host directories `flatpak run --filesystem` refuses to expose.
const RESERVED_HOST_PATHS: &[&str] =
    &["/app", "/bin", "/dev", "/etc", "/lib", "/lib32", "/lib64", "/proc", "/sbin", "/usr"];

/// Installs the manifest's SDK and re-invokes an executable inside it.
#[derive(Debug, Clone)]
pub struct SandboxReentryRunner {
    executable: PathBuf,
}

impl SandboxReentryRunner {
    /// Re-invokes `executable` inside the sandbox.
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Re-invokes the currently running executable.
    pub fn from_current_exe() -> Result<Self> {
        let executable = std::env::current_exe().context("Failed to determine the current executable")?;
        Ok(Self::new(executable))
    }

    /// Installs the SDK and its OpenJDK extension, then runs the updater in it.
    ///
    /// # Errors
    ///
    /// Fails when the manifest cannot be read or declares no SDK, when the
    /// executable lives in a directory Flatpak cannot mount
    /// ([`DepsError::ReservedSandboxPath`]), or when either `flatpak` command
    /// fails. A failure of the updater inside the sandbox surfaces as a failed
    /// `flatpak run`.
    pub async fn run<R: CommandRunner>(&self, runner: &R, settings: &Settings) -> Result<()> {
        let manifest = FlatpakManifest::load(&settings.manifest_path)?;
        let sdk = manifest.sdk()?;
        let openjdk = sdk.extension(OPENJDK_EXTENSION);
        tracing::debug!(target: "sandbox", "Using {} with {}", sdk, openjdk);

        // flatpak needs absolute paths for bind mounts
        let manifest_path = std::fs::canonicalize(&settings.manifest_path)
            .with_context(|| format!("Failed to resolve {}", settings.manifest_path.display()))?;
        let work_dir = manifest_path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("/"));
        let extra_filesystems = self.extra_filesystems(&work_dir)?;

        runner
            .run(ProcessCommand::flatpak_install([sdk.to_string(), openjdk.to_string()]))
            .await
            .context("Failed to install the Flatpak SDK")?;

        let script = self.reentry_script(&manifest_path, settings);
        runner
            .run(ProcessCommand::flatpak_run(&sdk.to_string(), &work_dir, &extra_filesystems, &script))
            .await
            .context("Updating dependencies inside the Flatpak sandbox failed")?;
        Ok(())
    }

    fn reentry_script(&self, manifest_path: &Path, settings: &Settings) -> String {
        let mut words = vec![
            self.executable.display().to_string(),
            "--manifest".to_string(),
            manifest_path.display().to_string(),
            "--module".to_string(),
            settings.module.clone(),
        ];
        if settings.verbose {
            words.push("--verbose".to_string());
        }
        words.iter().map(|word| shell_quote(word)).collect::<Vec<_>>().join(" ")
    }

    /// The executable's directory, read-only, unless the manifest directory
    /// already exposes it.
    fn extra_filesystems(&self, work_dir: &Path) -> Result<Vec<String>, DepsError> {
        match self.executable.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.starts_with(work_dir) => {
                if RESERVED_HOST_PATHS.iter().any(|reserved| dir.starts_with(reserved)) {
                    return Err(DepsError::ReservedSandboxPath {
                        path: dir.display().to_string(),
                    });
                }
                Ok(vec![format!("{}:ro", dir.display())])
            }
            _ => Ok(Vec::new()),
        }
    }
}

/// Runs the updater for `settings` inside the Flatpak SDK, re-invoking the
/// current executable.
pub async fn run_in_flatpak<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<()> {
    SandboxReentryRunner::from_current_exe()?.run(runner, settings).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingRunner;
    use crate::test_utils::fixtures::write_manifest;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_installs_sdk_then_reenters() {
        let temp = tempdir().unwrap();
        let manifest = write_manifest(temp.path()).unwrap();
        let dir = std::fs::canonicalize(temp.path()).unwrap();
        let runner = RecordingRunner::new();

        SandboxReentryRunner::new("/opt/tools/update-dependencies")
            .run(&runner, &Settings::new(&manifest))
            .await
            .unwrap();

        let lines = runner.command_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "flatpak install --user --noninteractive --assumeyes org.freedesktop.Sdk//24.08 org.freedesktop.Sdk.Extension.openjdk//24.08"
        );

        let run = &runner.commands()[1];
        let args = run.get_args();
        assert_eq!(args[0..3], ["run", "--share=network", "--command=/bin/bash"]);
        assert!(args.contains(&format!("--filesystem={}", dir.display())));
        assert!(args.contains(&format!("--cwd={}", dir.display())));
        assert!(args.contains(&"--filesystem=/opt/tools:ro".to_string()));
        assert!(args.contains(&"org.freedesktop.Sdk//24.08".to_string()));

        let script = args.last().unwrap();
        assert!(script.starts_with("source /usr/lib/sdk/openjdk/enable.sh; "));
        assert!(script.ends_with(&format!(
            "/opt/tools/update-dependencies --manifest {}/de.mediathekview.MediathekView.yaml --module mediathekview",
            dir.display()
        )));
    }

    #[tokio::test]
    async fn test_forwards_module_and_verbose() {
        let temp = tempdir().unwrap();
        let manifest = write_manifest(temp.path()).unwrap();
        let runner = RecordingRunner::new();
        let mut settings = Settings::new(&manifest).with_module("my module");
        settings.verbose = true;

        SandboxReentryRunner::new("/opt/tools/update-dependencies").run(&runner, &settings).await.unwrap();

        let script = runner.commands()[1].get_args().last().unwrap().clone();
        assert!(script.ends_with("--module 'my module' --verbose"));
    }

    #[tokio::test]
    async fn test_executable_inside_manifest_dir_not_mounted_twice() {
        let temp = tempdir().unwrap();
        let manifest = write_manifest(temp.path()).unwrap();
        let dir = std::fs::canonicalize(temp.path()).unwrap();
        let runner = RecordingRunner::new();

        SandboxReentryRunner::new(dir.join("bin/update-dependencies"))
            .run(&runner, &Settings::new(&manifest))
            .await
            .unwrap();

        let filesystems = runner.commands()[1]
            .get_args()
            .iter()
            .filter(|arg| arg.starts_with("--filesystem="))
            .count();
        assert_eq!(filesystems, 1);
    }

    #[tokio::test]
    async fn test_missing_sdk_runs_nothing() {
        let temp = tempdir().unwrap();
        let manifest = temp.path().join("app.yaml");
        std::fs::write(&manifest, "app-id: x\nmodules: []\n").unwrap();
        let runner = RecordingRunner::new();

        let error = SandboxReentryRunner::new("/bin/true").run(&runner, &Settings::new(&manifest)).await.unwrap_err();
        assert!(matches!(error.downcast_ref::<DepsError>(), Some(DepsError::SdkNotFound)));
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_install_failure_skips_reentry() {
        let temp = tempdir().unwrap();
        let manifest = write_manifest(temp.path()).unwrap();
        let runner = RecordingRunner::new().fail_on("flatpak");

        let result =
            SandboxReentryRunner::new("/opt/tools/update-dependencies").run(&runner, &Settings::new(&manifest)).await;
        assert!(result.is_err());
        assert_eq!(runner.commands().len(), 1);
    }

    #[tokio::test]
    async fn test_system_install_location_rejected_before_install() {
        let temp = tempdir().unwrap();
        let manifest = write_manifest(temp.path()).unwrap();
        let runner = RecordingRunner::new();

        let error = SandboxReentryRunner::new("/usr/bin/update-dependencies")
            .run(&runner, &Settings::new(&manifest))
            .await
            .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<DepsError>(),
            Some(DepsError::ReservedSandboxPath { path }) if path == "/usr/bin"
        ));
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn test_reserved_prefix_is_path_based() {
        let runner = SandboxReentryRunner::new("/usrlocal/bin/update-dependencies");
        let mounts = runner.extra_filesystems(Path::new("/srv/flatpak")).unwrap();
        assert_eq!(mounts, ["/usrlocal/bin:ro"]);
    }
}
