//! Manifest fixtures.

/// A manifest in the shape the updater expects.
pub const MANIFEST: &str = r#"app-id: de.mediathekview.MediathekView
runtime: org.freedesktop.Platform
runtime-version: '24.08'
sdk: org.freedesktop.Sdk
sdk-extensions:
  - org.freedesktop.Sdk.Extension.openjdk
command: mediathekview
modules:
  - name: mediathekview
    buildsystem: simple
    build-options:
      append-path: /usr/lib/sdk/openjdk/bin
    build-commands:
      - ./mvnw -o -B package
    sources:
      - type: git
        url: https://example.test/repo.git
        commit: abc123
      - maven-dependencies.json
"#;

/// Writes [`MANIFEST`] into `dir` and returns its path.
pub fn write_manifest(dir: &std::path::Path) -> std::io::Result<std::path::PathBuf> {
    let path = dir.join("de.mediathekview.MediathekView.yaml");
    std::fs::write(&path, MANIFEST)?;
    Ok(path)
}
