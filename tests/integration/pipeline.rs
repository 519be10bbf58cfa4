//! End-to-end tests of the direct pipeline.

use crate::common::TestProject;
use anyhow::Result;

use flatpak_maven_deps::core::{DepsError, ErrorCategory};
use flatpak_maven_deps::test_utils::{RecordingRunner, init_test_logging};
use flatpak_maven_deps::update::run_direct;

// SHA-512 of "abc"
const ABC_SHA512: &str = "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f";

fn deps_error(error: &anyhow::Error) -> Option<&DepsError> {
    error.chain().find_map(|cause| cause.downcast_ref::<DepsError>())
}

#[tokio::test]
async fn test_single_artifact_scenario() -> Result<()> {
    init_test_logging();
    let project = TestProject::new()?;
    let runner = RecordingRunner::new()
        .with_build_log(
            "[INFO] Downloaded from central: https://repo.maven.apache.org/maven2/foo/bar/1.0/bar-1.0.jar\n",
        )
        .with_cached_file("foo/bar/1.0/bar-1.0.jar", b"abc");

    run_direct(&runner, &project.settings()).await?;

    let json = project.read_output_json()?;
    let entries = json.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["type"], "file");
    assert_eq!(entries[0]["url"], "https://repo.maven.apache.org/maven2/foo/bar/1.0/bar-1.0.jar");
    assert_eq!(entries[0]["dest"], ".m2/repository/foo/bar/1.0");
    assert_eq!(entries[0]["dest-filename"], "bar-1.0.jar");
    assert_eq!(entries[0]["sha512"], ABC_SHA512);
    Ok(())
}

#[tokio::test]
async fn test_clones_manifest_commit() -> Result<()> {
    let project = TestProject::new()?;
    let runner = RecordingRunner::new();

    run_direct(&runner, &project.settings()).await?;

    let lines = runner.command_lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("git -c advice.detachedHead=false clone --depth=1 --revision=abc123 https://example.test/repo.git "));
    assert!(lines[1].contains("mvnw -B -Dmaven.repo.local="));
    assert!(lines[1].ends_with(" clean package"));
    Ok(())
}

#[tokio::test]
async fn test_output_sorted_across_repositories() -> Result<()> {
    let project = TestProject::new()?;
    let runner = RecordingRunner::new()
        .with_build_log(
            "Downloaded from ej-technologies: https://maven.ej-technologies.com/repository/com/install4j/rt/10/rt-10.jar\n\
             Downloaded from snapshots: https://oss.sonatype.org/content/repositories/snapshots/x/y/1-SNAPSHOT/y-1-SNAPSHOT.pom\n",
        )
        .with_cached_file("com/install4j/rt/10/rt-10.jar", b"rt")
        .with_cached_file("x/y/1-SNAPSHOT/y-1-SNAPSHOT.pom", b"pom")
        .with_artifact("org/apache/commons/lang/3/lang-3.jar", b"lang");

    run_direct(&runner, &project.settings()).await?;

    let json = project.read_output_json()?;
    let urls: Vec<&str> = json.as_array().expect("array").iter().filter_map(|entry| entry["url"].as_str()).collect();
    assert_eq!(
        urls,
        [
            "https://maven.ej-technologies.com/repository/com/install4j/rt/10/rt-10.jar",
            "https://oss.sonatype.org/content/repositories/snapshots/x/y/1-SNAPSHOT/y-1-SNAPSHOT.pom",
            "https://repo.maven.apache.org/maven2/org/apache/commons/lang/3/lang-3.jar",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_versioned_metadata_name() -> Result<()> {
    let project = TestProject::new()?;
    let runner = RecordingRunner::new()
        .with_artifact("x/y/1.0-SNAPSHOT/maven-metadata.xml", b"<metadata/>")
        .with_cached_file("x/y/1.0-SNAPSHOT/maven-metadata-20240101.120000-3.xml", b"<metadata/>");

    run_direct(&runner, &project.settings()).await?;

    let json = project.read_output_json()?;
    assert_eq!(json[0]["dest-filename"], "maven-metadata-20240101.120000-3.xml");
    assert_eq!(json[0]["dest"], ".m2/repository/x/y/1.0-SNAPSHOT");
    Ok(())
}

#[tokio::test]
async fn test_rerun_is_byte_identical() -> Result<()> {
    let project = TestProject::new()?;
    let runner = RecordingRunner::new()
        .with_artifact("b/b/1/b-1.jar", b"b")
        .with_artifact("a/a/1/a-1.pom", b"a")
        .with_artifact("c/c/1/c-1.jar", b"c");

    run_direct(&runner, &project.settings()).await?;
    let first = project.read_output()?;
    run_direct(&runner, &project.settings()).await?;
    let second = project.read_output()?;

    assert_eq!(first, second);
    assert!(!first.ends_with('\n'));
    Ok(())
}

#[tokio::test]
async fn test_duplicate_downloads_are_kept() -> Result<()> {
    let project = TestProject::new()?;
    let runner = RecordingRunner::new().with_artifact("a/a/1/a-1.jar", b"a").with_artifact("a/a/1/a-1.jar", b"a");

    run_direct(&runner, &project.settings()).await?;

    let json = project.read_output_json()?;
    assert_eq!(json.as_array().map(Vec::len), Some(2));
    assert_eq!(json[0], json[1]);
    Ok(())
}

#[tokio::test]
async fn test_no_downloads_writes_empty_array() -> Result<()> {
    let project = TestProject::new()?;
    let runner = RecordingRunner::new().with_build_log("[INFO] BUILD SUCCESS\n");

    run_direct(&runner, &project.settings()).await?;

    assert_eq!(project.read_output()?, "[]");
    Ok(())
}

#[tokio::test]
async fn test_unknown_repository_keeps_previous_output() -> Result<()> {
    let project = TestProject::new()?;
    std::fs::write(project.output_path(), "previous")?;
    let runner = RecordingRunner::new()
        .with_artifact("a/a/1/a-1.jar", b"a")
        .with_build_log("Downloaded from jitpack: https://jitpack.io/com/github/x/y/1/y-1.jar\n");

    let error = run_direct(&runner, &project.settings()).await.unwrap_err();

    let kind = deps_error(&error).map(DepsError::category);
    assert_eq!(kind, Some(ErrorCategory::Classification));
    assert!(error.to_string().contains("https://jitpack.io/com/github/x/y/1/y-1.jar"));
    assert_eq!(project.read_output()?, "previous");
    Ok(())
}

#[tokio::test]
async fn test_missing_cached_artifact_fails() -> Result<()> {
    let project = TestProject::new()?;
    let runner = RecordingRunner::new()
        .with_build_log("Downloaded from central: https://repo.maven.apache.org/maven2/a/a/1/a-1.jar\n");

    let error = run_direct(&runner, &project.settings()).await.unwrap_err();

    assert!(matches!(deps_error(&error), Some(DepsError::ArtifactMissing { .. })));
    assert!(!project.output_path().exists());
    Ok(())
}

#[tokio::test]
async fn test_build_failure_writes_nothing() -> Result<()> {
    let project = TestProject::new()?;
    let runner = RecordingRunner::new().with_artifact("a/a/1/a-1.jar", b"a").fail_on("mvnw");

    let error = run_direct(&runner, &project.settings()).await.unwrap_err();

    assert_eq!(deps_error(&error).map(DepsError::category), Some(ErrorCategory::Process));
    assert!(!project.output_path().exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_module_runs_no_commands() -> Result<()> {
    let project = TestProject::with_manifest("app-id: x\nmodules:\n  - name: other\n    sources:\n      - type: git\n")?;
    let runner = RecordingRunner::new();

    let error = run_direct(&runner, &project.settings()).await.unwrap_err();

    assert!(matches!(deps_error(&error), Some(DepsError::ModuleNotFound { module }) if module == "mediathekview"));
    assert!(runner.commands().is_empty());
    assert!(!project.path().join("maven-dependencies.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_other_module_is_selectable() -> Result<()> {
    let project = TestProject::with_manifest(
        "modules:\n  - name: helper\n    sources:\n      - type: git\n        commit: 111\n        url: https://example.test/helper.git\n",
    )?;
    let runner = RecordingRunner::new();

    run_direct(&runner, &project.settings().with_module("helper")).await?;

    assert!(runner.command_lines()[0].contains("--revision=111 https://example.test/helper.git"));
    assert_eq!(project.read_output()?, "[]");
    Ok(())
}

#[tokio::test]
async fn test_missing_manifest() -> Result<()> {
    let project = TestProject::new()?;
    let settings = flatpak_maven_deps::config::Settings::new(project.path().join("absent.yaml"));

    let error = run_direct(&RecordingRunner::new(), &settings).await.unwrap_err();

    assert!(matches!(deps_error(&error), Some(DepsError::ManifestNotFound { .. })));
    Ok(())
}
