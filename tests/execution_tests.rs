//! Integration tests driving real child processes through the tooling
//! factory, using `sh` as the build entry point so no Gradle installation is
//! required.

#![cfg(unix)]

use std::time::{Duration, Instant};

use gradle_testkit::{GradleHandleFactory, TestKitError, ToolingApiGradleHandleFactory};
use tempfile::TempDir;

fn sh_factory() -> ToolingApiGradleHandleFactory {
    ToolingApiGradleHandleFactory::with_gradle_command("sh").expect("runtime")
}

fn args(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}

#[test]
fn test_successful_build_captures_both_streams() {
    let project = TempDir::new().unwrap();
    let handle = sh_factory()
        .start(project.path(), &args("printf 'out text'; printf 'err text' 1>&2"))
        .unwrap();

    let result = handle.wait_for_finish().expect("build succeeded");
    assert_eq!(result.standard_output(), "out text");
    assert_eq!(result.standard_error(), "err text");
    assert!(!handle.is_running());
}

#[test]
fn test_running_flag_flips_on_completion() {
    let project = TempDir::new().unwrap();
    let handle = sh_factory()
        .start(project.path(), &args("sleep 0.3"))
        .unwrap();

    assert!(handle.is_running());
    handle.wait_for_finish().expect("build succeeded");
    assert!(!handle.is_running());
}

#[test]
fn test_failed_build_propagates_exit_code() {
    let project = TempDir::new().unwrap();
    let handle = sh_factory()
        .start(project.path(), &args("echo 'oops' 1>&2; exit 3"))
        .unwrap();

    match handle.wait_for_finish() {
        Err(TestKitError::Build(failure)) => {
            assert_eq!(failure.exit_code, Some(3));
            assert!(failure.message.contains("3"), "message: {}", failure.message);
        }
        other => panic!("expected build failure, got {other:?}"),
    }

    // Output captured up to the failure point stays readable.
    assert_eq!(handle.standard_error(), "oops\n");
    assert!(!handle.is_running());
}

#[test]
fn test_failure_without_output_leaves_accessors_empty() {
    let project = TempDir::new().unwrap();
    let handle = sh_factory()
        .start(project.path(), &args("exit 7"))
        .unwrap();

    assert!(handle.wait_for_finish().is_err());
    assert_eq!(handle.standard_output(), "");
    assert_eq!(handle.standard_error(), "");
}

#[test]
fn test_wait_after_completion_returns_immediately() {
    let project = TempDir::new().unwrap();
    let handle = sh_factory()
        .start(project.path(), &args("echo done"))
        .unwrap();

    let first = handle.wait_for_finish().expect("build succeeded");

    let started = Instant::now();
    let second = handle.wait_for_finish().expect("still finished");
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(first, second);
}

#[test]
fn test_all_output_before_completion_is_visible() {
    let project = TempDir::new().unwrap();
    let handle = sh_factory()
        .start(project.path(), &args("seq 1 1000"))
        .unwrap();

    let result = handle.wait_for_finish().expect("build succeeded");
    let lines: Vec<_> = result.standard_output().lines().collect();
    assert_eq!(lines.len(), 1000);
    assert_eq!(lines[0], "1");
    assert_eq!(lines[999], "1000");
}

#[test]
fn test_live_accessor_sees_partial_output() {
    let project = TempDir::new().unwrap();
    let handle = sh_factory()
        .start(project.path(), &args("echo early; sleep 5"))
        .unwrap();

    // The pump lags the child, so poll with a deadline.
    let deadline = Instant::now() + Duration::from_secs(4);
    while !handle.standard_output().contains("early") {
        assert!(Instant::now() < deadline, "never saw partial output");
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(handle.is_running());
}

#[test]
fn test_wait_timeout_expires_while_build_runs() {
    let project = TempDir::new().unwrap();
    let handle = sh_factory()
        .start(project.path(), &args("sleep 10"))
        .unwrap();

    match handle.wait_for_finish_timeout(Duration::from_millis(100)) {
        Err(TestKitError::WaitTimeout { .. }) => {}
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(handle.is_running());
}

#[test]
fn test_full_chain_with_classpath_injection() {
    use std::os::unix::fs::PermissionsExt;

    // A stand-in build tool that proves it received the init flag and prints
    // the script it was handed.
    let tools = TempDir::new().unwrap();
    let fake_gradle = tools.path().join("fake-gradle");
    std::fs::write(&fake_gradle, "#!/bin/sh\necho \"flag=$1\"\ncat \"$2\"\n").unwrap();
    std::fs::set_permissions(&fake_gradle, std::fs::Permissions::from_mode(0o755)).unwrap();

    let project = TempDir::new().unwrap();
    let jar = project.path().join("plugin.jar");
    std::fs::write(&jar, "").unwrap();

    let tooling =
        ToolingApiGradleHandleFactory::with_gradle_command(fake_gradle.as_os_str()).unwrap();
    let factory = gradle_testkit::ClasspathInjectingGradleHandleFactory::new(
        std::sync::Arc::new(tooling),
        vec![jar.clone()],
        "/home/test-kit",
    )
    .unwrap();

    let handle = factory
        .start(project.path(), &["build".to_string()])
        .unwrap();
    let result = handle.wait_for_finish().expect("build succeeded");

    let stdout = result.standard_output();
    assert!(stdout.starts_with("flag=-I\n"));
    assert!(stdout.contains("System.setProperty('user.home', '/home/test-kit')"));
    assert!(stdout.contains("classpath files("));
    assert!(stdout.contains(&jar.canonicalize().unwrap().to_string_lossy().into_owned()));

    // The script landed in the project's private state directory.
    assert!(project
        .path()
        .join(".gradle-test-kit")
        .join("init.gradle")
        .is_file());
}
