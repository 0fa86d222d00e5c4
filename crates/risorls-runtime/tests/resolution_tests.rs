//! End-to-end resolution tests against real subprocesses.
//!
//! The Go toolchain is replaced by small shell scripts written into a temp
//! directory, so these tests only run on Unix.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use risorls_core::{
    CommandError, CommandRunner, CommandSpec, ResolutionError, ResolutionErrorKind,
    ResolutionRequest, ResolutionSource, ResolutionStage, ResolverSettings, Toolchain,
};
use risorls_runtime::{Resolver, TokioCommandRunner};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// An executable name nothing on a test machine provides.
const MISSING_EXECUTABLE: &str = "risorls-test-missing-server";

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
    path
}

fn resolver_with_toolchain(program: &Path) -> Resolver {
    let settings = ResolverSettings {
        toolchain: Toolchain::new(program.to_string_lossy()),
        lookup_timeout: Duration::from_secs(5),
        toolchain_timeout: Duration::from_secs(5),
        install_timeout: Duration::from_secs(5),
        prefer_absolute_path: false,
    };
    Resolver::new(Arc::new(TokioCommandRunner::new()), settings)
}

fn missing_request() -> ResolutionRequest {
    ResolutionRequest::new().with_executable_name(MISSING_EXECUTABLE)
}

#[tokio::test]
async fn test_executable_on_path_is_found() {
    let resolver = Resolver::new(
        Arc::new(TokioCommandRunner::new()),
        ResolverSettings::default(),
    );
    let request = ResolutionRequest::new().with_executable_name("sh");

    let resolved = resolver.resolve(&request).await.into_result().unwrap();
    assert_eq!(resolved.command, "sh");
    assert_eq!(resolved.source, ResolutionSource::FoundOnPath);
    assert!(resolved.probed_path.is_some_and(|p| p.ends_with("/sh")));
}

#[tokio::test]
async fn test_absent_toolchain_is_missing_toolchain() {
    let resolver = resolver_with_toolchain(Path::new("/nonexistent/risorls/go"));

    let err = resolver
        .resolve(&missing_request())
        .await
        .into_result()
        .unwrap_err();
    assert_eq!(err.kind(), ResolutionErrorKind::MissingToolchain);
    assert!(err.to_string().contains("https://go.dev/dl/"));
}

#[tokio::test]
async fn test_failing_install_reports_manual_command() {
    let dir = TempDir::new().unwrap();
    let go = write_script(
        dir.path(),
        "go",
        r#"if [ "$1" = "version" ]; then echo "go version go1.22.0 linux/amd64"; exit 0; fi
echo "module lookup disabled" >&2
exit 1"#,
    );
    let resolver = resolver_with_toolchain(&go);

    let err = resolver
        .resolve(&missing_request())
        .await
        .into_result()
        .unwrap_err();
    match &err {
        ResolutionError::InstallationFailed {
            install_command,
            cause,
            ..
        } => {
            assert!(install_command.ends_with(
                "install github.com/risor-io/risor/cmd/risor-lsp@v1.8.1"
            ));
            assert!(matches!(cause, CommandError::Exited { code: Some(1), .. }));
        }
        other => panic!("expected InstallationFailed, got {other:?}"),
    }
    assert!(err.to_string().contains("install it manually"));
    assert!(
        err.cause_chain()
            .iter()
            .any(|line| line.contains("module lookup disabled"))
    );
}

#[tokio::test]
async fn test_install_without_binary_on_path_fails_verification() {
    let dir = TempDir::new().unwrap();
    let go = write_script(dir.path(), "go", "exit 0");
    let resolver = resolver_with_toolchain(&go);

    let outcome = resolver.resolve(&missing_request()).await;
    assert_eq!(
        outcome.error_kind(),
        Some(ResolutionErrorKind::VerificationFailed)
    );
    let report = outcome.report();
    assert!(report.message.unwrap_or_default().contains("GOBIN"));
}

/// Alive and not a zombie, per `/proc/<pid>/stat`.
#[cfg(target_os = "linux")]
fn is_running(pid: u32) -> bool {
    fs::read_to_string(format!("/proc/{pid}/stat")).is_ok_and(|stat| {
        stat.rsplit(')')
            .next()
            .is_some_and(|rest| !rest.trim_start().starts_with('Z'))
    })
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn test_cancel_during_install_kills_toolchain_workers() {
    let dir = TempDir::new().unwrap();
    let pid_file = dir.path().join("worker.pid");
    // A worker in the background plus a foreground step, like `go install`
    // running the compiler.
    let go = write_script(
        dir.path(),
        "go",
        &format!(
            r#"if [ "$1" = "version" ]; then exit 0; fi
sleep 30 &
echo $! > "{}"
sleep 30
true"#,
            pid_file.display()
        ),
    );
    let resolver = resolver_with_toolchain(&go);
    let token = CancellationToken::new();

    let canceller = {
        let token = token.clone();
        let pid_file = pid_file.clone();
        tokio::spawn(async move {
            for _ in 0..100 {
                if fs::read_to_string(&pid_file).is_ok_and(|pid| !pid.trim().is_empty()) {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            token.cancel();
        })
    };

    let started = std::time::Instant::now();
    let err = resolver
        .resolve_with_cancel(&missing_request(), &token)
        .await
        .into_result()
        .unwrap_err();
    canceller.await.unwrap();

    assert_eq!(
        err,
        ResolutionError::Cancelled {
            executable: MISSING_EXECUTABLE.to_string(),
            stage: ResolutionStage::Install,
        }
    );
    assert!(started.elapsed() < Duration::from_secs(10));

    let worker: u32 = fs::read_to_string(&pid_file)
        .unwrap()
        .trim()
        .parse()
        .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!is_running(worker), "toolchain worker {worker} survived cancellation");
}

#[tokio::test]
async fn test_install_timeout_is_not_extended_by_background_output() {
    let dir = TempDir::new().unwrap();
    let go = write_script(
        dir.path(),
        "go",
        r#"if [ "$1" = "version" ]; then exit 0; fi
sleep 6 &
echo "downloading github.com/risor-io/risor""#,
    );
    let settings = ResolverSettings {
        install_timeout: Duration::from_secs(1),
        ..resolver_with_toolchain(&go).settings().clone()
    };
    let resolver = Resolver::new(Arc::new(TokioCommandRunner::new()), settings);

    let started = std::time::Instant::now();
    let err = resolver
        .resolve(&missing_request())
        .await
        .into_result()
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(4));
    match err {
        ResolutionError::InstallationFailed { cause, .. } => {
            assert!(matches!(cause, CommandError::TimedOut { .. }));
        }
        other => panic!("expected InstallationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_runner_times_out_slow_command() {
    let spec = CommandSpec::new("sleep", Duration::from_millis(200)).arg("30");
    let result = TokioCommandRunner::new()
        .run(&spec, &CancellationToken::new())
        .await;

    match result {
        Err(CommandError::TimedOut { command, timeout }) => {
            assert_eq!(command, "sleep 30");
            assert_eq!(timeout, Duration::from_millis(200));
        }
        other => panic!("expected TimedOut, got {other:?}"),
    }
}

#[test]
fn test_runner_on_current_thread_runtime() {
    let spec = CommandSpec::new("sh", Duration::from_secs(5))
        .arg("-c")
        .arg("printf '/usr/local/bin/risor-lsp\\n'");
    let output = tokio_test::block_on(async {
        TokioCommandRunner::new()
            .run(&spec, &CancellationToken::new())
            .await
    });
    let output = tokio_test::assert_ok!(output);
    assert_eq!(output.first_line(), Some("/usr/local/bin/risor-lsp"));
}
