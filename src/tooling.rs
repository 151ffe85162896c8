//! Connector-backed handle factory.
//!
//! Talks to the build engine the way the Gradle tooling API does: resolve the
//! right entry point for a project directory, configure the invocation, attach
//! the output sinks, submit asynchronously, and hand back the handle without
//! waiting. The connection to the build engine itself is opaque; this module
//! only decides which executable to launch and wires up its lifecycle.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::buffer::OutputBuffer;
use crate::error::{BuildFailure, TestKitError};
use crate::factory::GradleHandleFactory;
use crate::handle::{CompletionSignal, GradleHandle};

/// Name of the Gradle wrapper script looked up in the project directory.
#[cfg(not(windows))]
const WRAPPER: &str = "gradlew";
#[cfg(windows)]
const WRAPPER: &str = "gradlew.bat";

/// Launches builds by spawning the project's Gradle entry point.
///
/// Executable resolution, per project directory: an explicit override set via
/// [`with_gradle_command`](Self::with_gradle_command), else the project's own
/// wrapper script, else `gradle` from `PATH`.
///
/// The factory owns the runtime that executes the backend's pump and
/// completion tasks; handles keep it alive, so the factory may be dropped
/// while builds are still in flight.
#[derive(Debug)]
pub struct ToolingApiGradleHandleFactory {
    runtime: Arc<Runtime>,
    gradle_command: Option<OsString>,
}

impl ToolingApiGradleHandleFactory {
    /// # Errors
    ///
    /// [`TestKitError::Runtime`] if the backend runtime cannot be created.
    pub fn new() -> Result<Self, TestKitError> {
        Ok(Self {
            runtime: Arc::new(build_runtime()?),
            gradle_command: None,
        })
    }

    /// Use an explicit executable instead of wrapper/`PATH` resolution.
    ///
    /// Intended for tests and for environments with a pinned Gradle
    /// installation.
    ///
    /// # Errors
    ///
    /// [`TestKitError::Runtime`] if the backend runtime cannot be created.
    pub fn with_gradle_command(command: impl Into<OsString>) -> Result<Self, TestKitError> {
        Ok(Self {
            runtime: Arc::new(build_runtime()?),
            gradle_command: Some(command.into()),
        })
    }

    fn resolve_program(&self, directory: &Path) -> OsString {
        if let Some(command) = &self.gradle_command {
            return command.clone();
        }

        let wrapper = directory.join(WRAPPER);
        if wrapper.is_file() {
            // Absolute so the spawned command is independent of its own
            // working directory handling.
            return std::path::absolute(&wrapper)
                .unwrap_or(wrapper)
                .into_os_string();
        }

        OsString::from("gradle")
    }
}

impl GradleHandleFactory for ToolingApiGradleHandleFactory {
    fn start(
        &self,
        directory: &Path,
        arguments: &[String],
    ) -> Result<GradleHandle, TestKitError> {
        if !directory.is_dir() {
            return Err(TestKitError::ProjectDirectory {
                path: directory.to_path_buf(),
            });
        }

        let program = self.resolve_program(directory);
        debug!(program = ?program, ?arguments, directory = %directory.display(), "launching build");

        let mut command = Command::new(&program);
        command
            .args(arguments)
            .current_dir(directory)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Spawning needs the runtime's I/O driver; everything after the spawn
        // happens on backend tasks.
        let _guard = self.runtime.enter();
        let mut child = command.spawn().map_err(|source| TestKitError::Spawn {
            program: program.clone(),
            source,
        })?;

        let stdout_pipe = child.stdout.take().ok_or_else(|| TestKitError::Spawn {
            program: program.clone(),
            source: io::Error::other("failed to capture stdout"),
        })?;
        let stderr_pipe = child.stderr.take().ok_or_else(|| TestKitError::Spawn {
            program: program.clone(),
            source: io::Error::other("failed to capture stderr"),
        })?;

        let stdout = OutputBuffer::new();
        let stderr = OutputBuffer::new();
        let signal = Arc::new(CompletionSignal::new());

        let out_sink = stdout.clone();
        let err_sink = stderr.clone();
        let completion = Arc::clone(&signal);
        self.runtime.spawn(async move {
            let out_pump = tokio::spawn(pump(stdout_pipe, out_sink));
            let err_pump = tokio::spawn(pump(stderr_pipe, err_sink));

            // Drain both pipes before declaring the invocation finished so
            // every byte written before completion is visible to waiters.
            let _ = out_pump.await;
            let _ = err_pump.await;

            let outcome = match child.wait().await {
                Ok(status) if status.success() => Ok(()),
                Ok(status) => Err(BuildFailure {
                    message: format!("Gradle build failed: {status}"),
                    exit_code: status.code(),
                }),
                Err(err) => Err(BuildFailure {
                    message: format!("failed to wait for build process: {err}"),
                    exit_code: None,
                }),
            };
            debug!(success = outcome.is_ok(), "build finished");
            completion.complete(outcome);
        });

        Ok(GradleHandle::new(
            stdout,
            stderr,
            signal,
            Some(Arc::clone(&self.runtime)),
        ))
    }
}

fn build_runtime() -> Result<Runtime, TestKitError> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("gradle-testkit")
        .enable_all()
        .build()
        .map_err(|source| TestKitError::Runtime { source })
}

async fn pump(mut reader: impl AsyncReadExt + Unpin, buffer: OutputBuffer) {
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buffer.append(&chunk[..n]),
        }
    }
}
