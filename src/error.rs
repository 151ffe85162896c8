//! Error types for the test harness.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by the build backend's completion callback.
///
/// Carries the backend's own diagnostic message and exit code unmodified.
/// Cloneable so the terminal state can be handed to every waiter.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BuildFailure {
    /// Diagnostic message from the build backend
    pub message: String,
    /// Exit code of the build process (None if terminated by signal)
    pub exit_code: Option<i32>,
}

/// Errors surfaced by the test harness.
///
/// Configuration and I/O errors are raised synchronously before any build is
/// submitted; build failures are captured asynchronously and re-raised from
/// [`GradleHandle::wait_for_finish`](crate::GradleHandle::wait_for_finish).
#[derive(Debug, Error)]
pub enum TestKitError {
    #[error("classpath entry does not resolve to a local file: {path}")]
    ClasspathEntry { path: PathBuf },

    #[error("project directory does not exist or is not a directory: {path}")]
    ProjectDirectory { path: PathBuf },

    #[error("failed to write init script {path}: {source}")]
    InitScript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to launch build process {program:?}: {source}")]
    Spawn {
        program: OsString,
        #[source]
        source: io::Error,
    },

    #[error("failed to set up fixture {path}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create build runtime: {source}")]
    Runtime {
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Build(#[from] BuildFailure),

    #[error("build did not finish within {seconds} seconds")]
    WaitTimeout { seconds: u64 },

    #[error("interrupted while waiting for the build to finish: {reason}")]
    WaitInterrupted { reason: String },
}
