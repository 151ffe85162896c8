//! Functional test harness for Gradle builds.
//!
//! Launches a Gradle build against a project directory, injects an auxiliary
//! classpath into the invocation via a generated init script, and exposes the
//! invocation's lifecycle plus captured output to the calling test.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gradle_testkit::create;
//!
//! # fn main() -> Result<(), gradle_testkit::TestKitError> {
//! let runner = create("/tmp/testkit-home")?;
//! let handle = runner.start("path/to/project".as_ref(), &["build".to_string()])?;
//! let result = handle.wait_for_finish()?;
//! assert!(result.standard_output().contains("BUILD SUCCESSFUL"));
//! # Ok(())
//! # }
//! ```
//!
//! # Sync vs Async
//!
//! Public APIs are synchronous and manage their own async runtime internally.
//! Tokio is an implementation detail not exposed to library consumers.

pub mod buffer;
pub mod classpath;
pub mod error;
pub mod factory;
pub mod fixture;
pub mod handle;
pub mod init_script;
pub mod result;
pub mod runner;
pub mod tooling;

pub use buffer::OutputBuffer;
pub use classpath::ClasspathInjectingGradleHandleFactory;
pub use error::{BuildFailure, TestKitError};
pub use factory::GradleHandleFactory;
pub use fixture::TemporaryFixture;
pub use handle::GradleHandle;
pub use result::ExecutionResult;
pub use runner::{create, create_with_classpath, GradleRunner};
pub use tooling::ToolingApiGradleHandleFactory;
