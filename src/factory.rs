//! Handle factory seam.

use std::path::Path;

use crate::error::TestKitError;
use crate::handle::GradleHandle;

/// Capability to submit one build invocation and hand back its handle.
///
/// Two implementations ship with the crate:
/// [`ToolingApiGradleHandleFactory`](crate::ToolingApiGradleHandleFactory)
/// launches the build, and
/// [`ClasspathInjectingGradleHandleFactory`](crate::ClasspathInjectingGradleHandleFactory)
/// decorates another factory with init-script classpath injection.
pub trait GradleHandleFactory: Send + Sync {
    /// Submit a build against `directory` with the given argument list and
    /// return a handle immediately, without waiting for completion.
    ///
    /// Arguments are opaque tokens passed to the build tool in order; the
    /// list may be empty.
    ///
    /// # Errors
    ///
    /// Synchronous setup errors only (directory validation, init-script I/O,
    /// spawn failure). Build failures are reported through the returned
    /// handle's [`wait_for_finish`](crate::GradleHandle::wait_for_finish).
    fn start(&self, directory: &Path, arguments: &[String])
        -> Result<GradleHandle, TestKitError>;
}
