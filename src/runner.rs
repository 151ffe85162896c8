//! Runner facade and composition entry points.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::classpath::ClasspathInjectingGradleHandleFactory;
use crate::error::TestKitError;
use crate::factory::GradleHandleFactory;
use crate::handle::GradleHandle;
use crate::tooling::ToolingApiGradleHandleFactory;

/// Environment variable holding the classpath entries to inject, joined with
/// the platform path separator. Read by [`create`].
pub const CLASSPATH_ENV: &str = "GRADLE_TESTKIT_CLASSPATH";

/// Facade over the composed factory chain.
///
/// Holds no state beyond the factory; start as many builds as needed, each
/// returning its own independent handle.
pub struct GradleRunner {
    factory: Arc<dyn GradleHandleFactory>,
}

impl GradleRunner {
    #[must_use]
    pub fn new(factory: Arc<dyn GradleHandleFactory>) -> Self {
        Self { factory }
    }

    /// Submit a build against `directory` with the given arguments and
    /// return its handle without waiting for completion.
    ///
    /// # Errors
    ///
    /// Synchronous setup errors only; build failures are reported through
    /// the handle.
    pub fn start(
        &self,
        directory: &Path,
        arguments: &[String],
    ) -> Result<GradleHandle, TestKitError> {
        self.factory.start(directory, arguments)
    }
}

/// Compose a runner that injects the classpath named by [`CLASSPATH_ENV`].
///
/// `user_home` overrides the `user.home` system property inside the build,
/// isolating it from the real home directory. When the environment variable
/// is unset, no entries are injected (the init script still carries the home
/// override).
///
/// # Errors
///
/// - [`TestKitError::ClasspathEntry`] if an entry from the environment does
///   not resolve to a local file.
/// - [`TestKitError::Runtime`] if the backend runtime cannot be created.
pub fn create(user_home: impl Into<PathBuf>) -> Result<GradleRunner, TestKitError> {
    create_with_classpath(user_home, classpath_from_env())
}

/// Compose a runner injecting an explicit classpath entry list.
///
/// # Errors
///
/// Same as [`create`].
pub fn create_with_classpath(
    user_home: impl Into<PathBuf>,
    classpath: impl IntoIterator<Item = PathBuf>,
) -> Result<GradleRunner, TestKitError> {
    let tooling = ToolingApiGradleHandleFactory::new()?;
    let injecting =
        ClasspathInjectingGradleHandleFactory::new(Arc::new(tooling), classpath, user_home)?;
    Ok(GradleRunner::new(Arc::new(injecting)))
}

fn classpath_from_env() -> Vec<PathBuf> {
    match env::var_os(CLASSPATH_ENV) {
        Some(joined) => env::split_paths(&joined).collect(),
        None => {
            warn!("{CLASSPATH_ENV} is not set; no classpath entries will be injected");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_create_with_empty_classpath() {
        assert!(create_with_classpath("/tmp/testkit-home", Vec::new()).is_ok());
    }

    #[test]
    fn test_create_with_resolvable_entries() {
        let dir = TempDir::new().unwrap();
        let jar = dir.path().join("plugin.jar");
        fs::write(&jar, "").unwrap();

        assert!(create_with_classpath("/tmp/testkit-home", vec![jar]).is_ok());
    }

    #[test]
    fn test_create_rejects_missing_entry() {
        let result = create_with_classpath(
            "/tmp/testkit-home",
            vec![PathBuf::from("/no/such/plugin.jar")],
        );
        assert!(matches!(result, Err(TestKitError::ClasspathEntry { .. })));
    }
}
