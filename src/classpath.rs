//! Classpath resolution and the injecting factory decorator.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::TestKitError;
use crate::factory::GradleHandleFactory;
use crate::handle::GradleHandle;
use crate::init_script::write_init_script;

/// Private state directory created under the invocation directory.
const TEST_KIT_DIR: &str = ".gradle-test-kit";
/// Init script file name inside [`TEST_KIT_DIR`].
const INIT_SCRIPT: &str = "init.gradle";
/// Gradle flag that loads an init script before configuration.
const INIT_SCRIPT_FLAG: &str = "-I";

/// Resolve classpath entries to canonical local paths.
///
/// Every entry must resolve to an existing file or directory; an entry that
/// does not is a hard error here, before any build starts. Order is
/// preserved; duplicates are allowed.
///
/// # Errors
///
/// [`TestKitError::ClasspathEntry`] naming the first unresolvable entry.
pub fn resolve_classpath(
    entries: impl IntoIterator<Item = PathBuf>,
) -> Result<Vec<PathBuf>, TestKitError> {
    entries
        .into_iter()
        .map(|entry| {
            entry
                .canonicalize()
                .map_err(|_| TestKitError::ClasspathEntry { path: entry.clone() })
        })
        .collect()
}

/// Decorator that injects extra classpath entries into every build it starts.
///
/// Before delegating, it writes the generated init script under the target
/// directory's private `.gradle-test-kit/` folder and prepends
/// `-I <init script>` to the argument list; the caller's arguments follow
/// unchanged in order. Pure decoration; all concurrency lives in the inner
/// factory.
pub struct ClasspathInjectingGradleHandleFactory {
    delegate: Arc<dyn GradleHandleFactory>,
    classpath: Vec<PathBuf>,
    user_home: PathBuf,
}

impl ClasspathInjectingGradleHandleFactory {
    /// # Errors
    ///
    /// [`TestKitError::ClasspathEntry`] if an entry does not resolve to a
    /// local file; raised here, not at [`start`](GradleHandleFactory::start)
    /// time.
    pub fn new(
        delegate: Arc<dyn GradleHandleFactory>,
        classpath: impl IntoIterator<Item = PathBuf>,
        user_home: impl Into<PathBuf>,
    ) -> Result<Self, TestKitError> {
        Ok(Self {
            delegate,
            classpath: resolve_classpath(classpath)?,
            user_home: user_home.into(),
        })
    }

    /// The resolved classpath this factory injects.
    #[must_use]
    pub fn classpath(&self) -> &[PathBuf] {
        &self.classpath
    }
}

impl GradleHandleFactory for ClasspathInjectingGradleHandleFactory {
    fn start(
        &self,
        directory: &Path,
        arguments: &[String],
    ) -> Result<GradleHandle, TestKitError> {
        let test_kit_dir = directory.join(TEST_KIT_DIR);
        fs::create_dir_all(&test_kit_dir).map_err(|source| TestKitError::InitScript {
            path: test_kit_dir.clone(),
            source,
        })?;

        let script_path = test_kit_dir.join(INIT_SCRIPT);
        write_init_script(&script_path, &self.classpath, &self.user_home)?;

        // The invocation directory may be relative; Gradle gets the script's
        // absolute path so the flag is independent of the child's cwd.
        let script_path =
            std::path::absolute(&script_path).map_err(|source| TestKitError::InitScript {
                path: script_path.clone(),
                source,
            })?;
        debug!(script = %script_path.display(), entries = self.classpath.len(), "wrote init script");

        let mut amended = Vec::with_capacity(arguments.len() + 2);
        amended.push(INIT_SCRIPT_FLAG.to_string());
        amended.push(script_path.to_string_lossy().into_owned());
        amended.extend_from_slice(arguments);

        self.delegate.start(directory, &amended)
    }
}
