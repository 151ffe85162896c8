//! Temporary fixture setup for functional tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::warn;

use crate::error::TestKitError;

const FOLDER_PROJECT: &str = "project";
const FOLDER_SDK: &str = ".android-sdk";

/// A named fixture copied into a fresh temporary directory.
///
/// The fixture is expected to contain a `project/` subfolder (a ready-to-build
/// Gradle project) and an `.android-sdk/` subfolder; a missing subfolder is
/// logged as a warning, not an error, so fixtures can omit what a test does
/// not need. The temporary tree is deleted when the fixture is dropped.
pub struct TemporaryFixture {
    root: TempDir,
    project: PathBuf,
    sdk: PathBuf,
}

impl TemporaryFixture {
    /// Copy `fixtures_root/name` into a new temporary directory.
    ///
    /// # Errors
    ///
    /// [`TestKitError::Fixture`] if the temporary directory cannot be created
    /// or the fixture contents cannot be copied.
    pub fn create(fixtures_root: &Path, name: &str) -> Result<Self, TestKitError> {
        let from = fixtures_root.join(name);

        if !from.join(FOLDER_PROJECT).exists() {
            warn!("project folder not found for '{name}'");
        }
        if !from.join(FOLDER_SDK).exists() {
            warn!("SDK folder not found for '{name}'");
        }

        let root = TempDir::new().map_err(|source| TestKitError::Fixture {
            path: from.clone(),
            source,
        })?;
        copy_dir_recursive(&from, root.path()).map_err(|source| TestKitError::Fixture {
            path: from,
            source,
        })?;

        let project = root.path().join(FOLDER_PROJECT);
        let sdk = root.path().join(FOLDER_SDK);
        Ok(Self { root, project, sdk })
    }

    /// Root of the temporary copy.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// The copied project directory, ready to hand to
    /// [`GradleRunner::start`](crate::GradleRunner::start).
    #[must_use]
    pub fn project(&self) -> &Path {
        &self.project
    }

    /// The copied SDK directory.
    #[must_use]
    pub fn sdk(&self) -> &Path {
        &self.sdk
    }
}

fn copy_dir_recursive(from: &Path, to: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            fs::create_dir_all(&target)?;
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
