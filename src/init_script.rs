//! Init-script text generation.
//!
//! The generated script is loaded by Gradle before normal configuration and
//! does three things: override the `user.home` system property, set the
//! ignore flag for the sdkmanager plugin's `ANDROID_HOME` probing (the test
//! cannot control the ambient environment), and append the given classpath
//! entries to every project's buildscript classpath.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::TestKitError;

/// Render the init script for the given classpath entries and home override.
///
/// Purely a function of its inputs. Entries are written as given and should
/// be absolute paths; characters significant in Groovy single-quoted string
/// literals are escaped. An empty entry list yields an empty `files()` block.
#[must_use]
pub fn init_script_text(classpath: &[PathBuf], user_home: &Path) -> String {
    let mut script = String::new();

    script.push_str(&format!(
        "System.setProperty('user.home', '{}')\n",
        escape_groovy_literal(&user_home.to_string_lossy())
    ));

    // The environment of the spawned build is inherited from the test run,
    // so tell the plugin under test to ignore it.
    script.push_str(
        "System.setProperty('com.jakewharton.sdkmanager.ignore_android_home', 'true')\n",
    );

    script.push_str("allprojects {\n");
    script.push_str("  buildscript {\n");
    script.push_str("    dependencies {\n");
    script.push_str("      classpath files(\n");
    for (index, entry) in classpath.iter().enumerate() {
        script.push_str(&format!(
            "        '{}'",
            escape_groovy_literal(&entry.to_string_lossy())
        ));
        if index + 1 != classpath.len() {
            script.push(',');
        }
        script.push('\n');
    }
    if classpath.is_empty() {
        script.push('\n');
    }
    script.push_str("      )\n");
    script.push_str("    }\n");
    script.push_str("  }\n");
    script.push_str("}\n");

    script
}

/// Write the init script to `path`, all-or-nothing.
///
/// The script is written to a temporary file in the target directory and
/// atomically renamed into place, so no partial file is left behind on any
/// failure path.
///
/// # Errors
///
/// [`TestKitError::InitScript`] on any I/O failure.
pub fn write_init_script(
    path: &Path,
    classpath: &[PathBuf],
    user_home: &Path,
) -> Result<(), TestKitError> {
    let init_script = |source| TestKitError::InitScript {
        path: path.to_path_buf(),
        source,
    };

    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(directory).map_err(init_script)?;
    file.write_all(init_script_text(classpath, user_home).as_bytes())
        .map_err(init_script)?;
    file.as_file().sync_all().map_err(init_script)?;
    file.persist(path)
        .map_err(|err| init_script(err.error))?;

    Ok(())
}

/// Escape for a Groovy single-quoted string literal.
fn escape_groovy_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
