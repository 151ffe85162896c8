//! Captured output of a finished build.

/// Immutable snapshot of a successful build's captured output.
///
/// Produced only by [`GradleHandle::wait_for_finish`](crate::GradleHandle::wait_for_finish)
/// after the completion callback has fired, so it always contains every byte
/// the build wrote before finishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    standard_output: String,
    standard_error: String,
}

impl ExecutionResult {
    #[must_use]
    pub fn new(standard_output: String, standard_error: String) -> Self {
        Self {
            standard_output,
            standard_error,
        }
    }

    /// Captured stdout of the build, decoded as UTF-8 (lossy).
    #[must_use]
    pub fn standard_output(&self) -> &str {
        &self.standard_output
    }

    /// Captured stderr of the build, decoded as UTF-8 (lossy).
    #[must_use]
    pub fn standard_error(&self) -> &str {
        &self.standard_error
    }
}
