//! Thread-safe growable output sink.

use std::sync::{Arc, Mutex, MutexGuard};

/// Append-only byte buffer shared between the backend's I/O-pumping tasks and
/// the caller's read-side accessors.
///
/// Appends are only performed by the backend while the build runs; readers see
/// either the state before an append or the state after it, never a torn
/// write. Cheap to clone (the clones share one underlying buffer).
///
/// Output grows without bound for the lifetime of the invocation. That is
/// acceptable at test scale; callers running very chatty builds should expect
/// memory usage proportional to the build log.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of output. Backend use only.
    pub(crate) fn append(&self, chunk: &[u8]) {
        self.lock().extend_from_slice(chunk);
    }

    /// Snapshot of the current contents, decoded as UTF-8.
    ///
    /// Invalid sequences are replaced with U+FFFD. While the build is still
    /// running this is a partial snapshot and may lag behind the child's
    /// actual output.
    #[must_use]
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Number of bytes captured so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the guard only interrupts a single append or
    // read; the bytes already in the buffer are still well-formed, so poison
    // recovery is safe here.
    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        match self.bytes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
