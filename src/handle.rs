//! The asynchronous build handle.
//!
//! A [`GradleHandle`] wraps one in-flight build invocation. The backend owns
//! the threads that run the build and pump its output; the handle owns the
//! buffers and the one-shot completion signal. The caller only ever suspends
//! inside [`GradleHandle::wait_for_finish`]; every other operation is
//! non-blocking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use tokio::runtime::Runtime;

use crate::buffer::OutputBuffer;
use crate::error::{BuildFailure, TestKitError};
use crate::result::ExecutionResult;

/// Terminal state of an invocation: success or the backend's failure.
pub(crate) type BuildOutcome = Result<(), BuildFailure>;

/// One-shot, broadcast-once completion latch.
///
/// Set exactly once by the backend's completion callback; awaited by any
/// number of waiters. A waiter arriving after completion returns immediately.
/// The outcome slot and the fast-path flag are updated under the same lock as
/// the notification, so the flag flip and the wake-up are atomic with respect
/// to each other.
#[derive(Debug, Default)]
pub(crate) struct CompletionSignal {
    outcome: Mutex<Option<BuildOutcome>>,
    finished: Condvar,
    done: AtomicBool,
}

impl CompletionSignal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Deliver the terminal state. Later calls are ignored: the status
    /// transitions exactly once, from running to exactly one terminal state.
    pub(crate) fn complete(&self, outcome: BuildOutcome) {
        let mut slot = match self.outcome.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if slot.is_none() {
            *slot = Some(outcome);
            self.done.store(true, Ordering::Release);
            self.finished.notify_all();
        }
    }

    /// Cheap non-blocking check, safe from any thread.
    pub(crate) fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Block until the terminal state has been delivered.
    pub(crate) fn wait(&self) -> Result<BuildOutcome, TestKitError> {
        let mut slot = self.outcome.lock().map_err(interrupted)?;
        loop {
            if let Some(outcome) = slot.as_ref() {
                return Ok(outcome.clone());
            }
            slot = self.finished.wait(slot).map_err(interrupted)?;
        }
    }

    /// Block until the terminal state has been delivered or the timeout
    /// elapses. Returns `None` on timeout.
    pub(crate) fn wait_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Option<BuildOutcome>, TestKitError> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.outcome.lock().map_err(interrupted)?;
        loop {
            if let Some(outcome) = slot.as_ref() {
                return Ok(Some(outcome.clone()));
            }
            let Some(remaining) = deadline.checked_duration_since(Instant::now()).filter(|d| !d.is_zero())
            else {
                return Ok(None);
            };
            let (guard, _timed_out) = self
                .finished
                .wait_timeout(slot, remaining)
                .map_err(interrupted)?;
            slot = guard;
        }
    }
}

fn interrupted<E: std::fmt::Display>(err: E) -> TestKitError {
    TestKitError::WaitInterrupted {
        reason: err.to_string(),
    }
}

/// Handle for one in-flight or completed build invocation.
///
/// Created the instant the invocation is submitted; there is no separate
/// start call. The handle is mutated only by the backend's single completion
/// callback, so all accessors take `&self` and are safe to call from any
/// thread at any time.
///
/// The submitted invocation cannot be cancelled and
/// [`wait_for_finish`](Self::wait_for_finish) has no timeout; use
/// [`wait_for_finish_timeout`](Self::wait_for_finish_timeout) when a bounded
/// wait is required.
#[derive(Debug)]
pub struct GradleHandle {
    stdout: OutputBuffer,
    stderr: OutputBuffer,
    signal: Arc<CompletionSignal>,
    // Keeps the backend's pump and completion tasks alive even if the
    // factory that submitted the invocation is dropped first.
    _runtime: Option<Arc<Runtime>>,
}

impl GradleHandle {
    pub(crate) fn new(
        stdout: OutputBuffer,
        stderr: OutputBuffer,
        signal: Arc<CompletionSignal>,
        runtime: Option<Arc<Runtime>>,
    ) -> Self {
        Self {
            stdout,
            stderr,
            signal,
            _runtime: runtime,
        }
    }

    /// Current contents of the build's stdout, decoded as UTF-8 (lossy).
    ///
    /// Safe to call while the build is still running; the returned value is a
    /// partial snapshot and must not be assumed stable until the handle has
    /// finished.
    #[must_use]
    pub fn standard_output(&self) -> String {
        self.stdout.to_text()
    }

    /// Current contents of the build's stderr, decoded as UTF-8 (lossy).
    ///
    /// Same snapshot semantics as [`standard_output`](Self::standard_output).
    #[must_use]
    pub fn standard_error(&self) -> String {
        self.stderr.to_text()
    }

    /// `true` until the completion callback has fired, `false` thereafter.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.signal.is_done()
    }

    /// Block until the build finishes, then return its captured output or
    /// re-raise the captured failure.
    ///
    /// All output the build produced before completion is guaranteed visible
    /// in the returned result. Blocks indefinitely; the invocation cannot be
    /// cancelled once submitted.
    ///
    /// # Errors
    ///
    /// - [`TestKitError::Build`] if the build reported failure. The failure
    ///   carries the backend's diagnostic message unmodified; output captured
    ///   up to the failure point remains readable via the live accessors.
    /// - [`TestKitError::WaitInterrupted`] if the wait could not complete.
    pub fn wait_for_finish(&self) -> Result<ExecutionResult, TestKitError> {
        self.collect(self.signal.wait()?)
    }

    /// Like [`wait_for_finish`](Self::wait_for_finish) but gives up after
    /// `timeout`. The build itself keeps running; only the wait is bounded.
    ///
    /// # Errors
    ///
    /// [`TestKitError::WaitTimeout`] if the build did not finish in time, in
    /// addition to the errors of [`wait_for_finish`](Self::wait_for_finish).
    pub fn wait_for_finish_timeout(
        &self,
        timeout: Duration,
    ) -> Result<ExecutionResult, TestKitError> {
        match self.signal.wait_timeout(timeout)? {
            Some(outcome) => self.collect(outcome),
            None => Err(TestKitError::WaitTimeout {
                seconds: timeout.as_secs(),
            }),
        }
    }

    fn collect(&self, outcome: BuildOutcome) -> Result<ExecutionResult, TestKitError> {
        match outcome {
            Ok(()) => Ok(ExecutionResult::new(
                self.standard_output(),
                self.standard_error(),
            )),
            Err(failure) => Err(TestKitError::Build(failure)),
        }
    }
}
