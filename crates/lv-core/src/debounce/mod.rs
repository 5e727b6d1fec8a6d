//! Cancellable delayed execution
//!
//! A burst of input events (keystrokes in the search box) collapses into a
//! single recomputation that runs once the input has been quiet for a fixed
//! window. The only primitive is cancel-and-reschedule on a tokio timer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Quiet window used when none is configured
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(100);

/// Handle to a single scheduled firing
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
    /// Set exactly once, by whichever of the timer or `cancel` gets there first
    claimed: Arc<AtomicBool>,
}

impl ScheduledTask {
    /// Cancel the firing if it has not started yet.
    ///
    /// Returns whether the firing was prevented; `false` once the action has started.
    pub fn cancel(&self) -> bool {
        let prevented = !self.claimed.swap(true, Ordering::AcqRel);
        self.handle.abort();
        prevented
    }

    /// Whether the action is still waiting for its delay
    pub fn is_pending(&self) -> bool {
        !self.claimed.load(Ordering::Acquire)
    }

    /// Whether the task already ran (or was cancelled)
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Run `action` once after `delay`, unless the returned handle is cancelled first.
///
/// Must be called from within a tokio runtime.
pub fn schedule<F>(action: F, delay: Duration) -> ScheduledTask
where
    F: FnOnce() + Send + 'static,
{
    let claimed = Arc::new(AtomicBool::new(false));
    let guard = claimed.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if !guard.swap(true, Ordering::AcqRel) {
            action();
        }
    });
    ScheduledTask { handle, claimed }
}

type Action = Box<dyn FnMut() + Send>;

/// Coalesces repeated calls into one delayed firing of an action
pub struct Debouncer {
    action: Arc<Mutex<Action>>,
    delay: Duration,
    pending: Mutex<Option<ScheduledTask>>,
}

impl Debouncer {
    /// Create a debouncer around `action` with the given quiet window
    pub fn new<F>(delay: Duration, action: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Self {
            action: Arc::new(Mutex::new(Box::new(action))),
            delay,
            pending: Mutex::new(None),
        }
    }

    /// The quiet window
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Register an input event: cancels any pending firing and schedules a new one
    pub fn call(&self) {
        let mut pending = self.pending.lock();
        if let Some(task) = pending.take() {
            task.cancel();
        }

        let action = self.action.clone();
        *pending = Some(schedule(
            move || {
                // Serializes firings so two never overlap.
                let mut action = action.lock();
                (*action)();
            },
            self.delay,
        ));
        tracing::trace!("debounce rescheduled in {:?}", self.delay);
    }

    /// Whether a firing is scheduled and has not happened yet
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .map(ScheduledTask::is_pending)
            .unwrap_or(false)
    }

    /// Drop the pending firing, if any. Returns whether one was pending.
    ///
    /// A firing whose action has already started is not pending and runs to completion.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(task) => task.cancel(),
            None => false,
        }
    }

    /// Fire immediately if a firing is pending. Returns whether the action ran.
    ///
    /// Each `call` yields at most one firing, whether from the timer or from here.
    pub fn flush(&self) -> bool {
        if !self.cancel() {
            return false;
        }
        let mut action = self.action.lock();
        (*action)();
        true
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(task) = self.pending.get_mut().take() {
            task.cancel();
        }
    }
}
