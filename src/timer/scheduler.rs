//! Logical-clock task scheduler.
//!
//! Tasks are scheduled relative to the scheduler's clock and fire when the
//! host advances the clock to or past their deadline. Nothing runs on its
//! own: the engine stays single-threaded and fully deterministic.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::TileId;

/// Handle to a scheduled task, used to cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

impl TimerHandle {
    /// Get the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

/// Deferred work the engine can schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledTask {
    /// Flip a mismatched pair back face-down and reopen input.
    HideMismatch {
        epoch: u64,
        first: TileId,
        second: TileId,
    },
}

/// A pending task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Entry {
    handle: TimerHandle,
    due_ms: u64,
    task: ScheduledTask,
}

/// Cancellable task queue driven by `advance`.
///
/// Entries are kept sorted by `(due_ms, handle)`, so tasks due at the same
/// instant fire in scheduling order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduler {
    now_ms: u64,
    next_handle: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `task` to fire `delay` from now.
    pub fn schedule(&mut self, delay: Duration, task: ScheduledTask) -> TimerHandle {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let due_ms = self.now_ms.saturating_add(delay_ms);

        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;

        let pos = self
            .entries
            .partition_point(|e| (e.due_ms, e.handle.0) <= (due_ms, handle.0));
        self.entries.insert(pos, Entry { handle, due_ms, task });

        tracing::trace!(%handle, due_ms, "scheduled task");
        handle
    }

    /// Cancel a pending task.
    ///
    /// Returns true if the task was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| e.handle == handle) {
            self.entries.remove(pos);
            tracing::trace!(%handle, "cancelled task");
            true
        } else {
            false
        }
    }

    /// Check if a task has neither fired nor been cancelled.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Deadline of a pending task.
    #[must_use]
    pub fn deadline(&self, handle: TimerHandle) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| e.due_ms)
    }

    /// The task behind a pending handle.
    #[must_use]
    pub fn task(&self, handle: TimerHandle) -> Option<ScheduledTask> {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| e.task)
    }

    /// Check the queue order `advance` relies on.
    ///
    /// Entries must be strictly sorted by `(due_ms, handle)` and every live
    /// handle must be below the next one to be issued.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let sorted = self
            .entries
            .windows(2)
            .all(|w| (w[0].due_ms, w[0].handle.0) < (w[1].due_ms, w[1].handle.0));
        sorted && self.entries.iter().all(|e| e.handle.0 < self.next_handle)
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.first().map(|e| e.due_ms)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.entries.len()
    }

    /// Move the clock forward and drain every task now due.
    ///
    /// Tasks are returned in deadline order. A task never fires before its
    /// deadline.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<(TimerHandle, ScheduledTask)> {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.now_ms = self.now_ms.saturating_add(elapsed_ms);

        let due = self.entries.partition_point(|e| e.due_ms <= self.now_ms);
        self.entries
            .drain(..due)
            .map(|e| {
                tracing::trace!(handle = %e.handle, due_ms = e.due_ms, "task fired");
                (e.handle, e.task)
            })
            .collect()
    }
}
