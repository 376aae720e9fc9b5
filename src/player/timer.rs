//! Deferred one-shot callbacks for the screen's event loop
//!
//! The UI loop owns a single [`DeferredQueue`] on a virtual clock. Handlers
//! schedule actions on it and keep the returned [`TimerId`]; the loop calls
//! [`DeferredQueue::advance_to`] and hands every due action back to the
//! screen. Cancellation removes the entry if it is still queued. A caller
//! that raced a cancellation must compare ids before acting.

use std::fmt;
use std::time::Duration;

/// Handle of a scheduled action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Actions the screen defers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Conceal the overlay controls
    HideControls,

    /// Let periodic ticks drive progress again after a scrub
    SettleSeek,
}

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    deadline: Duration,
    action: DeferredAction,
}

/// Queue of pending one-shot actions ordered by deadline
#[derive(Debug, Default)]
pub struct DeferredQueue {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

impl DeferredQueue {
    /// Create an empty queue with the clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `action` to fire `delay` from now
    pub fn schedule(&mut self, delay: Duration, action: DeferredAction) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let deadline = self.now.saturating_add(delay);

        // Keep entries sorted by deadline; equal deadlines fire in scheduling order
        let index = self.entries.partition_point(|e| e.deadline <= deadline);
        self.entries.insert(index, Entry { id, deadline, action });

        log::debug!("Scheduled {:?} as {} at {:?}", action, id, deadline);
        id
    }

    /// Remove a scheduled action. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                let entry = self.entries.remove(index);
                log::debug!("Cancelled {:?} ({})", entry.action, id);
                true
            }
            None => false,
        }
    }

    /// Whether `id` is still queued
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of queued entries for `action`
    pub fn pending_count(&self, action: DeferredAction) -> usize {
        self.entries.iter().filter(|e| e.action == action).count()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deadline of the earliest queued entry
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.first().map(|e| e.deadline)
    }

    /// Move the clock to `now` and drain every entry due by then, earliest first
    ///
    /// The clock never moves backwards.
    pub fn advance_to(&mut self, now: Duration) -> Vec<(TimerId, DeferredAction)> {
        if now > self.now {
            self.now = now;
        }

        let due = self.entries.partition_point(|e| e.deadline <= self.now);
        self.entries
            .drain(..due)
            .map(|e| (e.id, e.action))
            .collect()
    }
}
