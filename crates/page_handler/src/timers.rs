//! Timer queue driven by the page's virtual clock.
//!
//! Timers are ordered by due time and then by scheduling order, so two timers
//! due at the same instant fire in the order they were set, matching the
//! browser's `setTimeout` ordering.

use core::time::Duration;
use std::collections::BTreeMap;

use html::NodeId;

use crate::component::ComponentId;

/// Handle returned by `set_timeout`, usable with `clear_timeout`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Work performed when a timer fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerTask {
    /// Remove and release a node if it is still attached (banner auto-dismiss).
    RemoveNode(NodeId),
    /// Call back into the component that set the timer with its own token.
    Component { owner: ComponentId, token: u64 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timer {
    pub id: TimerId,
    pub due: Duration,
    pub task: TimerTask,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    pending: BTreeMap<(Duration, TimerId), TimerTask>,
    next_id: u64,
    /// Number of timers that have fired since the queue was created.
    fired: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` at the absolute virtual time `due`.
    pub fn schedule(&mut self, due: Duration, task: TimerTask) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.pending.insert((due, id), task);
        id
    }

    /// Cancel a pending timer. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.pending.keys().find(|(_, pending)| *pending == id).copied();
        key.is_some_and(|key| self.pending.remove(&key).is_some())
    }

    /// Pop the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Timer> {
        let (&(due, id), _) = self.pending.first_key_value()?;
        if due > now {
            return None;
        }
        let task = self.pending.remove(&(due, id))?;
        self.fired = self.fired.saturating_add(1);
        Some(Timer { id, due, task })
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.first_key_value().map(|(&(due, _), _)| due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Drop every pending timer without running it. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(token: u64) -> TimerTask {
        TimerTask::Component {
            owner: ComponentId::new(0),
            token,
        }
    }

    #[test]
    fn fires_by_due_time_then_scheduling_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::from_millis(200), token(1));
        queue.schedule(Duration::from_millis(100), token(2));
        queue.schedule(Duration::from_millis(100), token(3));

        let now = Duration::from_millis(250);
        let order: Vec<TimerTask> =
            core::iter::from_fn(|| queue.pop_due(now).map(|timer| timer.task)).collect();
        assert_eq!(order, vec![token(2), token(3), token(1)]);
        assert_eq!(queue.fired(), 3);
    }

    #[test]
    fn nothing_fires_early() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::from_millis(100), token(1));
        assert!(queue.pop_due(Duration::from_millis(99)).is_none());
        assert_eq!(queue.next_due(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn cancel_and_clear() {
        let mut queue = TimerQueue::new();
        let first = queue.schedule(Duration::from_millis(10), token(1));
        queue.schedule(Duration::from_millis(20), token(2));
        assert!(queue.cancel(first));
        assert!(!queue.cancel(first));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.clear(), 1);
        assert!(queue.is_empty());
    }
}
