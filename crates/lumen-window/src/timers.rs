//! Timer APIs
//!
//! setTimeout/clearTimeout against the window's virtual clock.

use std::collections::{BTreeMap, HashMap};

use crate::Window;

/// Handle returned by `set_timeout`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u32);

pub(crate) type TimerCallback = Box<dyn FnOnce(&mut Window)>;

/// Pending timeouts ordered by due time, then creation order
#[derive(Default)]
pub(crate) struct TimerQueue {
    next_id: u32,
    queue: BTreeMap<(u64, TimerId), TimerCallback>,
    due: HashMap<TimerId, u64>,
}

impl TimerQueue {
    /// Add a timeout due at `now + delay_ms`
    pub(crate) fn set_timeout(
        &mut self,
        now: u64,
        delay_ms: u64,
        callback: TimerCallback,
    ) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let due = now.saturating_add(delay_ms);
        self.queue.insert((due, id), callback);
        self.due.insert(id, due);
        id
    }

    /// Clear a timer; false if it already fired or never existed
    pub(crate) fn clear(&mut self, id: TimerId) -> bool {
        match self.due.remove(&id) {
            Some(due) => self.queue.remove(&(due, id)).is_some(),
            None => false,
        }
    }

    /// Due time of the earliest timer
    pub(crate) fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Take the earliest timer if it is due by `now`
    pub(crate) fn pop_due(&mut self, now: u64) -> Option<(TimerId, TimerCallback)> {
        let (&(due, id), _) = self.queue.iter().next()?;
        if due > now {
            return None;
        }
        self.due.remove(&id);
        self.queue.remove(&(due, id)).map(|cb| (id, cb))
    }

    /// Number of pending timers
    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}
