//! Cancellable delayed tasks on a virtual clock.
//!
//! The page runs single-threaded: work happens only in response to events, and
//! the only suspension points are delayed actions (element reveals, debounced
//! search). A [`Scheduler`] holds those actions keyed by a caller-chosen key.
//! Scheduling a key that already has a pending task replaces it
//! (cancel-before-reschedule), so a stale action can never fire after a newer
//! one for the same key was requested.
//!
//! Time only moves when the owner calls [`Scheduler::advance`], which returns
//! the tasks that came due in firing order: earlier due time first, and
//! schedule order among tasks due at the same instant.

use std::collections::BTreeMap;

/// Identity of one scheduled task. Unique for the scheduler's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A task that came due during [`Scheduler::advance`].
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<K, A> {
    pub id: TaskId,
    pub key: K,
    pub action: A,
    /// Virtual time the task was due at.
    pub due_ms: u64,
}

#[derive(Debug)]
struct Pending<K, A> {
    key: K,
    action: A,
}

#[derive(Debug)]
pub struct Scheduler<K, A> {
    now_ms: u64,
    next_id: u64,
    /// Ordered by (due time, task id); task ids grow with schedule order.
    queue: BTreeMap<(u64, TaskId), Pending<K, A>>,
    by_key: BTreeMap<K, (u64, TaskId)>,
}

impl<K: Ord + Clone, A> Default for Scheduler<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, A> Scheduler<K, A> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            queue: BTreeMap::new(),
            by_key: BTreeMap::new(),
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `action` to fire `delay_ms` from now under `key`.
    ///
    /// Any task already pending for `key` is cancelled first.
    pub fn schedule(&mut self, key: K, delay_ms: u64, action: A) -> TaskId {
        self.cancel(&key);
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.by_key.insert(key.clone(), (due, id));
        self.queue.insert((due, id), Pending { key, action });
        id
    }

    /// Cancel the pending task for `key`. Returns whether one was pending.
    pub fn cancel(&mut self, key: &K) -> bool {
        match self.by_key.remove(key) {
            Some(slot) => {
                self.queue.remove(&slot);
                true
            }
            None => false,
        }
    }

    /// Cancel every pending task whose key matches `pred`. Returns the count.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) -> usize {
        let doomed: Vec<K> = self.by_key.keys().filter(|k| pred(k)).cloned().collect();
        for key in &doomed {
            self.cancel(key);
        }
        doomed.len()
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.by_key.contains_key(key)
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<u64> {
        self.queue.first_key_value().map(|((due, _), _)| *due)
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// Drop every pending task without firing it. Returns the count.
    pub fn clear(&mut self) -> usize {
        let n = self.queue.len();
        self.queue.clear();
        self.by_key.clear();
        n
    }

    /// Move the clock forward by `ms` and return every task that came due.
    pub fn advance(&mut self, ms: u64) -> Vec<Fired<K, A>> {
        let target = self.now_ms.saturating_add(ms);
        let mut fired = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            let (due, id) = *entry.key();
            if due > target {
                break;
            }
            let pending = entry.remove();
            self.by_key.remove(&pending.key);
            self.now_ms = due;
            fired.push(Fired {
                id,
                key: pending.key,
                action: pending.action,
                due_ms: due,
            });
        }
        self.now_ms = target;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order() {
        let mut s: Scheduler<&str, u32> = Scheduler::new();
        s.schedule("b", 200, 2);
        s.schedule("a", 100, 1);
        s.schedule("c", 300, 3);

        let fired: Vec<u32> = s.advance(250).into_iter().map(|f| f.action).collect();
        assert_eq!(fired, vec![1, 2]);
        assert_eq!(s.now(), 250);
        assert_eq!(s.pending_len(), 1);

        let fired = s.advance(50);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].due_ms, 300);
    }

    #[test]
    fn next_due_tracks_earliest_pending() {
        let mut s: Scheduler<&str, ()> = Scheduler::new();
        assert_eq!(s.next_due(), None);
        s.schedule("late", 500, ());
        s.schedule("soon", 120, ());
        assert_eq!(s.next_due(), Some(120));
        s.cancel(&"soon");
        assert_eq!(s.next_due(), Some(500));
        s.advance(500);
        assert_eq!(s.next_due(), None);
    }

    #[test]
    fn same_due_time_fires_in_schedule_order() {
        let mut s: Scheduler<u32, ()> = Scheduler::new();
        for key in [5, 3, 9] {
            s.schedule(key, 100, ());
        }
        let keys: Vec<u32> = s.advance(100).into_iter().map(|f| f.key).collect();
        assert_eq!(keys, vec![5, 3, 9]);
    }

    #[test]
    fn rescheduling_a_key_replaces_pending_task() {
        let mut s: Scheduler<&str, &str> = Scheduler::new();
        s.schedule("search", 300, "cau");
        s.advance(100);
        s.schedule("search", 300, "causal");

        assert_eq!(s.pending_len(), 1);
        // The first task would have been due at 300
        assert!(s.advance(250).is_empty());
        let fired = s.advance(50);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].action, "causal");
        assert_eq!(fired[0].due_ms, 400);
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut s: Scheduler<&str, ()> = Scheduler::new();
        s.schedule("x", 10, ());
        assert!(s.cancel(&"x"));
        assert!(!s.cancel(&"x"));
        assert!(s.advance(100).is_empty());
    }

    #[test]
    fn cancel_where_filters_by_key() {
        let mut s: Scheduler<(&str, u32), ()> = Scheduler::new();
        s.schedule(("home", 1), 10, ());
        s.schedule(("home", 2), 20, ());
        s.schedule(("team", 1), 30, ());

        assert_eq!(s.cancel_where(|(section, _)| *section == "home"), 2);
        assert!(s.is_pending(&("team", 1)));
        assert!(!s.is_pending(&("home", 1)));
    }

    #[test]
    fn clear_drops_everything() {
        let mut s: Scheduler<u8, ()> = Scheduler::new();
        s.schedule(1, 5, ());
        s.schedule(2, 5, ());
        assert_eq!(s.clear(), 2);
        assert!(s.advance(10).is_empty());
    }

    #[test]
    fn zero_delay_fires_on_zero_advance() {
        let mut s: Scheduler<u8, ()> = Scheduler::new();
        s.schedule(1, 0, ());
        assert_eq!(s.advance(0).len(), 1);
    }
}
