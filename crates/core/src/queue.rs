//! Action queue - ordered hand-off from the simulation to its consumer
//!
//! The engine pushes one [`ActionGroup`] per simulation step. Subscribers are
//! notified synchronously after every non-empty push; they must not call back
//! into the engine (use them to set a flag or send on a channel, then drain the
//! queue from the consumer's own loop).

use std::collections::VecDeque;
use std::fmt;

use crate::types::ActionGroup;

/// Notification hook fired after a group is enqueued.
pub type Subscriber = Box<dyn FnMut() + Send>;

#[derive(Default)]
pub struct ActionQueue {
    groups: VecDeque<ActionGroup>,
    subscribers: Vec<Subscriber>,
    /// Total groups ever enqueued.
    pushed: u64,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a group and notify subscribers. Empty groups are dropped.
    ///
    /// Returns whether the group was enqueued.
    pub fn push(&mut self, group: ActionGroup) -> bool {
        if group.is_empty() {
            return false;
        }
        self.groups.push_back(group);
        self.pushed += 1;
        for notify in &mut self.subscribers {
            notify();
        }
        true
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    pub fn pending_group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn pushed_total(&self) -> u64 {
        self.pushed
    }

    pub fn peek(&self) -> Option<&ActionGroup> {
        self.groups.front()
    }

    pub fn pop_group(&mut self) -> Option<ActionGroup> {
        self.groups.pop_front()
    }

    /// Remove and return the oldest group.
    ///
    /// # Panics
    ///
    /// Panics when the queue is empty. Check [`pending_group_count`](Self::pending_group_count)
    /// first or use [`pop_group`](Self::pop_group).
    pub fn take_group(&mut self) -> ActionGroup {
        match self.groups.pop_front() {
            Some(group) => group,
            None => panic!("take_group called on an empty action queue"),
        }
    }

    /// Remove every pending group, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = ActionGroup> + '_ {
        self.groups.drain(..)
    }
}

impl fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionQueue")
            .field("groups", &self.groups)
            .field("subscribers", &self.subscribers.len())
            .field("pushed", &self.pushed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, Coord};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn group(n: usize) -> ActionGroup {
        (0..n)
            .map(|i| Action::generate(1, Coord::new(i as i32, 0)))
            .collect()
    }

    #[test]
    fn fifo_order() {
        let mut q = ActionQueue::new();
        q.push(group(1));
        q.push(group(2));
        assert_eq!(q.pending_group_count(), 2);
        assert_eq!(q.take_group().len(), 1);
        assert_eq!(q.take_group().len(), 2);
        assert!(q.pop_group().is_none());
    }

    #[test]
    fn subscribers_fire_only_for_non_empty_groups() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut q = ActionQueue::new();
        for _ in 0..2 {
            let hits = hits.clone();
            q.subscribe(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert!(!q.push(ActionGroup::new()));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        assert!(q.push(group(3)));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(q.pushed_total(), 1);
    }

    #[test]
    #[should_panic(expected = "empty action queue")]
    fn take_from_empty_queue_panics() {
        let mut q = ActionQueue::new();
        let _ = q.take_group();
    }

    #[test]
    fn drain_empties_in_order() {
        let mut q = ActionQueue::new();
        q.push(group(1));
        q.push(group(2));
        let sizes: Vec<_> = q.drain().map(|g| g.len()).collect();
        assert_eq!(sizes, vec![1, 2]);
        assert!(q.is_empty());
    }
}
