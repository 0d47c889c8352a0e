// Copyright (c) 2024 Mike Tsao

use core::cmp::{Ordering, Reverse};
use std::{collections::BinaryHeap, time::Instant};

/// A single-threaded queue of deferred work, ordered by due time.
///
/// Nothing is ever cancelled. A task that becomes irrelevant before it comes
/// due is expected to notice that when it runs (typically by comparing a
/// timestamp it captured with the current state) and do nothing.
#[derive(Debug)]
pub struct Scheduler<T> {
    queue: BinaryHeap<Reverse<Entry<T>>>,
    next_sequence: u64,
}
impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            queue: Default::default(),
            next_sequence: Default::default(),
        }
    }
}
impl<T> Scheduler<T> {
    /// Queues `task` to run at or after `due`.
    pub fn schedule(&mut self, due: Instant, task: T) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(Reverse(Entry {
            due,
            sequence,
            task,
        }));
    }

    /// Removes and returns every task due at `now`, earliest first. Tasks due
    /// at the same instant come out in the order they were scheduled.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let mut due = Vec::default();
        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.due > now {
                break;
            }
            if let Some(Reverse(entry)) = self.queue.pop() {
                due.push(entry.task);
            }
        }
        due
    }

    /// The due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Instant> {
        self.queue.peek().map(|Reverse(entry)| entry.due)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[derive(Debug)]
struct Entry<T> {
    due: Instant,
    sequence: u64,
    task: T,
}
impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.sequence == other.sequence
    }
}
impl<T> Eq for Entry<T> {}
impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then(self.sequence.cmp(&other.sequence))
    }
}
