//! Timer primitives on a simulated millisecond clock.
//!
//! Nothing here sleeps. Owners advance their own `now` and ask which timers
//! are due, which keeps every simulation step deterministic under test.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A fixed-period repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    period_ms: i64,
    next_due_ms: i64,
}

impl Cadence {
    /// First firing is one full period after `now_ms`.
    pub fn starting_at(period_ms: i64, now_ms: i64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due_ms: now_ms.saturating_add(period_ms),
        }
    }

    pub fn period_ms(&self) -> i64 {
        self.period_ms
    }

    pub fn next_due_ms(&self) -> i64 {
        self.next_due_ms
    }

    pub fn is_due(&self, now_ms: i64) -> bool {
        now_ms >= self.next_due_ms
    }

    /// Consume one firing and return the time it was due at.
    pub fn fire(&mut self) -> i64 {
        let due = self.next_due_ms;
        self.next_due_ms = self.next_due_ms.saturating_add(self.period_ms);
        due
    }

    pub fn restart(&mut self, now_ms: i64) {
        self.next_due_ms = now_ms.saturating_add(self.period_ms);
    }
}

/// Min-heap of deadlines. Entries with equal deadlines pop in insertion order.
#[derive(Debug, Clone)]
pub struct ExpiryQueue<K: Ord> {
    heap: BinaryHeap<Reverse<(i64, u64, K)>>,
    next_seq: u64,
}

impl<K: Ord> Default for ExpiryQueue<K> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<K: Ord> ExpiryQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline_ms: i64, key: K) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse((deadline_ms, seq, key)));
    }

    pub fn next_deadline(&self) -> Option<i64> {
        self.heap.peek().map(|Reverse((deadline, _, _))| *deadline)
    }

    /// Pop the earliest entry if its deadline is at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: i64) -> Option<(i64, K)> {
        if self.next_deadline()? > now_ms {
            return None;
        }
        self.heap
            .pop()
            .map(|Reverse((deadline, _, key))| (deadline, key))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_first_fire_is_one_period_out() {
        let cadence = Cadence::starting_at(3_000, 10_000);
        assert!(!cadence.is_due(12_999));
        assert!(cadence.is_due(13_000));
    }

    #[test]
    fn test_cadence_fire_advances_by_period() {
        let mut cadence = Cadence::starting_at(1_000, 0);
        assert_eq!(cadence.fire(), 1_000);
        assert_eq!(cadence.fire(), 2_000);
        assert_eq!(cadence.next_due_ms(), 3_000);
    }

    #[test]
    fn test_cadence_restart_discards_progress() {
        let mut cadence = Cadence::starting_at(1_000, 0);
        cadence.restart(750);
        assert_eq!(cadence.next_due_ms(), 1_750);
    }

    #[test]
    fn test_cadence_zero_period_clamped() {
        let cadence = Cadence::starting_at(0, 5);
        assert_eq!(cadence.period_ms(), 1);
    }

    #[test]
    fn test_expiry_queue_pops_in_deadline_order() {
        let mut queue = ExpiryQueue::new();
        queue.schedule(300, "c");
        queue.schedule(100, "a");
        queue.schedule(200, "b");

        assert_eq!(queue.pop_due(1_000), Some((100, "a")));
        assert_eq!(queue.pop_due(1_000), Some((200, "b")));
        assert_eq!(queue.pop_due(1_000), Some((300, "c")));
        assert_eq!(queue.pop_due(1_000), None);
    }

    #[test]
    fn test_expiry_queue_holds_entries_not_yet_due() {
        let mut queue = ExpiryQueue::new();
        queue.schedule(5_000, 1u32);
        assert_eq!(queue.pop_due(4_999), None);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_due(5_000), Some((5_000, 1)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_expiry_queue_ties_keep_insertion_order() {
        let mut queue = ExpiryQueue::new();
        queue.schedule(10, 9u32);
        queue.schedule(10, 1u32);
        assert_eq!(queue.pop_due(10), Some((10, 9)));
        assert_eq!(queue.pop_due(10), Some((10, 1)));
    }
}
