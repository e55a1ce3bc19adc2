//! Timer queue for Enrolla.
//!
//! Provides one-shot timers that model the engine's only asynchronous
//! concern: the simulated submission latency. The host drives the queue from
//! its event loop (or test harness) by calling
//! [`TimerQueue::process_expired`]; nothing here blocks or spawns threads.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};

use crate::error::{Result, TimerError};

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData {
    /// When this timer should fire.
    fire_at: Instant,
    /// Whether this timer is still pending.
    active: bool,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    id: TimerId,
    fire_at: Instant,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_at.cmp(&self.fire_at)
    }
}

/// A queue of pending one-shot timers.
///
/// Timers are started with a duration and fire exactly once when
/// [`process_expired`](Self::process_expired) is called past their deadline.
/// Stopped timers are dropped lazily from the heap.
#[derive(Default)]
pub struct TimerQueue {
    /// All pending timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Priority queue of pending fires (min-heap by fire time).
    queue: BinaryHeap<QueueEntry>,
}

impl TimerQueue {
    /// Create a new, empty timer queue.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// Start a one-shot timer that fires after the specified duration.
    ///
    /// Returns the timer ID, which can be used to stop the timer or to
    /// recognize it among the fired IDs.
    pub fn start(&mut self, duration: Duration) -> TimerId {
        let fire_at = Instant::now() + duration;

        let id = self.timers.insert(TimerData {
            fire_at,
            active: true,
        });
        self.queue.push(QueueEntry { id, fire_at });

        tracing::trace!(target: "enrolla_core::timer", ?id, ?duration, "timer started");
        id
    }

    /// Stop and remove a pending timer.
    ///
    /// Returns an error if the timer is unknown or has already fired.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        if self.timers.remove(id).is_some() {
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId.into())
        }
    }

    /// Check if a timer is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.get(id).is_some_and(|t| t.active)
    }

    /// Get the duration until the next timer fires, if any.
    ///
    /// Returns `None` if there are no pending timers.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        // Drop stopped timers from the front of the heap.
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }

        self.queue
            .peek()
            .map(|entry| entry.fire_at.saturating_duration_since(Instant::now()))
    }

    /// Process all timers that should have fired by now.
    ///
    /// Returns the fired timer IDs in fire order.
    pub fn process_expired(&mut self) -> Vec<TimerId> {
        self.process_expired_at(Instant::now())
    }

    /// Process all timers whose deadline is at or before `now`.
    ///
    /// Tests pass a fabricated `now` to drive the queue deterministically.
    pub fn process_expired_at(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek() {
            if entry.fire_at > now {
                break;
            }

            let entry = self.queue.pop().expect("peeked entry");

            // Skip timers stopped after being queued.
            if self.timers.remove(entry.id).is_none() {
                continue;
            }

            tracing::trace!(target: "enrolla_core::timer", id = ?entry.id, "timer fired");
            fired.push(entry.id);
        }

        fired
    }

    /// Get the number of pending timers.
    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = TimerQueue::new();
        let id = timers.start(Duration::from_millis(100));

        // Not yet expired
        assert!(timers.process_expired_at(Instant::now()).is_empty());
        assert!(timers.is_pending(id));

        let later = Instant::now() + Duration::from_millis(200);
        assert_eq!(timers.process_expired_at(later), vec![id]);
        assert!(!timers.is_pending(id));

        // Does not fire again
        assert!(timers.process_expired_at(later).is_empty());
    }

    #[test]
    fn test_fire_order_is_deadline_order() {
        let mut timers = TimerQueue::new();
        let slow = timers.start(Duration::from_millis(500));
        let fast = timers.start(Duration::from_millis(100));

        let later = Instant::now() + Duration::from_secs(1);
        assert_eq!(timers.process_expired_at(later), vec![fast, slow]);
    }

    #[test]
    fn test_stopped_timer_does_not_fire() {
        let mut timers = TimerQueue::new();
        let id = timers.start(Duration::from_millis(100));
        timers.stop(id).unwrap();

        let later = Instant::now() + Duration::from_millis(200);
        assert!(timers.process_expired_at(later).is_empty());
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_stop_unknown_timer_errors() {
        let mut timers = TimerQueue::new();
        let id = timers.start(Duration::from_millis(1));
        timers.stop(id).unwrap();
        assert!(timers.stop(id).is_err());
    }

    #[test]
    fn test_time_until_next_skips_stopped() {
        let mut timers = TimerQueue::new();
        assert!(timers.time_until_next().is_none());

        let short = timers.start(Duration::from_millis(10));
        let _long = timers.start(Duration::from_secs(60));
        timers.stop(short).unwrap();

        let until = timers.time_until_next().unwrap();
        assert!(until > Duration::from_secs(30));
    }
}
