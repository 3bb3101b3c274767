//! Timer scheduler with deterministic ordering.
//!
//! Implements a priority queue of timer ticks that ensures:
//! - Ticks fire in time order
//! - Ties are broken by insertion order (sequence number)
//! - A cancelled timer never fires again, even if a tick for it was queued

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::PlayTime;

/// Identifier of one timer. Never reused within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw numeric id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Owned handle to a repeating timer.
///
/// The handle is the only way to cancel the timer; whoever holds it owns the
/// timer.
#[derive(Debug, PartialEq, Eq)]
pub struct TimerHandle {
    id: TimerId,
    period: Duration,
}

impl TimerHandle {
    /// Id of the timer this handle controls.
    #[must_use]
    pub const fn id(&self) -> TimerId {
        self.id
    }

    /// Period the timer was started with.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }
}

/// A scheduled tick with time and sequence number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTick {
    /// Scheduled time.
    pub time: PlayTime,
    /// Sequence number for deterministic tie-breaking.
    pub sequence: u64,
    /// Timer that owns this tick.
    pub timer: TimerId,
}

impl ScheduledTick {
    /// Create a new scheduled tick.
    #[must_use]
    pub const fn new(time: PlayTime, sequence: u64, timer: TimerId) -> Self {
        Self {
            time,
            sequence,
            timer,
        }
    }
}

// Min-heap ordering: by time, then by sequence
impl PartialEq for ScheduledTick {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.sequence == other.sequence
    }
}

impl Eq for ScheduledTick {}

impl PartialOrd for ScheduledTick {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTick {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.time.cmp(&other.time) {
            std::cmp::Ordering::Equal => self.sequence.cmp(&other.sequence),
            ord => ord,
        }
    }
}

/// Priority-ordered tick queue.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use algoscope::engine::{PlayTime, TimerScheduler};
///
/// let mut scheduler = TimerScheduler::new();
/// let handle = scheduler.start(PlayTime::ZERO, Duration::from_millis(500));
///
/// assert!(scheduler.next_before(PlayTime::from_millis(499)).is_none());
/// assert!(scheduler.next_before(PlayTime::from_millis(500)).is_some());
///
/// scheduler.cancel(handle);
/// assert!(scheduler.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct TimerScheduler {
    /// Min-heap ordered by (time, sequence).
    queue: BinaryHeap<Reverse<ScheduledTick>>,
    /// Monotonic sequence counter for tie-breaking.
    sequence: u64,
    /// Next timer id to hand out.
    next_id: u64,
}

impl TimerScheduler {
    /// Create a new timer scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a repeating timer whose first tick is due at `now + period`.
    pub fn start(&mut self, now: PlayTime, period: Duration) -> TimerHandle {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        self.schedule(now.saturating_add(period), id);
        TimerHandle { id, period }
    }

    /// Queue the next tick of `handle`'s timer at `time`.
    pub fn reschedule(&mut self, handle: &TimerHandle, time: PlayTime) {
        self.schedule(time, handle.id);
    }

    fn schedule(&mut self, time: PlayTime, timer: TimerId) {
        let seq = self.sequence;
        self.sequence += 1;

        self.queue.push(Reverse(ScheduledTick::new(time, seq, timer)));
    }

    /// Cancel a timer, dropping every queued tick it owns.
    ///
    /// Consumes the handle: a cancelled timer cannot be rescheduled.
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.queue.retain(|Reverse(tick)| tick.timer != handle.id);
    }

    /// Get the next tick if its time is before or at the given time.
    #[must_use]
    pub fn next_before(&mut self, time: PlayTime) -> Option<ScheduledTick> {
        if let Some(Reverse(tick)) = self.queue.peek() {
            if tick.time <= time {
                return self.queue.pop().map(|Reverse(t)| t);
            }
        }
        None
    }

    /// Peek at the next tick without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&ScheduledTick> {
        self.queue.peek().map(|Reverse(t)| t)
    }

    /// Get the time of the next tick, if any.
    #[must_use]
    pub fn next_tick_time(&self) -> Option<PlayTime> {
        self.peek().map(|t| t.time)
    }

    /// Number of distinct timers with a queued tick.
    #[must_use]
    pub fn active_timers(&self) -> usize {
        let mut ids: Vec<TimerId> = self.queue.iter().map(|Reverse(t)| t.timer).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Check if the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Get the number of pending ticks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Drop all pending ticks. Handles stay valid but will never fire.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
