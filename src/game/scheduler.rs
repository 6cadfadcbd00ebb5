//! Time-ordered event queue for the match clock.
//!
//! Repeating timers (energy regeneration, castle volleys, spawner cycles) and
//! one-shot delays (attack cooldowns) all live in one min-heap keyed by fire
//! time. Events due at the same instant fire in the order they were scheduled.
//! Nothing is ever cancelled: consumers re-check liveness when an event fires,
//! and [`Scheduler::clear`] drops everything when a match restarts.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::game::{EntityId, Team};

/// Something that happens at a scheduled time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledEvent {
    /// Tick both energy pools.
    EnergyRegen,
    /// A castle scans for a target and fires.
    CastleVolley(Team),
    /// A spawner tries to place a unit.
    Spawn(Team),
    /// A unit's attack cooldown ends.
    CooldownExpired(EntityId),
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    at: f64,
    seq: u64,
    event: ScheduledEvent,
    period: Option<f64>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap and we want the earliest first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .at
            .total_cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Match clock plus pending events.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: f64,
    next_seq: u64,
    queue: BinaryHeap<Entry>,
}

impl Scheduler {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock value in seconds.
    #[must_use]
    pub const fn now(&self) -> f64 {
        self.now
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Move the clock forward. Negative or non-finite steps are ignored.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
    }

    fn push(&mut self, at: f64, event: ScheduledEvent, period: Option<f64>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            at,
            seq,
            event,
            period,
        });
    }

    /// Fire `event` once, `delay` seconds from now.
    pub fn schedule_once(&mut self, delay: f64, event: ScheduledEvent) {
        self.push(self.now + delay.max(0.0), event, None);
    }

    /// Fire `event` every `period` seconds, first at `now + period`.
    ///
    /// Non-positive periods are rejected silently; config validation is
    /// responsible for never producing them.
    pub fn schedule_repeating(&mut self, period: f64, event: ScheduledEvent) {
        if period.is_finite() && period > 0.0 {
            self.push(self.now + period, event, Some(period));
        }
    }

    /// Pop the next event due at or before the current clock.
    ///
    /// Repeating events are re-armed relative to their own fire time, so a
    /// large tick fires a timer several times instead of drifting.
    pub fn pop_due(&mut self) -> Option<ScheduledEvent> {
        let due = self.queue.peek().is_some_and(|e| e.at <= self.now);
        if !due {
            return None;
        }
        let entry = self.queue.pop()?;
        if let Some(period) = entry.period {
            self.push(entry.at + period, entry.event, Some(period));
        }
        Some(entry.event)
    }

    /// Drop every pending event and reset the clock to zero.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.now = 0.0;
        self.next_seq = 0;
    }
}
