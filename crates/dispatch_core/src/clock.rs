//! Simulated day clock: a minute-scale timeline of dispatch events.
//!
//! All timestamps and `clock.now()` are in **minutes since midnight**. The
//! timeline advances by popping the next scheduled event (same-minute events
//! are ordered by `EventKind`).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    DayStarted,
    Tick,
    DayCompleted,
}

/// Dispatch event. `minute` is simulated minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub minute: u32,
    pub kind: EventKind,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by minute; same minute ordered by kind for determinism.
        other
            .minute
            .cmp(&self.minute)
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

/// Day clock: time in minutes, advances to the next scheduled event.
#[derive(Debug, Clone, Default, Resource)]
pub struct DayClock {
    /// Current simulated minute (updated when an event is popped).
    now: u32,
    events: BinaryHeap<Event>,
}

impl DayClock {
    /// Current simulated minute since midnight.
    pub fn now(&self) -> u32 {
        self.now
    }

    /// Schedule an event at a specific minute.
    pub fn schedule_at(&mut self, minute: u32, kind: EventKind) {
        self.schedule(Event { minute, kind });
    }

    /// Schedule a full event (minute must be >= now).
    pub fn schedule(&mut self, event: Event) {
        debug_assert!(
            event.minute >= self.now,
            "event minute must be >= current time"
        );
        self.events.push(event);
    }

    /// Pop the next event (earliest minute; same-minute order by kind).
    /// Advances `now` to that minute.
    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.minute;
        Some(event)
    }

    /// Minute of the next scheduled event without popping it.
    pub fn next_event_time(&self) -> Option<u32> {
        self.events.peek().map(|event| event.minute)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events still in the queue (for tests and scenario checks).
    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }
}
