//! Tick systems: event-driven phases of a dispatch tick.
//!
//! Each system handles one phase and they run chained, in order, on every
//! assignment event (`DayStarted` or `Tick`):
//!
//! - **Release**: reveal instant bookings whose load-time has arrived
//! - **Lock Gate**: freeze near-term work, free the rest, fix availability
//! - **Reassignment**: run the three passes when anything was released
//! - **Tick Metrics**: record totals (and a snapshot on reassignment ticks)
//!
//! `DayCompleted` runs the end-of-day sweep instead. Systems react to the
//! `CurrentEvent` resource, which the runner inserts before each schedule run.

use bevy_ecs::prelude::Resource;

use crate::booking::BookingId;

pub mod day_sweep;
pub mod lock_gate;
pub mod reassignment;
pub mod release;
pub mod tick_metrics;

/// Scratch state shared by the chained phases of one tick.
#[derive(Debug, Default, Resource)]
pub struct TickContext {
    /// Bookings made visible this tick.
    pub released: Vec<BookingId>,
    /// Unlocked bookings the gate dropped from vehicle plans this tick.
    pub dropped: Vec<BookingId>,
    /// Whether the reassignment pipeline ran this tick.
    pub reassigned: bool,
}
