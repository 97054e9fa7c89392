//! Instant-booking visibility: when each instant becomes known to dispatch.
//!
//! Each instant booking gets a load-time drawn once, at dataset load, from a
//! single seeded generator so a day replays identically under the same seed.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::booking::{Booking, BookingId};

/// An instant booking becomes visible at most this many minutes before pickup.
pub const VISIBILITY_LEAD_MAX: u32 = 120;
/// And at least this many minutes before pickup (when the day allows it).
pub const VISIBILITY_LEAD_MIN: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadEntry {
    pub load_time: u32,
    pub booking_id: BookingId,
}

/// Load-times for the full instant dataset, emitted in due order.
#[derive(Debug, Default, Clone, Resource)]
pub struct InstantSchedule {
    /// Sorted by (load_time, booking_id).
    entries: Vec<LoadEntry>,
    emitted: usize,
}

impl InstantSchedule {
    /// Draw a load-time for every instant booking.
    ///
    /// The window is `[max(day_start, pickup − 120), pickup − 60]`; when it
    /// collapses the earliest bound wins without consuming a draw. Bookings
    /// are visited in ascending id order so the RNG stream is reproducible.
    pub fn draw(instants: &[Booking], day_start: u32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut ordered: Vec<&Booking> = instants.iter().collect();
        ordered.sort_by_key(|b| b.id);

        let mut entries = Vec::with_capacity(ordered.len());
        for b in ordered {
            let earliest = day_start.max(b.pickup_time.saturating_sub(VISIBILITY_LEAD_MAX));
            let latest = b.pickup_time.saturating_sub(VISIBILITY_LEAD_MIN);
            let load_time = if latest > earliest {
                rng.gen_range(earliest..=latest)
            } else {
                earliest
            };
            entries.push(LoadEntry {
                load_time,
                booking_id: b.id,
            });
        }
        entries.sort_by_key(|e| (e.load_time, e.booking_id));

        Self {
            entries,
            emitted: 0,
        }
    }

    /// Emit every not-yet-emitted booking whose load-time has arrived.
    pub fn emit_due(&mut self, now: u32) -> Vec<BookingId> {
        let mut due = Vec::new();
        while let Some(entry) = self.entries.get(self.emitted) {
            if entry.load_time > now {
                break;
            }
            due.push(entry.booking_id);
            self.emitted += 1;
        }
        due
    }

    pub fn remaining(&self) -> usize {
        self.entries.len() - self.emitted
    }

    pub fn entries(&self) -> &[LoadEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingOrigin;
    use crate::geo::GeoPoint;

    fn instant(id: u32, pickup_time: u32) -> Booking {
        Booking {
            id,
            class: 1,
            pickup: GeoPoint::new(0.0, 0.0),
            drop: GeoPoint::new(0.0, 0.1),
            pickup_time,
            distance_km: 11.1,
            travel_time: 30,
            origin: BookingOrigin::Instant,
        }
    }

    #[test]
    fn load_time_falls_inside_the_visibility_window() {
        // Pickup 08:00, day start 06:00: window is [06:00, 07:00]
        let schedule = InstantSchedule::draw(&[instant(1, 480)], 360, 42);
        let entry = schedule.entries()[0];
        assert!(entry.load_time >= 360 && entry.load_time <= 420);
    }

    #[test]
    fn collapsed_window_pins_to_earliest() {
        // Pickup 06:30: latest (05:30) is before day start, so load at 06:00
        let schedule = InstantSchedule::draw(&[instant(1, 390)], 360, 42);
        assert_eq!(schedule.entries()[0].load_time, 360);
    }

    #[test]
    fn draw_is_deterministic_per_seed() {
        let bookings = vec![instant(1, 480), instant(2, 600), instant(3, 720)];
        let a = InstantSchedule::draw(&bookings, 360, 7);
        let b = InstantSchedule::draw(&bookings, 360, 7);
        assert_eq!(a.entries(), b.entries());
    }

    #[test]
    fn emit_due_walks_forward_only() {
        let bookings = vec![instant(1, 390), instant(2, 480), instant(3, 900)];
        let mut schedule = InstantSchedule::draw(&bookings, 360, 1);

        let early = schedule.emit_due(420);
        assert!(early.contains(&1));
        assert!(!early.contains(&3));

        let again = schedule.emit_due(420);
        assert!(again.is_empty());

        let late = schedule.emit_due(1140);
        assert_eq!(schedule.remaining(), 0);
        assert!(late.contains(&3));
    }
}
