//! Booking rows and the board that tracks their visibility.

use std::collections::{HashMap, HashSet};

use bevy_ecs::prelude::Resource;

use crate::geo::GeoPoint;

pub type BookingId = u32;
pub type VehicleId = u32;

/// Where a booking entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum BookingOrigin {
    /// Known at day start.
    Scheduled,
    /// Revealed during the day, shortly before its pickup.
    Instant,
}

/// One trip request. Immutable once loaded; vehicles reference it by id only.
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: BookingId,
    /// Required vehicle capability (1..9).
    pub class: u8,
    pub pickup: GeoPoint,
    pub drop: GeoPoint,
    /// Minutes since midnight.
    pub pickup_time: u32,
    /// Active distance of the trip in km.
    pub distance_km: f64,
    /// Driving minutes from pickup to drop.
    pub travel_time: u32,
    pub origin: BookingOrigin,
}

impl Booking {
    /// Minute at which the serving vehicle is free again.
    pub fn completion_time(&self, service_time: u32) -> u32 {
        self.pickup_time + self.travel_time + service_time
    }
}

/// Flat registry of all bookings, scheduled and instant, keyed by id.
///
/// Rows are stored in load order; `visible` marks the subset the engine may
/// assign (scheduled bookings from day start, instants from their load time).
#[derive(Debug, Default, Clone, Resource)]
pub struct BookingBoard {
    rows: Vec<Booking>,
    index: HashMap<BookingId, usize>,
    visible: HashSet<BookingId>,
}

impl BookingBoard {
    /// Insert a booking row. `visible` is true for scheduled bookings.
    pub fn insert(&mut self, booking: Booking, visible: bool) {
        if visible {
            self.visible.insert(booking.id);
        }
        self.index.insert(booking.id, self.rows.len());
        self.rows.push(booking);
    }

    pub fn get(&self, id: BookingId) -> Option<&Booking> {
        self.index.get(&id).map(|&i| &self.rows[i])
    }

    /// Make an instant booking assignable from now on.
    pub fn reveal(&mut self, id: BookingId) {
        if self.index.contains_key(&id) {
            self.visible.insert(id);
        }
    }

    pub fn is_visible(&self, id: BookingId) -> bool {
        self.visible.contains(&id)
    }

    /// All rows in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Booking> {
        self.rows.iter()
    }

    /// Visible rows in load order.
    pub fn visible(&self) -> impl Iterator<Item = &Booking> {
        self.rows.iter().filter(|b| self.visible.contains(&b.id))
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(id: BookingId, pickup_time: u32) -> Booking {
        Booking {
            id,
            class: 1,
            pickup: GeoPoint::new(0.0, 0.0),
            drop: GeoPoint::new(0.0, 0.1),
            pickup_time,
            distance_km: 11.1,
            travel_time: 30,
            origin: BookingOrigin::Scheduled,
        }
    }

    #[test]
    fn completion_time_adds_travel_and_service() {
        let b = booking(1, 480);
        assert_eq!(b.completion_time(30), 480 + 30 + 30);
    }

    #[test]
    fn reveal_controls_visibility() {
        let mut board = BookingBoard::default();
        board.insert(booking(1, 480), true);
        board.insert(booking(2, 500), false);

        assert!(board.is_visible(1));
        assert!(!board.is_visible(2));
        assert_eq!(board.visible_count(), 1);

        board.reveal(2);
        assert!(board.is_visible(2));
        assert_eq!(board.visible().count(), 2);

        // Unknown ids never become visible
        board.reveal(99);
        assert_eq!(board.visible_count(), 2);
    }
}
