//! Per-tick reports: assignment snapshots and running totals.

use bevy_ecs::prelude::Resource;

use crate::assign::LockBoard;
use crate::booking::{BookingBoard, BookingId, BookingOrigin, VehicleId};
use crate::fleet::Fleet;
use crate::metrics::DispatchTotals;

/// One vehicle's plan as reported at a tick.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VehicleRow {
    pub vehicle_id: VehicleId,
    pub class: u8,
    pub booking_ids: Vec<BookingId>,
    pub active_km: f64,
    pub dead_km: f64,
    pub driver_pay: f64,
    pub available_from: u32,
}

/// One visible booking's status as reported at a tick.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub class: u8,
    pub origin: BookingOrigin,
    pub pickup_time: u32,
    pub vehicle_id: Option<VehicleId>,
    pub locked: bool,
}

/// Full assignment state: every vehicle plan plus every visible booking.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AssignmentSnapshot {
    pub vehicles: Vec<VehicleRow>,
    pub bookings: Vec<BookingRow>,
}

/// What one tick produced.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TickReport {
    pub minute: u32,
    /// Bookings that became visible this tick.
    pub released: usize,
    /// Whether the reassignment pipeline ran.
    pub reassigned: bool,
    pub totals: DispatchTotals,
    /// Present on ticks that reassigned, and on the final report.
    pub snapshot: Option<AssignmentSnapshot>,
}

/// Collected reports for the whole day.
#[derive(Debug, Default, Resource)]
pub struct DispatchTelemetry {
    pub reports: Vec<TickReport>,
    /// Written once, after the end-of-day sweep.
    pub final_report: Option<TickReport>,
}

/// Capture the current assignment state.
pub fn capture_snapshot(
    fleet: &Fleet,
    board: &BookingBoard,
    locks: &LockBoard,
) -> AssignmentSnapshot {
    let vehicles = fleet
        .vehicles()
        .iter()
        .map(|v| VehicleRow {
            vehicle_id: v.id,
            class: v.class,
            booking_ids: v.assigned_ids.clone(),
            active_km: v.active_km,
            dead_km: v.dead_km,
            driver_pay: v.driver_pay,
            available_from: v.available_from,
        })
        .collect();

    let mut bookings: Vec<BookingRow> = board
        .visible()
        .map(|b| BookingRow {
            booking_id: b.id,
            class: b.class,
            origin: b.origin,
            pickup_time: b.pickup_time,
            vehicle_id: fleet.holder_of(b.id),
            locked: locks.is_locked(b.id),
        })
        .collect();
    bookings.sort_by_key(|row| (row.pickup_time, row.booking_id));

    AssignmentSnapshot { vehicles, bookings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::Booking;
    use crate::fleet::Vehicle;
    use crate::geo::GeoPoint;
    use crate::pricing::PricingTable;

    #[test]
    fn snapshot_tags_holder_and_lock_state() {
        let mut board = BookingBoard::default();
        board.insert(
            Booking {
                id: 1,
                class: 1,
                pickup: GeoPoint::new(0.0, 0.1),
                drop: GeoPoint::new(0.0, 0.2),
                pickup_time: 480,
                distance_km: 11.1,
                travel_time: 15,
                origin: BookingOrigin::Instant,
            },
            true,
        );
        let pricing = PricingTable::default();
        let mut fleet = Fleet::default();
        let mut v = Vehicle::new(7, 1, GeoPoint::new(0.0, 0.0));
        v.assigned_ids = vec![1];
        v.rebuild(&board, &pricing);
        fleet.push(v);

        let snapshot = capture_snapshot(&fleet, &board, &LockBoard::default());
        assert_eq!(snapshot.vehicles.len(), 1);
        assert_eq!(snapshot.bookings.len(), 1);

        let row = &snapshot.bookings[0];
        assert_eq!(row.vehicle_id, Some(7));
        assert_eq!(row.origin, BookingOrigin::Instant);
        assert!(!row.locked);
    }
}
