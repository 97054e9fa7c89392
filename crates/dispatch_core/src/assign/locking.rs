//! Locking gate: freezes near-term assignments and frees the rest.
//!
//! At every tick, each vehicle keeps only the bookings whose pickup falls
//! inside the lock window; everything else is dropped back into the pool for
//! reassignment. A vehicle's `available_from` never decreases across the
//! gate: a dropped booking cannot earn the vehicle back the minutes it had
//! reserved.

use std::collections::HashSet;

use bevy_ecs::prelude::Resource;

use crate::booking::{BookingBoard, BookingId};
use crate::config::DispatchConfig;
use crate::fleet::Fleet;
use crate::pricing::PricingTable;

/// The set of booking ids currently frozen to their vehicles.
#[derive(Debug, Default, Clone, Resource)]
pub struct LockBoard {
    locked: HashSet<BookingId>,
}

impl LockBoard {
    pub fn is_locked(&self, id: BookingId) -> bool {
        self.locked.contains(&id)
    }

    pub fn locked_count(&self) -> usize {
        self.locked.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = BookingId> + '_ {
        self.locked.iter().copied()
    }

    fn replace(&mut self, locked: HashSet<BookingId>) {
        self.locked = locked;
    }
}

/// Run the gate at minute `now`. Returns the unlocked booking ids dropped
/// from vehicle plans, sorted ascending.
///
/// Per vehicle: partition the plan by `pickup_time <= now + lock_window`,
/// push `available_from` forward to cover the locked work (and `now`
/// itself), keep only the locked ids, and recompute the plan's route and
/// open-form costs from them alone.
pub fn run_lock_gate(
    now: u32,
    fleet: &mut Fleet,
    locks: &mut LockBoard,
    board: &BookingBoard,
    pricing: &PricingTable,
    config: &DispatchConfig,
) -> Vec<BookingId> {
    let horizon = now + config.lock_window;
    let mut locked_now: HashSet<BookingId> = HashSet::new();
    let mut dropped = Vec::new();

    for vehicle in fleet.vehicles_mut() {
        let mut locked_here = Vec::new();
        for &id in &vehicle.assigned_ids {
            match board.get(id) {
                Some(b) if b.pickup_time <= horizon => locked_here.push(id),
                _ => dropped.push(id),
            }
        }

        let busy_until = locked_here
            .iter()
            .filter_map(|&id| board.get(id))
            .map(|b| b.completion_time(config.service_time))
            .max()
            .unwrap_or(0);
        vehicle.available_from = vehicle.available_from.max(now).max(busy_until);

        locked_now.extend(locked_here.iter().copied());
        vehicle.assigned_ids = locked_here;
        vehicle.rebuild(board, pricing);
    }

    locks.replace(locked_now);
    dropped.sort_unstable();
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{Booking, BookingOrigin};
    use crate::fleet::Vehicle;
    use crate::geo::GeoPoint;

    fn booking(id: u32, pickup_time: u32) -> Booking {
        Booking {
            id,
            class: 1,
            pickup: GeoPoint::new(0.0, 0.1),
            drop: GeoPoint::new(0.0, 0.2),
            pickup_time,
            distance_km: 11.1,
            travel_time: 30,
            origin: BookingOrigin::Scheduled,
        }
    }

    fn setup(bookings: Vec<Booking>) -> (BookingBoard, Fleet, PricingTable, DispatchConfig) {
        let mut board = BookingBoard::default();
        let ids: Vec<u32> = bookings.iter().map(|b| b.id).collect();
        for b in bookings {
            board.insert(b, true);
        }
        let pricing = PricingTable::default();
        let config = DispatchConfig::default();
        let mut fleet = Fleet::default();
        let mut v = Vehicle::new(1, 1, GeoPoint::new(0.0, 0.0));
        v.available_from = config.day_start;
        v.assigned_ids = ids;
        v.rebuild(&board, &pricing);
        fleet.push(v);
        (board, fleet, pricing, config)
    }

    #[test]
    fn partitions_by_the_lock_window() {
        // At 07:00 a pickup at 08:30 is inside the window, 09:30 is not
        let (board, mut fleet, pricing, config) = setup(vec![booking(1, 510), booking(2, 570)]);
        let mut locks = LockBoard::default();

        let dropped = run_lock_gate(420, &mut fleet, &mut locks, &board, &pricing, &config);

        assert!(locks.is_locked(1));
        assert!(!locks.is_locked(2));
        assert_eq!(dropped, vec![2]);
        assert_eq!(fleet.get(1).unwrap().assigned_ids, vec![1]);
        assert_eq!(fleet.get(1).unwrap().route.len(), 2);
    }

    #[test]
    fn availability_covers_locked_work() {
        let (board, mut fleet, pricing, config) = setup(vec![booking(1, 510)]);
        let mut locks = LockBoard::default();

        run_lock_gate(420, &mut fleet, &mut locks, &board, &pricing, &config);

        // completion = 510 + 30 travel + 30 service
        assert_eq!(fleet.get(1).unwrap().available_from, 570);
    }

    #[test]
    fn availability_is_retained_when_unlocked_work_drops() {
        let (board, mut fleet, pricing, config) = setup(vec![booking(2, 570)]);
        // The plan reserved the vehicle until the dropped booking's completion
        fleet.get_mut(1).unwrap().available_from = 630;
        let mut locks = LockBoard::default();

        let dropped = run_lock_gate(420, &mut fleet, &mut locks, &board, &pricing, &config);

        assert_eq!(dropped, vec![2]);
        assert_eq!(fleet.get(1).unwrap().available_from, 630);
        assert!(fleet.get(1).unwrap().assigned_ids.is_empty());
    }

    #[test]
    fn idle_vehicle_becomes_available_now() {
        let (board, mut fleet, pricing, config) = setup(vec![]);
        fleet.get_mut(1).unwrap().available_from = 0;
        let mut locks = LockBoard::default();

        run_lock_gate(420, &mut fleet, &mut locks, &board, &pricing, &config);

        assert_eq!(fleet.get(1).unwrap().available_from, 420);
    }
}
