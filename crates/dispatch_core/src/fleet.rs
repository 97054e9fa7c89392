//! Vehicle records and the fleet registry.
//!
//! A vehicle owns its ordered `assigned_ids` and everything derived from it:
//! the route polyline, running active/dead kilometers, and driver pay. The
//! derived fields are recomputed from scratch whenever the plan changes; the
//! booking board is the single source of truth for the rows behind the ids.

use std::collections::HashSet;

use bevy_ecs::prelude::Resource;

use crate::booking::{BookingBoard, BookingId, VehicleId};
use crate::cost;
use crate::geo::GeoPoint;
use crate::pricing::PricingTable;

/// One vehicle of the home-based fleet.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    /// Capability class (1..9); may only serve bookings of equal or lower class.
    pub class: u8,
    pub home: GeoPoint,
    /// Booking ids ordered by (pickup_time, id).
    pub assigned_ids: Vec<BookingId>,
    /// Polyline (pickup₁, drop₁, pickup₂, drop₂, …) induced by `assigned_ids`.
    pub route: Vec<GeoPoint>,
    pub active_km: f64,
    /// Dead km in the open form until [Vehicle::book_home_leg] runs.
    pub dead_km: f64,
    pub driver_pay: f64,
    /// Earliest minute this vehicle can start new work. Never decreases
    /// within a tick.
    pub available_from: u32,
    home_leg_booked: bool,
}

impl Vehicle {
    pub fn new(id: VehicleId, class: u8, home: GeoPoint) -> Self {
        Self {
            id,
            class,
            home,
            assigned_ids: Vec::new(),
            route: Vec::new(),
            active_km: 0.0,
            dead_km: 0.0,
            driver_pay: 0.0,
            available_from: 0,
            home_leg_booked: false,
        }
    }

    pub fn booking_count(&self) -> usize {
        self.assigned_ids.len()
    }

    /// Where the vehicle ends its current plan: last drop, or home when idle.
    pub fn last_position(&self) -> GeoPoint {
        self.route.last().copied().unwrap_or(self.home)
    }

    /// Re-derive route, kilometers, and pay from `assigned_ids`.
    ///
    /// Sorts the plan by (pickup_time, id), rebuilds the polyline, and
    /// recomputes open-form costs. `available_from` is left alone; callers
    /// own that field's monotonicity.
    pub fn rebuild(&mut self, board: &BookingBoard, pricing: &PricingTable) {
        self.assigned_ids.sort_by_key(|&id| {
            let pickup = board.get(id).map(|b| b.pickup_time).unwrap_or(u32::MAX);
            (pickup, id)
        });
        let rows: Vec<_> = self
            .assigned_ids
            .iter()
            .filter_map(|&id| board.get(id))
            .collect();
        self.route = cost::polyline(&rows);
        self.active_km = cost::active_km(&self.route);
        self.dead_km = cost::open_dead_km(self.home, &self.route);
        self.driver_pay = cost::driver_pay(self.active_km, self.dead_km, pricing.rates(self.class));
        self.home_leg_booked = false;
    }

    /// Book the final return-home leg into `dead_km` and `driver_pay`.
    ///
    /// Idempotent per rebuild: the leg is added at most once until the plan
    /// changes again. Empty plans get no leg.
    pub fn book_home_leg(&mut self, pricing: &PricingTable) {
        if self.home_leg_booked || self.assigned_ids.is_empty() {
            return;
        }
        let leg = cost::closing_leg_km(self.home, &self.route);
        self.dead_km += leg;
        self.driver_pay += leg * pricing.rates(self.class).dead_pay;
        self.home_leg_booked = true;
    }

    pub fn home_leg_booked(&self) -> bool {
        self.home_leg_booked
    }
}

/// Flat registry of all vehicles. The only mutable state of the engine;
/// cloneable so assignment passes can work on a shadow copy.
#[derive(Debug, Default, Clone, Resource)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
}

impl Fleet {
    pub fn push(&mut self, vehicle: Vehicle) {
        self.vehicles.push(vehicle);
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.id == id)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicles_mut(&mut self) -> &mut [Vehicle] {
        &mut self.vehicles
    }

    /// Every booking id currently held by some vehicle.
    pub fn assigned_ids(&self) -> HashSet<BookingId> {
        self.vehicles
            .iter()
            .flat_map(|v| v.assigned_ids.iter().copied())
            .collect()
    }

    /// The vehicle holding a booking, if any.
    pub fn holder_of(&self, id: BookingId) -> Option<VehicleId> {
        self.vehicles
            .iter()
            .find(|v| v.assigned_ids.contains(&id))
            .map(|v| v.id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}
