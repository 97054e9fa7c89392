//! Fleet-wide financial totals.
//!
//! Totals are recomputed from each vehicle's route in the finalized form
//! (return-home leg included), so a report taken between reassignments never
//! under-counts dead kilometers.

use crate::booking::BookingBoard;
use crate::cost;
use crate::fleet::Fleet;
use crate::pricing::{self, PricingTable};

/// Aggregated totals over the whole fleet.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct DispatchTotals {
    pub active_km: f64,
    pub dead_km: f64,
    pub driver_pay: f64,
    pub customer_fare: f64,
    pub profit: f64,
    /// `active / (active + dead)`; zero when the fleet has not moved.
    pub efficiency: f64,
    pub assigned: usize,
    pub unassigned: usize,
}

/// Compute totals for the current assignment state.
pub fn aggregate(fleet: &Fleet, board: &BookingBoard, pricing: &PricingTable) -> DispatchTotals {
    let mut totals = DispatchTotals::default();

    for vehicle in fleet.vehicles() {
        let rates = pricing.rates(vehicle.class);
        let active = cost::active_km(&vehicle.route);
        let mut dead = cost::open_dead_km(vehicle.home, &vehicle.route);
        if !vehicle.assigned_ids.is_empty() {
            dead += cost::closing_leg_km(vehicle.home, &vehicle.route);
        }

        totals.active_km += active;
        totals.dead_km += dead;
        totals.driver_pay += cost::driver_pay(active, dead, rates);
        totals.customer_fare += vehicle
            .assigned_ids
            .iter()
            .filter_map(|&id| board.get(id))
            .map(|b| pricing::customer_fare(b.distance_km, rates))
            .sum::<f64>();
        totals.assigned += vehicle.assigned_ids.len();
    }

    totals.profit = totals.customer_fare - totals.driver_pay;
    let moved = totals.active_km + totals.dead_km;
    totals.efficiency = if moved > 0.0 {
        totals.active_km / moved
    } else {
        0.0
    };
    totals.unassigned = board.visible_count().saturating_sub(totals.assigned);
    totals
}
