//! Greedy insertion: cheapest-deadhead vehicle choice with route completion.

use std::collections::HashSet;

use crate::booking::{Booking, BookingBoard, BookingId, VehicleId};
use crate::config::DispatchConfig;
use crate::cost;
use crate::fleet::{Fleet, Vehicle};
use crate::geo::{self, distance_km};
use crate::pricing::PricingTable;

/// Tolerance when comparing Δ scores; differences below this are ties.
const DELTA_EPS: f64 = 1e-9;

/// Class filter applied by an assignment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassRule {
    /// Vehicle class must equal the booking class.
    Exact,
    /// Vehicle class must equal the booking class plus one.
    UpgradeOne,
    /// Vehicle class must be at least the booking class.
    AtLeast,
}

impl ClassRule {
    pub fn admits(self, vehicle_class: u8, booking_class: u8) -> bool {
        match self {
            ClassRule::Exact => vehicle_class == booking_class,
            ClassRule::UpgradeOne => vehicle_class == booking_class.saturating_add(1),
            ClassRule::AtLeast => vehicle_class >= booking_class,
        }
    }
}

/// Shared read-only inputs of an assignment pass.
#[derive(Clone, Copy)]
pub struct AssignContext<'a> {
    pub board: &'a BookingBoard,
    pub pricing: &'a PricingTable,
    pub config: &'a DispatchConfig,
}

/// Whether the vehicle can deadhead from its last drop (or home) to the
/// booking's pickup before the pickup time, at the assumed average speed.
pub fn reaches_in_time(vehicle: &Vehicle, booking: &Booking, config: &DispatchConfig) -> bool {
    let approach = distance_km(vehicle.last_position(), booking.pickup);
    let lead = geo::deadhead_minutes(approach, config.deadhead_speed_kmh);
    vehicle.available_from as f64 + lead <= booking.pickup_time as f64
}

/// Marginal score of appending the booking to the vehicle's route:
/// hypothetical open dead km minus hypothetical active km. Lower is better.
pub fn insertion_delta(vehicle: &Vehicle, booking: &Booking) -> f64 {
    let mut extended = vehicle.route.clone();
    extended.push(booking.pickup);
    extended.push(booking.drop);
    let dead = cost::open_dead_km(vehicle.home, &extended);
    let active = vehicle.active_km + distance_km(booking.pickup, booking.drop);
    dead - active
}

/// Pick the admissible vehicle minimizing Δ. Ties break on lower current
/// booking count, then lower vehicle id.
pub(crate) fn best_vehicle<F>(fleet: &Fleet, booking: &Booking, mut admit: F) -> Option<VehicleId>
where
    F: FnMut(&Vehicle) -> bool,
{
    let mut best: Option<(f64, usize, VehicleId)> = None;
    for vehicle in fleet.vehicles() {
        if !admit(vehicle) {
            continue;
        }
        let delta = insertion_delta(vehicle, booking);
        let better = match best {
            None => true,
            Some((best_delta, best_count, best_id)) => {
                if delta + DELTA_EPS < best_delta {
                    true
                } else if (delta - best_delta).abs() <= DELTA_EPS {
                    (vehicle.booking_count(), vehicle.id) < (best_count, best_id)
                } else {
                    false
                }
            }
        };
        if better {
            best = Some((delta, vehicle.booking_count(), vehicle.id));
        }
    }
    best.map(|(_, _, id)| id)
}

/// Attach a booking to a vehicle and refresh the derived plan fields.
/// `available_from` only moves forward.
pub(crate) fn commit(
    fleet: &mut Fleet,
    vehicle_id: VehicleId,
    booking: &Booking,
    ctx: &AssignContext,
) {
    let Some(vehicle) = fleet.get_mut(vehicle_id) else {
        return;
    };
    vehicle.assigned_ids.push(booking.id);
    vehicle.rebuild(ctx.board, ctx.pricing);
    vehicle.available_from = vehicle
        .available_from
        .max(booking.completion_time(ctx.config.service_time));
}

/// One greedy pass over the pool, in ascending pickup order (ties by id).
///
/// Each booking goes to the admissible vehicle with the smallest Δ; right
/// after an assignment, the host vehicle's route is densified by pulling in
/// further pool bookings (scanned in descending pickup order). Returns the
/// ids the pass left unassigned, in ascending (pickup, id) order.
pub fn greedy_pass(
    fleet: &mut Fleet,
    pool: &[BookingId],
    rule: ClassRule,
    ctx: &AssignContext,
) -> Vec<BookingId> {
    let mut ascending: Vec<&Booking> = pool.iter().filter_map(|&id| ctx.board.get(id)).collect();
    ascending.sort_by_key(|b| (b.pickup_time, b.id));

    let mut placed: HashSet<BookingId> = HashSet::new();

    for i in 0..ascending.len() {
        let booking = ascending[i];
        if placed.contains(&booking.id) {
            continue;
        }
        let chosen = best_vehicle(fleet, booking, |v| {
            rule.admits(v.class, booking.class) && reaches_in_time(v, booking, ctx.config)
        });
        let Some(vehicle_id) = chosen else {
            continue;
        };
        commit(fleet, vehicle_id, booking, ctx);
        placed.insert(booking.id);
        complete_route(fleet, vehicle_id, &ascending, &mut placed, rule, ctx);
    }

    ascending
        .iter()
        .filter(|b| !placed.contains(&b.id))
        .map(|b| b.id)
        .collect()
}

/// Pull up to `route_completion_limit` extra pool bookings into the vehicle
/// that just received one. Each slot takes the fitting candidate with the
/// smallest Δ, so incrementally profitable (Δ < 0) insertions win first.
fn complete_route(
    fleet: &mut Fleet,
    vehicle_id: VehicleId,
    ascending: &[&Booking],
    placed: &mut HashSet<BookingId>,
    rule: ClassRule,
    ctx: &AssignContext,
) {
    for _ in 0..ctx.config.route_completion_limit {
        let mut best: Option<(f64, BookingId)> = None;
        {
            let Some(vehicle) = fleet.get(vehicle_id) else {
                return;
            };
            for booking in ascending.iter().rev() {
                if placed.contains(&booking.id) {
                    continue;
                }
                if !rule.admits(vehicle.class, booking.class) {
                    continue;
                }
                if !reaches_in_time(vehicle, booking, ctx.config) {
                    continue;
                }
                let delta = insertion_delta(vehicle, booking);
                let better = match best {
                    None => true,
                    Some((best_delta, best_id)) => {
                        delta + DELTA_EPS < best_delta
                            || ((delta - best_delta).abs() <= DELTA_EPS && booking.id < best_id)
                    }
                };
                if better {
                    best = Some((delta, booking.id));
                }
            }
        }
        let Some((_, id)) = best else {
            return;
        };
        let Some(booking) = ctx.board.get(id) else {
            return;
        };
        commit(fleet, vehicle_id, booking, ctx);
        placed.insert(id);
    }
}
