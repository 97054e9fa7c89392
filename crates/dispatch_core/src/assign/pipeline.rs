//! Reassignment pipeline: exact-class, class-upgrade, and urgency passes,
//! plus the end-of-day sweep.
//!
//! The pipeline clones the fleet, runs every pass on the clone, books each
//! nonempty vehicle's return-home leg, and swaps the clone in atomically.

use tracing::warn;

use crate::booking::{Booking, BookingBoard, BookingId};
use crate::config::DispatchConfig;
use crate::fleet::Fleet;
use crate::pricing::PricingTable;

use super::greedy::{self, greedy_pass, AssignContext, ClassRule};

/// What one pipeline run did with its pool.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutcome {
    pub pool_size: usize,
    /// Placed at the booking's own class.
    pub exact: usize,
    /// Placed on a vehicle one class up.
    pub upgraded: usize,
    /// Placed inside the urgent window with availability waived.
    pub urgent: usize,
    /// Still unassigned after all passes, ascending (pickup, id) order.
    pub unassigned: Vec<BookingId>,
}

/// Run the three passes over `pool` at minute `now` and commit the result.
pub fn run_reassignment(
    now: u32,
    fleet: &mut Fleet,
    board: &BookingBoard,
    pricing: &PricingTable,
    config: &DispatchConfig,
    pool: Vec<BookingId>,
) -> PipelineOutcome {
    let ctx = AssignContext {
        board,
        pricing,
        config,
    };
    let pool_size = pool.len();
    let mut shadow = fleet.clone();

    let after_exact = greedy_pass(&mut shadow, &pool, ClassRule::Exact, &ctx);

    // Single-class upgrade: only bookings that can still go one class up
    let (upgradable, capped): (Vec<BookingId>, Vec<BookingId>) =
        after_exact.iter().copied().partition(|&id| {
            board
                .get(id)
                .map(|b| b.class < config.class_upgrade_max)
                .unwrap_or(false)
        });
    let after_upgrade = greedy_pass(&mut shadow, &upgradable, ClassRule::UpgradeOne, &ctx);
    let upgraded = upgradable.len() - after_upgrade.len();

    let mut remaining = after_upgrade;
    remaining.extend(capped);
    let unassigned = urgent_pass(now, &mut shadow, &remaining, &ctx);

    for vehicle in shadow.vehicles_mut() {
        vehicle.book_home_leg(pricing);
    }
    *fleet = shadow;

    for &id in &unassigned {
        warn!(booking = id, minute = now, "booking unassigned after all passes");
    }

    PipelineOutcome {
        pool_size,
        exact: pool_size - after_exact.len(),
        upgraded,
        urgent: remaining.len() - unassigned.len(),
        unassigned,
    }
}

/// Urgency relaxation: bookings picking up within the urgent window may go to
/// any class-compatible vehicle under the load cap, availability ignored.
fn urgent_pass(
    now: u32,
    fleet: &mut Fleet,
    pool: &[BookingId],
    ctx: &AssignContext,
) -> Vec<BookingId> {
    let mut rows: Vec<&Booking> = pool.iter().filter_map(|&id| ctx.board.get(id)).collect();
    rows.sort_by_key(|b| (b.pickup_time, b.id));

    let mut unassigned = Vec::new();
    for booking in rows {
        if booking.pickup_time > now + ctx.config.urgent_window {
            unassigned.push(booking.id);
            continue;
        }
        let chosen = greedy::best_vehicle(fleet, booking, |v| {
            v.class >= booking.class && v.booking_count() < ctx.config.overload_cap
        });
        match chosen {
            Some(vehicle_id) => greedy::commit(fleet, vehicle_id, booking, ctx),
            None => unassigned.push(booking.id),
        }
    }
    unassigned.sort_by_key(|&id| {
        let pickup = ctx.board.get(id).map(|b| b.pickup_time).unwrap_or(u32::MAX);
        (pickup, id)
    });
    unassigned
}

/// Best-effort end-of-day sweep: place leftovers on the least-loaded
/// class-compatible vehicle under the soft cap, with no availability test.
/// Returns the ids that remain terminally unassigned.
pub fn run_final_sweep(
    fleet: &mut Fleet,
    board: &BookingBoard,
    pricing: &PricingTable,
    config: &DispatchConfig,
    pool: Vec<BookingId>,
) -> Vec<BookingId> {
    let ctx = AssignContext {
        board,
        pricing,
        config,
    };
    let mut rows: Vec<&Booking> = pool.iter().filter_map(|&id| board.get(id)).collect();
    rows.sort_by_key(|b| (b.pickup_time, b.id));

    let mut leftover = Vec::new();
    for booking in rows {
        let mut best: Option<(usize, u32)> = None;
        for vehicle in fleet.vehicles() {
            if vehicle.class < booking.class
                || vehicle.booking_count() >= config.overload_cap_final
            {
                continue;
            }
            let key = (vehicle.booking_count(), vehicle.id);
            if best.map_or(true, |b| key < b) {
                best = Some(key);
            }
        }
        match best {
            Some((_, vehicle_id)) => greedy::commit(fleet, vehicle_id, booking, &ctx),
            None => leftover.push(booking.id),
        }
    }

    for vehicle in fleet.vehicles_mut() {
        vehicle.book_home_leg(pricing);
    }
    for &id in &leftover {
        warn!(booking = id, "booking terminally unassigned after final sweep");
    }
    leftover
}
