use bevy_ecs::prelude::{Res, ResMut};
use tracing::info;

use crate::assign::run_reassignment;
use crate::booking::{BookingBoard, BookingId};
use crate::clock::DayClock;
use crate::config::DispatchConfig;
use crate::fleet::Fleet;
use crate::pricing::PricingTable;

use super::TickContext;

/// Run the three assignment passes over everything visible and unassigned.
/// Skipped on ticks where nothing new became visible.
pub fn reassignment_system(
    clock: Res<DayClock>,
    mut ctx: ResMut<TickContext>,
    mut fleet: ResMut<Fleet>,
    board: Res<BookingBoard>,
    pricing: Res<PricingTable>,
    config: Res<DispatchConfig>,
) {
    if ctx.released.is_empty() {
        return;
    }

    let assigned = fleet.assigned_ids();
    let pool: Vec<BookingId> = board
        .visible()
        .map(|b| b.id)
        .filter(|id| !assigned.contains(id))
        .collect();

    let outcome = run_reassignment(clock.now(), &mut fleet, &board, &pricing, &config, pool);
    info!(
        minute = clock.now(),
        pool = outcome.pool_size,
        exact = outcome.exact,
        upgraded = outcome.upgraded,
        urgent = outcome.urgent,
        unassigned = outcome.unassigned.len(),
        "reassignment pipeline finished"
    );
    ctx.reassigned = true;
}
