use bevy_ecs::prelude::{Res, ResMut};
use tracing::info;

use crate::assign::{run_final_sweep, LockBoard};
use crate::booking::{BookingBoard, BookingId};
use crate::clock::DayClock;
use crate::config::DispatchConfig;
use crate::fleet::Fleet;
use crate::metrics::aggregate;
use crate::pricing::PricingTable;
use crate::telemetry::{capture_snapshot, DispatchTelemetry, TickReport};

/// End of day: best-effort sweep for leftovers, then the final report.
pub fn day_sweep_system(
    clock: Res<DayClock>,
    mut fleet: ResMut<Fleet>,
    board: Res<BookingBoard>,
    pricing: Res<PricingTable>,
    config: Res<DispatchConfig>,
    locks: Res<LockBoard>,
    mut telemetry: ResMut<DispatchTelemetry>,
) {
    let assigned = fleet.assigned_ids();
    let pool: Vec<BookingId> = board
        .visible()
        .map(|b| b.id)
        .filter(|id| !assigned.contains(id))
        .collect();

    let swept = pool.len();
    let leftover = run_final_sweep(&mut fleet, &board, &pricing, &config, pool);
    info!(
        minute = clock.now(),
        swept,
        terminal = leftover.len(),
        "end-of-day sweep finished"
    );

    let totals = aggregate(&fleet, &board, &pricing);
    telemetry.final_report = Some(TickReport {
        minute: clock.now(),
        released: 0,
        reassigned: true,
        totals,
        snapshot: Some(capture_snapshot(&fleet, &board, &locks)),
    });
}
