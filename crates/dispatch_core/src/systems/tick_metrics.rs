use bevy_ecs::prelude::{Res, ResMut};

use crate::assign::LockBoard;
use crate::booking::BookingBoard;
use crate::clock::DayClock;
use crate::fleet::Fleet;
use crate::metrics::aggregate;
use crate::pricing::PricingTable;
use crate::telemetry::{capture_snapshot, DispatchTelemetry, TickReport};

use super::TickContext;

/// Record this tick's totals; ticks that reassigned also get a full snapshot.
pub fn tick_metrics_system(
    clock: Res<DayClock>,
    ctx: Res<TickContext>,
    fleet: Res<Fleet>,
    board: Res<BookingBoard>,
    pricing: Res<PricingTable>,
    locks: Res<LockBoard>,
    mut telemetry: ResMut<DispatchTelemetry>,
) {
    let totals = aggregate(&fleet, &board, &pricing);
    let snapshot = ctx
        .reassigned
        .then(|| capture_snapshot(&fleet, &board, &locks));
    telemetry.reports.push(TickReport {
        minute: clock.now(),
        released: ctx.released.len(),
        reassigned: ctx.reassigned,
        totals,
        snapshot,
    });
}
