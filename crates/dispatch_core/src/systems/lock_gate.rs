use bevy_ecs::prelude::{Res, ResMut};

use crate::assign::{run_lock_gate, LockBoard};
use crate::booking::BookingBoard;
use crate::clock::DayClock;
use crate::config::DispatchConfig;
use crate::fleet::Fleet;
use crate::pricing::PricingTable;

use super::TickContext;

/// Freeze near-term assignments and drop the rest back into the pool.
pub fn lock_gate_system(
    clock: Res<DayClock>,
    mut ctx: ResMut<TickContext>,
    mut fleet: ResMut<Fleet>,
    mut locks: ResMut<LockBoard>,
    board: Res<BookingBoard>,
    pricing: Res<PricingTable>,
    config: Res<DispatchConfig>,
) {
    ctx.dropped = run_lock_gate(
        clock.now(),
        &mut fleet,
        &mut locks,
        &board,
        &pricing,
        &config,
    );
}
