use bevy_ecs::prelude::{Res, ResMut};
use tracing::debug;

use crate::booking::{BookingBoard, BookingOrigin};
use crate::clock::{CurrentEvent, DayClock, EventKind};
use crate::instants::InstantSchedule;

use super::TickContext;

/// Reveal everything that becomes visible at this tick: the whole scheduled
/// set on `DayStarted`, plus every instant whose load-time has arrived.
pub fn release_system(
    event: Res<CurrentEvent>,
    clock: Res<DayClock>,
    mut ctx: ResMut<TickContext>,
    mut board: ResMut<BookingBoard>,
    mut instants: ResMut<InstantSchedule>,
) {
    ctx.released.clear();
    ctx.dropped.clear();
    ctx.reassigned = false;

    let now = clock.now();
    let mut released = Vec::new();

    if event.0.kind == EventKind::DayStarted {
        released.extend(
            board
                .iter()
                .filter(|b| b.origin == BookingOrigin::Scheduled)
                .map(|b| b.id),
        );
    }
    for id in instants.emit_due(now) {
        board.reveal(id);
        released.push(id);
    }

    if !released.is_empty() {
        debug!(minute = now, count = released.len(), "bookings released");
    }
    ctx.released = released;
}
