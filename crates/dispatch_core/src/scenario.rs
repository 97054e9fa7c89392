//! Day scenario assembly: inserts every resource a dispatch day needs.

use bevy_ecs::prelude::World;

use crate::assign::LockBoard;
use crate::booking::{Booking, BookingBoard, BookingOrigin};
use crate::clock::DayClock;
use crate::config::DispatchConfig;
use crate::fleet::Fleet;
use crate::instants::InstantSchedule;
use crate::pricing::PricingTable;
use crate::runner::StopFlag;
use crate::systems::TickContext;
use crate::telemetry::DispatchTelemetry;

/// Populate the world for one dispatch day.
///
/// Scheduled bookings are visible immediately; instants stay hidden until
/// their drawn load-time. Vehicles start their day at `config.day_start`.
pub fn build_day(
    world: &mut World,
    config: DispatchConfig,
    pricing: PricingTable,
    mut fleet: Fleet,
    scheduled: Vec<Booking>,
    instants: Vec<Booking>,
) {
    let mut board = BookingBoard::default();
    for booking in scheduled {
        debug_assert_eq!(booking.origin, BookingOrigin::Scheduled);
        board.insert(booking, true);
    }
    let instant_schedule = InstantSchedule::draw(&instants, config.day_start, config.seed);
    for booking in instants {
        debug_assert_eq!(booking.origin, BookingOrigin::Instant);
        board.insert(booking, false);
    }

    for vehicle in fleet.vehicles_mut() {
        vehicle.available_from = config.day_start;
    }

    world.insert_resource(board);
    world.insert_resource(instant_schedule);
    world.insert_resource(fleet);
    world.insert_resource(pricing);
    world.insert_resource(config);
    world.insert_resource(LockBoard::default());
    world.insert_resource(TickContext::default());
    world.insert_resource(DispatchTelemetry::default());
    world.insert_resource(DayClock::default());
    world.insert_resource(StopFlag::default());
}
