//! Day runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each
//! step pops the next event from [DayClock], inserts it as [CurrentEvent],
//! then runs the schedule. The wall-clock pacing sleep and the stop-flag
//! check both live between steps; nothing interrupts a tick mid-flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bevy_ecs::prelude::{Res, Resource};
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::{CurrentEvent, DayClock, Event, EventKind};
use crate::config::DispatchConfig;
use crate::systems::{
    day_sweep::day_sweep_system, lock_gate::lock_gate_system, reassignment::reassignment_system,
    release::release_system, tick_metrics::tick_metrics_system,
};

/// Cooperative stop signal, checked only between ticks.
#[derive(Debug, Default, Clone, Resource)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// A handle that can stop the run from another thread.
    pub fn handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

// Condition functions for each event kind
fn is_assignment_event(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::DayStarted | EventKind::Tick))
        .unwrap_or(false)
}

fn is_day_completed(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::DayCompleted)
        .unwrap_or(false)
}

/// Runs one step: pops the next event, inserts it as [CurrentEvent], then
/// runs the schedule. Returns `false` when the clock is empty.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    let event = match world.resource_mut::<DayClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    true
}

/// Runs one step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, &Event),
{
    let event = match world.resource_mut::<DayClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    hook(world, &event);
    true
}

/// Runs the whole day: every scheduled event until the clock drains or the
/// stop flag is raised. Returns the number of steps executed.
pub fn run_day(world: &mut World, schedule: &mut Schedule) -> usize {
    run_day_with_hook(world, schedule, |_, _| {})
}

/// Runs the whole day and invokes `hook` after each step.
pub fn run_day_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    loop {
        let stopped = world
            .get_resource::<StopFlag>()
            .map(|f| f.is_stopped())
            .unwrap_or(false);
        if stopped {
            break;
        }
        if !run_next_event_with_hook(world, schedule, &mut hook) {
            break;
        }
        steps += 1;

        let pace_secs = world
            .get_resource::<DispatchConfig>()
            .map(|c| c.real_sleep_secs)
            .unwrap_or(0.0);
        let more_to_come = !world.resource::<DayClock>().is_empty();
        if pace_secs > 0.0 && more_to_come {
            thread::sleep(Duration::from_secs_f64(pace_secs));
        }
    }
    steps
}

/// Builds the dispatch schedule: the chained tick phases on assignment
/// events, and the end-of-day sweep on [EventKind::DayCompleted].
pub fn dispatch_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            release_system.run_if(is_assignment_event),
            lock_gate_system.run_if(is_assignment_event),
            reassignment_system.run_if(is_assignment_event),
            tick_metrics_system.run_if(is_assignment_event),
            day_sweep_system.run_if(is_day_completed),
        )
            .chain(),
    );
    schedule
}

/// Schedules the day's timeline: `DayStarted` at day start, a `Tick` every
/// step until day end, and `DayCompleted` at day end.
/// Call after building the scenario and before running events.
pub fn initialize_day(world: &mut World) {
    let (day_start, day_end, step) = {
        let config = world.resource::<DispatchConfig>();
        (config.day_start, config.day_end, config.tick_step)
    };
    let mut clock = world.resource_mut::<DayClock>();
    clock.schedule_at(day_start, EventKind::DayStarted);
    let mut minute = day_start.saturating_add(step);
    while minute < day_end {
        clock.schedule_at(minute, EventKind::Tick);
        minute = minute.saturating_add(step);
    }
    if day_end > day_start {
        clock.schedule_at(day_end, EventKind::DayCompleted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_day_lays_out_the_timeline() {
        let mut world = World::new();
        world.insert_resource(
            DispatchConfig::default()
                .with_day_window(360, 480)
                .with_tick_step(30),
        );
        world.insert_resource(DayClock::default());

        initialize_day(&mut world);

        let mut clock = world.resource_mut::<DayClock>();
        // 06:00 start, ticks 06:30 07:00 07:30, end 08:00
        assert_eq!(clock.pending_event_count(), 5);
        assert_eq!(clock.pop_next().unwrap().kind, EventKind::DayStarted);
        assert_eq!(clock.pop_next().unwrap().minute, 390);
        assert_eq!(clock.pop_next().unwrap().minute, 420);
        assert_eq!(clock.pop_next().unwrap().minute, 450);
        let last = clock.pop_next().unwrap();
        assert_eq!(last.kind, EventKind::DayCompleted);
        assert_eq!(last.minute, 480);
    }

    #[test]
    fn stop_flag_halts_between_ticks() {
        let flag = StopFlag::default();
        assert!(!flag.is_stopped());
        flag.stop();
        assert!(flag.is_stopped());
    }
}
