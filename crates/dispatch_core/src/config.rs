//! Engine configuration surface.

use bevy_ecs::prelude::Resource;

/// All tunables of a dispatch day, with the operational defaults.
#[derive(Debug, Clone, Resource, serde::Serialize)]
pub struct DispatchConfig {
    /// First simulated minute of the day (minutes since midnight).
    pub day_start: u32,
    /// Last simulated minute of the day.
    pub day_end: u32,
    /// Simulated minutes per tick.
    pub tick_step: u32,
    /// Wall-clock seconds slept between ticks. Cosmetic pacing only.
    pub real_sleep_secs: f64,
    /// Assignments with pickup inside this forward window may not move.
    pub lock_window: u32,
    /// Inside this forward window the availability predicate is waived.
    pub urgent_window: u32,
    /// Minutes added after drop-off before the vehicle is free again.
    pub service_time: u32,
    /// Max bookings per vehicle for the urgency pass.
    pub overload_cap: usize,
    /// Max bookings per vehicle for the end-of-day sweep.
    pub overload_cap_final: usize,
    /// Highest class a booking may be shadow-upgraded to.
    pub class_upgrade_max: u8,
    /// Assumed average speed for deadhead feasibility checks (km/h).
    pub deadhead_speed_kmh: f64,
    /// Max extra bookings pulled into a route right after an assignment.
    pub route_completion_limit: usize,
    /// Seed for the instant-booking visibility draw.
    pub seed: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            day_start: 6 * 60,
            day_end: 19 * 60,
            tick_step: 30,
            real_sleep_secs: 6.0,
            lock_window: 120,
            urgent_window: 60,
            service_time: 30,
            overload_cap: 8,
            overload_cap_final: 10,
            class_upgrade_max: 9,
            deadhead_speed_kmh: crate::geo::DEADHEAD_SPEED_KMH,
            route_completion_limit: 3,
            seed: 0,
        }
    }
}

impl DispatchConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the simulated day window in minutes since midnight.
    pub fn with_day_window(mut self, day_start: u32, day_end: u32) -> Self {
        self.day_start = day_start;
        self.day_end = day_end;
        self
    }

    pub fn with_tick_step(mut self, minutes: u32) -> Self {
        self.tick_step = minutes.max(1);
        self
    }

    /// Wall-clock pacing per tick; 0 disables sleeping.
    pub fn with_real_sleep_secs(mut self, secs: f64) -> Self {
        self.real_sleep_secs = secs.max(0.0);
        self
    }

    pub fn with_lock_window(mut self, minutes: u32) -> Self {
        self.lock_window = minutes;
        self
    }

    pub fn with_urgent_window(mut self, minutes: u32) -> Self {
        self.urgent_window = minutes;
        self
    }

    pub fn with_service_time(mut self, minutes: u32) -> Self {
        self.service_time = minutes;
        self
    }
}
