#![allow(dead_code)]

use bevy_ecs::prelude::World;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dispatch_core::booking::{Booking, BookingOrigin};
use dispatch_core::config::DispatchConfig;
use dispatch_core::fleet::{Fleet, Vehicle};
use dispatch_core::geo::{distance_km, GeoPoint};
use dispatch_core::pricing::PricingTable;
use dispatch_core::runner::initialize_day;
use dispatch_core::scenario::build_day;

/// Builder that assembles a ready-to-run dispatch day for integration tests.
#[derive(Default)]
pub struct TestDayBuilder {
    config: Option<DispatchConfig>,
    vehicles: Vec<Vehicle>,
    scheduled: Vec<Booking>,
    instants: Vec<Booking>,
}

impl TestDayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicles.push(vehicle);
        self
    }

    pub fn scheduled(mut self, booking: Booking) -> Self {
        self.scheduled.push(booking);
        self
    }

    pub fn instant(mut self, booking: Booking) -> Self {
        self.instants.push(booking);
        self
    }

    /// Build the world with the timeline already scheduled.
    pub fn build(self) -> World {
        let config = self
            .config
            .unwrap_or_else(|| DispatchConfig::default().with_real_sleep_secs(0.0).with_seed(42));
        let mut fleet = Fleet::default();
        for vehicle in self.vehicles {
            fleet.push(vehicle);
        }
        let mut world = World::new();
        build_day(
            &mut world,
            config,
            PricingTable::default(),
            fleet,
            self.scheduled,
            self.instants,
        );
        initialize_day(&mut world);
        world
    }
}

/// A reproducible random day: vehicles around a city center, scheduled and
/// instant bookings spread over the working hours.
pub fn random_day(
    seed: u64,
    vehicle_count: usize,
    scheduled_count: usize,
    instant_count: usize,
) -> (Fleet, Vec<Booking>, Vec<Booking>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let point = |rng: &mut StdRng| {
        GeoPoint::new(rng.gen_range(52.40..52.60), rng.gen_range(13.20..13.60))
    };

    let mut fleet = Fleet::default();
    for id in 1..=vehicle_count as u32 {
        let class = rng.gen_range(1..=3u8);
        let home = point(&mut rng);
        fleet.push(Vehicle::new(id, class, home));
    }

    let booking = |rng: &mut StdRng, id: u32, origin: BookingOrigin| {
        let pickup = point(rng);
        let drop = point(rng);
        Booking {
            id,
            class: rng.gen_range(1..=3u8),
            pickup,
            drop,
            pickup_time: rng.gen_range(420..1100),
            distance_km: distance_km(pickup, drop),
            travel_time: rng.gen_range(10..40),
            origin,
        }
    };

    let scheduled: Vec<Booking> = (1..=scheduled_count as u32)
        .map(|id| booking(&mut rng, id, BookingOrigin::Scheduled))
        .collect();
    let instants: Vec<Booking> = (1..=instant_count as u32)
        .map(|i| booking(&mut rng, scheduled_count as u32 + i, BookingOrigin::Instant))
        .collect();

    (fleet, scheduled, instants)
}

/// Build a ready-to-run world from [random_day] output.
pub fn random_world(seed: u64, vehicles: usize, scheduled: usize, instants: usize) -> World {
    let (fleet, scheduled_rows, instant_rows) = random_day(seed, vehicles, scheduled, instants);
    let mut world = World::new();
    build_day(
        &mut world,
        DispatchConfig::default()
            .with_real_sleep_secs(0.0)
            .with_seed(seed),
        PricingTable::default(),
        fleet,
        scheduled_rows,
        instant_rows,
    );
    initialize_day(&mut world);
    world
}
