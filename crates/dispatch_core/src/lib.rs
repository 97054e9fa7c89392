//! # Fleet Dispatch Core
//!
//! A rolling-horizon dispatch engine for a home-based vehicle fleet.
//!
//! ## Overview
//!
//! This crate provides the assignment engine, including:
//!
//! - **Day Clock**: Minute-precision simulated day with fixed-step ticks
//! - **Fleet & Booking Board**: Flat, id-indexed registries for vehicles and bookings
//! - **Locking Gate**: Freezes assignments whose pickup is inside the lock window
//! - **Reassignment Pipeline**: Exact-class, class-upgrade, and urgency-relaxed passes
//! - **Route Costing**: Active vs. dead kilometers with home-return accounting
//! - **Telemetry**: Per-tick reports and fleet-wide financial totals
//!
//! ## Key Concepts
//!
//! - **Tick Driven**: The clock advances in fixed simulated steps; each tick
//!   releases newly visible instant bookings, re-locks near-term work, and
//!   reconsiders everything else
//! - **Deterministic**: Instant visibility times come from a single seeded RNG
//! - **Single Writer**: All vehicle mutation happens between ticks; passes work
//!   on a cloned registry and swap it in whole
//!
//! ## Example
//!
//! ```rust,no_run
//! use bevy_ecs::prelude::World;
//! use dispatch_core::config::DispatchConfig;
//! use dispatch_core::fleet::Fleet;
//! use dispatch_core::pricing::PricingTable;
//! use dispatch_core::runner::{dispatch_schedule, initialize_day, run_day};
//! use dispatch_core::scenario::build_day;
//!
//! let mut world = World::new();
//! let config = DispatchConfig::default().with_seed(42).with_real_sleep_secs(0.0);
//! build_day(&mut world, config, PricingTable::default(), Fleet::default(), vec![], vec![]);
//! initialize_day(&mut world);
//!
//! let mut schedule = dispatch_schedule();
//! let ticks = run_day(&mut world, &mut schedule);
//! ```

pub mod assign;
pub mod booking;
pub mod clock;
pub mod config;
pub mod cost;
pub mod fleet;
pub mod geo;
pub mod instants;
pub mod metrics;
pub mod pricing;
pub mod runner;
pub mod scenario;
pub mod systems;
pub mod telemetry;
