//! Day runner CLI: loads the JSON inputs, runs the simulated dispatch day,
//! and renders tick-by-tick reports plus the final snapshot.

mod export;
mod input;
mod report;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context};
use bevy_ecs::prelude::World;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use dispatch_core::booking::{Booking, BookingOrigin};
use dispatch_core::clock::EventKind;
use dispatch_core::config::DispatchConfig;
use dispatch_core::geo::pickup_minutes;
use dispatch_core::pricing::PricingTable;
use dispatch_core::runner::{dispatch_schedule, initialize_day, run_day_with_hook};
use dispatch_core::scenario::build_day;
use dispatch_core::telemetry::DispatchTelemetry;

#[derive(Parser)]
#[command(
    name = "dispatch_cli",
    about = "Rolling-horizon vehicle dispatch over a simulated day",
    long_about = "Loads a vehicle registry, scheduled bookings, and instant bookings,\n\
                  then replays the day: scheduled work is pre-assigned at day start,\n\
                  instants surface tick by tick and are folded into the running plan."
)]
struct Cli {
    /// Vehicle registry JSON
    #[arg(long, default_value = "vehicles.json")]
    vehicles: PathBuf,
    /// Scheduled bookings JSON
    #[arg(long, default_value = "bookings.json")]
    bookings: PathBuf,
    /// Instant bookings JSON
    #[arg(long, default_value = "instant_bookings.json")]
    instant_bookings: PathBuf,
    /// Day start as HH:MM
    #[arg(long, default_value = "06:00")]
    day_start: String,
    /// Day end as HH:MM
    #[arg(long, default_value = "19:00")]
    day_end: String,
    /// Simulated minutes per tick
    #[arg(long, default_value_t = 30)]
    tick_step: u32,
    /// Wall-clock seconds slept between ticks (0 = run flat out)
    #[arg(long, default_value_t = 6.0)]
    sleep_secs: f64,
    /// Forward window (minutes) inside which assignments freeze
    #[arg(long, default_value_t = 120)]
    lock_window: u32,
    /// Forward window (minutes) inside which availability is waived
    #[arg(long, default_value_t = 60)]
    urgent_window: u32,
    /// Minutes a vehicle stays occupied after each drop-off
    #[arg(long, default_value_t = 30)]
    service_time: u32,
    /// Max bookings per vehicle in the urgency pass
    #[arg(long, default_value_t = 8)]
    overload_cap: usize,
    /// Max bookings per vehicle in the final sweep
    #[arg(long, default_value_t = 10)]
    overload_cap_final: usize,
    /// Highest class a booking may be shadow-upgraded to
    #[arg(long, default_value_t = 9)]
    class_upgrade_max: u8,
    /// Seed for the instant visibility draw
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Write per-tick totals to this CSV file
    #[arg(long)]
    export_csv: Option<PathBuf>,
    /// Write the final report to this JSON file
    #[arg(long)]
    export_json: Option<PathBuf>,
    /// Suppress per-tick tables; show a progress bar instead
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let day_start = pickup_minutes(&cli.day_start)
        .with_context(|| format!("bad --day-start {:?}", cli.day_start))?;
    let day_end = pickup_minutes(&cli.day_end)
        .with_context(|| format!("bad --day-end {:?}", cli.day_end))?;
    if day_end <= day_start {
        bail!("day end {} must be after day start {}", cli.day_end, cli.day_start);
    }

    let mut config = DispatchConfig::default()
        .with_day_window(day_start, day_end)
        .with_tick_step(cli.tick_step)
        .with_real_sleep_secs(cli.sleep_secs)
        .with_lock_window(cli.lock_window)
        .with_urgent_window(cli.urgent_window)
        .with_service_time(cli.service_time)
        .with_seed(cli.seed);
    config.overload_cap = cli.overload_cap;
    config.overload_cap_final = cli.overload_cap_final;
    config.class_upgrade_max = cli.class_upgrade_max;

    let fleet = input::load_vehicles(&cli.vehicles)
        .with_context(|| format!("loading {}", cli.vehicles.display()))?;
    let scheduled = input::load_bookings(&cli.bookings, BookingOrigin::Scheduled)
        .with_context(|| format!("loading {}", cli.bookings.display()))?;
    let instants = input::load_bookings(&cli.instant_bookings, BookingOrigin::Instant)
        .with_context(|| format!("loading {}", cli.instant_bookings.display()))?;

    let pricing = PricingTable::default();
    let all_rows: Vec<&Booking> = scheduled.iter().chain(instants.iter()).collect();
    input::warn_unknown_classes(&fleet, &all_rows, &pricing);
    drop(all_rows);

    tracing::info!(
        vehicles = fleet.len(),
        scheduled = scheduled.len(),
        instants = instants.len(),
        "inputs loaded"
    );

    let mut world = World::new();
    build_day(&mut world, config, pricing, fleet, scheduled, instants);
    initialize_day(&mut world);

    let total_events = {
        let mut count = 2u64; // day start + day completed
        let mut minute = day_start + cli.tick_step.max(1);
        while minute < day_end {
            count += 1;
            minute += cli.tick_step.max(1);
        }
        count
    };
    let progress = cli.quiet.then(|| {
        let pb = ProgressBar::new(total_events);
        pb.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} ticks {msg}")
                .expect("valid progress template"),
        );
        pb
    });

    let mut schedule = dispatch_schedule();
    run_day_with_hook(&mut world, &mut schedule, |world, event| {
        if let Some(pb) = &progress {
            pb.inc(1);
            return;
        }
        let telemetry = world.resource::<DispatchTelemetry>();
        match event.kind {
            EventKind::DayCompleted => {
                if let Some(final_report) = &telemetry.final_report {
                    report::render_final(final_report);
                }
            }
            _ => {
                if let Some(tick_report) = telemetry.reports.last() {
                    report::render_tick(tick_report);
                }
            }
        }
    });
    if let Some(pb) = &progress {
        pb.finish_with_message("done");
    }

    let telemetry = world.resource::<DispatchTelemetry>();
    if cli.quiet {
        if let Some(final_report) = &telemetry.final_report {
            report::render_final(final_report);
        }
    }

    if let Some(path) = &cli.export_csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        export::export_tick_totals_csv(&telemetry.reports, file)
            .map_err(|e| anyhow::anyhow!("csv export failed: {e}"))?;
        tracing::info!(path = %path.display(), "tick totals exported");
    }
    if let Some(path) = &cli.export_json {
        let Some(final_report) = &telemetry.final_report else {
            bail!("no final report to export");
        };
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        export::export_final_json(final_report, file)
            .map_err(|e| anyhow::anyhow!("json export failed: {e}"))?;
        tracing::info!(path = %path.display(), "final report exported");
    }

    Ok(())
}
