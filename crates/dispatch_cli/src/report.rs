//! Console rendering of tick reports and the final snapshot.

use dispatch_core::booking::BookingOrigin;
use dispatch_core::metrics::DispatchTotals;
use dispatch_core::telemetry::{AssignmentSnapshot, TickReport};

/// Format minutes since midnight as `HH:MM`.
pub fn hhmm(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

fn origin_tag(origin: BookingOrigin) -> &'static str {
    match origin {
        BookingOrigin::Scheduled => "scheduled",
        BookingOrigin::Instant => "instant",
    }
}

fn render_totals(totals: &DispatchTotals) -> String {
    format!(
        "fare {:>10.2} | pay {:>10.2} | profit {:>10.2} | eff {:>5.1}% | assigned {:>3} | unassigned {:>3}",
        totals.customer_fare,
        totals.driver_pay,
        totals.profit,
        totals.efficiency * 100.0,
        totals.assigned,
        totals.unassigned
    )
}

fn render_snapshot(snapshot: &AssignmentSnapshot) {
    println!("  vehicles:");
    println!(
        "    {:>4} {:>5} {:>9} {:>9} {:>10} {:>9}  bookings",
        "id", "class", "active_km", "dead_km", "pay", "free_at"
    );
    for row in &snapshot.vehicles {
        let ids: Vec<String> = row.booking_ids.iter().map(|id| id.to_string()).collect();
        println!(
            "    {:>4} {:>5} {:>9.1} {:>9.1} {:>10.2} {:>9}  [{}]",
            row.vehicle_id,
            row.class,
            row.active_km,
            row.dead_km,
            row.driver_pay,
            hhmm(row.available_from),
            ids.join(" ")
        );
    }

    println!("  bookings:");
    println!(
        "    {:>4} {:>5} {:>9} {:>6} {:>8} {:>8}",
        "id", "class", "origin", "pickup", "state", "vehicle"
    );
    for row in &snapshot.bookings {
        let state = if row.locked { "locked" } else { "unlocked" };
        let vehicle = row
            .vehicle_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    {:>4} {:>5} {:>9} {:>6} {:>8} {:>8}",
            row.booking_id,
            row.class,
            origin_tag(row.origin),
            hhmm(row.pickup_time),
            state,
            vehicle
        );
    }
}

/// Print one tick: a header line, totals, and the snapshot when one exists.
pub fn render_tick(report: &TickReport) {
    let marker = if report.reassigned { "reassigned" } else { "idle" };
    println!(
        "── {} ── released {:>2} ── {} ──",
        hhmm(report.minute),
        report.released,
        marker
    );
    println!("  {}", render_totals(&report.totals));
    if let Some(snapshot) = &report.snapshot {
        render_snapshot(snapshot);
    }
}

/// Print the end-of-day report.
pub fn render_final(report: &TickReport) {
    println!();
    println!("══ day complete at {} ══", hhmm(report.minute));
    println!("  {}", render_totals(&report.totals));
    if let Some(snapshot) = &report.snapshot {
        render_snapshot(snapshot);
    }
}
