//! Result export: per-tick totals as CSV, the final report as JSON.

use std::fs::File;

use dispatch_core::telemetry::TickReport;

pub fn export_tick_totals_csv(
    reports: &[TickReport],
    file: File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "minute",
        "released",
        "reassigned",
        "active_km",
        "dead_km",
        "driver_pay",
        "customer_fare",
        "profit",
        "efficiency",
        "assigned",
        "unassigned",
    ])?;

    for report in reports {
        wtr.write_record([
            &report.minute.to_string(),
            &report.released.to_string(),
            &report.reassigned.to_string(),
            &report.totals.active_km.to_string(),
            &report.totals.dead_km.to_string(),
            &report.totals.driver_pay.to_string(),
            &report.totals.customer_fare.to_string(),
            &report.totals.profit.to_string(),
            &report.totals.efficiency.to_string(),
            &report.totals.assigned.to_string(),
            &report.totals.unassigned.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_final_json(
    report: &TickReport,
    file: File,
) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}
