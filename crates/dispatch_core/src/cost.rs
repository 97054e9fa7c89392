//! Route cost kernel: active and dead kilometers over a route polyline.
//!
//! A route is the polyline `(pickup₁, drop₁, pickup₂, drop₂, …)` induced by a
//! vehicle's booking sequence. Active km is the sum of pickup→drop legs; dead
//! km is home→first pickup plus every drop→next pickup. The **open** form
//! excludes the final return home and is what insertion decisions use; the
//! **closing leg** is booked once, when a tick's plan is final.

use crate::booking::Booking;
use crate::geo::{distance_km, GeoPoint};
use crate::pricing::ClassRates;

/// Build the pickup/drop polyline for an ordered booking sequence.
pub fn polyline(bookings: &[&Booking]) -> Vec<GeoPoint> {
    let mut route = Vec::with_capacity(bookings.len() * 2);
    for b in bookings {
        route.push(b.pickup);
        route.push(b.drop);
    }
    route
}

/// Sum of passenger-carrying legs of a pickup/drop polyline.
pub fn active_km(route: &[GeoPoint]) -> f64 {
    route
        .chunks_exact(2)
        .map(|leg| distance_km(leg[0], leg[1]))
        .sum()
}

/// Dead km in the open form: home to first pickup, then each drop to the
/// next pickup. Zero for an empty route.
pub fn open_dead_km(home: GeoPoint, route: &[GeoPoint]) -> f64 {
    let Some(&first_pickup) = route.first() else {
        return 0.0;
    };
    let mut dead = distance_km(home, first_pickup);
    // route[1], route[3], ... are drops; the next pickup follows each
    let mut i = 1;
    while i + 1 < route.len() {
        dead += distance_km(route[i], route[i + 1]);
        i += 2;
    }
    dead
}

/// The final return-home leg: last drop back to home. Zero for an empty route.
pub fn closing_leg_km(home: GeoPoint, route: &[GeoPoint]) -> f64 {
    match route.last() {
        Some(&last_drop) => distance_km(last_drop, home),
        None => 0.0,
    }
}

/// Driver pay for the given kilometer split.
pub fn driver_pay(active_km: f64, dead_km: f64, rates: ClassRates) -> f64 {
    active_km * rates.active_pay + dead_km * rates.dead_pay
}
