#![allow(dead_code)]

use dispatch_core::booking::{Booking, BookingOrigin};
use dispatch_core::fleet::Vehicle;
use dispatch_core::geo::{distance_km, GeoPoint};

pub fn vehicle(id: u32, class: u8, home: GeoPoint) -> Vehicle {
    Vehicle::new(id, class, home)
}

/// A booking along the equatorial test corridor: pickup at `lng`, drop 0.05
/// degrees (~5.6 km) further east.
pub fn corridor_booking(
    id: u32,
    class: u8,
    pickup_time: u32,
    lng: f64,
    origin: BookingOrigin,
) -> Booking {
    let pickup = GeoPoint::new(0.0, lng);
    let drop = GeoPoint::new(0.0, lng + 0.05);
    Booking {
        id,
        class,
        pickup,
        drop,
        pickup_time,
        distance_km: distance_km(pickup, drop),
        travel_time: 15,
        origin,
    }
}

pub fn scheduled(id: u32, class: u8, pickup_time: u32, lng: f64) -> Booking {
    corridor_booking(id, class, pickup_time, lng, BookingOrigin::Scheduled)
}

pub fn instant(id: u32, class: u8, pickup_time: u32, lng: f64) -> Booking {
    corridor_booking(id, class, pickup_time, lng, BookingOrigin::Instant)
}
