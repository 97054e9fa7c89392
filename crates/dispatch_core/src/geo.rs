//! Geographic oracle: straight-line distances and pickup-time parsing.
//!
//! This module provides:
//!
//! - **GeoPoint**: A raw latitude/longitude coordinate
//! - **Distance calculations**: Haversine distance between two points, cached
//! - **Time parsing**: `"HH:MM"` into minutes since midnight
//!
//! The engine treats `distance_km` as an oracle: everything downstream only
//! assumes it is a pure, symmetric function of its endpoints.

use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock};

use lru::LruCache;
use thiserror::Error;

/// Assumed average speed for deadhead legs (km/h).
pub const DEADHEAD_SPEED_KMH: f64 = 40.0;

/// A raw geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Uncached distance calculation (internal use).
fn distance_km_uncached(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lng.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    6371.0 * c
}

type PointKey = (u64, u64);

fn point_key(p: GeoPoint) -> PointKey {
    (p.lat.to_bits(), p.lng.to_bits())
}

/// Global distance cache (10,000 entries).
fn get_distance_cache() -> &'static Mutex<LruCache<(PointKey, PointKey), f64>> {
    static CACHE: OnceLock<Mutex<LruCache<(PointKey, PointKey), f64>>> = OnceLock::new();
    CACHE.get_or_init(|| {
        Mutex::new(LruCache::new(
            NonZeroUsize::new(10_000).expect("cache size must be non-zero"),
        ))
    })
}

/// Haversine distance between two points with LRU caching.
///
/// Uses a global LRU cache to avoid recomputing trigonometry for frequently
/// accessed point pairs (home bases and popular pickup spots recur all day).
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    // Symmetric key (smaller point first) to maximize cache hits
    let (ka, kb) = (point_key(a), point_key(b));
    let key = if ka < kb { (ka, kb) } else { (kb, ka) };

    let mut cache = get_distance_cache().lock().unwrap();
    *cache.get_or_insert(key, || distance_km_uncached(a, b))
}

/// Minutes needed to cover `km` empty at the given average speed.
pub fn deadhead_minutes(km: f64, speed_kmh: f64) -> f64 {
    if speed_kmh <= 0.0 {
        return f64::INFINITY;
    }
    km / speed_kmh * 60.0
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("expected HH:MM, got {0:?}")]
    Malformed(String),
    #[error("hour {0} out of range")]
    HourOutOfRange(u32),
    #[error("minute {0} out of range")]
    MinuteOutOfRange(u32),
}

/// Parse a `"HH:MM"` wall-clock string into minutes since midnight.
pub fn pickup_minutes(s: &str) -> Result<u32, TimeParseError> {
    let (hh, mm) = s
        .split_once(':')
        .ok_or_else(|| TimeParseError::Malformed(s.to_string()))?;
    let hour: u32 = hh
        .trim()
        .parse()
        .map_err(|_| TimeParseError::Malformed(s.to_string()))?;
    let minute: u32 = mm
        .trim()
        .parse()
        .map_err(|_| TimeParseError::Malformed(s.to_string()))?;
    if hour > 23 {
        return Err(TimeParseError::HourOutOfRange(hour));
    }
    if minute > 59 {
        return Err(TimeParseError::MinuteOutOfRange(minute));
    }
    Ok(hour * 60 + minute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_is_symmetric_and_zero_on_identity() {
        let a = GeoPoint::new(52.52, 13.40);
        let b = GeoPoint::new(52.50, 13.45);
        assert_eq!(distance_km(a, a), 0.0);
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-12);
    }

    #[test]
    fn one_tenth_degree_of_longitude_at_equator() {
        let a = GeoPoint::new(0.0, 0.1);
        let b = GeoPoint::new(0.0, 0.2);
        let d = distance_km(a, b);
        // 0.1 deg of arc on a 6371 km sphere is ~11.1 km
        assert!((d - 11.12).abs() < 0.05, "got {d}");
    }

    #[test]
    fn deadhead_minutes_at_default_speed() {
        assert_eq!(deadhead_minutes(40.0, DEADHEAD_SPEED_KMH), 60.0);
        assert_eq!(deadhead_minutes(10.0, DEADHEAD_SPEED_KMH), 15.0);
        assert!(deadhead_minutes(1.0, 0.0).is_infinite());
    }

    #[test]
    fn parses_wall_clock_times() {
        assert_eq!(pickup_minutes("06:00"), Ok(360));
        assert_eq!(pickup_minutes("19:00"), Ok(1140));
        assert_eq!(pickup_minutes("08:30"), Ok(510));
        assert_eq!(pickup_minutes("00:00"), Ok(0));
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(matches!(
            pickup_minutes("0800"),
            Err(TimeParseError::Malformed(_))
        ));
        assert_eq!(pickup_minutes("24:00"), Err(TimeParseError::HourOutOfRange(24)));
        assert_eq!(
            pickup_minutes("08:60"),
            Err(TimeParseError::MinuteOutOfRange(60))
        );
    }
}
