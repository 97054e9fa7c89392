//! JSON input files: vehicles, scheduled bookings, instant bookings.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use dispatch_core::booking::{Booking, BookingOrigin};
use dispatch_core::fleet::{Fleet, Vehicle};
use dispatch_core::geo::{pickup_minutes, GeoPoint, TimeParseError};
use dispatch_core::pricing::PricingTable;

/// Applied when a booking record omits `travel_time`.
const DEFAULT_TRAVEL_TIME: u32 = 30;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("vehicle_type {0:?} is not of the form \"classN\"")]
    VehicleType(String),
    #[error("bad pickup_time for booking {id}: {source}")]
    PickupTime {
        id: u32,
        #[source]
        source: TimeParseError,
    },
}

#[derive(Debug, Deserialize)]
pub struct VehicleRecord {
    pub vehicle_id: u32,
    pub vehicle_type: String,
    pub home_lat: f64,
    pub home_lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct BookingRecord {
    pub booking_id: u32,
    pub vehicle_type: String,
    pub pickup_lat: f64,
    pub pickup_lon: f64,
    pub drop_lat: f64,
    pub drop_lon: f64,
    pub pickup_time: String,
    pub distance_km: f64,
    pub travel_time: Option<u32>,
}

/// Parse a `"classN"` vehicle type into its numeric class.
pub fn parse_vehicle_class(vehicle_type: &str) -> Result<u8, InputError> {
    vehicle_type
        .strip_prefix("class")
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| InputError::VehicleType(vehicle_type.to_string()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `vehicles.json` into a fleet.
pub fn load_vehicles(path: &Path) -> Result<Fleet, InputError> {
    let records: Vec<VehicleRecord> = read_json(path)?;
    let mut fleet = Fleet::default();
    for record in records {
        let class = parse_vehicle_class(&record.vehicle_type)?;
        fleet.push(Vehicle::new(
            record.vehicle_id,
            class,
            GeoPoint::new(record.home_lat, record.home_lng),
        ));
    }
    Ok(fleet)
}

/// Load a bookings file; both scheduled and instant files share the shape.
pub fn load_bookings(path: &Path, origin: BookingOrigin) -> Result<Vec<Booking>, InputError> {
    let records: Vec<BookingRecord> = read_json(path)?;
    records
        .into_iter()
        .map(|record| {
            let class = parse_vehicle_class(&record.vehicle_type)?;
            let pickup_time =
                pickup_minutes(&record.pickup_time).map_err(|source| InputError::PickupTime {
                    id: record.booking_id,
                    source,
                })?;
            Ok(Booking {
                id: record.booking_id,
                class,
                pickup: GeoPoint::new(record.pickup_lat, record.pickup_lon),
                drop: GeoPoint::new(record.drop_lat, record.drop_lon),
                pickup_time,
                distance_km: record.distance_km,
                travel_time: record.travel_time.unwrap_or(DEFAULT_TRAVEL_TIME),
                origin,
            })
        })
        .collect()
}

/// Warn once per class that has no pricing row and will use fallback rates.
pub fn warn_unknown_classes(fleet: &Fleet, bookings: &[&Booking], pricing: &PricingTable) {
    let mut classes: Vec<u8> = fleet
        .vehicles()
        .iter()
        .map(|v| v.class)
        .chain(bookings.iter().map(|b| b.class))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    classes.sort_unstable();
    for class in classes {
        if !pricing.knows(class) {
            warn!(class, "no pricing row for class, using fallback rates");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_class_names() {
        assert_eq!(parse_vehicle_class("class1").unwrap(), 1);
        assert_eq!(parse_vehicle_class("class9").unwrap(), 9);
        assert!(parse_vehicle_class("van").is_err());
        assert!(parse_vehicle_class("classx").is_err());
    }

    #[test]
    fn loads_vehicles_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"vehicle_id": 1, "vehicle_type": "class2", "home_lat": 52.5, "home_lng": 13.4}}]"#
        )
        .unwrap();

        let fleet = load_vehicles(file.path()).unwrap();
        assert_eq!(fleet.len(), 1);
        let v = fleet.get(1).unwrap();
        assert_eq!(v.class, 2);
        assert_eq!(v.home.lat, 52.5);
    }

    #[test]
    fn loads_bookings_and_defaults_travel_time() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"booking_id": 1, "vehicle_type": "class1",
                  "pickup_lat": 52.5, "pickup_lon": 13.4,
                  "drop_lat": 52.52, "drop_lon": 13.42,
                  "pickup_time": "08:00", "distance_km": 3.5, "travel_time": 20}},
                {{"booking_id": 2, "vehicle_type": "class1",
                  "pickup_lat": 52.5, "pickup_lon": 13.4,
                  "drop_lat": 52.52, "drop_lon": 13.42,
                  "pickup_time": "09:30", "distance_km": 3.5}}
            ]"#
        )
        .unwrap();

        let bookings = load_bookings(file.path(), BookingOrigin::Scheduled).unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].pickup_time, 480);
        assert_eq!(bookings[0].travel_time, 20);
        assert_eq!(bookings[1].pickup_time, 570);
        assert_eq!(bookings[1].travel_time, DEFAULT_TRAVEL_TIME);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            load_vehicles(file.path()),
            Err(InputError::Json { .. })
        ));
    }

    #[test]
    fn bad_pickup_time_names_the_booking() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"booking_id": 7, "vehicle_type": "class1",
                 "pickup_lat": 0.0, "pickup_lon": 0.0,
                 "drop_lat": 0.0, "drop_lon": 0.1,
                 "pickup_time": "25:00", "distance_km": 1.0}}]"#
        )
        .unwrap();
        match load_bookings(file.path(), BookingOrigin::Instant) {
            Err(InputError::PickupTime { id, .. }) => assert_eq!(id, 7),
            other => panic!("expected PickupTime error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_vehicles(Path::new("/nonexistent/vehicles.json")),
            Err(InputError::Io { .. })
        ));
    }
}
