use crate::aircraft::Aircraft;
use crate::flight::{Flight, SpotRef};
use crate::parking::{ParkingArea, ParkingSpot, SpotCatalog};
use crate::schedule::validator::Candidate;
use crate::time::{DayWindow, Time};
use chrono::{Duration, NaiveDate};
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub const DATE: &str = "2024-05-01";

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn date() -> NaiveDate {
    NaiveDate::parse_from_str(DATE, "%Y-%m-%d").unwrap()
}

pub fn day() -> DayWindow {
    DayWindow::new(date(), 0)
}

/// `"10:00"` on the test date, or a full timestamp.
pub fn at(s: &str) -> Time {
    if s.len() == 5 {
        format!("{}T{}", DATE, s).parse().unwrap()
    } else {
        s.parse().unwrap()
    }
}

pub fn spot(name: &str, footprint_sqm: f64) -> ParkingSpot {
    ParkingSpot {
        name: id(name),
        footprint_sqm,
    }
}

pub fn add_area(areas: &mut Vec<ParkingArea>, name: &str, spots: Vec<ParkingSpot>) {
    areas.push(ParkingArea {
        name: id(name),
        parking_spots: Some(spots),
    });
}

pub fn catalog(spots: Vec<ParkingSpot>) -> SpotCatalog {
    SpotCatalog::new(spots)
}

pub fn add_flight(
    flights: &mut Vec<Flight>,
    flight_id: &str,
    spot_name: &str,
    footprint_sqm: f64,
    start: &str,
    end: &str,
) {
    flights.push(Flight::new(
        id(flight_id),
        Aircraft::new(&format!("REG-{}", flight_id), "B738", footprint_sqm),
        id(spot_name),
        at(start),
        at(end),
    ));
}

pub fn add_incomplete_flight(
    flights: &mut Vec<Flight>,
    flight_id: &str,
    spot_name: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) {
    flights.push(Flight {
        id: id(flight_id),
        aircraft: Some(Aircraft::new("REG", "A320", 10.0)),
        parking_spot: spot_name.map(|s| SpotRef { name: id(s) }),
        start_date_time: start.map(at),
        end_date_time: end.map(at),
    });
}

pub fn candidate(spot_name: &str, footprint_sqm: f64, start: &str, end: &str) -> Candidate {
    Candidate {
        spot_name: id(spot_name),
        footprint_sqm,
        start: at(start),
        end: at(end),
    }
}

pub fn arb_id(prefix: &'static str) -> impl Strategy<Value = Arc<str>> {
    prop_oneof![
        Just(Arc::from(format!("{}_1", prefix))),
        Just(Arc::from(format!("{}_2", prefix))),
        Just(Arc::from(format!("{}_3", prefix))),
    ]
}

/// Minutes relative to midnight of the test date, spanning the day before
/// through the day after.
pub fn arb_interval() -> impl Strategy<Value = (Time, Time)> {
    (-1440..2880i64, 1..1000i64).prop_map(|(start, len)| {
        let start = day().start + Duration::minutes(start);
        (start, start + Duration::minutes(len))
    })
}

pub fn arb_flight() -> impl Strategy<Value = Flight> {
    (arb_id("FL"), arb_id("SPOT"), 0..200u32, arb_interval()).prop_map(
        |(fid, spot, sqm, (start, end))| {
            Flight::new(
                fid,
                Aircraft::new("REG", "B738", sqm as f64),
                spot,
                start,
                end,
            )
        },
    )
}
