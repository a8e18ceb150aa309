use crate::flight::Flight;
use crate::schedule::Schedule;
use crate::schedule::projection::{StyleHint, chart_rows, project_day};
use crate::schedule::tests::utils::{
    add_area, add_flight, add_incomplete_flight, at, catalog, day, id, spot,
};

#[test]
fn test_every_spot_is_present() {
    let catalog = catalog(vec![spot("A", 100.0), spot("B", 100.0), spot("C", 100.0)]);
    let mut flights = Vec::new();
    add_flight(&mut flights, "F1", "B", 30.0, "10:00", "12:00");

    let projection = project_day(&flights, &catalog, day());

    let keys: Vec<&str> = projection.iter().map(|(name, _)| name.as_ref()).collect();
    assert_eq!(keys, vec!["A", "B", "C"]);
    assert_eq!(projection.get("A").map(|p| p.len()), Some(0));
    assert_eq!(projection.get("B").map(|p| p.len()), Some(1));
    assert!(projection.get("X").is_none());
}

#[test]
fn test_clips_to_day() {
    let catalog = catalog(vec![spot("A", 100.0)]);
    let mut flights = Vec::new();
    add_flight(&mut flights, "F1", "A", 30.0, "2024-04-30T20:00", "2024-05-01T06:00");
    add_flight(&mut flights, "F2", "A", 30.0, "2024-05-01T20:00", "2024-05-03T06:00");
    add_flight(&mut flights, "F3", "A", 30.0, "2024-04-30T00:00", "2024-05-05T00:00");

    let projection = project_day(&flights, &catalog, day());
    let a = projection.get("A").unwrap();

    assert_eq!((a[0].start, a[0].end), (at("00:00"), at("06:00")));
    assert_eq!((a[1].start, a[1].end), (at("20:00"), day().end));
    assert_eq!((a[2].start, a[2].end), (day().start, day().end));
    assert_eq!(a[0].flight.id, id("F1"));
}

#[test]
fn test_other_days_and_touching_flights_excluded() {
    let catalog = catalog(vec![spot("A", 100.0)]);
    let mut flights = Vec::new();
    add_flight(&mut flights, "F1", "A", 30.0, "2024-04-30T20:00", "2024-05-01T00:00");
    add_flight(&mut flights, "F2", "A", 30.0, "2024-05-02T00:00", "2024-05-02T06:00");
    add_flight(&mut flights, "F3", "A", 30.0, "2024-05-03T10:00", "2024-05-03T12:00");

    let projection = project_day(&flights, &catalog, day());

    assert!(projection.get("A").unwrap().is_empty());
}

#[test]
fn test_input_order_is_kept() {
    let catalog = catalog(vec![spot("A", 100.0)]);
    let mut flights = Vec::new();
    add_flight(&mut flights, "LATE", "A", 30.0, "18:00", "19:00");
    add_flight(&mut flights, "EARLY", "A", 30.0, "06:00", "07:00");

    let projection = project_day(&flights, &catalog, day());
    let ids: Vec<&str> = projection
        .get("A")
        .unwrap()
        .iter()
        .map(|p| p.flight.id.as_ref())
        .collect();

    assert_eq!(ids, vec!["LATE", "EARLY"]);
}

#[test]
fn test_incomplete_and_unknown_spot_flights_are_skipped() {
    let catalog = catalog(vec![spot("A", 100.0)]);
    let mut flights = Vec::new();
    add_incomplete_flight(&mut flights, "F1", None, Some("08:00"), Some("09:00"));
    add_incomplete_flight(&mut flights, "F2", Some("A"), None, Some("09:00"));
    add_incomplete_flight(&mut flights, "F3", Some("A"), Some("08:00"), None);
    add_flight(&mut flights, "F4", "Z", 30.0, "08:00", "09:00");

    let projection = project_day(&flights, &catalog, day());

    assert_eq!(projection.len(), 1);
    assert!(projection.get("A").unwrap().is_empty());
}

#[test]
fn test_chart_rows() {
    let mut areas = Vec::new();
    add_area(&mut areas, "North", vec![spot("A", 100.0), spot("B", 100.0)]);
    let mut flights = Vec::new();
    add_flight(&mut flights, "F1", "A", 30.0, "10:00", "12:00");
    add_flight(&mut flights, "F2", "A", 40.0, "2024-05-01T22:00", "2024-05-02T02:00");
    let schedule = Schedule::new(areas, flights);

    let rows = chart_rows(&schedule.project_day(day()));

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].spot_name, id("A"));
    assert_eq!(rows[0].label, "REG-F1 - B738 - 30m2");
    assert_eq!(rows[0].style, StyleHint::Assigned);
    assert_eq!(rows[0].flight_id, Some(id("F1")));
    assert_eq!(rows[1].end, day().end);

    assert_eq!(rows[2].row, 2);
    assert_eq!(rows[2].spot_name, id("B"));
    assert_eq!(rows[2].label, "");
    assert_eq!(rows[2].style, StyleHint::Placeholder);
    assert_eq!((rows[2].start, rows[2].end), (day().start, day().end));
    assert_eq!(rows[2].flight_id, None);
}

#[test]
fn test_chart_row_without_aircraft() {
    let catalog = catalog(vec![spot("A", 100.0)]);
    let mut flights: Vec<Flight> = Vec::new();
    add_flight(&mut flights, "F1", "A", 30.0, "10:00", "12:00");
    flights[0].aircraft = None;

    let rows = chart_rows(&project_day(&flights, &catalog, day()));

    assert_eq!(rows[0].label, "unknown aircraft");
    assert_eq!(rows[0].style, StyleHint::Assigned);
}
