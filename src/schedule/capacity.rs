use crate::flight::{Flight, FlightId};
use crate::parking::{SpotCatalog, SpotName};
use crate::time::{Interval, Time};
use std::collections::HashMap;
use std::fmt;
use tabled::Tabled;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpotUsage {
    pub used_sqm: f64,
    pub flights: Vec<FlightId>,
}

/// Spot, footprint and interval of a flight that counts towards capacity.
/// Degenerate flights and negative footprints yield `None`.
fn occupancy(flight: &Flight) -> Option<(&SpotName, f64, Interval)> {
    match (flight.spot_name(), flight.footprint_sqm(), flight.interval()) {
        (Some(spot), Some(sqm), Some(interval)) if sqm >= 0.0 => Some((spot, sqm, interval)),
        (Some(_), Some(sqm), Some(_)) => {
            tracing::debug!(flight = %flight.id, sqm, "skipping flight with negative footprint");
            None
        }
        _ => {
            tracing::debug!(flight = %flight.id, "skipping incomplete flight");
            None
        }
    }
}

/// Footprint committed to `spot_name` by flights overlapping `window`,
/// together with the ids of those flights.
pub fn spot_usage<'a>(
    spot_name: &str,
    window: &Interval,
    flights: impl IntoIterator<Item = &'a Flight>,
) -> SpotUsage {
    if window.1 <= window.0 {
        return SpotUsage::default();
    }
    flights
        .into_iter()
        .filter_map(|f| occupancy(f).map(|(spot, sqm, interval)| (f, spot, sqm, interval)))
        .filter(|&(_, spot, _, interval)| **spot == *spot_name && Time::overlaps(&interval, window))
        .fold(SpotUsage::default(), |mut acc, (flight, _, sqm, _)| {
            acc.used_sqm += sqm;
            acc.flights.push(flight.id.clone());
            acc
        })
}

pub fn used_footprint<'a>(
    spot_name: &str,
    start: Time,
    end: Time,
    flights: impl IntoIterator<Item = &'a Flight>,
) -> f64 {
    spot_usage(spot_name, &(start, end), flights).used_sqm
}

/// Used footprint per spot for every spot touched during `window`.
pub fn usage_by_spot<'a>(
    window: &Interval,
    flights: impl IntoIterator<Item = &'a Flight>,
) -> HashMap<SpotName, f64> {
    if window.1 <= window.0 {
        return HashMap::new();
    }
    flights
        .into_iter()
        .filter_map(occupancy)
        .filter(|(_, _, interval)| Time::overlaps(interval, window))
        .fold(HashMap::new(), |mut acc, (spot, sqm, _)| {
            *acc.entry(spot.clone()).or_insert(0.0) += sqm;
            acc
        })
}

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct SpotAvailability {
    #[tabled(rename = "spot")]
    pub name: SpotName,
    #[tabled(rename = "capacity (m2)")]
    pub capacity_sqm: f64,
    #[tabled(rename = "used (m2)")]
    pub used_sqm: f64,
    #[tabled(rename = "free (m2)")]
    pub remaining_sqm: f64,
    #[tabled(rename = "fits")]
    pub selectable: bool,
}

impl fmt::Display for SpotAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - ({} of {})m2 free",
            self.name, self.remaining_sqm, self.capacity_sqm
        )
    }
}

/// Remaining capacity of every catalog spot for an aircraft of
/// `footprint_sqm` during `window`. `exclude` leaves the flight being edited
/// out of the sums.
pub fn spot_availability(
    catalog: &SpotCatalog,
    flights: &[Flight],
    window: &Interval,
    footprint_sqm: f64,
    exclude: Option<&str>,
) -> Vec<SpotAvailability> {
    let usage = usage_by_spot(
        window,
        flights.iter().filter(|f| Some(f.id.as_ref()) != exclude),
    );
    catalog
        .iter()
        .map(|spot| {
            let used_sqm = usage.get(&spot.name).copied().unwrap_or(0.0);
            let remaining_sqm = spot.footprint_sqm - used_sqm;
            SpotAvailability {
                name: spot.name.clone(),
                capacity_sqm: spot.footprint_sqm,
                used_sqm,
                remaining_sqm,
                selectable: remaining_sqm > 0.0 && footprint_sqm <= remaining_sqm,
            }
        })
        .collect()
}
