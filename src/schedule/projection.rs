use crate::flight::{Flight, FlightId};
use crate::parking::{SpotCatalog, SpotName};
use crate::time::{DayWindow, Time};
use std::collections::HashMap;
use std::fmt;
use tabled::Tabled;

/// A flight as seen on one day: its interval clipped to the day window.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedInterval<'a> {
    pub flight: &'a Flight,
    pub start: Time,
    pub end: Time,
}

/// Flights of one day grouped by parking spot. Every catalog spot is present,
/// in catalog order, even when nothing is parked on it that day.
#[derive(Debug, Clone)]
pub struct DayProjection<'a> {
    pub day: DayWindow,
    spots: Vec<(SpotName, Vec<ProjectedInterval<'a>>)>,
}

impl<'a> DayProjection<'a> {
    pub fn get(&self, spot_name: &str) -> Option<&[ProjectedInterval<'a>]> {
        self.spots
            .iter()
            .find(|(name, _)| **name == *spot_name)
            .map(|(_, intervals)| intervals.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SpotName, &[ProjectedInterval<'a>])> {
        self.spots.iter().map(|(name, intervals)| (name, intervals.as_slice()))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.spots.len()
    }
}

/// Groups the flights overlapping `day` by spot and clips them to the day.
/// Within a spot, flights keep their input order.
pub fn project_day<'a>(flights: &'a [Flight], catalog: &SpotCatalog, day: DayWindow) -> DayProjection<'a> {
    let mut grouped = flights
        .iter()
        .filter_map(|f| Some((f.spot_name()?, f.interval()?, f)))
        .filter(|(_, interval, _)| day.overlaps(interval))
        .fold(
            HashMap::<&str, Vec<ProjectedInterval<'a>>>::new(),
            |mut acc, (spot, (start, end), flight)| {
                let (start, end) = day.clip(start, end);
                acc.entry(spot.as_ref())
                    .or_default()
                    .push(ProjectedInterval { flight, start, end });
                acc
            },
        );

    let spots = catalog
        .iter()
        .map(|spot| {
            let intervals = grouped.remove(spot.name.as_ref()).unwrap_or_default();
            (spot.name.clone(), intervals)
        })
        .collect();

    if !grouped.is_empty() {
        tracing::debug!(
            spots = ?grouped.keys().collect::<Vec<_>>(),
            "flights parked on spots missing from the catalog were not projected"
        );
    }

    DayProjection { day, spots }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleHint {
    Assigned,
    /// Nothing parked on the spot that day; drawn invisibly across the day.
    Placeholder,
}

impl fmt::Display for StyleHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleHint::Assigned => write!(f, "assigned"),
            StyleHint::Placeholder => write!(f, "empty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct ChartRow {
    #[tabled(rename = "#")]
    pub row: usize,
    #[tabled(rename = "spot")]
    pub spot_name: SpotName,
    #[tabled(rename = "aircraft")]
    pub label: String,
    pub start: Time,
    pub end: Time,
    #[tabled(rename = "state")]
    pub style: StyleHint,
    #[tabled(skip)]
    pub flight_id: Option<FlightId>,
}

/// Timeline rows: one per projected flight, or a single placeholder row
/// spanning the whole day for a spot without flights.
pub fn chart_rows(projection: &DayProjection<'_>) -> Vec<ChartRow> {
    let day = projection.day;
    projection
        .iter()
        .flat_map(|(spot, intervals)| {
            if intervals.is_empty() {
                vec![(spot.clone(), String::new(), day.start, day.end, StyleHint::Placeholder, None)]
            } else {
                intervals
                    .iter()
                    .map(|p| {
                        let label = p
                            .flight
                            .aircraft
                            .as_ref()
                            .map(|a| a.to_string())
                            .unwrap_or_else(|| "unknown aircraft".to_string());
                        (spot.clone(), label, p.start, p.end, StyleHint::Assigned, Some(p.flight.id.clone()))
                    })
                    .collect()
            }
        })
        .enumerate()
        .map(|(row, (spot_name, label, start, end, style, flight_id))| ChartRow {
            row,
            spot_name,
            label,
            start,
            end,
            style,
            flight_id,
        })
        .collect()
}
