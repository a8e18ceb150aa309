use crate::flight::{Flight, FlightId};
use crate::parking::{ParkingArea, SpotCatalog};
use crate::schedule::capacity::SpotAvailability;
use crate::schedule::projection::DayProjection;
use crate::schedule::validator::{Accepted, Candidate, Rejection};
use crate::time::{DayWindow, Interval, Time};
use std::collections::HashMap;

pub mod capacity;
pub mod projection;
pub mod validator;

/// Immutable snapshot of one fetch cycle: the spot catalog and every flight.
/// All planning questions are answered against a snapshot; a refresh builds
/// a new one.
pub struct Schedule {
    pub areas: Vec<ParkingArea>,
    pub catalog: SpotCatalog,
    pub flights: Vec<Flight>,
    flights_index: HashMap<FlightId, usize>,
}

impl Schedule {
    pub fn new(areas: Vec<ParkingArea>, flights: Vec<Flight>) -> Schedule {
        let catalog = SpotCatalog::from_areas(&areas);
        let flights_index = flights
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id.clone(), i))
            .collect::<HashMap<FlightId, usize>>();
        Schedule {
            areas,
            catalog,
            flights,
            flights_index,
        }
    }

    pub fn flight(&self, id: &str) -> Option<&Flight> {
        self.flights_index.get(id).map(|i| &self.flights[*i])
    }

    pub fn project_day(&self, day: DayWindow) -> DayProjection<'_> {
        projection::project_day(&self.flights, &self.catalog, day)
    }

    pub fn used_footprint(&self, spot_name: &str, start: Time, end: Time) -> f64 {
        capacity::used_footprint(spot_name, start, end, &self.flights)
    }

    pub fn availability(
        &self,
        window: &Interval,
        footprint_sqm: f64,
        exclude: Option<&str>,
    ) -> Vec<SpotAvailability> {
        capacity::spot_availability(&self.catalog, &self.flights, window, footprint_sqm, exclude)
    }

    pub fn validate(&self, candidate: &Candidate, exclude: Option<&str>) -> Result<Accepted, Rejection> {
        validator::validate(candidate, &self.flights, &self.catalog, exclude)
    }
}
