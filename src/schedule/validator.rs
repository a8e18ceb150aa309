use crate::flight::{Flight, FlightId};
use crate::parking::{SpotCatalog, SpotName};
use crate::schedule::capacity::spot_usage;
use crate::time::Time;
use thiserror::Error;

/// A proposed parking assignment, new or edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub spot_name: SpotName,
    pub footprint_sqm: f64,
    pub start: Time,
    pub end: Time,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accepted {
    /// Capacity left on the spot for the candidate window, before the candidate parks.
    pub remaining_sqm: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("flight must end after it starts ({start} - {end})")]
    InvalidInterval { start: Time, end: Time },
    #[error("unknown parking spot '{0}'")]
    UnknownSpot(SpotName),
    #[error("aircraft footprint must be a non-negative number, got {0}")]
    InvalidFootprint(f64),
    #[error(
        "spot {spot} has {remaining_sqm}m2 free, aircraft needs {requested_sqm}m2{}",
        occupied_by(.conflicts)
    )]
    CapacityExceeded {
        spot: SpotName,
        requested_sqm: f64,
        remaining_sqm: f64,
        conflicts: Vec<FlightId>,
    },
}

fn occupied_by(conflicts: &[FlightId]) -> String {
    if conflicts.is_empty() {
        String::new()
    } else {
        format!(" (occupied by {})", conflicts.join(", "))
    }
}

/// Checks a candidate assignment against every other flight on the spot.
/// `exclude` is the id of the flight being edited so its previous
/// assignment does not count against itself.
pub fn validate(
    candidate: &Candidate,
    flights: &[Flight],
    catalog: &SpotCatalog,
    exclude: Option<&str>,
) -> Result<Accepted, Rejection> {
    if candidate.end <= candidate.start {
        return Err(Rejection::InvalidInterval {
            start: candidate.start,
            end: candidate.end,
        });
    }

    let spot = catalog
        .get(&candidate.spot_name)
        .ok_or_else(|| Rejection::UnknownSpot(candidate.spot_name.clone()))?;

    if !candidate.footprint_sqm.is_finite() || candidate.footprint_sqm < 0.0 {
        return Err(Rejection::InvalidFootprint(candidate.footprint_sqm));
    }

    let usage = spot_usage(
        &spot.name,
        &(candidate.start, candidate.end),
        flights.iter().filter(|f| Some(f.id.as_ref()) != exclude),
    );
    let remaining_sqm = spot.footprint_sqm - usage.used_sqm;

    if remaining_sqm <= 0.0 || candidate.footprint_sqm > remaining_sqm {
        return Err(Rejection::CapacityExceeded {
            spot: spot.name.clone(),
            requested_sqm: candidate.footprint_sqm,
            remaining_sqm,
            conflicts: usage.flights,
        });
    }

    Ok(Accepted { remaining_sqm })
}
