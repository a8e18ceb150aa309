use crate::flight::{Flight, FlightId};
use crate::parking::{ParkingArea, SpotCatalog};
use crate::schedule::validator::{self, Candidate};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed scenario: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("flight {0} not found")]
    NotFound(FlightId),
    #[error("submission rejected: {0}")]
    Rejected(String),
}

/// The system of record for flights and parking areas. Local validation is
/// advisory; a backend may still refuse a write.
pub trait Backend {
    fn fetch_flights(&self) -> Result<Vec<Flight>, BackendError>;
    fn fetch_parking_areas(&self) -> Result<Vec<ParkingArea>, BackendError>;
    /// Creates the flight, or replaces the stored flight with the same id.
    fn submit_flight(&mut self, flight: Flight) -> Result<Flight, BackendError>;
    fn delete_flight(&mut self, id: &str) -> Result<(), BackendError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default)]
    pub parking_areas: Vec<ParkingArea>,
    #[serde(default)]
    pub flights: Vec<Flight>,
}

/// Backend over a JSON scenario file, rewritten after every change. Writes
/// are checked against the stored flights before they are accepted.
pub struct ScenarioBackend {
    path: Option<PathBuf>,
    scenario: Scenario,
}

impl ScenarioBackend {
    pub fn load(path: &Path) -> Result<ScenarioBackend, BackendError> {
        let data = std::fs::read_to_string(path).map_err(|source| BackendError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario: Scenario = serde_json::from_str(&data)?;
        tracing::info!(
            path = %path.display(),
            areas = scenario.parking_areas.len(),
            flights = scenario.flights.len(),
            "loaded scenario"
        );
        Ok(ScenarioBackend {
            path: Some(path.to_path_buf()),
            scenario,
        })
    }

    #[cfg(test)]
    pub fn in_memory(scenario: Scenario) -> ScenarioBackend {
        ScenarioBackend {
            path: None,
            scenario,
        }
    }

    fn persist(&self) -> Result<(), BackendError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.scenario)?;
        std::fs::write(path, json).map_err(|source| BackendError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "scenario saved");
        Ok(())
    }

    fn check(&self, flight: &Flight) -> Result<(), BackendError> {
        let incomplete = || BackendError::Rejected(format!("flight {} is incomplete", flight.id));
        let (start, end) = (
            flight.start_date_time.ok_or_else(incomplete)?,
            flight.end_date_time.ok_or_else(incomplete)?,
        );
        let candidate = Candidate {
            spot_name: flight.spot_name().ok_or_else(incomplete)?.clone(),
            footprint_sqm: flight.footprint_sqm().ok_or_else(incomplete)?,
            start,
            end,
        };
        let catalog = SpotCatalog::from_areas(&self.scenario.parking_areas);
        validator::validate(
            &candidate,
            &self.scenario.flights,
            &catalog,
            Some(flight.id.as_ref()),
        )
        .map(|_| ())
        .map_err(|rejection| BackendError::Rejected(rejection.to_string()))
    }
}

impl Backend for ScenarioBackend {
    fn fetch_flights(&self) -> Result<Vec<Flight>, BackendError> {
        Ok(self.scenario.flights.clone())
    }

    fn fetch_parking_areas(&self) -> Result<Vec<ParkingArea>, BackendError> {
        Ok(self.scenario.parking_areas.clone())
    }

    fn submit_flight(&mut self, flight: Flight) -> Result<Flight, BackendError> {
        self.check(&flight)?;
        match self.scenario.flights.iter_mut().find(|f| f.id == flight.id) {
            Some(existing) => {
                tracing::info!(flight = %flight.id, "flight updated");
                *existing = flight.clone();
            }
            None => {
                tracing::info!(flight = %flight.id, "flight created");
                self.scenario.flights.push(flight.clone());
            }
        }
        self.persist()?;
        Ok(flight)
    }

    fn delete_flight(&mut self, id: &str) -> Result<(), BackendError> {
        let before = self.scenario.flights.len();
        self.scenario.flights.retain(|f| f.id.as_ref() != id);
        if self.scenario.flights.len() == before {
            return Err(BackendError::NotFound(id.into()));
        }
        tracing::info!(flight = id, "flight deleted");
        self.persist()
    }
}
