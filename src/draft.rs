use crate::aircraft::Aircraft;
use crate::flight::{Flight, FlightId, new_flight_id};
use crate::parking::SpotName;
use crate::schedule::validator::Candidate;
use crate::time::{Time, TimeParseError};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The assignment form as typed by the operator. Fields stay raw until the
/// draft is turned into a candidate or a flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightDraft {
    pub registration_code: String,
    pub aircraft_type: String,
    pub footprint_sqm: String,
    pub spot_name: Option<SpotName>,
    pub start: Option<Time>,
    pub end: Option<Time>,
}

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("footprint must be a number, got '{0}'")]
    InvalidFootprint(String),
    #[error(transparent)]
    InvalidTime(#[from] TimeParseError),
    #[error("unknown field '{0}', expected one of: reg, type, footprint, spot, start, end")]
    UnknownField(String),
}

impl FlightDraft {
    /// Prefills the form from an existing flight. Flights missing any part of
    /// their assignment cannot be edited through the form.
    pub fn from_flight(flight: &Flight) -> Option<FlightDraft> {
        let aircraft = flight.aircraft.as_ref()?;
        Some(FlightDraft {
            registration_code: aircraft.registration_code.clone(),
            aircraft_type: aircraft.aircraft_type.clone(),
            footprint_sqm: aircraft.footprint_sqm.to_string(),
            spot_name: Some(flight.spot_name()?.clone()),
            start: Some(flight.start_date_time?),
            end: Some(flight.end_date_time?),
        })
    }

    pub fn set(&mut self, field: &str, value: &str) -> Result<(), DraftError> {
        let value = value.trim();
        match field {
            "reg" | "registration" => self.registration_code = value.to_string(),
            "type" => self.aircraft_type = value.to_string(),
            "footprint" | "sqm" => self.footprint_sqm = value.to_string(),
            "spot" => self.spot_name = (!value.is_empty()).then(|| Arc::from(value)),
            "start" => self.start = Some(value.parse()?),
            "end" => self.end = Some(value.parse()?),
            _ => return Err(DraftError::UnknownField(field.to_string())),
        }
        Ok(())
    }

    pub fn footprint(&self) -> Result<f64, DraftError> {
        let raw = self.footprint_sqm.trim();
        if raw.is_empty() {
            return Err(DraftError::MissingField("footprint"));
        }
        raw.parse()
            .map_err(|_| DraftError::InvalidFootprint(raw.to_string()))
    }

    pub fn candidate(&self) -> Result<Candidate, DraftError> {
        Ok(Candidate {
            spot_name: self.spot_name.clone().ok_or(DraftError::MissingField("spot"))?,
            footprint_sqm: self.footprint()?,
            start: self.start.ok_or(DraftError::MissingField("start"))?,
            end: self.end.ok_or(DraftError::MissingField("end"))?,
        })
    }

    /// Builds the flight to submit. Editing keeps the selected flight's id,
    /// otherwise a fresh one is generated.
    pub fn to_flight(&self, id: Option<FlightId>) -> Result<Flight, DraftError> {
        if self.registration_code.is_empty() {
            return Err(DraftError::MissingField("registration code"));
        }
        if self.aircraft_type.is_empty() {
            return Err(DraftError::MissingField("aircraft type"));
        }
        let candidate = self.candidate()?;
        Ok(Flight::new(
            id.unwrap_or_else(new_flight_id),
            Aircraft::new(
                &self.registration_code,
                &self.aircraft_type,
                candidate.footprint_sqm,
            ),
            candidate.spot_name,
            candidate.start,
            candidate.end,
        ))
    }
}

impl fmt::Display for FlightDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show<T: fmt::Display>(v: &Option<T>) -> String {
            v.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
        }
        writeln!(f, "  registration: {}", self.registration_code)?;
        writeln!(f, "  type:         {}", self.aircraft_type)?;
        writeln!(f, "  footprint:    {} m2", self.footprint_sqm)?;
        writeln!(f, "  spot:         {}", show(&self.spot_name))?;
        writeln!(f, "  start:        {}", show(&self.start))?;
        write!(f, "  end:          {}", show(&self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FlightDraft {
        let mut draft = FlightDraft::default();
        draft.set("reg", "PH-BXA").unwrap();
        draft.set("type", "B738").unwrap();
        draft.set("footprint", "40").unwrap();
        draft.set("spot", "A1").unwrap();
        draft.set("start", "2024-05-01 10:00").unwrap();
        draft.set("end", "2024-05-01 12:00").unwrap();
        draft
    }

    #[test]
    fn test_candidate_from_filled_draft() {
        let candidate = filled().candidate().unwrap();
        assert_eq!(candidate.spot_name.as_ref(), "A1");
        assert_eq!(candidate.footprint_sqm, 40.0);
        assert_eq!(candidate.start, "2024-05-01T10:00".parse().unwrap());
    }

    #[test]
    fn test_missing_and_invalid_fields() {
        let mut draft = filled();
        draft.spot_name = None;
        assert_eq!(draft.candidate(), Err(DraftError::MissingField("spot")));

        let mut draft = filled();
        draft.set("footprint", "big").unwrap();
        assert_eq!(
            draft.candidate(),
            Err(DraftError::InvalidFootprint("big".to_string()))
        );

        let mut draft = filled();
        draft.registration_code.clear();
        assert_eq!(
            draft.to_flight(None),
            Err(DraftError::MissingField("registration code"))
        );

        assert!(matches!(
            filled().set("start", "noon"),
            Err(DraftError::InvalidTime(_))
        ));
        assert_eq!(
            filled().set("gate", "B2"),
            Err(DraftError::UnknownField("gate".to_string()))
        );
    }

    #[test]
    fn test_to_flight_keeps_selected_id() {
        let edited = filled().to_flight(Some(Arc::from("F1"))).unwrap();
        assert_eq!(edited.id.as_ref(), "F1");

        let created = filled().to_flight(None).unwrap();
        assert_ne!(created.id.as_ref(), "F1");
        assert_eq!(created.footprint_sqm(), Some(40.0));
    }

    #[test]
    fn test_prefill_from_flight() {
        let flight = filled().to_flight(Some(Arc::from("F1"))).unwrap();
        assert_eq!(FlightDraft::from_flight(&flight), Some(filled()));

        let incomplete = Flight {
            end_date_time: None,
            ..flight
        };
        assert_eq!(FlightDraft::from_flight(&incomplete), None);
    }
}
