use crate::aircraft::Aircraft;
use crate::parking::SpotName;
use crate::time::{Interval, Time};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use tabled::Tabled;

pub type FlightId = Arc<str>;

pub fn new_flight_id() -> FlightId {
    Arc::from(uuid::Uuid::new_v4().to_string())
}

/// Weak reference to a parking spot. Only the name is kept; any other spot
/// fields sent along by the backend are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpotRef {
    pub name: SpotName,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    #[serde(default = "new_flight_id")]
    pub id: FlightId,
    #[serde(default)]
    pub aircraft: Option<Aircraft>,
    #[serde(default)]
    pub parking_spot: Option<SpotRef>,
    #[serde(default)]
    pub start_date_time: Option<Time>,
    #[serde(default)]
    pub end_date_time: Option<Time>,
}

impl Flight {
    pub fn new(id: FlightId, aircraft: Aircraft, spot: SpotName, start: Time, end: Time) -> Flight {
        Flight {
            id,
            aircraft: Some(aircraft),
            parking_spot: Some(SpotRef { name: spot }),
            start_date_time: Some(start),
            end_date_time: Some(end),
        }
    }

    pub fn spot_name(&self) -> Option<&SpotName> {
        self.parking_spot.as_ref().map(|s| &s.name)
    }

    pub fn footprint_sqm(&self) -> Option<f64> {
        self.aircraft.as_ref().map(|a| a.footprint_sqm)
    }

    /// `None` for degenerate flights: a bound is missing or the flight does
    /// not end after it starts.
    pub fn interval(&self) -> Option<Interval> {
        match (self.start_date_time, self.end_date_time) {
            (Some(start), Some(end)) if end > start => Some((start, end)),
            _ => None,
        }
    }
}

fn or_dash<T: ToString>(value: Option<T>) -> Cow<'static, str> {
    value
        .map(|v| Cow::Owned(v.to_string()))
        .unwrap_or(Cow::Borrowed("-"))
}

impl Tabled for Flight {
    const LENGTH: usize = 6;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        let aircraft = self.aircraft.as_ref();
        vec![
            Cow::Borrowed(self.id.as_ref()),
            or_dash(self.spot_name()),
            or_dash(aircraft.map(|a| a.registration_code.as_str())),
            or_dash(aircraft.map(|a| format!("{} / {}m2", a.aircraft_type, a.footprint_sqm))),
            or_dash(self.start_date_time),
            or_dash(self.end_date_time),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        ["id", "spot", "registration", "type", "start", "end"]
            .into_iter()
            .map(Cow::Borrowed)
            .collect()
    }
}
