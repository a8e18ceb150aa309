use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fmt::Formatter;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    #[serde(default, deserialize_with = "nullable_text")]
    pub registration_code: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub aircraft_type: String,
    #[serde(default, deserialize_with = "footprint")]
    pub footprint_sqm: f64,
}

impl Aircraft {
    pub fn new(registration_code: &str, aircraft_type: &str, footprint_sqm: f64) -> Aircraft {
        Aircraft {
            registration_code: registration_code.to_string(),
            aircraft_type: aircraft_type.to_string(),
            footprint_sqm,
        }
    }
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {}m2",
            self.registration_code, self.aircraft_type, self.footprint_sqm
        )
    }
}

fn nullable_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// The form posts the footprint as typed text, so both "40" and 40 are accepted.
fn footprint<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSqm {
        Number(f64),
        Text(String),
    }

    match Option::<RawSqm>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(RawSqm::Number(n)) => Ok(n),
        Some(RawSqm::Text(s)) if s.trim().is_empty() => Ok(0.0),
        Some(RawSqm::Text(s)) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
