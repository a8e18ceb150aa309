use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;
use tabled::Tabled;

pub type SpotName = Arc<str>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpot {
    #[tabled(rename = "spot")]
    pub name: SpotName,
    #[tabled(rename = "footprint (m2)")]
    pub footprint_sqm: f64,
}

impl fmt::Display for ParkingSpot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingArea {
    pub name: Arc<str>,
    #[serde(default)]
    pub parking_spots: Option<Vec<ParkingSpot>>,
}

/// All spots of all areas, flattened in area order then spot order.
#[derive(Clone, Debug, Default)]
pub struct SpotCatalog {
    spots: Vec<ParkingSpot>,
    index: HashMap<SpotName, usize>,
}

impl SpotCatalog {
    pub fn new(spots: Vec<ParkingSpot>) -> SpotCatalog {
        let mut index = HashMap::with_capacity(spots.len());
        for (i, spot) in spots.iter().enumerate() {
            if index.contains_key(&spot.name) {
                tracing::warn!(spot = %spot.name, "duplicate parking spot name, keeping the first");
                continue;
            }
            index.insert(spot.name.clone(), i);
        }
        SpotCatalog { spots, index }
    }

    pub fn from_areas(areas: &[ParkingArea]) -> SpotCatalog {
        SpotCatalog::new(
            areas
                .iter()
                .filter_map(|area| area.parking_spots.as_ref())
                .flatten()
                .cloned()
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&ParkingSpot> {
        self.index.get(name).map(|i| &self.spots[*i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParkingSpot> {
        self.spots.iter()
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}
