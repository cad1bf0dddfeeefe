use std::collections::BTreeMap;

use foundation::math::LonLat;
use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// Descriptive metadata of a country with data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryMeta {
    pub region: String,
    pub threat_level: String,
    #[serde(default)]
    pub partners: u32,
    #[serde(default)]
    pub contracts: u32,
}

/// Capital beacon drawn on top of a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    pub country: String,
    pub capital: String,
    pub lon: f64,
    pub lat: f64,
}

impl Beacon {
    pub fn at(&self) -> LonLat {
        LonLat::new(self.lon, self.lat)
    }
}

/// Selection payload handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryInfo {
    pub id: u32,
    pub name: String,
    pub has_data: bool,
    pub region: String,
    pub threat_level: String,
    pub partners: u32,
    pub contracts: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CountryDataset {
    /// Numeric country code → display name.
    pub names: BTreeMap<u32, String>,
    /// Display name → metadata. Sparse.
    #[serde(default)]
    pub metadata: BTreeMap<String, CountryMeta>,
    #[serde(default)]
    pub beacons: Vec<Beacon>,
}

impl CountryDataset {
    pub fn from_json_str(payload: &str) -> Result<Self, AssetError> {
        let dataset: Self =
            serde_json::from_str(payload).map_err(AssetError::json("country dataset"))?;
        for b in &dataset.beacons {
            if !b.at().is_finite() || b.lat.abs() > 90.0 {
                return Err(AssetError::Invalid {
                    what: "beacon",
                    reason: format!("{} has invalid coordinates", b.capital),
                });
            }
        }
        Ok(dataset)
    }

    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn meta_of(&self, id: u32) -> Option<&CountryMeta> {
        self.metadata.get(self.name_of(id)?)
    }

    pub fn has_data(&self, id: u32) -> bool {
        self.meta_of(id).is_some()
    }

    pub fn beacon_for(&self, name: &str) -> Option<&Beacon> {
        self.beacons.iter().find(|b| b.country == name)
    }

    /// Full record for countries with metadata; a minimal one otherwise.
    pub fn info_for(&self, id: u32) -> CountryInfo {
        let name = self
            .name_of(id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Country {id}"));
        match self.metadata.get(&name) {
            Some(meta) => CountryInfo {
                id,
                name,
                has_data: true,
                region: meta.region.clone(),
                threat_level: meta.threat_level.clone(),
                partners: meta.partners,
                contracts: meta.contracts,
            },
            None => CountryInfo {
                id,
                name,
                has_data: false,
                region: "Unknown".to_string(),
                threat_level: "Unknown".to_string(),
                partners: 0,
                contracts: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CountryDataset;
    use pretty_assertions::assert_eq;

    const PAYLOAD: &str = r#"{
        "names": {"250": "France", "4": "Afghanistan"},
        "metadata": {
            "France": {"region": "Europe", "threat_level": "Low", "partners": 12, "contracts": 4}
        },
        "beacons": [{"country": "France", "capital": "Paris", "lon": 2.35, "lat": 48.86}]
    }"#;

    #[test]
    fn resolves_names_and_metadata() {
        let ds = CountryDataset::from_json_str(PAYLOAD).expect("parse");
        assert_eq!(ds.name_of(250), Some("France"));
        assert!(ds.has_data(250));
        assert!(!ds.has_data(4));
        assert_eq!(ds.beacon_for("France").map(|b| b.capital.as_str()), Some("Paris"));
    }

    #[test]
    fn synthesizes_minimal_info_without_metadata() {
        let ds = CountryDataset::from_json_str(PAYLOAD).expect("parse");
        let info = ds.info_for(4);
        assert_eq!(info.name, "Afghanistan");
        assert!(!info.has_data);
        assert_eq!(info.partners, 0);
        assert_eq!(ds.info_for(999).name, "Country 999");
        assert_eq!(ds.info_for(250).contracts, 4);
    }

    #[test]
    fn rejects_bad_beacons() {
        let bad = r#"{"names": {}, "beacons": [{"country": "X", "capital": "Y", "lon": 0, "lat": 95}]}"#;
        assert!(CountryDataset::from_json_str(bad).is_err());
    }
}
