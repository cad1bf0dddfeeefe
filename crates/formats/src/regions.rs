//! Focus regions: installations and conflict zones shown in the close-up view.

use foundation::math::LonLat;
use serde::{Deserialize, Serialize};

use crate::error::AssetError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Installation,
    ConflictZone,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStatus {
    Militarized,
    Incident,
    Disputed,
    Controlled,
}

impl MarkerStatus {
    /// Theme key of the status color.
    pub fn color_key(self) -> &'static str {
        match self {
            MarkerStatus::Militarized => "militarized",
            MarkerStatus::Incident => "incident",
            MarkerStatus::Disputed => "disputed",
            MarkerStatus::Controlled => "controlled",
        }
    }

    /// Range-ring dash pattern `[on, off]` in px; `None` for a solid ring.
    pub fn dash(self) -> Option<[f64; 2]> {
        match self {
            MarkerStatus::Militarized => None,
            MarkerStatus::Incident => Some([2.0, 3.0]),
            MarkerStatus::Disputed => Some([6.0, 4.0]),
            MarkerStatus::Controlled => Some([10.0, 3.0]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub label: String,
    pub kind: MarkerKind,
    /// Theme key of the category color (e.g. "naval", "air").
    pub category: String,
    pub status: MarkerStatus,
    pub lon: f64,
    pub lat: f64,
    /// Range-ring radius; 0 draws no ring.
    #[serde(default)]
    pub radius_km: f64,
}

impl Marker {
    pub fn at(&self) -> LonLat {
        LonLat::new(self.lon, self.lat)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusRegion {
    pub id: String,
    pub label: String,
    /// `[lon, lat]` the camera centers on.
    pub center: [f64; 2],
    /// Close-up zoom; falls back to the configured focus zoom.
    #[serde(default)]
    pub zoom: Option<f64>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl FocusRegion {
    pub fn center(&self) -> LonLat {
        LonLat::new(self.center[0], self.center[1])
    }

    pub fn installations(&self) -> impl Iterator<Item = &Marker> {
        self.markers
            .iter()
            .filter(|m| m.kind == MarkerKind::Installation)
    }

    pub fn conflict_zones(&self) -> impl Iterator<Item = &Marker> {
        self.markers
            .iter()
            .filter(|m| m.kind == MarkerKind::ConflictZone)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionSet {
    pub regions: Vec<FocusRegion>,
}

impl RegionSet {
    pub fn from_json_str(payload: &str) -> Result<Self, AssetError> {
        let set: Self = serde_json::from_str(payload).map_err(AssetError::json("focus regions"))?;
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<(), AssetError> {
        let invalid = |reason: String| AssetError::Invalid {
            what: "focus region",
            reason,
        };
        for r in &self.regions {
            if !r.center().is_finite() || r.center[1].abs() > 90.0 {
                return Err(invalid(format!("{}: center out of range", r.id)));
            }
            if let Some(z) = r.zoom
                && !(z.is_finite() && z > 1.0)
            {
                return Err(invalid(format!("{}: zoom must be > 1", r.id)));
            }
            for m in &r.markers {
                if !m.at().is_finite() || m.lat.abs() > 90.0 {
                    return Err(invalid(format!("{}/{}: bad coordinates", r.id, m.id)));
                }
                if !(m.radius_km.is_finite() && m.radius_km >= 0.0) {
                    return Err(invalid(format!("{}/{}: bad radius", r.id, m.id)));
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&FocusRegion> {
        self.regions.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkerKind, MarkerStatus, RegionSet};

    const PAYLOAD: &str = r#"{"regions": [{
        "id": "baltic", "label": "Baltic", "center": [20.0, 57.0], "zoom": 3.2,
        "markers": [
            {"id": "a", "label": "Base A", "kind": "installation", "category": "naval",
             "status": "militarized", "lon": 21.0, "lat": 56.0, "radius_km": 120},
            {"id": "b", "label": "Zone B", "kind": "conflict_zone", "category": "border",
             "status": "disputed", "lon": 24.0, "lat": 58.0}
        ]
    }]}"#;

    #[test]
    fn parses_and_partitions_markers() {
        let set = RegionSet::from_json_str(PAYLOAD).expect("parse");
        let r = set.get("baltic").expect("region");
        assert_eq!(r.installations().count(), 1);
        assert_eq!(r.conflict_zones().count(), 1);
        assert_eq!(r.markers[1].kind, MarkerKind::ConflictZone);
        assert_eq!(r.markers[1].radius_km, 0.0);
        assert!(set.get("pacific").is_none());
    }

    #[test]
    fn status_selects_dash_style() {
        assert_eq!(MarkerStatus::Militarized.dash(), None);
        assert!(MarkerStatus::Disputed.dash().is_some());
        assert_ne!(MarkerStatus::Incident.dash(), MarkerStatus::Controlled.dash());
    }

    #[test]
    fn rejects_unzoomed_region() {
        let bad = PAYLOAD.replace("3.2", "0.5");
        assert!(RegionSet::from_json_str(&bad).is_err());
    }
}
