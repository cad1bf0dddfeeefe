//! Base map: country polygons and the border mesh between them.
//!
//! Input is a GeoJSON FeatureCollection. Areal features with a numeric id are
//! countries. Linear features (`LineString`/`MultiLineString`) are taken as a
//! precomputed border mesh; when none are present the mesh is derived from
//! edges shared by two different countries.

use std::collections::HashMap;

use foundation::math::LonLat;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AssetError;
use crate::geojson::{FeatureId, parse_feature_collection};

#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub id: u32,
    /// `[polygon][ring][point]`, first ring of each polygon is the outer ring.
    pub polygons: Vec<Vec<Vec<LonLat>>>,
}

impl CountryShape {
    pub fn rings(&self) -> impl Iterator<Item = &Vec<LonLat>> {
        self.polygons.iter().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BaseMap {
    pub countries: Vec<CountryShape>,
    pub borders: Vec<Vec<LonLat>>,
}

impl BaseMap {
    pub fn from_geojson_str(payload: &str) -> Result<Self, AssetError> {
        let value: Value = serde_json::from_str(payload).map_err(AssetError::json("base map"))?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, AssetError> {
        let features = parse_feature_collection(value)?;
        let mut countries: Vec<CountryShape> = Vec::new();
        let mut borders = Vec::new();

        for (index, feature) in features.iter().enumerate() {
            let Some(geometry) = &feature.geometry else {
                continue;
            };
            let lines = geometry.lines();
            if !lines.is_empty() {
                borders.extend(lines);
                continue;
            }
            let polygons = geometry.polygons();
            if polygons.is_empty() {
                continue;
            }
            let Some(id) = feature.id.as_ref().and_then(FeatureId::as_u32) else {
                warn!(index, "base map feature without a numeric id skipped");
                continue;
            };
            // Some sources split one country across several features.
            match countries.iter_mut().find(|c| c.id == id) {
                Some(existing) => existing.polygons.extend(polygons),
                None => countries.push(CountryShape { id, polygons }),
            }
        }

        if countries.is_empty() {
            return Err(AssetError::Invalid {
                what: "base map",
                reason: "no country polygons".to_string(),
            });
        }
        if borders.is_empty() {
            borders = shared_border_mesh(&countries);
        }
        debug!(
            countries = countries.len(),
            borders = borders.len(),
            "base map parsed"
        );
        Ok(Self { countries, borders })
    }

    pub fn country(&self, id: u32) -> Option<&CountryShape> {
        self.countries.iter().find(|c| c.id == id)
    }
}

type PointKey = (i64, i64);

fn key(p: LonLat) -> PointKey {
    ((p.lon * 1e6).round() as i64, (p.lat * 1e6).round() as i64)
}

fn edge_key(a: LonLat, b: LonLat) -> (PointKey, PointKey) {
    let (ka, kb) = (key(a), key(b));
    if ka <= kb { (ka, kb) } else { (kb, ka) }
}

/// Interior borders: runs of ring edges owned by at least two countries.
///
/// Each shared edge is emitted once, by the lowest owning country id.
fn shared_border_mesh(countries: &[CountryShape]) -> Vec<Vec<LonLat>> {
    let mut owners: HashMap<(PointKey, PointKey), Vec<u32>> = HashMap::new();
    for c in countries {
        for ring in c.rings() {
            for w in ring.windows(2) {
                let entry = owners.entry(edge_key(w[0], w[1])).or_default();
                if !entry.contains(&c.id) {
                    entry.push(c.id);
                }
            }
        }
    }

    let mut lines = Vec::new();
    for c in countries {
        for ring in c.rings() {
            let mut run: Vec<LonLat> = Vec::new();
            for w in ring.windows(2) {
                let emit = owners
                    .get(&edge_key(w[0], w[1]))
                    .is_some_and(|o| o.len() > 1 && o.iter().min() == Some(&c.id));
                if emit {
                    if run.is_empty() {
                        run.push(w[0]);
                    }
                    run.push(w[1]);
                } else if !run.is_empty() {
                    lines.push(std::mem::take(&mut run));
                }
            }
            if !run.is_empty() {
                lines.push(run);
            }
        }
    }
    lines
}
