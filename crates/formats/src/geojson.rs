use foundation::math::LonLat;
use serde_json::{Map, Value};

use crate::error::AssetError;

/// The GeoJSON geometries a base map can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoGeometry {
    Point(LonLat),
    LineString(Vec<LonLat>),
    MultiLineString(Vec<Vec<LonLat>>),
    Polygon(Vec<Vec<LonLat>>),
    MultiPolygon(Vec<Vec<Vec<LonLat>>>),
}

impl GeoGeometry {
    /// Polygons as `[polygon][ring][point]`; empty for non-areal geometry.
    pub fn polygons(&self) -> Vec<Vec<Vec<LonLat>>> {
        match self {
            GeoGeometry::Polygon(rings) => vec![rings.clone()],
            GeoGeometry::MultiPolygon(polys) => polys.clone(),
            _ => Vec::new(),
        }
    }

    /// Polylines; empty for non-linear geometry.
    pub fn lines(&self) -> Vec<Vec<LonLat>> {
        match self {
            GeoGeometry::LineString(line) => vec![line.clone()],
            GeoGeometry::MultiLineString(lines) => lines.clone(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureId {
    Number(f64),
    Text(String),
}

impl FeatureId {
    /// Numeric country code, accepting zero-padded strings such as `"004"`.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            FeatureId::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX) => {
                Some(*n as u32)
            }
            FeatureId::Number(_) => None,
            FeatureId::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub id: Option<FeatureId>,
    pub properties: Map<String, Value>,
    /// `None` for features with a `null` geometry.
    pub geometry: Option<GeoGeometry>,
}

impl GeoFeature {
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }
}

pub fn parse_feature_collection(value: &Value) -> Result<Vec<GeoFeature>, AssetError> {
    let obj = value.as_object().ok_or(AssetError::NotAFeatureCollection)?;
    if obj.get("type").and_then(|v| v.as_str()) != Some("FeatureCollection") {
        return Err(AssetError::NotAFeatureCollection);
    }
    let features_val = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or(AssetError::NotAFeatureCollection)?;

    let mut features = Vec::with_capacity(features_val.len());
    for (index, feat_val) in features_val.iter().enumerate() {
        let invalid = |reason: String| AssetError::InvalidFeature { index, reason };
        let feat_obj = feat_val
            .as_object()
            .ok_or_else(|| invalid("feature must be an object".to_string()))?;
        match feat_obj.get("type").and_then(|v| v.as_str()) {
            Some("Feature") => {}
            Some(other) => return Err(invalid(format!("unexpected feature type: {other}"))),
            None => return Err(invalid("feature missing type".to_string())),
        }

        let id = match feat_obj.get("id") {
            Some(Value::String(s)) => Some(FeatureId::Text(s.clone())),
            Some(Value::Number(n)) => n.as_f64().map(FeatureId::Number),
            _ => None,
        };
        let properties = feat_obj
            .get("properties")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();
        let geometry = match feat_obj.get("geometry") {
            None => return Err(invalid("feature missing geometry".to_string())),
            Some(Value::Null) => None,
            Some(g) => Some(parse_geometry(g).map_err(invalid)?),
        };

        features.push(GeoFeature {
            id,
            properties,
            geometry,
        });
    }
    Ok(features)
}

fn parse_geometry(value: &Value) -> Result<GeoGeometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;
    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(GeoGeometry::Point(parse_position(coords)?)),
        "LineString" => Ok(GeoGeometry::LineString(parse_positions(coords)?)),
        "MultiLineString" => Ok(GeoGeometry::MultiLineString(parse_nested(
            coords,
            parse_positions,
        )?)),
        "Polygon" => Ok(GeoGeometry::Polygon(parse_rings(coords)?)),
        "MultiPolygon" => Ok(GeoGeometry::MultiPolygon(parse_nested(coords, parse_rings)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_position(coords: &Value) -> Result<LonLat, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    let (Some(lon), Some(lat)) = (
        arr.first().and_then(|v| v.as_f64()),
        arr.get(1).and_then(|v| v.as_f64()),
    ) else {
        return Err("position must be [lon, lat] numbers".to_string());
    };
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(format!("position out of range: [{lon}, {lat}]"));
    }
    Ok(LonLat::new(lon, lat))
}

fn parse_positions(coords: &Value) -> Result<Vec<LonLat>, String> {
    parse_nested(coords, parse_position)
}

fn parse_rings(coords: &Value) -> Result<Vec<Vec<LonLat>>, String> {
    let rings = parse_nested(coords, parse_positions)?;
    if rings.iter().any(|r| r.len() < 4) {
        return Err("polygon ring needs at least 4 positions".to_string());
    }
    Ok(rings)
}

fn parse_nested<T>(
    coords: &Value,
    item: impl Fn(&Value) -> Result<T, String>,
) -> Result<Vec<T>, String> {
    coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?
        .iter()
        .map(item)
        .collect()
}
