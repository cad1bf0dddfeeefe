//! Spherical geometry on a unit sphere, in degrees.
//!
//! Conventions: longitude east-positive, latitude north-positive. Unit vectors
//! use `x = cos(lat)·cos(lon)`, `y = cos(lat)·sin(lon)`, `z = sin(lat)`.

use super::Vec3;

/// Mean Earth radius (km), used to turn range-ring radii into angles.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn to_unit(self) -> Vec3 {
        let (sin_lat, cos_lat) = self.lat.to_radians().sin_cos();
        let (sin_lon, cos_lon) = self.lon.to_radians().sin_cos();
        Vec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    pub fn from_unit(v: Vec3) -> Self {
        let lat = v.z.clamp(-1.0, 1.0).asin().to_degrees();
        let lon = v.y.atan2(v.x).to_degrees();
        Self { lon, lat }
    }

    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

/// Wrap a longitude into `(-180, 180]`.
pub fn wrap_lon(lon: f64) -> f64 {
    let w = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if w == -180.0 { 180.0 } else { w }
}

/// Signed shortest angular step from `from` to `to`, in `(-180, 180]`.
pub fn shortest_lon_delta(from: f64, to: f64) -> f64 {
    wrap_lon(to - from)
}

/// Central angle between two points (degrees).
pub fn angular_distance(a: LonLat, b: LonLat) -> f64 {
    a.to_unit().dot(b.to_unit()).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Point reached from `origin` travelling `distance_deg` along `bearing_deg`
/// (clockwise from north).
pub fn destination(origin: LonLat, bearing_deg: f64, distance_deg: f64) -> LonLat {
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let brg = bearing_deg.to_radians();
    let d = distance_deg.to_radians();

    let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * brg.cos()).asin();
    let lon2 = lon1
        + (brg.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat2.sin());
    LonLat::new(wrap_lon(lon2.to_degrees()), lat2.to_degrees())
}

/// Closed ring approximating a small circle of angular radius `radius_deg`.
///
/// The last point repeats the first. `steps` is floored at 8.
pub fn geo_circle(center: LonLat, radius_deg: f64, steps: usize) -> Vec<LonLat> {
    let steps = steps.max(8);
    let mut ring = Vec::with_capacity(steps + 1);
    for i in 0..steps {
        let bearing = 360.0 * i as f64 / steps as f64;
        ring.push(destination(center, bearing, radius_deg));
    }
    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }
    ring
}

/// Convert a surface distance to an angular radius.
pub fn km_to_degrees(km: f64) -> f64 {
    (km / EARTH_RADIUS_KM).to_degrees()
}

/// Linear interpolation along the great circle between `a` and `b`.
pub fn interpolate_great_circle(a: LonLat, b: LonLat, t: f64) -> LonLat {
    let ua = a.to_unit();
    let ub = b.to_unit();
    let dot = ua.dot(ub).clamp(-1.0, 1.0);
    let omega = dot.acos();
    if omega.abs() < 1e-9 {
        return a;
    }
    let s = omega.sin();
    let wa = ((1.0 - t) * omega).sin() / s;
    let wb = (t * omega).sin() / s;
    LonLat::from_unit(ua.scale(wa) + ub.scale(wb))
}
