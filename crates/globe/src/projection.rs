//! Orthographic projection with d3-style three-axis rotation.
//!
//! A point is rotated by `[λ, φ, γ]`, then projected onto the plane as
//! `x = tx + k·cosφ'·sinλ'`, `y = ty − k·sinφ'`. It is on the visible
//! hemisphere when `cosφ'·cosλ' > 0`.

use foundation::math::{LonLat, interpolate_great_circle, wrap_lon};
use scene::visibility::HorizonTest;

use crate::camera::CameraState;
use crate::error::GlobeError;

/// Canvas size in CSS px plus the device-pixel ratio of the backing store.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, dpr: f64) -> Result<Self, GlobeError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !(ok(width) && ok(height) && ok(dpr)) {
            return Err(GlobeError::EmptyViewport { width, height, dpr });
        }
        Ok(Self { width, height, dpr })
    }

    pub fn size(&self) -> [f64; 2] {
        [self.width, self.height]
    }

    /// Backing-store size in device pixels.
    pub fn pixel_size(&self) -> [u32; 2] {
        [
            (self.width * self.dpr).round() as u32,
            (self.height * self.dpr).round() as u32,
        ]
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    rotation: [f64; 3],
    k: f64,
    translate: [f64; 2],
    sin_phi: f64,
    cos_phi: f64,
    sin_gamma: f64,
    cos_gamma: f64,
}

/// Rotated spherical coordinates, radians.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Rotated {
    lambda: f64,
    phi: f64,
}

impl Rotated {
    /// Cosine of the angular distance from the view center.
    fn depth(self) -> f64 {
        self.phi.cos() * self.lambda.cos()
    }

    fn plane(self) -> [f64; 2] {
        [self.phi.cos() * self.lambda.sin(), self.phi.sin()]
    }
}

impl Projection {
    pub fn new(camera: &CameraState, base_radius: f64) -> Self {
        let (sin_phi, cos_phi) = camera.rotation[1].to_radians().sin_cos();
        let (sin_gamma, cos_gamma) = camera.rotation[2].to_radians().sin_cos();
        Self {
            rotation: camera.rotation,
            k: base_radius * camera.scale,
            translate: camera.translate,
            sin_phi,
            cos_phi,
            sin_gamma,
            cos_gamma,
        }
    }

    /// On-screen radius of the globe disc.
    pub fn radius(&self) -> f64 {
        self.k
    }

    pub fn center(&self) -> [f64; 2] {
        self.translate
    }

    pub fn view_center(&self) -> LonLat {
        LonLat::new(wrap_lon(-self.rotation[0]), -self.rotation[1])
    }

    pub fn horizon(&self, threshold: f64) -> HorizonTest {
        HorizonTest::new(self.view_center(), threshold)
    }

    /// Cosine of the angle between `p` and the view center: 1 at the center,
    /// 0 on the limb, negative behind.
    pub fn visibility_score(&self, p: LonLat) -> f64 {
        self.rotate(p).depth()
    }

    fn rotate(&self, p: LonLat) -> Rotated {
        let lambda = (p.lon + self.rotation[0]).to_radians();
        let phi = p.lat.to_radians();
        let x = phi.cos() * lambda.cos();
        let y = lambda.sin() * phi.cos();
        let z = phi.sin();
        let k = z * self.cos_phi + x * self.sin_phi;
        Rotated {
            lambda: (y * self.cos_gamma - k * self.sin_gamma)
                .atan2(x * self.cos_phi - z * self.sin_phi),
            phi: (k * self.cos_gamma + y * self.sin_gamma).clamp(-1.0, 1.0).asin(),
        }
    }

    fn to_screen(&self, plane: [f64; 2]) -> [f64; 2] {
        [
            self.translate[0] + self.k * plane[0],
            self.translate[1] - self.k * plane[1],
        ]
    }

    /// Screen position of a front-facing point; `None` behind the horizon.
    pub fn project(&self, p: LonLat) -> Option<[f64; 2]> {
        if !p.is_finite() {
            return None;
        }
        let r = self.rotate(p);
        (r.depth() > 0.0).then(|| self.to_screen(r.plane()))
    }

    /// Like `project`, but points behind the horizon are pushed radially onto
    /// the limb. Used for filled polygons straddling the horizon.
    pub fn project_clamped(&self, p: LonLat) -> [f64; 2] {
        let r = self.rotate(p);
        let plane = r.plane();
        if r.depth() > 0.0 {
            return self.to_screen(plane);
        }
        let len = (plane[0] * plane[0] + plane[1] * plane[1]).sqrt();
        if len < 1e-12 {
            // Antipode of the view center: no direction to push along.
            return self.to_screen([1.0, 0.0]);
        }
        self.to_screen([plane[0] / len, plane[1] / len])
    }

    /// Geographic point under a screen position, `None` outside the disc.
    pub fn invert(&self, xy: [f64; 2]) -> Option<LonLat> {
        if self.k <= 0.0 || !xy[0].is_finite() || !xy[1].is_finite() {
            return None;
        }
        let x = (xy[0] - self.translate[0]) / self.k;
        let y = -(xy[1] - self.translate[1]) / self.k;
        let rho = (x * x + y * y).sqrt();
        if rho > 1.0 {
            return None;
        }
        let c = rho.asin();
        let (sin_c, cos_c) = c.sin_cos();
        let lambda = (x * sin_c).atan2(rho * cos_c);
        let phi = if rho == 0.0 {
            0.0
        } else {
            (y * sin_c / rho).clamp(-1.0, 1.0).asin()
        };

        // Undo the γ/φ rotation, then the λ shift.
        let cx = phi.cos() * lambda.cos();
        let cy = lambda.sin() * phi.cos();
        let cz = phi.sin();
        let k = cz * self.cos_gamma - cy * self.sin_gamma;
        let lon = (cy * self.cos_gamma + cz * self.sin_gamma)
            .atan2(cx * self.cos_phi + k * self.sin_phi)
            .to_degrees();
        let lat = (k * self.cos_phi - cx * self.sin_phi)
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees();
        Some(LonLat::new(wrap_lon(lon - self.rotation[0]), lat))
    }

    /// Project a polyline, splitting it where it crosses the horizon. Crossing
    /// points are placed on the limb so visible pieces end cleanly.
    pub fn project_line(&self, line: &[LonLat]) -> Vec<Vec<[f64; 2]>> {
        let mut pieces = Vec::new();
        let mut current: Vec<[f64; 2]> = Vec::new();
        let mut prev: Option<(LonLat, f64)> = None;

        for &p in line {
            if !p.is_finite() {
                continue;
            }
            let s = self.visibility_score(p);
            if let Some((q, sq)) = prev
                && (sq > 0.0) != (s > 0.0)
            {
                let t = sq / (sq - s);
                current.push(self.project_clamped(interpolate_great_circle(q, p, t)));
                if sq > 0.0 {
                    pieces.push(std::mem::take(&mut current));
                }
            }
            if s > 0.0 {
                current.push(self.to_screen(self.rotate(p).plane()));
            }
            prev = Some((p, s));
        }
        if !current.is_empty() {
            pieces.push(current);
        }
        pieces.retain(|piece| piece.len() >= 2);
        pieces
    }

    /// Project a closed ring for filling. Returns `None` when the ring lies
    /// entirely behind the horizon.
    pub fn project_ring(&self, ring: &[LonLat]) -> Option<Vec<[f64; 2]>> {
        if !ring.iter().any(|p| self.visibility_score(*p) > 0.0) {
            return None;
        }
        Some(
            ring.iter()
                .filter(|p| p.is_finite())
                .map(|p| self.project_clamped(*p))
                .collect(),
        )
    }
}
