//! Orbiting objects on a stylized sinusoidal ground track.
//!
//! `lon = phase·360 − 180`, `lat = inclination·sin(2π·phase)`. This is a
//! visual approximation, not orbital mechanics.

use std::f64::consts::TAU;

use foundation::math::{LonLat, shortest_lon_delta};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OrbitSpec;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitKind {
    Station,
    Satellite,
}

/// Ground-track position at `phase` (any real; only the fractional part matters).
pub fn position_at(phase: f64, inclination_deg: f64) -> LonLat {
    let phase = phase.rem_euclid(1.0);
    LonLat::new(
        phase * 360.0 - 180.0,
        inclination_deg * (TAU * phase).sin(),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalObject {
    pub id: String,
    pub label: String,
    pub kind: OrbitKind,
    pub period_ms: f64,
    pub inclination_deg: f64,
    /// Theme key of the marker/trace color.
    pub color: String,
    /// Fraction of the orbit completed, in `[0, 1)`.
    pub phase: f64,
    pub tracked: bool,
    /// Screen position from the last frame the object was front-facing.
    pub last_screen: Option<[f64; 2]>,
    /// Front-facing on the last redraw.
    pub visible: bool,
}

impl OrbitalObject {
    pub fn from_spec(spec: &OrbitSpec) -> Self {
        Self {
            id: spec.id.clone(),
            label: spec.label.clone(),
            kind: spec.kind,
            period_ms: spec.period_ms,
            inclination_deg: spec.inclination_deg,
            color: spec.color.clone(),
            phase: spec.phase.rem_euclid(1.0),
            tracked: false,
            last_screen: None,
            visible: false,
        }
    }

    /// Advance by wall-clock time, so angular speed does not depend on frame rate.
    pub fn advance(&mut self, dt_ms: f64) {
        if dt_ms.is_finite() && dt_ms > 0.0 && self.period_ms > 0.0 {
            self.phase = (self.phase + dt_ms / self.period_ms).rem_euclid(1.0);
        }
    }

    pub fn position(&self) -> LonLat {
        position_at(self.phase, self.inclination_deg)
    }

    /// Closed ground track of `samples` points; the last point repeats the first.
    pub fn trace(&self, samples: usize) -> Vec<LonLat> {
        let n = samples.max(8);
        (0..=n)
            .map(|i| position_at(i as f64 / n as f64, self.inclination_deg))
            .collect()
    }
}

/// Frame length `follow_rate` is expressed against.
const FOLLOW_REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;

/// Share of the remaining gap closed over `dt_ms` when `rate` is closed per reference frame.
fn follow_factor(rate: f64, dt_ms: f64) -> f64 {
    if !dt_ms.is_finite() || dt_ms <= 0.0 {
        return 0.0;
    }
    let rate = rate.clamp(0.0, 1.0);
    1.0 - (1.0 - rate).powf(dt_ms / FOLLOW_REFERENCE_FRAME_MS)
}

/// Tracking transition produced by a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingChange {
    pub released: Option<usize>,
    pub tracked: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct OrbitSimulator {
    objects: Vec<OrbitalObject>,
}

impl OrbitSimulator {
    pub fn new(specs: &[OrbitSpec]) -> Self {
        Self {
            objects: specs.iter().map(OrbitalObject::from_spec).collect(),
        }
    }

    pub fn objects(&self) -> &[OrbitalObject] {
        &self.objects
    }

    pub fn get(&self, idx: usize) -> Option<&OrbitalObject> {
        self.objects.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut OrbitalObject> {
        self.objects.get_mut(idx)
    }

    pub fn advance(&mut self, dt_ms: f64) {
        for o in &mut self.objects {
            o.advance(dt_ms);
        }
    }

    pub fn tracked(&self) -> Option<usize> {
        self.objects.iter().position(|o| o.tracked)
    }

    /// Track `idx`, releasing whatever was tracked before. Clicking the tracked
    /// object again releases it.
    pub fn toggle_tracking(&mut self, idx: usize) -> TrackingChange {
        let previous = self.tracked();
        if idx >= self.objects.len() {
            return TrackingChange {
                released: None,
                tracked: previous,
            };
        }
        for o in &mut self.objects {
            o.tracked = false;
        }
        let tracked = if previous == Some(idx) {
            None
        } else {
            self.objects[idx].tracked = true;
            Some(idx)
        };
        debug!(?previous, ?tracked, "tracking changed");
        TrackingChange {
            released: previous,
            tracked,
        }
    }

    /// Release tracking; returns the object that was tracked.
    pub fn clear_tracking(&mut self) -> Option<usize> {
        let previous = self.tracked();
        for o in &mut self.objects {
            o.tracked = false;
        }
        if previous.is_some() {
            debug!(?previous, "tracking cleared");
        }
        previous
    }

    /// Camera longitude rotation eased toward the tracked object. `rate` is
    /// the share of the gap closed per 60 Hz frame; other frame lengths close
    /// the gap at the same speed per unit of time.
    pub fn follow(&self, camera_lon_rotation: f64, rate: f64, dt_ms: f64) -> Option<f64> {
        let target = -self.get(self.tracked()?)?.position().lon;
        let gap = shortest_lon_delta(camera_lon_rotation, target);
        Some(camera_lon_rotation + gap * follow_factor(rate, dt_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::{FOLLOW_REFERENCE_FRAME_MS, OrbitKind, OrbitSimulator, follow_factor, position_at};
    use crate::config::GlobeConfig;
    use foundation::math::shortest_lon_delta;

    fn sim() -> OrbitSimulator {
        OrbitSimulator::new(&GlobeConfig::default().orbits)
    }

    #[test]
    fn position_is_periodic() {
        for i in 0..20 {
            let phase = i as f64 * 0.173;
            let a = position_at(phase, 51.6);
            let b = position_at(phase + 1.0, 51.6);
            assert!((a.lon - b.lon).abs() < 1e-9 && (a.lat - b.lat).abs() < 1e-9);
        }
    }

    #[test]
    fn advancing_a_full_period_returns_to_the_same_position() {
        let mut s = sim();
        let before = s.objects()[1].position();
        let period = s.objects()[1].period_ms;
        for _ in 0..4 {
            s.advance(period / 4.0);
        }
        let after = s.objects()[1].position();
        assert!((before.lon - after.lon).abs() < 1e-6);
        assert!((before.lat - after.lat).abs() < 1e-6);
    }

    #[test]
    fn ground_track_formula() {
        let p = position_at(0.25, 30.0);
        assert_eq!(p.lon, -90.0);
        assert!((p.lat - 30.0).abs() < 1e-12);
        assert_eq!(position_at(0.0, 30.0).lon, -180.0);
    }

    #[test]
    fn trace_is_closed() {
        let s = sim();
        let trace = s.objects()[0].trace(72);
        assert_eq!(trace.len(), 73);
        let (first, last) = (trace[0], trace[72]);
        assert!((first.lat - last.lat).abs() < 1e-9);
        assert_eq!(s.objects()[0].kind, OrbitKind::Station);
    }

    #[test]
    fn at_most_one_object_is_tracked() {
        let mut s = sim();
        assert_eq!(s.toggle_tracking(1).tracked, Some(1));
        let change = s.toggle_tracking(2);
        assert_eq!(change.released, Some(1));
        assert_eq!(change.tracked, Some(2));
        assert_eq!(s.objects().iter().filter(|o| o.tracked).count(), 1);
        assert_eq!(s.toggle_tracking(2).tracked, None);
        assert_eq!(s.tracked(), None);
        assert_eq!(s.toggle_tracking(99).tracked, None);
    }

    #[test]
    fn follow_converges_on_object_longitude() {
        let mut s = sim();
        s.toggle_tracking(0);
        let target = -s.objects()[0].position().lon;
        let mut lon = 0.0;
        let mut gap = shortest_lon_delta(lon, target).abs();
        for _ in 0..60 {
            lon = s.follow(lon, 0.1, FOLLOW_REFERENCE_FRAME_MS).expect("tracking");
            let g = shortest_lon_delta(lon, target).abs();
            assert!(g <= gap + 1e-9);
            gap = g;
        }
        assert!(gap < 1.0);
    }

    #[test]
    fn follow_speed_does_not_depend_on_frame_rate() {
        let mut s = sim();
        s.toggle_tracking(0);
        let frame = FOLLOW_REFERENCE_FRAME_MS;
        let one = s.follow(0.0, 0.08, frame).expect("tracking");
        let mut two = 0.0;
        for _ in 0..2 {
            two = s.follow(two, 0.08, frame / 2.0).expect("tracking");
        }
        assert!((one - two).abs() < 1e-9, "{one} vs {two}");
        assert!((follow_factor(0.08, frame) - 0.08).abs() < 1e-12);
        assert_eq!(follow_factor(0.5, 0.0), 0.0);
        assert_eq!(follow_factor(1.0, 5.0), 1.0);
    }
}
