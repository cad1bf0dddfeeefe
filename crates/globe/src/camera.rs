use foundation::Time;
use foundation::math::{LonLat, wrap_lon};
use serde::Serialize;
use tracing::{debug, warn};

use crate::tween::{TweenJob, TweenKind};

/// Orthographic camera: d3-style rotation `[λ, φ, γ]` in degrees, zoom
/// multiplier relative to the base radius, and the screen position of the
/// globe center in px.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CameraState {
    pub rotation: [f64; 3],
    pub scale: f64,
    pub translate: [f64; 2],
}

impl CameraState {
    /// Geographic point at the center of the view.
    pub fn center(&self) -> LonLat {
        LonLat::new(wrap_lon(-self.rotation[0]), -self.rotation[1])
    }

    /// Rotation that puts `p` at the center of the view.
    pub fn rotation_for(p: LonLat) -> [f64; 3] {
        [wrap_lon(-p.lon), -p.lat, 0.0]
    }

    pub fn rescaled(mut self, sx: f64, sy: f64) -> Self {
        self.translate = [self.translate[0] * sx, self.translate[1] * sy];
        self
    }

    pub fn is_finite(&self) -> bool {
        self.rotation.iter().all(|v| v.is_finite())
            && self.scale.is_finite()
            && self.translate.iter().all(|v| v.is_finite())
    }
}

/// Result of advancing the camera by one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraStep {
    pub camera: CameraState,
    /// Set on the frame a tween completes.
    pub finished: Option<TweenKind>,
}

/// Holds the camera and at most one tween. Drag input and tracking write the
/// camera directly; tweens are sampled from their own immutable job.
#[derive(Debug, Clone)]
pub struct CameraController {
    state: CameraState,
    tween: Option<TweenJob>,
    sensitivity: f64,
    lat_clamp: f64,
    min_scale: f64,
    max_scale: f64,
}

impl CameraController {
    pub fn new(
        initial: CameraState,
        sensitivity: f64,
        lat_clamp: f64,
        min_scale: f64,
        max_scale: f64,
    ) -> Self {
        Self {
            state: initial,
            tween: None,
            sensitivity,
            lat_clamp,
            min_scale,
            max_scale,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn tween(&self) -> Option<&TweenJob> {
        self.tween.as_ref()
    }

    pub fn is_tweening(&self) -> bool {
        self.tween.is_some()
    }

    pub fn tween_progress(&self, now: Time) -> Option<f64> {
        self.tween.as_ref().map(|job| job.progress(now))
    }

    /// Apply a drag delta in px. Non-finite input is ignored; latitude is
    /// clamped and longitude wrapped.
    pub fn rotate_by(&mut self, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() {
            warn!(dx, dy, "non-finite drag delta ignored");
            return false;
        }
        let r = &mut self.state.rotation;
        r[0] = wrap_lon(r[0] + dx * self.sensitivity);
        r[1] = (r[1] - dy * self.sensitivity).clamp(-self.lat_clamp, self.lat_clamp);
        true
    }

    /// Set the view longitude directly (tracking). Ignored while a tween runs.
    pub fn set_lon(&mut self, lon_rotation: f64) {
        if self.tween.is_none() && lon_rotation.is_finite() {
            self.state.rotation[0] = wrap_lon(lon_rotation);
        }
    }

    /// Install a job, superseding any job in flight.
    pub fn set_tween(&mut self, job: TweenJob) {
        if let Some(prev) = self.tween.replace(job) {
            debug!(kind = ?prev.kind, "tween superseded");
        }
        debug!(kind = ?job.kind, duration_ms = job.span.duration(), "tween started");
    }

    pub fn cancel_tween(&mut self) {
        if self.tween.take().is_some() {
            debug!("tween cancelled");
        }
    }

    /// Sample the active tween at `now`. Clears the job once it completes,
    /// snapping to its exact target with the scale clamped.
    pub fn advance(&mut self, now: Time) -> CameraStep {
        let Some(job) = self.tween else {
            return CameraStep {
                camera: self.state,
                finished: None,
            };
        };
        let mut camera = job.sample(now);
        let finished = job.is_finished(now).then_some(job.kind);
        if finished.is_some() {
            self.tween = None;
            debug!(kind = ?job.kind, "tween finished");
        }
        camera.scale = camera.scale.clamp(self.min_scale, self.max_scale);
        if camera.is_finite() {
            self.state = camera;
        } else {
            warn!("tween produced a non-finite camera; keeping previous state");
        }
        CameraStep {
            camera: self.state,
            finished,
        }
    }

    /// Scale translates after a resize, including those of an active tween.
    pub fn rescale(&mut self, sx: f64, sy: f64) {
        self.state = self.state.rescaled(sx, sy);
        self.tween = self.tween.map(|job| job.rescaled(sx, sy));
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraController, CameraState};
    use crate::tween::{TweenJob, TweenKind};
    use foundation::Time;

    fn controller() -> CameraController {
        CameraController::new(
            CameraState {
                rotation: [0.0, 0.0, 0.0],
                scale: 1.0,
                translate: [400.0, 300.0],
            },
            0.25,
            75.0,
            1.0,
            3.0,
        )
    }

    #[test]
    fn drag_rotates_and_clamps_latitude() {
        let mut c = controller();
        assert!(c.rotate_by(120.0, 0.0));
        assert_eq!(c.state().rotation[0], 30.0);
        c.rotate_by(0.0, -10_000.0);
        assert_eq!(c.state().rotation[1], 75.0);
        c.rotate_by(0.0, 10_000.0);
        assert_eq!(c.state().rotation[1], -75.0);
    }

    #[test]
    fn non_finite_drag_is_ignored() {
        let mut c = controller();
        assert!(!c.rotate_by(f64::NAN, 1.0));
        assert!(!c.rotate_by(1.0, f64::INFINITY));
        assert_eq!(c.state().rotation, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn longitude_wraps() {
        let mut c = controller();
        c.rotate_by(4.0 * 190.0, 0.0);
        assert_eq!(c.state().rotation[0], -170.0);
    }

    #[test]
    fn new_tween_supersedes_old_and_finishes_exactly() {
        let mut c = controller();
        let start = c.state();
        let mut a = start;
        a.rotation = [50.0, 10.0, 0.0];
        a.scale = 3.0;
        let mut b = start;
        b.rotation = [-20.0, 5.0, 0.0];
        b.scale = 2.0;

        c.set_tween(TweenJob::zoom_in(start, a, Time(0.0), 1000.0));
        c.advance(Time(300.0));
        c.set_tween(TweenJob::zoom_in(c.state(), b, Time(300.0), 1000.0));
        let step = c.advance(Time(1300.0));
        assert_eq!(step.finished, Some(TweenKind::ZoomIn));
        assert_eq!(step.camera, b);
        assert!(!c.is_tweening());
        assert_eq!(c.advance(Time(2000.0)).finished, None);
    }

    #[test]
    fn finished_scale_is_clamped() {
        let mut c = controller();
        let mut to = c.state();
        to.scale = 9.0;
        c.set_tween(TweenJob::zoom_in(c.state(), to, Time(0.0), 10.0));
        assert_eq!(c.advance(Time(10.0)).camera.scale, 3.0);
    }

    #[test]
    fn center_is_negated_rotation() {
        let cam = CameraState {
            rotation: [-30.0, -45.0, 0.0],
            scale: 1.0,
            translate: [0.0, 0.0],
        };
        let c = cam.center();
        assert_eq!((c.lon, c.lat), (30.0, 45.0));
        assert_eq!(CameraState::rotation_for(c), [-30.0, -45.0, 0.0]);
    }
}
