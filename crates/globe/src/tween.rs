//! Camera tweens between the global and regional views.

use foundation::math::shortest_lon_delta;
use foundation::{Time, TimeSpan};
use serde::Serialize;

use crate::camera::CameraState;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum TweenKind {
    ZoomIn,
    ZoomOut,
}

/// `t < 0.5 ? 4t³ : 1 − (−2t + 2)³ / 2`, input clamped to `[0, 1]`.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// One interpolation between two camera states.
///
/// `sample` is a pure function of time, so replaying a job gives identical
/// cameras, and a sample at or after the end is exactly `to`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TweenJob {
    pub from: CameraState,
    pub to: CameraState,
    pub span: TimeSpan,
    pub kind: TweenKind,
    /// Zoom-out only: share of progress (from the start) the zoom eases over.
    pub zoom_phase: f64,
    /// Zoom-out only: share of progress (up to the end) the pan eases over.
    pub pan_phase: f64,
}

impl TweenJob {
    pub fn zoom_in(from: CameraState, to: CameraState, start: Time, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            span: TimeSpan::new(start, duration_ms),
            kind: TweenKind::ZoomIn,
            zoom_phase: 1.0,
            pan_phase: 1.0,
        }
    }

    pub fn zoom_out(
        from: CameraState,
        to: CameraState,
        start: Time,
        duration_ms: f64,
        zoom_phase: f64,
        pan_phase: f64,
    ) -> Self {
        Self {
            from,
            to,
            span: TimeSpan::new(start, duration_ms),
            kind: TweenKind::ZoomOut,
            zoom_phase: zoom_phase.clamp(f64::EPSILON, 1.0),
            pan_phase: pan_phase.clamp(f64::EPSILON, 1.0),
        }
    }

    pub fn progress(&self, now: Time) -> f64 {
        self.span.progress(now)
    }

    pub fn is_finished(&self, now: Time) -> bool {
        self.progress(now) >= 1.0
    }

    /// Eased `(zoom, pan)` weights at normalized progress `t`.
    pub fn weights(&self, t: f64) -> (f64, f64) {
        match self.kind {
            TweenKind::ZoomIn => {
                let e = ease_in_out_cubic(t);
                (e, e)
            }
            TweenKind::ZoomOut => {
                let zoom = ease_in_out_cubic(t / self.zoom_phase);
                let pan = ease_in_out_cubic((t - (1.0 - self.pan_phase)) / self.pan_phase);
                (zoom, pan)
            }
        }
    }

    pub fn sample(&self, now: Time) -> CameraState {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        let (wz, wp) = self.weights(t);
        let (a, b) = (&self.from, &self.to);
        let lerp = |x: f64, y: f64, w: f64| x + (y - x) * w;
        CameraState {
            rotation: [
                a.rotation[0] + shortest_lon_delta(a.rotation[0], b.rotation[0]) * wp,
                lerp(a.rotation[1], b.rotation[1], wp),
                lerp(a.rotation[2], b.rotation[2], wp),
            ],
            scale: lerp(a.scale, b.scale, wz),
            translate: [
                lerp(a.translate[0], b.translate[0], wp),
                lerp(a.translate[1], b.translate[1], wp),
            ],
        }
    }

    /// Same job with every translate scaled, used when the canvas is resized.
    pub fn rescaled(mut self, sx: f64, sy: f64) -> Self {
        self.from = self.from.rescaled(sx, sy);
        self.to = self.to.rescaled(sx, sy);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{TweenJob, TweenKind, ease_in_out_cubic};
    use crate::camera::CameraState;
    use foundation::Time;

    fn from() -> CameraState {
        CameraState {
            rotation: [170.0, -20.0, 0.0],
            scale: 1.0,
            translate: [500.0, 300.0],
        }
    }

    fn to() -> CameraState {
        CameraState {
            rotation: [-170.0, -50.0, 0.0],
            scale: 3.0,
            translate: [400.0, 300.0],
        }
    }

    #[test]
    fn easing_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-12);
        assert_eq!(ease_in_out_cubic(-3.0), 0.0);
        assert_eq!(ease_in_out_cubic(7.0), 1.0);
    }

    #[test]
    fn sample_is_deterministic_and_snaps_to_target() {
        let job = TweenJob::zoom_in(from(), to(), Time(100.0), 1200.0);
        let a = job.sample(Time(700.0));
        let b = job.sample(Time(700.0));
        assert_eq!(a, b);
        assert_eq!(job.sample(Time(1300.0)), to());
        assert_eq!(job.sample(Time(9_999.0)), to());
        assert_eq!(job.sample(Time(100.0)), from());
        assert_eq!(job.kind, TweenKind::ZoomIn);
    }

    #[test]
    fn longitude_takes_the_short_way_round() {
        let job = TweenJob::zoom_in(from(), to(), Time(0.0), 1000.0);
        let mid = job.sample(Time(500.0));
        // 170 → -170 crosses the antimeridian: 20° total, not 340°.
        assert!((mid.rotation[0] - 180.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_out_zooms_before_panning() {
        let job = TweenJob::zoom_out(to(), from(), Time(0.0), 1800.0, 0.5, 0.65);
        // At 30 % progress the pan has not started yet, zoom is well under way.
        let early = job.sample(Time(540.0));
        assert_eq!(early.rotation, to().rotation);
        assert!(early.scale < 3.0 && early.scale > 1.0);
        // Zoom completes at half time; pan is still running.
        let half = job.sample(Time(900.0));
        assert!((half.scale - 1.0).abs() < 1e-12);
        assert!(half.translate[0] > to().translate[0] && half.translate[0] < from().translate[0]);
        assert_eq!(job.sample(Time(1800.0)), from());
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let job = TweenJob::zoom_in(from(), to(), Time(5.0), 0.0);
        assert!(job.is_finished(Time(5.0)));
        assert_eq!(job.sample(Time(5.0)), to());
    }
}
