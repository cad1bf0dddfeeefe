//! Engine configuration. Every tunable lives here; JSON files may override any subset.

use runtime::{DeviceProfile, PerfPolicy};
use serde::{Deserialize, Serialize};

use crate::error::GlobeError;
use crate::orbit::OrbitKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Degrees of rotation per dragged pixel.
    pub drag_sensitivity: f64,
    /// Latitude clamp applied to drag input.
    pub lat_clamp_deg: f64,
    pub default_zoom: f64,
    pub focus_zoom: f64,
    /// Globe radius at zoom 1 as a fraction of `min(width, height)`.
    pub base_radius_fraction: f64,
    /// Horizontal offset of the default view center, as a fraction of the width.
    /// Leaves room for side panels of the host page.
    pub default_offset_x: f64,
    pub initial_rotation: [f64; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.25,
            lat_clamp_deg: 75.0,
            default_zoom: 1.0,
            focus_zoom: 3.0,
            base_radius_fraction: 0.42,
            default_offset_x: 0.12,
            initial_rotation: [-10.0, -25.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenConfig {
    pub zoom_in_ms: f64,
    pub zoom_out_ms: f64,
    /// Share of zoom-out progress over which the zoom eases (from the start).
    pub zoom_out_zoom_phase: f64,
    /// Share of zoom-out progress over which the pan eases (up to the end).
    pub zoom_out_pan_phase: f64,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            zoom_in_ms: 1200.0,
            zoom_out_ms: 1800.0,
            zoom_out_zoom_phase: 0.5,
            zoom_out_pan_phase: 0.65,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Tween progress at which the overlay starts fading in.
    pub fade_in_start: f64,
    pub fade_in_ms: f64,
    pub fade_out_ms: f64,
    /// Delay between the end of the focus tween and the legend appearing.
    pub legend_delay_ms: f64,
    pub pulse_period_ms: f64,
    /// Relative growth of marker radii at the pulse peak.
    pub pulse_amplitude: f64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            fade_in_start: 0.8,
            fade_in_ms: 400.0,
            fade_out_ms: 450.0,
            legend_delay_ms: 200.0,
            pulse_period_ms: 1600.0,
            pulse_amplitude: 0.45,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    /// Pointer travel below which a press/release is a click.
    pub drag_threshold_px: f64,
    /// Width of the invisible hit stroke around orbit traces.
    pub orbit_hit_width_px: f64,
    pub marker_padding_px: f64,
    /// Minimum horizon score for points to count as front-facing.
    pub horizon_threshold: f64,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: 4.0,
            orbit_hit_width_px: 16.0,
            marker_padding_px: 4.0,
            horizon_threshold: 0.02,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub width_px: f64,
    pub height_px: f64,
    pub offset_px: f64,
    pub margin_px: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            width_px: 220.0,
            height_px: 96.0,
            offset_px: 14.0,
            margin_px: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitSpec {
    pub id: String,
    pub label: String,
    pub kind: OrbitKind,
    pub period_ms: f64,
    pub inclination_deg: f64,
    /// Theme key of the object color.
    pub color: String,
    #[serde(default)]
    pub phase: f64,
}

impl OrbitSpec {
    fn new(id: &str, label: &str, kind: OrbitKind, period_ms: f64, incl: f64, phase: f64) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
            period_ms,
            inclination_deg: incl,
            color: match kind {
                OrbitKind::Station => "station".to_string(),
                OrbitKind::Satellite => id.to_string(),
            },
            phase,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerfConfig {
    pub standard: PerfPolicy,
    pub low_power: PerfPolicy,
}

impl Default for PerfConfig {
    fn default() -> Self {
        Self {
            standard: PerfPolicy::standard(),
            low_power: PerfPolicy::low_power(),
        }
    }
}

impl PerfConfig {
    pub fn for_device(&self, device: DeviceProfile) -> PerfPolicy {
        if device.low_power {
            self.low_power
        } else {
            self.standard
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub camera: CameraConfig,
    pub tween: TweenConfig,
    pub focus: FocusConfig,
    pub picking: PickingConfig,
    pub tooltip: TooltipConfig,
    /// Fraction of the remaining longitude gap closed per frame while tracking.
    pub follow_rate: f64,
    pub orbits: Vec<OrbitSpec>,
    pub perf: PerfConfig,
    pub star_seed: u64,
    /// Pending pointer commands kept per frame; older moves are coalesced.
    pub command_queue_len: usize,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            tween: TweenConfig::default(),
            focus: FocusConfig::default(),
            picking: PickingConfig::default(),
            tooltip: TooltipConfig::default(),
            follow_rate: 0.08,
            orbits: vec![
                OrbitSpec::new("station", "Orbital Station", OrbitKind::Station, 92_000.0, 51.6, 0.1),
                OrbitSpec::new("sat-a", "Sentinel A", OrbitKind::Satellite, 64_000.0, 28.0, 0.35),
                OrbitSpec::new("sat-b", "Sentinel B", OrbitKind::Satellite, 78_000.0, 63.0, 0.6),
                OrbitSpec::new("sat-c", "Sentinel C", OrbitKind::Satellite, 110_000.0, 12.0, 0.85),
            ],
            perf: PerfConfig::default(),
            star_seed: 7,
            command_queue_len: 256,
        }
    }
}

impl GlobeConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, GlobeError> {
        let config: Self = serde_json::from_str(payload)
            .map_err(|e| GlobeError::InvalidConfig(format!("parse: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GlobeError> {
        fn check(ok: bool, what: &str) -> Result<(), GlobeError> {
            if ok {
                Ok(())
            } else {
                Err(GlobeError::InvalidConfig(what.to_string()))
            }
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);

        let cam = &self.camera;
        check(positive(cam.drag_sensitivity), "camera.drag_sensitivity must be > 0")?;
        check(
            cam.lat_clamp_deg.is_finite() && cam.lat_clamp_deg > 0.0 && cam.lat_clamp_deg < 90.0,
            "camera.lat_clamp_deg must be in (0, 90)",
        )?;
        check(
            cam.default_zoom.is_finite() && cam.default_zoom >= 1.0,
            "camera.default_zoom must be >= 1",
        )?;
        check(
            cam.focus_zoom.is_finite() && cam.focus_zoom > 1.0 && cam.focus_zoom >= cam.default_zoom,
            "camera.focus_zoom must be > 1 and >= default_zoom",
        )?;
        check(
            positive(cam.base_radius_fraction) && cam.base_radius_fraction <= 0.5,
            "camera.base_radius_fraction must be in (0, 0.5]",
        )?;
        check(cam.default_offset_x.abs() < 0.5, "camera.default_offset_x must be in (-0.5, 0.5)")?;
        check(
            cam.initial_rotation.iter().all(|v| v.is_finite()),
            "camera.initial_rotation must be finite",
        )?;

        let tw = &self.tween;
        check(positive(tw.zoom_in_ms), "tween.zoom_in_ms must be > 0")?;
        check(positive(tw.zoom_out_ms), "tween.zoom_out_ms must be > 0")?;
        check(
            positive(tw.zoom_out_zoom_phase) && tw.zoom_out_zoom_phase <= 1.0,
            "tween.zoom_out_zoom_phase must be in (0, 1]",
        )?;
        check(
            positive(tw.zoom_out_pan_phase) && tw.zoom_out_pan_phase <= 1.0,
            "tween.zoom_out_pan_phase must be in (0, 1]",
        )?;

        let f = &self.focus;
        check(unit(f.fade_in_start), "focus.fade_in_start must be in [0, 1]")?;
        check(positive(f.fade_in_ms), "focus.fade_in_ms must be > 0")?;
        check(positive(f.fade_out_ms), "focus.fade_out_ms must be > 0")?;
        check(
            f.legend_delay_ms.is_finite() && f.legend_delay_ms >= 0.0,
            "focus.legend_delay_ms must be >= 0",
        )?;
        check(positive(f.pulse_period_ms), "focus.pulse_period_ms must be > 0")?;
        check(unit(f.pulse_amplitude), "focus.pulse_amplitude must be in [0, 1]")?;

        let p = &self.picking;
        check(
            p.drag_threshold_px.is_finite() && p.drag_threshold_px >= 0.0,
            "picking.drag_threshold_px must be >= 0",
        )?;
        check(positive(p.orbit_hit_width_px), "picking.orbit_hit_width_px must be > 0")?;
        check(
            p.marker_padding_px.is_finite() && p.marker_padding_px >= 0.0,
            "picking.marker_padding_px must be >= 0",
        )?;
        check(
            p.horizon_threshold.is_finite() && p.horizon_threshold.abs() < 1.0,
            "picking.horizon_threshold must be in (-1, 1)",
        )?;

        let t = &self.tooltip;
        check(
            positive(t.width_px) && positive(t.height_px),
            "tooltip size must be > 0",
        )?;
        check(
            t.offset_px.is_finite() && t.margin_px.is_finite() && t.margin_px >= 0.0,
            "tooltip offset/margin must be finite",
        )?;

        check(
            positive(self.follow_rate) && self.follow_rate <= 1.0,
            "follow_rate must be in (0, 1]",
        )?;
        check(self.command_queue_len > 0, "command_queue_len must be > 0")?;

        let stations = self
            .orbits
            .iter()
            .filter(|o| o.kind == OrbitKind::Station)
            .count();
        check(stations <= 1, "at most one station orbit")?;
        for o in &self.orbits {
            check(positive(o.period_ms), "orbit period_ms must be > 0")?;
            check(
                o.inclination_deg.is_finite() && o.inclination_deg.abs() <= 90.0,
                "orbit inclination_deg must be in [-90, 90]",
            )?;
            check(unit(o.phase) && o.phase < 1.0, "orbit phase must be in [0, 1)")?;
        }
        for (i, o) in self.orbits.iter().enumerate() {
            check(
                !self.orbits[..i].iter().any(|prev| prev.id == o.id),
                "orbit ids must be unique",
            )?;
        }

        for policy in [&self.perf.standard, &self.perf.low_power] {
            check(policy.orbit_samples >= 8, "perf.orbit_samples must be >= 8")?;
            check(policy.geo_circle_steps >= 8, "perf.geo_circle_steps must be >= 8")?;
            check(policy.pulse_every_n >= 1, "perf.pulse_every_n must be >= 1")?;
            check(
                policy.skip_idle >= 1 && policy.skip_tweening >= 1,
                "perf skip factors must be >= 1",
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::GlobeConfig;
    use crate::error::GlobeError;

    #[test]
    fn defaults_are_valid() {
        let c = GlobeConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.camera.lat_clamp_deg, 75.0);
        assert_eq!(c.tween.zoom_in_ms, 1200.0);
        assert_eq!(c.tween.zoom_out_ms, 1800.0);
        assert!(c.tween.zoom_out_ms > c.tween.zoom_in_ms);
        assert_eq!(c.focus.fade_in_start, 0.8);
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let c = GlobeConfig::from_json_str(r#"{"camera": {"focus_zoom": 4.5}, "follow_rate": 0.2}"#)
            .expect("parse");
        assert_eq!(c.camera.focus_zoom, 4.5);
        assert_eq!(c.camera.drag_sensitivity, 0.25);
        assert_eq!(c.follow_rate, 0.2);
        assert_eq!(c.orbits.len(), 4);
    }

    #[test]
    fn rejects_focus_zoom_of_one() {
        let err = GlobeConfig::from_json_str(r#"{"camera": {"focus_zoom": 1.0}}"#)
            .expect_err("must fail");
        assert!(matches!(err, GlobeError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_two_stations() {
        let mut c = GlobeConfig::default();
        let mut extra = c.orbits[0].clone();
        extra.id = "station-2".into();
        c.orbits.push(extra);
        assert!(c.validate().is_err());
    }
}
