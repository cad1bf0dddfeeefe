//! Regional-focus mode: the state machine, overlay fades, legend and pulse.

use std::f64::consts::TAU;

use formats::{FocusRegion, MarkerKind, MarkerStatus};
use foundation::{Time, TimeSpan};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::FocusConfig;
use crate::tween::TweenKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModeState {
    Default,
    Focusing { region: String },
    Focused { region: String },
    Defocusing,
}

impl ModeState {
    pub fn region(&self) -> Option<&str> {
        match self {
            ModeState::Focusing { region } | ModeState::Focused { region } => Some(region),
            _ => None,
        }
    }

    /// Manual camera control is only allowed in the global view.
    pub fn allows_drag(&self) -> bool {
        matches!(self, ModeState::Default)
    }
}

/// What the engine must do after a mode request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeTransition {
    None,
    /// Start the zoom-in tween toward the region.
    StartZoomIn { region: String },
    /// Start the zoom-out tween back to the global view.
    StartZoomOut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub kind: MarkerKind,
    pub category: String,
    pub status: MarkerStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub region_id: String,
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn for_region(region: &FocusRegion) -> Self {
        Self {
            region_id: region.id.clone(),
            title: region.label.clone(),
            entries: region
                .markers
                .iter()
                .map(|m| LegendEntry {
                    label: m.label.clone(),
                    kind: m.kind,
                    category: m.category.clone(),
                    status: m.status,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Fade {
    from: f64,
    to: f64,
    span: TimeSpan,
}

impl Fade {
    fn value(&self, now: Time) -> f64 {
        let t = self.span.progress(now);
        self.from + (self.to - self.from) * t
    }
}

/// Overlay visibility derived from the mode and the focus tween.
#[derive(Debug, Clone)]
pub struct FocusOverlay {
    config: FocusConfig,
    mode: ModeState,
    opacity: f64,
    fade: Option<Fade>,
    /// Overlay nodes are part of the drawn scene.
    attached: bool,
    legend_at: Option<Time>,
    legend: Option<Legend>,
}

impl FocusOverlay {
    pub fn new(config: FocusConfig) -> Self {
        Self {
            config,
            mode: ModeState::Default,
            opacity: 0.0,
            fade: None,
            attached: false,
            legend_at: None,
            legend: None,
        }
    }

    pub fn mode(&self) -> &ModeState {
        &self.mode
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub fn request_focus(&mut self, region: &str) -> ModeTransition {
        if self.mode.region() == Some(region) {
            return ModeTransition::None;
        }
        if self.mode.region().is_some() {
            // Switching regions: the old overlay disappears at once.
            self.opacity = 0.0;
            self.attached = false;
            self.fade = None;
        }
        self.legend = None;
        self.legend_at = None;
        self.set_mode(ModeState::Focusing {
            region: region.to_string(),
        });
        ModeTransition::StartZoomIn {
            region: region.to_string(),
        }
    }

    pub fn request_defocus(&mut self, now: Time) -> ModeTransition {
        if self.mode.region().is_none() {
            return ModeTransition::None;
        }
        self.legend = None;
        self.legend_at = None;
        self.fade = Some(Fade {
            from: self.opacity,
            to: 0.0,
            span: TimeSpan::new(now, self.config.fade_out_ms),
        });
        self.set_mode(ModeState::Defocusing);
        ModeTransition::StartZoomOut
    }

    /// Advance the machine when a tween completes. Returns whether the mode changed.
    pub fn on_tween_finished(&mut self, kind: TweenKind, now: Time) -> bool {
        let next = match (&self.mode, kind) {
            (ModeState::Focusing { region }, TweenKind::ZoomIn) => ModeState::Focused {
                region: region.clone(),
            },
            (ModeState::Defocusing, TweenKind::ZoomOut) => ModeState::Default,
            _ => return false,
        };
        if matches!(next, ModeState::Focused { .. }) {
            self.legend_at = Some(now.after(self.config.legend_delay_ms));
        }
        self.set_mode(next);
        true
    }

    /// Per-frame fade and legend update. `tween_progress` is the progress of
    /// the active tween, if any. Returns whether the legend appeared this frame.
    pub fn update(
        &mut self,
        now: Time,
        tween_progress: Option<f64>,
        region: Option<&FocusRegion>,
    ) -> bool {
        let fading_in = self.fade.is_some_and(|f| f.to > f.from);
        let wants_in = match &self.mode {
            ModeState::Focusing { .. } => {
                tween_progress.is_some_and(|t| t >= self.config.fade_in_start)
            }
            ModeState::Focused { .. } => true,
            _ => false,
        };
        if wants_in && !fading_in && self.opacity < 1.0 {
            self.attached = true;
            self.fade = Some(Fade {
                from: self.opacity,
                to: 1.0,
                span: TimeSpan::new(now, self.config.fade_in_ms),
            });
        }

        if let Some(fade) = self.fade {
            self.opacity = fade.value(now);
            if fade.span.is_finished(now) {
                self.opacity = fade.to;
                self.fade = None;
                if fade.to == 0.0 {
                    self.attached = false;
                    debug!("focus overlay detached");
                }
            }
        }

        if let (ModeState::Focused { .. }, Some(at)) = (&self.mode, self.legend_at)
            && now >= at
            && self.legend.is_none()
            && let Some(region) = region
        {
            self.legend = Some(Legend::for_region(region));
            self.legend_at = None;
            return true;
        }
        false
    }

    fn set_mode(&mut self, next: ModeState) {
        if next != self.mode {
            info!(from = ?self.mode, to = ?next, "focus mode changed");
            self.mode = next;
        }
    }
}

/// Marker pulse. On low-power devices the value only refreshes every
/// `every_n` frames; the phase itself always follows wall-clock time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pulse {
    period_ms: f64,
    every_n: u32,
    value: f64,
}

impl Pulse {
    pub fn new(period_ms: f64, every_n: u32) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            every_n: every_n.max(1),
            value: 0.0,
        }
    }

    /// Pulse level in `[0, 1]`.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns whether the value was refreshed this frame.
    pub fn update(&mut self, frame_index: u64, now: Time) -> bool {
        if frame_index % u64::from(self.every_n) != 0 {
            return false;
        }
        let phase = (now.ms() / self.period_ms).rem_euclid(1.0);
        self.value = 0.5 - 0.5 * (TAU * phase).cos();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FocusConfig;

    fn region() -> FocusRegion {
        FocusRegion {
            id: "baltic".into(),
            label: "Baltic".into(),
            center: [20.0, 57.0],
            zoom: None,
            markers: Vec::new(),
        }
    }

    #[test]
    fn full_cycle_through_all_modes() {
        let mut o = FocusOverlay::new(FocusConfig::default());
        assert_eq!(
            o.request_focus("baltic"),
            ModeTransition::StartZoomIn {
                region: "baltic".into()
            }
        );
        assert_eq!(o.request_focus("baltic"), ModeTransition::None);
        assert!(!o.on_tween_finished(TweenKind::ZoomOut, Time(0.0)));
        assert!(o.on_tween_finished(TweenKind::ZoomIn, Time(1200.0)));
        assert_eq!(
            o.mode(),
            &ModeState::Focused {
                region: "baltic".into()
            }
        );
        assert_eq!(o.request_defocus(Time(2000.0)), ModeTransition::StartZoomOut);
        assert_eq!(o.mode(), &ModeState::Defocusing);
        assert_eq!(o.request_defocus(Time(2001.0)), ModeTransition::None);
        assert!(o.on_tween_finished(TweenKind::ZoomOut, Time(3800.0)));
        assert_eq!(o.mode(), &ModeState::Default);
    }

    #[test]
    fn overlay_fades_in_late_in_the_tween() {
        let mut o = FocusOverlay::new(FocusConfig::default());
        let r = region();
        o.request_focus("baltic");
        o.update(Time(500.0), Some(0.5), Some(&r));
        assert_eq!(o.opacity(), 0.0);
        assert!(!o.is_attached());
        o.update(Time(960.0), Some(0.8), Some(&r));
        assert!(o.is_attached());
        o.update(Time(1160.0), Some(0.97), Some(&r));
        assert!(o.opacity() > 0.4 && o.opacity() < 0.6);
        o.update(Time(1400.0), None, Some(&r));
        assert_eq!(o.opacity(), 1.0);
    }

    #[test]
    fn legend_appears_after_delay_and_clears_on_exit() {
        let mut o = FocusOverlay::new(FocusConfig::default());
        let r = region();
        o.request_focus("baltic");
        o.on_tween_finished(TweenKind::ZoomIn, Time(1200.0));
        assert!(!o.update(Time(1300.0), None, Some(&r)));
        assert!(o.legend().is_none());
        assert!(o.update(Time(1400.0), None, Some(&r)));
        assert_eq!(o.legend().map(|l| l.region_id.as_str()), Some("baltic"));
        o.request_defocus(Time(1500.0));
        assert!(o.legend().is_none());
    }

    #[test]
    fn overlay_detaches_only_after_fade_out() {
        let mut o = FocusOverlay::new(FocusConfig::default());
        let r = region();
        o.request_focus("baltic");
        o.on_tween_finished(TweenKind::ZoomIn, Time(1200.0));
        o.update(Time(1200.0), None, Some(&r));
        o.update(Time(1700.0), None, Some(&r));
        assert_eq!(o.opacity(), 1.0);

        o.request_defocus(Time(2000.0));
        o.update(Time(2200.0), Some(0.1), None);
        assert!(o.is_attached());
        assert!(o.opacity() > 0.0 && o.opacity() < 1.0);
        o.update(Time(2450.0), Some(0.25), None);
        assert!(!o.is_attached());
        assert_eq!(o.opacity(), 0.0);
    }

    #[test]
    fn pulse_respects_frame_cadence() {
        let mut p = Pulse::new(1000.0, 3);
        assert!(p.update(0, Time(250.0)));
        assert!((p.value() - 0.5).abs() < 1e-12);
        assert!(!p.update(1, Time(500.0)));
        assert!((p.value() - 0.5).abs() < 1e-12);
        assert!(p.update(3, Time(500.0)));
        assert!((p.value() - 1.0).abs() < 1e-12);
    }
}
