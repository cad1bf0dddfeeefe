//! Performance scheduling: device capability detection, per-device quality policy,
//! frame-skip gate for expensive path recomputation, and a throttle for
//! animation-driven host updates.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// User-agent fragments that mark a handheld device.
const MOBILE_UA_MARKERS: &[&str] = &[
    "android",
    "iphone",
    "ipad",
    "ipod",
    "mobile",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Viewports narrower than this count as "narrow" for touch devices.
const NARROW_VIEWPORT_PX: f64 = 768.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct DeviceProfile {
    pub low_power: bool,
}

impl DeviceProfile {
    /// Coarse classification: a mobile user agent, or touch input on a narrow viewport.
    pub fn detect(user_agent: &str, max_touch_points: u32, viewport_width_px: f64) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        let mobile_ua = MOBILE_UA_MARKERS.iter().any(|m| ua.contains(m));
        let narrow_touch = max_touch_points > 0 && viewport_width_px < NARROW_VIEWPORT_PX;
        let low_power = mobile_ua || narrow_touch;
        debug!(low_power, mobile_ua, narrow_touch, "device profile detected");
        Self { low_power }
    }

    pub fn desktop() -> Self {
        Self { low_power: false }
    }
}

/// Quality knobs that differ between standard and low-power devices.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerfPolicy {
    /// Samples per orbit trace.
    pub orbit_samples: usize,
    /// Background star points.
    pub star_count: usize,
    /// Polygon steps per range ring.
    pub geo_circle_steps: usize,
    /// Pulse animation advances every Nth frame.
    pub pulse_every_n: u32,
    /// Recompute projected paths every Nth frame while idle.
    pub skip_idle: u32,
    /// Recompute projected paths every Nth frame while a tween runs.
    pub skip_tweening: u32,
    /// Minimum interval between loop-driven tooltip updates (ms).
    pub tooltip_throttle_ms: f64,
}

impl PerfPolicy {
    pub fn standard() -> Self {
        Self {
            orbit_samples: 180,
            star_count: 220,
            geo_circle_steps: 64,
            pulse_every_n: 1,
            skip_idle: 1,
            skip_tweening: 1,
            tooltip_throttle_ms: 0.0,
        }
    }

    pub fn low_power() -> Self {
        Self {
            orbit_samples: 72,
            star_count: 80,
            geo_circle_steps: 24,
            pulse_every_n: 3,
            skip_idle: 2,
            skip_tweening: 3,
            tooltip_throttle_ms: 120.0,
        }
    }

    pub fn for_device(profile: DeviceProfile) -> Self {
        if profile.low_power {
            Self::low_power()
        } else {
            Self::standard()
        }
    }
}

impl Default for PerfPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Decides whether this frame recomputes projected geometry.
///
/// The dirty flag always has the last word: a clean cache is never recomputed,
/// and a dirty one is recomputed on the next frame the skip factor allows, so
/// the final camera pose is always drawn once motion stops.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameSkip {
    pub idle: u32,
    pub tweening: u32,
}

impl FrameSkip {
    pub fn from_policy(policy: &PerfPolicy) -> Self {
        Self {
            idle: policy.skip_idle.max(1),
            tweening: policy.skip_tweening.max(1),
        }
    }

    /// A gate that recomputes on every dirty frame.
    pub fn disabled() -> Self {
        Self {
            idle: 1,
            tweening: 1,
        }
    }

    pub fn should_recompute(&self, frame_index: u64, tweening: bool, dirty: bool) -> bool {
        if !dirty {
            return false;
        }
        let factor = u64::from(if tweening { self.tweening } else { self.idle }.max(1));
        frame_index % factor == 0
    }
}

/// Minimum-interval gate.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Throttle {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            last_ms: None,
        }
    }

    /// Returns `true` (and records `now_ms`) when at least the interval has passed.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_user_agent_is_low_power() {
        let p = DeviceProfile::detect(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
            5,
            390.0,
        );
        assert!(p.low_power);
    }

    #[test]
    fn touch_laptop_with_wide_viewport_is_standard() {
        let p = DeviceProfile::detect("Mozilla/5.0 (Windows NT 10.0; Win64; x64)", 10, 1440.0);
        assert!(!p.low_power);
        let narrow = DeviceProfile::detect("Mozilla/5.0 (Windows NT 10.0; Win64; x64)", 10, 600.0);
        assert!(narrow.low_power);
    }

    #[test]
    fn low_power_policy_is_cheaper() {
        let std = PerfPolicy::standard();
        let low = PerfPolicy::low_power();
        assert!(low.orbit_samples < std.orbit_samples);
        assert!(low.star_count < std.star_count);
        assert!(low.geo_circle_steps < std.geo_circle_steps);
        assert!(low.pulse_every_n > std.pulse_every_n);
        assert!(low.skip_tweening > low.skip_idle);
        assert!(low.tooltip_throttle_ms > 0.0);
    }

    #[test]
    fn frame_skip_never_recomputes_clean_cache() {
        let gate = FrameSkip::disabled();
        assert!(!gate.should_recompute(0, false, false));
        assert!(gate.should_recompute(7, true, true));
    }

    #[test]
    fn frame_skip_is_more_aggressive_while_tweening() {
        let gate = FrameSkip::from_policy(&PerfPolicy::low_power());
        let idle = (0..12).filter(|i| gate.should_recompute(*i, false, true)).count();
        let tween = (0..12).filter(|i| gate.should_recompute(*i, true, true)).count();
        assert_eq!(idle, 6);
        assert_eq!(tween, 4);
    }

    #[test]
    fn throttle_enforces_interval() {
        let mut t = Throttle::new(100.0);
        assert!(t.ready(0.0));
        assert!(!t.ready(50.0));
        assert!(t.ready(100.0));
        let mut open = Throttle::new(0.0);
        assert!(open.ready(1.0));
        assert!(open.ready(1.0));
    }
}
