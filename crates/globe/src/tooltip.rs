//! Single-slot tooltip state for the host to render.

use formats::{CountryInfo, MarkerKind, MarkerStatus};
use serde::Serialize;

use crate::orbit::OrbitKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TooltipContent {
    Beacon {
        capital: String,
        country: CountryInfo,
    },
    Orbital {
        id: String,
        label: String,
        kind: OrbitKind,
        lon: f64,
        lat: f64,
    },
    Marker {
        label: String,
        kind: MarkerKind,
        category: String,
        status: MarkerStatus,
        radius_km: f64,
    },
}

/// Why the tooltip is open; decides what closes it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TooltipSource {
    /// Follows the pointer; closes when the pointer leaves the feature.
    Hover,
    /// Pinned by a click; closes on the next click elsewhere.
    Click,
    /// Follows a tracked orbital object from the animation loop.
    Tracking,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub content: TooltipContent,
    pub source: TooltipSource,
    /// Screen point the tooltip refers to.
    pub anchor: [f64; 2],
    /// Top-left corner after placement.
    pub position: [f64; 2],
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    pub width: f64,
    pub height: f64,
    pub offset: f64,
    pub margin: f64,
}

impl Placement {
    /// Offset from the anchor toward the lower right, flip to the other side
    /// of the anchor on overflow, then clamp to the canvas.
    pub fn place(&self, anchor: [f64; 2], canvas: [f64; 2]) -> [f64; 2] {
        let axis = |a: f64, size: f64, extent: f64| {
            let mut v = a + self.offset;
            if v + size > extent - self.margin {
                v = a - self.offset - size;
            }
            let max = (extent - size - self.margin).max(self.margin);
            v.clamp(self.margin, max)
        };
        [
            axis(anchor[0], self.width, canvas[0]),
            axis(anchor[1], self.height, canvas[1]),
        ]
    }
}

/// Holds at most one tooltip: opening a new one closes the previous.
#[derive(Debug, Clone, Default)]
pub struct TooltipSlot {
    current: Option<Tooltip>,
}

impl TooltipSlot {
    pub fn current(&self) -> Option<&Tooltip> {
        self.current.as_ref()
    }

    pub fn open(&mut self, tooltip: Tooltip) -> Option<Tooltip> {
        self.current.replace(tooltip)
    }

    pub fn close(&mut self) -> Option<Tooltip> {
        self.current.take()
    }

    /// Close only if the open tooltip came from `source`.
    pub fn close_from(&mut self, source: TooltipSource) -> Option<Tooltip> {
        if self.current.as_ref().map(|t| t.source) == Some(source) {
            self.current.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement() -> Placement {
        Placement {
            width: 200.0,
            height: 80.0,
            offset: 10.0,
            margin: 8.0,
        }
    }

    fn orbital(source: TooltipSource) -> Tooltip {
        Tooltip {
            content: TooltipContent::Orbital {
                id: "sat-a".into(),
                label: "Sentinel A".into(),
                kind: OrbitKind::Satellite,
                lon: 0.0,
                lat: 0.0,
            },
            source,
            anchor: [0.0, 0.0],
            position: [0.0, 0.0],
        }
    }

    #[test]
    fn offsets_to_lower_right_when_room() {
        assert_eq!(placement().place([100.0, 100.0], [800.0, 600.0]), [110.0, 110.0]);
    }

    #[test]
    fn flips_on_overflow() {
        let p = placement().place([750.0, 580.0], [800.0, 600.0]);
        assert_eq!(p, [540.0, 490.0]);
    }

    #[test]
    fn clamps_to_canvas() {
        let p = placement().place([150.0, 50.0], [300.0, 120.0]);
        // Neither side fits horizontally: clamp into the canvas.
        assert!(p[0] >= 8.0 && p[0] + 200.0 <= 300.0 - 8.0 + 1e-9);
        assert!(p[1] >= 8.0);
        // Canvas smaller than the tooltip: pin to the margin.
        assert_eq!(placement().place([10.0, 10.0], [100.0, 50.0]), [8.0, 8.0]);
    }

    #[test]
    fn slot_holds_one_tooltip() {
        let mut slot = TooltipSlot::default();
        assert!(slot.open(orbital(TooltipSource::Hover)).is_none());
        let prev = slot.open(orbital(TooltipSource::Click));
        assert_eq!(prev.map(|t| t.source), Some(TooltipSource::Hover));
        assert!(slot.close_from(TooltipSource::Hover).is_none());
        assert!(slot.current().is_some());
        assert!(slot.close_from(TooltipSource::Click).is_some());
        assert!(slot.current().is_none());
    }
}
