/// Draw layers, back to front. Picking walks them front to back.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Stars,
    Atmosphere,
    Ocean,
    HexPattern,
    GraticuleMinor,
    GraticuleMajor,
    Parallels,
    Countries,
    Borders,
    Rings,
    Ticks,
    OrbitTraces,
    Beacons,
    FocusRings,
    OrbitMarkers,
    FocusMarkers,
}

/// What a scene node stands for, and therefore how it is hit-tested.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Decorative geometry; never picked.
    Decor,
    /// Country polygon; index into the country table.
    Country(usize),
    /// Capital beacon of a country; index into the beacon table.
    Beacon(usize),
    /// Orbit ground track of an orbital object; index into the object table.
    OrbitTrace(usize),
    /// Moving marker of an orbital object.
    OrbitMarker(usize),
    /// Name tag next to an orbital object's marker; never picked.
    OrbitLabel(usize),
    /// Installation or conflict-zone marker of the active focus region.
    FocusMarker(usize),
    /// Range ring of a focus marker; decorative for picking.
    FocusRing(usize),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HitMode {
    None,
    /// Point-in-polygon on closed sub-paths.
    Fill,
    /// Distance to the stroked outline.
    Stroke,
    /// Distance to a circle's center.
    Disc,
}

impl NodeKind {
    pub fn hit_mode(&self) -> HitMode {
        match self {
            NodeKind::Decor | NodeKind::FocusRing(_) | NodeKind::OrbitLabel(_) => HitMode::None,
            NodeKind::Country(_) => HitMode::Fill,
            NodeKind::OrbitTrace(_) => HitMode::Stroke,
            NodeKind::Beacon(_) | NodeKind::OrbitMarker(_) | NodeKind::FocusMarker(_) => {
                HitMode::Disc
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HitMode, Layer, NodeKind};

    #[test]
    fn markers_draw_above_countries() {
        assert!(Layer::OrbitMarkers > Layer::Countries);
        assert!(Layer::FocusMarkers > Layer::OrbitMarkers);
        assert!(Layer::Beacons > Layer::OrbitTraces);
        assert!(Layer::Stars < Layer::Ocean);
    }

    #[test]
    fn decor_is_not_pickable() {
        assert_eq!(NodeKind::Decor.hit_mode(), HitMode::None);
        assert_eq!(NodeKind::OrbitLabel(0).hit_mode(), HitMode::None);
        assert_eq!(NodeKind::Country(0).hit_mode(), HitMode::Fill);
        assert_eq!(NodeKind::OrbitTrace(1).hit_mode(), HitMode::Stroke);
    }
}
