use foundation::math::LonLat;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GeometryId(pub u32);

/// Source geometry of a scene node, before projection.
///
/// Geographic variants are re-projected whenever the camera changes.
/// Disc-relative variants only depend on the globe's screen center and radius.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Filled polygon rings (outer and holes), each closed.
    GeoPolygon { rings: Vec<Vec<LonLat>> },
    /// Open or closed polylines on the sphere.
    GeoLines { lines: Vec<Vec<LonLat>> },
    /// A point on the sphere drawn as a screen-space circle.
    GeoPoint { at: LonLat, radius_px: f64 },
    /// Circle concentric with the globe disc, `radius_factor` × globe radius.
    DiscCircle { radius_factor: f64 },
    /// Radial tick marks around the disc every `step_deg`; every
    /// `major_every`-th tick extends to `outer_major`.
    DiscTicks {
        inner: f64,
        outer: f64,
        outer_major: f64,
        step_deg: f64,
        major_every: u32,
    },
    /// Hexagon tiling clipped to the disc, cells of `cell_px` circumradius.
    HexPattern { cell_px: f64 },
    /// Background points in normalized viewport coordinates `[x, y, radius_px]`.
    Stars { points: Vec<[f64; 3]> },
}

impl Geometry {
    /// Whether the projected form depends on the camera rotation.
    pub fn is_geographic(&self) -> bool {
        matches!(
            self,
            Geometry::GeoPolygon { .. } | Geometry::GeoLines { .. } | Geometry::GeoPoint { .. }
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ComponentGeometry {
    pub id: GeometryId,
}

#[cfg(test)]
mod tests {
    use super::Geometry;
    use foundation::math::LonLat;

    #[test]
    fn geographic_classification() {
        assert!(
            Geometry::GeoPoint {
                at: LonLat::new(0.0, 0.0),
                radius_px: 3.0
            }
            .is_geographic()
        );
        assert!(!Geometry::DiscCircle { radius_factor: 1.1 }.is_geographic());
        assert!(!Geometry::Stars { points: vec![] }.is_geographic());
    }
}
