use foundation::math::LonLat;

/// Front-face test against the globe's horizon.
///
/// The score of a point is the cosine of its angular distance from the view
/// center: `cos(lat)·cos(c_lat)·cos(lon − c_lon) + sin(lat)·sin(c_lat)`.
/// It is 1 at the center, 0 exactly on the limb and negative on the far side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HorizonTest {
    pub center: LonLat,
    /// Minimum score to count as front-facing. A small positive value keeps
    /// markers from flickering on the limb.
    pub threshold: f64,
    sin_lat: f64,
    cos_lat: f64,
}

impl HorizonTest {
    pub fn new(center: LonLat, threshold: f64) -> Self {
        let (sin_lat, cos_lat) = center.lat.to_radians().sin_cos();
        Self {
            center,
            threshold,
            sin_lat,
            cos_lat,
        }
    }

    pub fn score(&self, p: LonLat) -> f64 {
        let (sin_lat, cos_lat) = p.lat.to_radians().sin_cos();
        let dlon = (p.lon - self.center.lon).to_radians();
        cos_lat * self.cos_lat * dlon.cos() + sin_lat * self.sin_lat
    }

    pub fn is_front_facing(&self, p: LonLat) -> bool {
        self.score(p) > self.threshold
    }
}

/// Convenience wrapper for a one-off score.
pub fn visibility_score(p: LonLat, center: LonLat) -> f64 {
    HorizonTest::new(center, 0.0).score(p)
}

#[cfg(test)]
mod tests {
    use super::{HorizonTest, visibility_score};
    use foundation::math::LonLat;

    #[test]
    fn center_scores_one_and_antipode_minus_one() {
        let c = LonLat::new(20.0, 10.0);
        assert!((visibility_score(c, c) - 1.0).abs() < 1e-12);
        let anti = LonLat::new(-160.0, -10.0);
        assert!((visibility_score(anti, c) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn edge_on_point_scores_zero() {
        let c = LonLat::new(0.0, 0.0);
        assert!(visibility_score(LonLat::new(90.0, 0.0), c).abs() < 1e-12);
        assert!(visibility_score(LonLat::new(0.0, 90.0), c).abs() < 1e-12);
    }

    #[test]
    fn score_is_monotonic_while_rotating_out_of_view() {
        let c = LonLat::new(0.0, 0.0);
        let mut prev = f64::INFINITY;
        for lon in 0..=180 {
            let s = visibility_score(LonLat::new(lon as f64, 0.0), c);
            assert!(s <= prev);
            prev = s;
        }
    }

    #[test]
    fn threshold_hides_limb_points() {
        let t = HorizonTest::new(LonLat::new(0.0, 0.0), 0.05);
        assert!(t.is_front_facing(LonLat::new(80.0, 0.0)));
        assert!(!t.is_front_facing(LonLat::new(89.0, 0.0)));
    }
}
