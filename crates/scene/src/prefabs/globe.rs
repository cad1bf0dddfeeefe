use foundation::math::LonLat;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::World;
use crate::components::{Geometry, Layer, NodeKind, Paint};
use crate::entity::EntityId;

/// Latitude of the tropics (Cancer/Capricorn).
pub const TROPIC_LAT: f64 = 23.44;
/// Latitude of the polar circles.
pub const POLAR_CIRCLE_LAT: f64 = 66.56;

/// Decorative rings drawn around the disc, as multiples of the globe radius.
pub const RING_FACTORS: [f64; 3] = [1.04, 1.1, 1.16];

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DecorOptions {
    pub minor_step_deg: f64,
    pub major_step_deg: f64,
    /// Sampling step along graticule lines.
    pub sample_deg: f64,
    pub star_count: usize,
    pub star_seed: u64,
    pub hex_cell_px: f64,
}

impl Default for DecorOptions {
    fn default() -> Self {
        Self {
            minor_step_deg: 10.0,
            major_step_deg: 30.0,
            sample_deg: 2.0,
            star_count: 220,
            star_seed: 7,
            hex_cell_px: 14.0,
        }
    }
}

/// Handles of the static decor nodes of a globe.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeDecor {
    pub stars: EntityId,
    pub atmosphere: EntityId,
    pub ocean: EntityId,
    pub hex: EntityId,
    pub graticule_minor: EntityId,
    pub graticule_major: EntityId,
    pub equator: EntityId,
    pub tropics: EntityId,
    pub polar_circles: EntityId,
    pub rings: Vec<EntityId>,
    pub ticks: EntityId,
}

impl GlobeDecor {
    pub fn all(&self) -> Vec<EntityId> {
        let mut out = vec![
            self.stars,
            self.atmosphere,
            self.ocean,
            self.hex,
            self.graticule_minor,
            self.graticule_major,
            self.equator,
            self.tropics,
            self.polar_circles,
        ];
        out.extend(self.rings.iter().copied());
        out.push(self.ticks);
        out
    }
}

/// Spawn the static decor of the globe. Paint is left at its default; the
/// renderer resolves it from the active theme.
pub fn spawn_globe_decor(world: &mut World, opts: &DecorOptions) -> GlobeDecor {
    let mut decor = |layer: Layer, geometry: Geometry| {
        world.spawn_with(NodeKind::Decor, layer, geometry, Paint::default())
    };

    let stars = decor(
        Layer::Stars,
        Geometry::Stars {
            points: star_field(opts.star_count, opts.star_seed),
        },
    );
    let atmosphere = decor(Layer::Atmosphere, Geometry::DiscCircle { radius_factor: 1.02 });
    let ocean = decor(Layer::Ocean, Geometry::DiscCircle { radius_factor: 1.0 });
    let hex = decor(
        Layer::HexPattern,
        Geometry::HexPattern {
            cell_px: opts.hex_cell_px,
        },
    );
    let graticule_minor = decor(
        Layer::GraticuleMinor,
        Geometry::GeoLines {
            lines: graticule_lines(opts.minor_step_deg, opts.sample_deg),
        },
    );
    let graticule_major = decor(
        Layer::GraticuleMajor,
        Geometry::GeoLines {
            lines: graticule_lines(opts.major_step_deg, opts.sample_deg),
        },
    );
    let equator = decor(
        Layer::Parallels,
        Geometry::GeoLines {
            lines: vec![parallel(0.0, opts.sample_deg)],
        },
    );
    let tropics = decor(
        Layer::Parallels,
        Geometry::GeoLines {
            lines: vec![
                parallel(TROPIC_LAT, opts.sample_deg),
                parallel(-TROPIC_LAT, opts.sample_deg),
            ],
        },
    );
    let polar_circles = decor(
        Layer::Parallels,
        Geometry::GeoLines {
            lines: vec![
                parallel(POLAR_CIRCLE_LAT, opts.sample_deg),
                parallel(-POLAR_CIRCLE_LAT, opts.sample_deg),
            ],
        },
    );
    let rings = RING_FACTORS
        .iter()
        .map(|f| decor(Layer::Rings, Geometry::DiscCircle { radius_factor: *f }))
        .collect();
    let ticks = decor(
        Layer::Ticks,
        Geometry::DiscTicks {
            inner: RING_FACTORS[1],
            outer: RING_FACTORS[1] + 0.015,
            outer_major: RING_FACTORS[2],
            step_deg: 5.0,
            major_every: 6,
        },
    );

    GlobeDecor {
        stars,
        atmosphere,
        ocean,
        hex,
        graticule_minor,
        graticule_major,
        equator,
        tropics,
        polar_circles,
        rings,
        ticks,
    }
}

/// Meridians every `step_deg` plus parallels strictly between the poles.
pub fn graticule_lines(step_deg: f64, sample_deg: f64) -> Vec<Vec<LonLat>> {
    let step = step_deg.max(1.0);
    let sample = sample_deg.clamp(0.25, step);
    let mut lines = Vec::new();

    let meridians = (360.0 / step).round() as usize;
    for i in 0..meridians {
        let lon = -180.0 + i as f64 * step;
        let n = (180.0 / sample).ceil() as usize;
        lines.push(
            (0..=n)
                .map(|j| LonLat::new(lon, (-90.0 + j as f64 * sample).min(90.0)))
                .collect(),
        );
    }

    let mut lat = -90.0 + step;
    while lat < 90.0 - 1e-9 {
        lines.push(parallel(lat, sample));
        lat += step;
    }
    lines
}

/// Closed circle of constant latitude.
pub fn parallel(lat: f64, sample_deg: f64) -> Vec<LonLat> {
    let sample = sample_deg.max(0.25);
    let n = (360.0 / sample).ceil() as usize;
    (0..=n)
        .map(|j| LonLat::new((-180.0 + j as f64 * sample).min(180.0), lat))
        .collect()
}

/// Deterministic background stars in normalized viewport coordinates.
pub fn star_field(count: usize, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = rng.random::<f64>();
            let y = rng.random::<f64>();
            // Mostly faint pinpricks, a few larger ones.
            let r = 0.4 + rng.random::<f64>().powi(3) * 1.2;
            [x, y, r]
        })
        .collect()
}

/// Centers of pointy-top hexagons covering a disc, with circumradius `cell`.
pub fn hex_centers(center: [f64; 2], radius: f64, cell: f64) -> Vec<[f64; 2]> {
    if !cell.is_finite() || !radius.is_finite() || cell <= 0.0 || radius <= 0.0 {
        return Vec::new();
    }
    let w = 3f64.sqrt() * cell;
    let h = 1.5 * cell;
    let rows = (radius / h).ceil() as i64 + 1;
    let cols = (radius / w).ceil() as i64 + 1;
    let mut out = Vec::new();
    for row in -rows..=rows {
        let y = center[1] + row as f64 * h;
        let shift = if row.rem_euclid(2) == 1 { w / 2.0 } else { 0.0 };
        for col in -cols..=cols {
            let x = center[0] + col as f64 * w + shift;
            let d = ((x - center[0]).powi(2) + (y - center[1]).powi(2)).sqrt();
            if d + cell <= radius {
                out.push([x, y]);
            }
        }
    }
    out
}

/// Corner points of a pointy-top hexagon.
pub fn hex_corners(c: [f64; 2], cell: f64) -> Vec<[f64; 2]> {
    (0..6)
        .map(|i| {
            let a = (60.0 * i as f64 - 30.0).to_radians();
            [c[0] + cell * a.cos(), c[1] + cell * a.sin()]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_decor_in_layers() {
        let mut world = World::new();
        let decor = spawn_globe_decor(&mut world, &DecorOptions::default());

        assert_eq!(decor.all().len(), world.len());
        assert_eq!(world.layer(decor.stars), Some(Layer::Stars));
        assert_eq!(world.entities_in_layer(Layer::Rings).len(), RING_FACTORS.len());
        assert!(
            decor
                .all()
                .iter()
                .all(|e| world.kind(*e) == Some(NodeKind::Decor))
        );
    }

    #[test]
    fn graticule_has_meridians_and_parallels() {
        let lines = graticule_lines(30.0, 2.0);
        // 12 meridians + 5 parallels (-60..=60).
        assert_eq!(lines.len(), 17);
        let first = &lines[0];
        assert_eq!(first.first().map(|p| p.lat), Some(-90.0));
        assert_eq!(first.last().map(|p| p.lat), Some(90.0));
    }

    #[test]
    fn parallel_is_closed_loop() {
        let p = parallel(TROPIC_LAT, 5.0);
        assert_eq!(p.first().map(|p| p.lon), Some(-180.0));
        assert_eq!(p.last().map(|p| p.lon), Some(180.0));
        assert!(p.iter().all(|q| q.lat == TROPIC_LAT));
    }

    #[test]
    fn star_field_is_deterministic() {
        let a = star_field(32, 9);
        let b = star_field(32, 9);
        let c = star_field(32, 10);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|s| (0.0..1.0).contains(&s[0]) && (0.0..1.0).contains(&s[1])));
    }

    #[test]
    fn hex_cells_stay_inside_disc() {
        let centers = hex_centers([100.0, 100.0], 80.0, 10.0);
        assert!(!centers.is_empty());
        for c in &centers {
            for corner in hex_corners(*c, 10.0) {
                let d = ((corner[0] - 100.0).powi(2) + (corner[1] - 100.0).powi(2)).sqrt();
                assert!(d <= 80.0 + 1e-9);
            }
        }
        assert!(hex_centers([0.0, 0.0], 5.0, 0.0).is_empty());
    }
}
