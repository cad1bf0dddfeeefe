use foundation::math::precision::stable_total_cmp_f64;

use crate::World;
use crate::components::{HitMode, Layer, NodeKind, PathData, Shape};
use crate::entity::EntityId;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    pub kind: NodeKind,
    pub layer: Layer,
    /// Screen distance from the pointer to the hit feature (0 inside fills).
    pub distance: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    /// Extra pixels around circular markers.
    pub marker_padding_px: f64,
    /// Half-width of the invisible hit stroke around traces.
    pub stroke_half_width_px: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            marker_padding_px: 4.0,
            stroke_half_width_px: 8.0,
        }
    }
}

/// Deterministic screen-space picking over projected shapes.
///
/// Ordering contract:
/// - The topmost layer with any hit wins.
/// - Within a layer, the smallest distance wins; ties go to the lower `EntityId::index()`.
///
/// Notes:
/// - Hidden nodes and nodes whose kind has `HitMode::None` are ignored.
/// - Shapes come from the last redraw, so picking matches what is on screen.
pub fn pick_screen(world: &World, x_px: f64, y_px: f64, opts: PickOptions) -> Option<PickHit> {
    if !x_px.is_finite() || !y_px.is_finite() {
        return None;
    }
    let p = [x_px, y_px];
    let mut best: Option<PickHit> = None;

    for entity in world.entities() {
        if !world.is_visible(entity) {
            continue;
        }
        let (Some(kind), Some(layer), Some(shape)) =
            (world.kind(entity), world.layer(entity), world.shape(entity))
        else {
            continue;
        };
        let Some(distance) = hit_distance(kind.hit_mode(), shape, p, opts) else {
            continue;
        };

        let candidate = PickHit {
            entity,
            kind,
            layer,
            distance,
        };
        best = match best {
            None => Some(candidate),
            Some(b) => {
                let ord = b
                    .layer
                    .cmp(&candidate.layer)
                    .then_with(|| stable_total_cmp_f64(candidate.distance, b.distance))
                    .then_with(|| candidate.entity.index().cmp(&b.entity.index()));
                if ord.is_lt() { Some(candidate) } else { Some(b) }
            }
        };
    }

    best
}

fn hit_distance(mode: HitMode, shape: &Shape, p: [f64; 2], opts: PickOptions) -> Option<f64> {
    match (mode, shape) {
        (HitMode::None, _) | (_, Shape::Empty) => None,
        (HitMode::Disc, Shape::Circle { center, radius }) => {
            let d = dist(p, *center);
            (d <= radius + opts.marker_padding_px).then_some(d)
        }
        (HitMode::Fill, Shape::Path(path)) => {
            if !path.bounds.contains(p) {
                return None;
            }
            point_in_path(path, p).then_some(0.0)
        }
        (HitMode::Stroke, Shape::Path(path)) => {
            if !path.bounds.inflate(opts.stroke_half_width_px).contains(p) {
                return None;
            }
            let d = distance_to_path(path, p);
            (d <= opts.stroke_half_width_px).then_some(d)
        }
        _ => None,
    }
}

/// Even-odd point-in-polygon over every closed sub-path.
pub fn point_in_path(path: &PathData, p: [f64; 2]) -> bool {
    let mut inside = false;
    for sub in path.subpaths.iter().filter(|s| s.closed) {
        let pts = &sub.points;
        let n = pts.len();
        if n < 3 {
            continue;
        }
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = (pts[i][0], pts[i][1]);
            let (xj, yj) = (pts[j][0], pts[j][1]);
            if (yi > p[1]) != (yj > p[1]) {
                let x_cross = (xj - xi) * (p[1] - yi) / (yj - yi) + xi;
                if p[0] < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
    }
    inside
}

/// Minimum distance from `p` to any segment of the path (closing segments included).
pub fn distance_to_path(path: &PathData, p: [f64; 2]) -> f64 {
    let mut best = f64::INFINITY;
    for sub in &path.subpaths {
        let pts = &sub.points;
        for w in pts.windows(2) {
            best = best.min(distance_to_segment(p, w[0], w[1]));
        }
        if sub.closed
            && let (Some(first), Some(last)) = (pts.first(), pts.last())
        {
            best = best.min(distance_to_segment(p, *last, *first));
        }
    }
    best
}

fn distance_to_segment(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let ap = [p[0] - a[0], p[1] - a[1]];
    let len2 = ab[0] * ab[0] + ab[1] * ab[1];
    if len2 <= 0.0 {
        return dist(p, a);
    }
    let t = ((ap[0] * ab[0] + ap[1] * ab[1]) / len2).clamp(0.0, 1.0);
    dist(p, [a[0] + ab[0] * t, a[1] + ab[1] * t])
}

fn dist(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::{PickOptions, pick_screen};
    use crate::World;
    use crate::components::{Layer, NodeKind, Paint, PathData, Shape, Visibility};

    fn square(world: &mut World, kind: NodeKind, layer: Layer, x0: f64, size: f64) -> crate::entity::EntityId {
        let e = world.spawn(kind, layer);
        let mut p = PathData::new();
        p.push(
            vec![[x0, 0.0], [x0 + size, 0.0], [x0 + size, size], [x0, size]],
            true,
        );
        world.set_paint(e, Paint::default());
        world.set_shape(e, Shape::Path(p));
        e
    }

    #[test]
    fn picks_country_under_pointer() {
        let mut world = World::new();
        let a = square(&mut world, NodeKind::Country(0), Layer::Countries, 0.0, 10.0);
        let _b = square(&mut world, NodeKind::Country(1), Layer::Countries, 20.0, 10.0);

        let hit = pick_screen(&world, 5.0, 5.0, PickOptions::default()).expect("hit");
        assert_eq!(hit.entity, a);
        assert!(pick_screen(&world, 15.0, 5.0, PickOptions::default()).is_none());
    }

    #[test]
    fn markers_win_over_countries() {
        let mut world = World::new();
        square(&mut world, NodeKind::Country(0), Layer::Countries, 0.0, 10.0);
        let m = world.spawn(NodeKind::OrbitMarker(0), Layer::OrbitMarkers);
        world.set_shape(
            m,
            Shape::Circle {
                center: [5.0, 5.0],
                radius: 2.0,
            },
        );

        let hit = pick_screen(&world, 6.0, 5.0, PickOptions::default()).expect("hit");
        assert_eq!(hit.entity, m);
    }

    #[test]
    fn stroke_hit_uses_wide_region_and_ignores_decor() {
        let mut world = World::new();
        let _decor = square(&mut world, NodeKind::Decor, Layer::Rings, 0.0, 100.0);
        let trace = world.spawn(NodeKind::OrbitTrace(2), Layer::OrbitTraces);
        let mut p = PathData::new();
        p.push(vec![[0.0, 50.0], [100.0, 50.0]], false);
        world.set_shape(trace, Shape::Path(p));

        let hit = pick_screen(&world, 40.0, 56.0, PickOptions::default()).expect("hit");
        assert_eq!(hit.entity, trace);
        assert!((hit.distance - 6.0).abs() < 1e-9);
        assert!(pick_screen(&world, 40.0, 70.0, PickOptions::default()).is_none());

        world.set_visibility(trace, Visibility::hidden());
        assert!(pick_screen(&world, 40.0, 50.0, PickOptions::default()).is_none());
    }

    #[test]
    fn ties_break_by_entity_index() {
        let mut world = World::new();
        let first = square(&mut world, NodeKind::Country(0), Layer::Countries, 0.0, 10.0);
        let _second = square(&mut world, NodeKind::Country(1), Layer::Countries, 0.0, 10.0);
        let hit = pick_screen(&world, 5.0, 5.0, PickOptions::default()).expect("hit");
        assert_eq!(hit.entity, first);
    }
}
