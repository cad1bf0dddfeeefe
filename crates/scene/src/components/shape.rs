use std::fmt::Write as _;

use foundation::bounds::Aabb2;

/// One screen-space sub-path.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    pub points: Vec<[f64; 2]>,
    pub closed: bool,
}

/// Projected screen-space path made of independent sub-paths.
#[derive(Debug, Clone, PartialEq)]
pub struct PathData {
    pub subpaths: Vec<SubPath>,
    pub bounds: Aabb2,
}

impl Default for PathData {
    fn default() -> Self {
        Self {
            subpaths: Vec::new(),
            bounds: Aabb2::empty(),
        }
    }
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sub-path; sub-paths with fewer than two points are dropped.
    pub fn push(&mut self, points: Vec<[f64; 2]>, closed: bool) {
        if points.len() < 2 {
            return;
        }
        for p in &points {
            self.bounds.include(*p);
        }
        self.subpaths.push(SubPath { points, closed });
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.subpaths.iter().map(|s| s.points.len()).sum()
    }

    /// SVG path `d` attribute, coordinates rounded to 0.1 px.
    pub fn to_svg_d(&self) -> String {
        let mut d = String::new();
        for sub in &self.subpaths {
            for (i, p) in sub.points.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{cmd}{:.1},{:.1}", p[0], p[1]);
            }
            if sub.closed {
                d.push('Z');
            }
        }
        d
    }
}

/// Projected form of a node, recomputed only when the camera is dirty.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Shape {
    /// Nothing on screen (e.g. entirely behind the globe).
    #[default]
    Empty,
    Path(PathData),
    Circle { center: [f64; 2], radius: f64 },
    /// Screen points `[x, y, radius]`.
    Points(Vec<[f64; 3]>),
    /// Text whose baseline starts at `anchor`.
    Text { anchor: [f64; 2], text: String },
}

impl Shape {
    pub fn is_empty(&self) -> bool {
        match self {
            Shape::Empty => true,
            Shape::Path(p) => p.is_empty(),
            Shape::Circle { .. } => false,
            Shape::Points(p) => p.is_empty(),
            Shape::Text { text, .. } => text.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PathData, Shape};

    #[test]
    fn svg_d_closes_rings() {
        let mut p = PathData::new();
        p.push(vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]], true);
        p.push(vec![[1.0, 1.0], [2.0, 2.0]], false);
        assert_eq!(
            p.to_svg_d(),
            "M0.0,0.0L10.0,0.0L10.0,10.0ZM1.0,1.0L2.0,2.0"
        );
        assert_eq!(p.point_count(), 5);
        assert_eq!(p.bounds.max, [10.0, 10.0]);
    }

    #[test]
    fn degenerate_subpaths_are_dropped() {
        let mut p = PathData::new();
        p.push(vec![[0.0, 0.0]], false);
        assert!(p.is_empty());
        assert!(Shape::Path(p).is_empty());
        assert!(Shape::Empty.is_empty());
        let blank = Shape::Text {
            anchor: [0.0, 0.0],
            text: String::new(),
        };
        assert!(blank.is_empty());
    }
}
