/// Screen-space axis-aligned bounding box (pixels).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// An inverted box that any `include` call will snap onto.
    pub fn empty() -> Self {
        Aabb2 {
            min: [f64::INFINITY, f64::INFINITY],
            max: [f64::NEG_INFINITY, f64::NEG_INFINITY],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    pub fn include(&mut self, p: [f64; 2]) {
        self.min[0] = self.min[0].min(p[0]);
        self.min[1] = self.min[1].min(p[1]);
        self.max[0] = self.max[0].max(p[0]);
        self.max[1] = self.max[1].max(p[1]);
    }

    pub fn inflate(self, by: f64) -> Self {
        Aabb2 {
            min: [self.min[0] - by, self.min[1] - by],
            max: [self.max[0] + by, self.max[1] + by],
        }
    }

    pub fn contains(&self, p: [f64; 2]) -> bool {
        p[0] >= self.min[0] && p[0] <= self.max[0] && p[1] >= self.min[1] && p[1] <= self.max[1]
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;

    #[test]
    fn include_grows_from_empty() {
        let mut b = Aabb2::empty();
        assert!(b.is_empty());
        b.include([1.0, 2.0]);
        b.include([-1.0, 5.0]);
        assert!(!b.is_empty());
        assert_eq!(b.min, [-1.0, 2.0]);
        assert_eq!(b.max, [1.0, 5.0]);
        assert!(b.contains([0.0, 3.0]));
        assert!(!b.contains([0.0, 6.0]));
        assert!(b.inflate(1.0).contains([0.0, 6.0]));
    }
}
