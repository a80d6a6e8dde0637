use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Axis-aligned rectangle on the world plane. Edges are inclusive.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb2 { min, max }
    }

    /// Rectangle spanning `origin` to `origin + size`; negative sizes extend
    /// the other way.
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        let far = origin + size;
        Aabb2 {
            min: Vec2::new(origin.x.min(far.x), origin.y.min(far.y)),
            max: Vec2::new(origin.x.max(far.x), origin.y.max(far.y)),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size().scale(0.5)
    }

    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.min.x, self.max.y)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::math::Vec2;

    #[test]
    fn contains_edges_and_interior() {
        let b = Aabb2::from_origin_size(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
        assert!(b.contains(Vec2::new(10.0, 10.0)));
        assert!(b.contains(Vec2::new(30.0, 30.0)));
        assert!(b.contains(b.center()));
        assert!(!b.contains(Vec2::new(30.1, 15.0)));
        assert!(!b.contains(Vec2::new(15.0, 9.9)));
    }

    #[test]
    fn negative_size_is_normalized() {
        let b = Aabb2::from_origin_size(Vec2::new(10.0, 10.0), Vec2::new(-20.0, 5.0));
        assert_eq!(b.min, Vec2::new(-10.0, 10.0));
        assert_eq!(b.max, Vec2::new(10.0, 15.0));
        assert!(b.contains(b.center()));
    }

    #[test]
    fn center_and_corner() {
        let b = Aabb2::from_origin_size(Vec2::new(0.0, 0.0), Vec2::new(100.0, 50.0));
        assert_eq!(b.center(), Vec2::new(50.0, 25.0));
        assert_eq!(b.bottom_left(), Vec2::new(0.0, 50.0));
    }
}
