use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Axis-aligned bounding box in the section plane.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    pub fn around(center: Vec2, half_extent: f64) -> Self {
        Aabb2 {
            min: [center.x - half_extent, center.y - half_extent],
            max: [center.x + half_extent, center.y + half_extent],
        }
    }

    /// Smallest box containing every point; `None` for an empty slice.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = points.first()?;
        let mut b = Aabb2::new([first.x, first.y], [first.x, first.y]);
        for p in &points[1..] {
            b.min[0] = b.min[0].min(p.x);
            b.min[1] = b.min[1].min(p.y);
            b.max[0] = b.max[0].max(p.x);
            b.max[1] = b.max[1].max(p.y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::math::Vec2;

    #[test]
    fn around_center() {
        let b = Aabb2::around(Vec2::new(3.0, 4.0), 2.0);
        assert_eq!(b.min, [1.0, 2.0]);
        assert_eq!(b.max, [5.0, 6.0]);
        assert_eq!(b.width(), 4.0);
    }

    #[test]
    fn from_points_covers_all() {
        let pts = [
            Vec2::new(0.0, 10.0),
            Vec2::new(5.0, 10.0),
            Vec2::new(15.0, 0.0),
            Vec2::new(20.0, 0.0),
        ];
        let b = Aabb2::from_points(&pts).expect("non-empty");
        assert_eq!(b.min, [0.0, 0.0]);
        assert_eq!(b.max, [20.0, 10.0]);
        assert!(Aabb2::from_points(&[]).is_none());
    }
}
