use serde::{Deserialize, Serialize};

/// Axis-aligned bounding rectangle, the minimum bounding rectangle (MBR) of
/// every R-tree entry and node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub min: [f64; 2], // [x_min, y_min]
    pub max: [f64; 2], // [x_max, y_max]
}

impl Rectangle {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        assert!(x_min <= x_max && y_min <= y_max, "Invalid rectangle bounds");
        Rectangle {
            min: [x_min, y_min],
            max: [x_max, y_max],
        }
    }

    /// Degenerate rectangle at a single point.
    pub fn from_point(x: f64, y: f64) -> Self {
        Rectangle {
            min: [x, y],
            max: [x, y],
        }
    }

    pub fn area(&self) -> f64 {
        (self.max[0] - self.min[0]) * (self.max[1] - self.min[1])
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle {
            min: [
                self.min[0].min(other.min[0]),
                self.min[1].min(other.min[1]),
            ],
            max: [
                self.max[0].max(other.max[0]),
                self.max[1].max(other.max[1]),
            ],
        }
    }

    /// Area growth needed to absorb `other`.
    pub fn enlargement(&self, other: &Rectangle) -> f64 {
        self.union(other).area() - self.area()
    }

    pub fn contains(&self, other: &Rectangle) -> bool {
        self.min[0] <= other.min[0]
            && self.min[1] <= other.min[1]
            && self.max[0] >= other.max[0]
            && self.max[1] >= other.max[1]
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.min[0] <= x && x <= self.max[0] && self.min[1] <= y && y <= self.max[1]
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        ]
    }

    /// Minimum Euclidean distance from a point to this rectangle: zero when
    /// the point lies inside, otherwise the distance to the nearest edge.
    /// This is the lower bound that makes branch-and-bound pruning safe.
    pub fn min_distance(&self, x: f64, y: f64) -> f64 {
        let closest_x = x.clamp(self.min[0], self.max[0]);
        let closest_y = y.clamp(self.min[1], self.max[1]);
        let dx = x - closest_x;
        let dy = y - closest_y;
        (dx * dx + dy * dy).sqrt()
    }
}
