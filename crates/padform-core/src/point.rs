use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A location on the board plane, in millimetres.
///
/// Rotations follow board convention: positive angles turn clockwise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    #[must_use]
    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Rotate clockwise by `angle_deg` around `origin` (the plane origin when `None`).
    pub fn rotate(&mut self, angle_deg: f64, origin: Option<Point>) -> &mut Self {
        let origin = origin.unwrap_or_default();
        let p = rotate_point([self.x, self.y], -angle_deg, [origin.x, origin.y]);
        self.x = p[0];
        self.y = p[1];
        self
    }

    /// Non-mutating variant of [`Point::rotate`].
    #[must_use]
    pub fn rotated(mut self, angle_deg: f64, origin: Option<Point>) -> Self {
        self.rotate(angle_deg, origin);
        self
    }
}

impl From<[f64; 2]> for Point {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// Counter-clockwise in the maths sense; callers negate for board rotation.
fn rotate_vec(v: [f64; 2], angle_deg: f64) -> [f64; 2] {
    let a = angle_deg.to_radians();
    let (s, c) = a.sin_cos();
    [v[0] * c - v[1] * s, v[0] * s + v[1] * c]
}

fn rotate_point(p: [f64; 2], angle_deg: f64, origin: [f64; 2]) -> [f64; 2] {
    let translated = [p[0] - origin[0], p[1] - origin[1]];
    let rotated = rotate_vec(translated, angle_deg);
    [rotated[0] + origin[0], rotated[1] + origin[1]]
}
