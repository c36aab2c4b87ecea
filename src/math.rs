use std::ops::{Add, Index, IndexMut, Sub};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn all() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn from_offset(offset: [i32; 3]) -> Self {
        Self::new(offset[0] as f32, offset[1] as f32, offset[2] as f32)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Chebyshev-style test: every component differs by less than `tolerance`.
    pub fn within(self, other: Vec3, tolerance: f32) -> bool {
        (self.x - other.x).abs() < tolerance
            && (self.y - other.y).abs() < tolerance
            && (self.z - other.z).abs() < tolerance
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Index<Axis> for Vec3 {
    type Output = f32;

    fn index(&self, axis: Axis) -> &f32 {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

impl IndexMut<Axis> for Vec3 {
    fn index_mut(&mut self, axis: Axis) -> &mut f32 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

/// Euler angles in radians, applied in XYZ order.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Orientation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn yaw(y: f32) -> Self {
        Self { x: 0.0, y, z: 0.0 }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn matrix(self) -> Mat3 {
        let (a, b) = (self.x.cos(), self.x.sin());
        let (c, d) = (self.y.cos(), self.y.sin());
        let (e, f) = (self.z.cos(), self.z.sin());
        let (ae, af, be, bf) = (a * e, a * f, b * e, b * f);
        Mat3 {
            rows: [
                [c * e, -c * f, d],
                [af + be * d, ae - bf * d, -b * c],
                [bf - ae * d, be + af * d, a * c],
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat3 {
    pub rows: [[f32; 3]; 3],
}

impl Mat3 {
    pub fn apply(&self, v: Vec3) -> Vec3 {
        let r = &self.rows;
        Vec3::new(
            r[0][0] * v.x + r[0][1] * v.y + r[0][2] * v.z,
            r[1][0] * v.x + r[1][1] * v.y + r[1][2] * v.z,
            r[2][0] * v.x + r[2][1] * v.y + r[2][2] * v.z,
        )
    }
}

/// Nearest integer with halves going up, the way browsers round.
pub fn round_half_up(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}
