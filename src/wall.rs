use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::math::{Axis, Vec3};

/// Which inner face of the cube pieces currently slide down.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
pub enum WallFace {
    #[default]
    Front,
    Right,
    Back,
    Left,
}

/// Everything that differs between faces, in one place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallProfile {
    pub spawn_yaw: f32,
    /// The horizontal axis a piece may move along on this face.
    pub lateral_axis: Axis,
    /// Direction of a "left" press along `lateral_axis`.
    pub left_sign: f32,
    /// The axis pinned to the face plane.
    pub fixed_axis: Axis,
    pub fixed_sign: f32,
}

static PROFILES: [WallProfile; 4] = [
    // Front
    WallProfile {
        spawn_yaw: 0.0,
        lateral_axis: Axis::X,
        left_sign: -1.0,
        fixed_axis: Axis::Z,
        fixed_sign: 1.0,
    },
    // Right
    WallProfile {
        spawn_yaw: -FRAC_PI_2,
        lateral_axis: Axis::Z,
        left_sign: 1.0,
        fixed_axis: Axis::X,
        fixed_sign: 1.0,
    },
    // Back
    WallProfile {
        spawn_yaw: PI,
        lateral_axis: Axis::X,
        left_sign: -1.0,
        fixed_axis: Axis::Z,
        fixed_sign: -1.0,
    },
    // Left
    WallProfile {
        spawn_yaw: FRAC_PI_2,
        lateral_axis: Axis::Z,
        left_sign: 1.0,
        fixed_axis: Axis::X,
        fixed_sign: -1.0,
    },
];

impl WallFace {
    pub fn all() -> [WallFace; 4] {
        [WallFace::Front, WallFace::Right, WallFace::Back, WallFace::Left]
    }

    /// Clockwise seen from above.
    pub fn next(self) -> WallFace {
        match self {
            WallFace::Front => WallFace::Right,
            WallFace::Right => WallFace::Back,
            WallFace::Back => WallFace::Left,
            WallFace::Left => WallFace::Front,
        }
    }

    pub fn profile(self) -> &'static WallProfile {
        &PROFILES[self as usize]
    }
}

impl WallProfile {
    /// Coordinate of the face plane along `fixed_axis`.
    pub fn outer_bound(&self, half_extent: f32) -> f32 {
        self.fixed_sign * half_extent
    }

    pub fn spawn_position(&self, half_extent: f32, height: f32) -> Vec3 {
        let mut p = Vec3::new(0.0, height, 0.0);
        p[self.fixed_axis] = self.outer_bound(half_extent);
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_steps_return_to_start() {
        for face in WallFace::all() {
            assert_eq!(face.next().next().next().next(), face);
            assert_ne!(face.next(), face);
        }
    }

    #[test]
    fn spawn_points_sit_on_their_face() {
        let expected = [
            Vec3::new(0.0, 8.0, 4.5),
            Vec3::new(4.5, 8.0, 0.0),
            Vec3::new(0.0, 8.0, -4.5),
            Vec3::new(-4.5, 8.0, 0.0),
        ];
        for (face, want) in WallFace::all().into_iter().zip(expected) {
            assert_eq!(face.profile().spawn_position(4.5, 8.0), want, "{face:?}");
        }
    }

    #[test]
    fn lateral_and_fixed_axes_never_coincide() {
        for face in WallFace::all() {
            let p = face.profile();
            assert_ne!(p.lateral_axis, p.fixed_axis);
            assert_ne!(p.lateral_axis, Axis::Y);
        }
    }
}
