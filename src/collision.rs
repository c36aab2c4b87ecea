use serde::{Deserialize, Serialize};

use crate::board::{Board, LockReport, world_cell};
use crate::math::{Axis, Orientation, Vec3};
use crate::shape::PieceKind;
use crate::wall::WallFace;

/// Half the edge of a unit block.
pub const BLOCK_HALF_SIZE: f32 = 0.5;
/// Per-axis distance below which two blocks overlap. Just under one block so
/// blocks resting face to face do not count.
pub const CONTACT_TOLERANCE: f32 = 0.95;
/// How far a block may stray from the face plane in wall mode.
pub const FACE_TOLERANCE: f32 = 0.1;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Orientation,
}

impl Transform {
    pub fn new(position: Vec3, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Centres of the piece's blocks in world space.
    pub fn world_points(&self, kind: PieceKind) -> [Vec3; 4] {
        let m = self.orientation.matrix();
        kind.offsets()
            .map(|o| self.position + m.apply(Vec3::from_offset(o)))
    }

    pub fn world_cells(&self, kind: PieceKind) -> [[i32; 3]; 4] {
        self.world_points(kind).map(world_cell)
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Round to lattice cells and query the occupancy grid.
    Discrete,
    /// Compare continuous block centres against arena walls and locked blocks.
    Geometric,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum CollisionKind {
    Vertical,
    Lateral,
}

/// A rejected candidate that moved vertically was trying to fall.
pub fn classify(current: &Transform, candidate: &Transform) -> CollisionKind {
    if candidate.position.y != current.position.y {
        CollisionKind::Vertical
    } else {
        CollisionKind::Lateral
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LockedPiece {
    pub kind: PieceKind,
    pub transform: Transform,
    pub face: Option<WallFace>,
    pub points: [Vec3; 4],
}

impl LockedPiece {
    pub fn new(kind: PieceKind, transform: Transform, face: Option<WallFace>) -> Self {
        Self {
            kind,
            transform,
            face,
            points: transform.world_points(kind),
        }
    }
}

/// Open box of side `2 * half_extent` centred on the origin above y = 0,
/// plus every piece locked into it so far.
#[derive(Clone, Debug)]
pub struct Arena {
    half_extent: f32,
    locked: Vec<LockedPiece>,
}

impl Arena {
    pub fn new(half_extent: f32) -> Self {
        Self {
            half_extent,
            locked: Vec::new(),
        }
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    pub fn locked(&self) -> &[LockedPiece] {
        &self.locked
    }

    fn inside_walls(&self, p: Vec3, face: Option<WallFace>) -> bool {
        let h = self.half_extent;
        let spans = |v: f32| v - BLOCK_HALF_SIZE >= -h && v + BLOCK_HALF_SIZE <= h;
        if p.y - BLOCK_HALF_SIZE < 0.0 {
            return false;
        }
        match face {
            None => spans(p.x) && spans(p.z),
            Some(face) => {
                let profile = face.profile();
                spans(p[profile.lateral_axis])
                    && (p[profile.fixed_axis] - profile.outer_bound(h)).abs() <= FACE_TOLERANCE
            }
        }
    }

    fn touches_stack(&self, p: Vec3) -> bool {
        self.locked
            .iter()
            .flat_map(|piece| piece.points.iter())
            .any(|q| p.within(*q, CONTACT_TOLERANCE))
    }

    pub fn is_legal(&self, kind: PieceKind, t: &Transform, face: Option<WallFace>) -> bool {
        t.world_points(kind)
            .iter()
            .all(|&p| self.inside_walls(p, face) && !self.touches_stack(p))
    }

    pub fn lock(&mut self, kind: PieceKind, t: &Transform, face: Option<WallFace>) -> LockReport {
        self.locked.push(LockedPiece::new(kind, *t, face));
        LockReport {
            written: kind.offsets().len(),
            dropped: 0,
        }
    }
}

/// The locked-block store, in whichever representation the policy needs.
#[derive(Clone, Debug)]
pub enum Playfield {
    Discrete(Board),
    Geometric(Arena),
}

impl Playfield {
    pub fn policy(&self) -> CollisionPolicy {
        match self {
            Playfield::Discrete(_) => CollisionPolicy::Discrete,
            Playfield::Geometric(_) => CollisionPolicy::Geometric,
        }
    }

    /// True iff every block of `kind` at `t` is inside the playfield and
    /// clear of locked blocks. The face only matters to the geometric policy.
    pub fn is_legal(&self, kind: PieceKind, t: &Transform, face: Option<WallFace>) -> bool {
        match self {
            Playfield::Discrete(board) => t
                .world_cells(kind)
                .iter()
                .all(|&[x, y, z]| !board.is_occupied(x, y, z)),
            Playfield::Geometric(arena) => arena.is_legal(kind, t, face),
        }
    }

    pub fn lock(&mut self, kind: PieceKind, t: &Transform, face: Option<WallFace>) -> LockReport {
        match self {
            Playfield::Discrete(board) => board.lock_cells(&t.world_cells(kind)),
            Playfield::Geometric(arena) => arena.lock(kind, t, face),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resolution {
    /// The candidate was legal as proposed.
    Commit(Transform),
    /// Part of a level candidate was discarded; this is what survived.
    Slide(Transform),
    /// The piece could not fall and must lock where it is.
    Lock,
}

/// Decides what becomes of `candidate`. `lateral_axes` are the axes the
/// player can move along; on a lateral rejection only the offending ones are
/// reverted. Any rejected candidate that also changes y locks, so a piece
/// steered into a wall while falling locks rather than slides.
pub fn resolve(
    field: &Playfield,
    kind: PieceKind,
    face: Option<WallFace>,
    current: &Transform,
    candidate: &Transform,
    lateral_axes: &[Axis],
) -> Resolution {
    if field.is_legal(kind, candidate, face) {
        return Resolution::Commit(*candidate);
    }
    match classify(current, candidate) {
        CollisionKind::Vertical => Resolution::Lock,
        CollisionKind::Lateral => {
            Resolution::Slide(slide(field, kind, face, current, candidate, lateral_axes))
        }
    }
}

fn slide(
    field: &Playfield,
    kind: PieceKind,
    face: Option<WallFace>,
    current: &Transform,
    candidate: &Transform,
    lateral_axes: &[Axis],
) -> Transform {
    // Smallest discards first: nothing, each single axis, then all of them.
    let mut attempts: Vec<Vec<Axis>> = vec![Vec::new()];
    attempts.extend(lateral_axes.iter().map(|&a| vec![a]));
    if lateral_axes.len() > 1 {
        attempts.push(lateral_axes.to_vec());
    }

    for reverted in attempts {
        let mut t = *candidate;
        for &axis in &reverted {
            t.position[axis] = current.position[axis];
        }
        if !reverted.is_empty() && field.is_legal(kind, &t, face) {
            return t;
        }
        if t.orientation != current.orientation {
            t.orientation = current.orientation;
            if field.is_legal(kind, &t, face) {
                return t;
            }
        }
    }
    *current
}
