use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::board::{Board, LockReport};
use crate::collision::{
    Arena, BLOCK_HALF_SIZE, CollisionPolicy, Playfield, Resolution, Transform, resolve,
};
use crate::input::InputFrame;
use crate::log;
use crate::math::{Axis, Orientation, Vec3};
use crate::randomizer::{Randomizer, randomizer_from_kind};
use crate::settings::{GameMode, GameSettings};
use crate::shape::PieceKind;
use crate::wall::WallFace;

static PLANE_AXES: [Axis; 2] = [Axis::X, Axis::Z];

/// Farthest a block may move along one axis in a single sub-step.
const MAX_STEP_TRAVEL: f32 = BLOCK_HALF_SIZE;
/// Largest yaw change per sub-step, in radians.
const MAX_STEP_TURN: f32 = 0.25;
const MAX_SUBSTEPS: u32 = 512;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub transform: Transform,
    pub face: Option<WallFace>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Active(ActivePiece),
    /// Wall mode: the last piece is locked, the next one is not out yet.
    Locking { remaining_ms: f32 },
    BoardFull,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PhaseName {
    Active,
    Locking,
    BoardFull,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickEvent {
    Moved,
    Slid,
    Locked { report: LockReport, board_full: bool },
    Waiting,
    Spawned,
    BoardFull,
    Idle,
}

pub struct Game {
    settings: GameSettings,
    field: Playfield,
    phase: Phase,
    face: WallFace,
    randomizer: Box<dyn Randomizer>,
    pieces_locked: u32,
    elapsed_ms: f32,
}

fn build_field(settings: &GameSettings) -> Playfield {
    match settings.mode.policy() {
        CollisionPolicy::Discrete => Playfield::Discrete(Board::new(settings.board)),
        CollisionPolicy::Geometric => Playfield::Geometric(Arena::new(settings.arena_half_extent)),
    }
}

impl Game {
    pub fn new(settings: GameSettings) -> Result<Self, String> {
        settings.validate()?;
        let mut game = Self {
            field: build_field(&settings),
            randomizer: randomizer_from_kind(&settings.randomizer, settings.seed),
            settings,
            phase: Phase::BoardFull,
            face: WallFace::default(),
            pieces_locked: 0,
            elapsed_ms: 0.0,
        };
        game.check_spawn_fits()?;
        game.spawn();
        Ok(game)
    }

    /// Every piece must fit at every spawn point of an empty playfield.
    fn check_spawn_fits(&self) -> Result<(), String> {
        let faces: Vec<Option<WallFace>> = match self.settings.mode {
            GameMode::Wall => WallFace::all().into_iter().map(Some).collect(),
            _ => vec![None],
        };
        for face in faces {
            let at = self.spawn_transform_for(face);
            for kind in PieceKind::all() {
                if !self.field.is_legal(kind, &at, face) {
                    return Err(format!(
                        "{kind:?} does not fit at its spawn point {:?} on an empty {:?} playfield",
                        at.position, self.settings.mode
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.field = build_field(&self.settings);
        self.randomizer = randomizer_from_kind(&self.settings.randomizer, self.settings.seed);
        self.face = WallFace::default();
        self.pieces_locked = 0;
        self.elapsed_ms = 0.0;
        self.spawn();
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn field(&self) -> &Playfield {
        &self.field
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        match &self.phase {
            Phase::Active(piece) => Some(piece),
            _ => None,
        }
    }

    /// Only wall mode has a face.
    pub fn wall_face(&self) -> Option<WallFace> {
        match self.settings.mode {
            GameMode::Wall => Some(self.face),
            _ => None,
        }
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn is_board_full(&self) -> bool {
        matches!(self.phase, Phase::BoardFull)
    }

    fn lateral_axes(&self, face: Option<WallFace>) -> &'static [Axis] {
        match face {
            Some(face) => std::slice::from_ref(&face.profile().lateral_axis),
            None => &PLANE_AXES,
        }
    }

    fn spawn_transform_for(&self, face: Option<WallFace>) -> Transform {
        let s = &self.settings;
        match (s.mode, face) {
            (GameMode::Grid, _) => Transform::new(
                Vec3::new(0.0, s.board.height as f32 - 1.0, 0.0),
                Orientation::IDENTITY,
            ),
            (_, Some(face)) => {
                let p = face.profile();
                Transform::new(
                    p.spawn_position(s.arena_half_extent, s.spawn_height),
                    Orientation::yaw(p.spawn_yaw),
                )
            }
            (_, None) => Transform::new(Vec3::new(0.0, s.spawn_height, 0.0), Orientation::IDENTITY),
        }
    }

    pub fn spawn_transform(&self) -> Transform {
        self.spawn_transform_for(self.wall_face())
    }

    fn spawn(&mut self) -> TickEvent {
        let kind = self.randomizer.next();
        let face = self.wall_face();
        let piece = ActivePiece {
            kind,
            transform: self.spawn_transform_for(face),
            face,
        };
        if !self.field.is_legal(kind, &piece.transform, face) {
            log(&format!(
                "[game] board full: {kind:?} blocked at spawn after {} pieces",
                self.pieces_locked
            ));
            self.phase = Phase::BoardFull;
            return TickEvent::BoardFull;
        }
        self.phase = Phase::Active(piece);
        TickEvent::Spawned
    }

    /// Where `piece` would be after `dt_ms` with `input` held, gravity
    /// included.
    pub fn candidate(&self, piece: &ActivePiece, dt_ms: f32, input: &InputFrame) -> Transform {
        let s = &self.settings;
        let secs = dt_ms.max(0.0) / 1000.0;
        let step = s.move_speed * secs;
        let mut t = piece.transform;

        match piece.face {
            None => {
                t.position.x += input.sideways() * step;
                t.position.z += input.depthwise() * step;
            }
            Some(face) => {
                let p = face.profile();
                t.position[p.lateral_axis] -= input.sideways() * p.left_sign * step;
            }
        }

        let turn = input.turn();
        if turn != 0.0 {
            t.orientation.y = t.orientation.y % TAU + turn * s.rotate_speed * secs;
        }

        let mut fall = s.fall_speed;
        if input.fast_drop {
            fall += s.fast_drop_speed;
        }
        t.position.y -= fall * secs;
        t
    }

    /// Advances the game by one frame. Negative or non-finite frame times
    /// count as zero.
    pub fn tick(&mut self, dt_ms: f32, input: &InputFrame) -> TickEvent {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        match self.phase {
            Phase::BoardFull => TickEvent::Idle,
            Phase::Locking { remaining_ms } => {
                self.elapsed_ms += dt_ms;
                let left = remaining_ms - dt_ms;
                if left > 0.0 {
                    self.phase = Phase::Locking { remaining_ms: left };
                    TickEvent::Waiting
                } else {
                    self.spawn()
                }
            }
            Phase::Active(_) => {
                self.elapsed_ms += dt_ms;
                self.advance(dt_ms, input)
            }
        }
    }

    /// Longest sub-step in ms such that no block travels more than
    /// `MAX_STEP_TRAVEL` along an axis or turns more than `MAX_STEP_TURN`.
    fn substep_limit_ms(&self, input: &InputFrame) -> f32 {
        let s = &self.settings;
        let mut fall = s.fall_speed;
        if input.fast_drop {
            fall += s.fast_drop_speed;
        }
        let slide = if input.sideways() != 0.0 || input.depthwise() != 0.0 {
            s.move_speed
        } else {
            0.0
        };
        let turn = if input.turn() != 0.0 { s.rotate_speed } else { 0.0 };
        let rate = (fall.max(slide) / MAX_STEP_TRAVEL).max(turn / MAX_STEP_TURN);
        if rate > 0.0 { 1000.0 / rate } else { f32::INFINITY }
    }

    /// Spends `dt_ms` in sub-steps and stops at the first lock. Time beyond
    /// `MAX_SUBSTEPS` sub-steps is dropped.
    fn advance(&mut self, dt_ms: f32, input: &InputFrame) -> TickEvent {
        let limit = self.substep_limit_ms(input);
        let mut left = dt_ms.min(limit * MAX_SUBSTEPS as f32);
        let mut outcome = TickEvent::Idle;
        loop {
            let Phase::Active(piece) = self.phase else {
                break;
            };
            let step = left.min(limit);
            left -= step;
            match self.step(piece, step, input) {
                locked @ TickEvent::Locked { .. } => return locked,
                TickEvent::Slid => outcome = TickEvent::Slid,
                TickEvent::Moved if outcome == TickEvent::Idle => outcome = TickEvent::Moved,
                _ => {}
            }
            if left <= 0.0 {
                break;
            }
        }
        outcome
    }

    fn step(&mut self, piece: ActivePiece, dt_ms: f32, input: &InputFrame) -> TickEvent {
        let candidate = self.candidate(&piece, dt_ms, input);
        let axes = self.lateral_axes(piece.face);
        match resolve(&self.field, piece.kind, piece.face, &piece.transform, &candidate, axes) {
            Resolution::Commit(transform) => {
                self.phase = Phase::Active(ActivePiece { transform, ..piece });
                if transform == piece.transform {
                    TickEvent::Idle
                } else {
                    TickEvent::Moved
                }
            }
            Resolution::Slide(transform) => {
                self.phase = Phase::Active(ActivePiece { transform, ..piece });
                TickEvent::Slid
            }
            Resolution::Lock => self.lock_active(piece),
        }
    }

    /// Locks `piece` where it stands and moves on to the next piece in one
    /// step.
    fn lock_active(&mut self, piece: ActivePiece) -> TickEvent {
        let report = self.field.lock(piece.kind, &piece.transform, piece.face);
        if report.dropped > 0 {
            log(&format!(
                "[game] {:?} at {:?}: {} cell(s) outside the board were dropped",
                piece.kind, piece.transform.position, report.dropped
            ));
        }
        self.pieces_locked += 1;

        if self.settings.mode == GameMode::Wall {
            self.face = self.face.next();
            log(&format!("[game] wall face -> {:?}", self.face));
            if self.settings.lock_cooldown_ms > 0.0 {
                self.phase = Phase::Locking {
                    remaining_ms: self.settings.lock_cooldown_ms,
                };
                return TickEvent::Locked {
                    report,
                    board_full: false,
                };
            }
        }

        let board_full = self.spawn() == TickEvent::BoardFull;
        TickEvent::Locked { report, board_full }
    }

    pub fn snapshot(&self) -> FrameView {
        let phase = match self.phase {
            Phase::Active(_) => PhaseName::Active,
            Phase::Locking { .. } => PhaseName::Locking,
            Phase::BoardFull => PhaseName::BoardFull,
        };
        let (grid_cells, locked) = match &self.field {
            Playfield::Discrete(board) => (board.occupied_cells(), Vec::new()),
            Playfield::Geometric(arena) => (
                Vec::new(),
                arena
                    .locked()
                    .iter()
                    .map(|p| PieceView::new(p.kind, &p.transform, p.face))
                    .collect(),
            ),
        };
        FrameView {
            mode: self.settings.mode,
            phase,
            wall_face: self.wall_face(),
            active: self
                .active()
                .map(|p| PieceView::new(p.kind, &p.transform, p.face)),
            grid_cells,
            locked,
            pieces_locked: self.pieces_locked,
            elapsed_ms: self.elapsed_ms,
            board_full: self.is_board_full(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PieceView {
    pub kind: PieceKind,
    pub color: &'static str,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub blocks: Vec<[f32; 3]>,
    pub face: Option<WallFace>,
}

impl PieceView {
    fn new(kind: PieceKind, t: &Transform, face: Option<WallFace>) -> Self {
        Self {
            kind,
            color: kind.color(),
            position: t.position.to_array(),
            rotation: t.orientation.to_array(),
            blocks: t.world_points(kind).iter().map(|p| p.to_array()).collect(),
            face,
        }
    }
}

/// What the renderer needs to draw one frame.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameView {
    pub mode: GameMode,
    pub phase: PhaseName,
    pub wall_face: Option<WallFace>,
    pub active: Option<PieceView>,
    pub grid_cells: Vec<[i32; 3]>,
    pub locked: Vec<PieceView>,
    pub pieces_locked: u32,
    pub elapsed_ms: f32,
    pub board_full: bool,
}
