/**
 * Property tests for the collision and lock engine.
 *
 * Invariants covered:
 * - An empty playfield accepts every placement whose blocks are inside it.
 * - Any block outside the playfield rejects the placement.
 * - Locking is a set union: repeating a lock adds nothing.
 * - A level candidate never changes height when it is resolved.
 * - Whatever the input and frame time, the active piece always sits somewhere
 *   legal and the grid only ever grows.
 * - A piece dropped straight down locks resting on the floor or the stack.
 */
use cubefall::{
    Arena, Axis, Board, BoardDims, FrameView, Game, GameMode, GameSettings, InputFrame, Orientation,
    PieceKind, Playfield, RandomizerKind, Resolution, TickEvent, Transform, Vec3, resolve,
};
use proptest::prelude::*;

fn kind_strategy() -> impl Strategy<Value = PieceKind> {
    prop_oneof![
        Just(PieceKind::L),
        Just(PieceKind::I),
        Just(PieceKind::O),
        Just(PieceKind::T),
    ]
}

fn input_strategy() -> impl Strategy<Value = InputFrame> {
    any::<[bool; 7]>().prop_map(|b| InputFrame {
        move_left: b[0],
        move_right: b[1],
        move_forward: b[2],
        move_backward: b[3],
        rotate_left: b[4],
        rotate_right: b[5],
        fast_drop: b[6],
    })
}

/// The piece locked between `before` and `after` rests on the floor or on a
/// block underneath it.
fn lock_is_supported(before: &FrameView, after: &FrameView) -> bool {
    match after.mode {
        GameMode::Grid => after
            .grid_cells
            .iter()
            .filter(|c| !before.grid_cells.contains(*c))
            .any(|&[x, y, z]| y == 0 || before.grid_cells.contains(&[x, y - 1, z])),
        GameMode::Free | GameMode::Wall => {
            let Some(piece) = after.locked.last() else {
                return false;
            };
            let stack: Vec<[f32; 3]> =
                before.locked.iter().flat_map(|p| p.blocks.clone()).collect();
            piece.blocks.iter().any(|b| {
                b[1] < 1.0 + 1e-3
                    || stack.iter().any(|q| {
                        let rise = b[1] - q[1];
                        (b[0] - q[0]).abs() < 0.95
                            && (b[2] - q[2]).abs() < 0.95
                            && rise > 0.0
                            && rise < 1.5
                    })
            })
        }
    }
}

fn at(x: f32, y: f32, z: f32) -> Transform {
    Transform::new(Vec3::new(x, y, z), Orientation::IDENTITY)
}

proptest! {
    #[test]
    fn empty_grid_accepts_in_bounds(kind in kind_strategy(), x in -3i32..=3, y in -1i32..=11, z in -3i32..=3) {
        let board = Board::new(BoardDims::default());
        let t = at(x as f32, y as f32, z as f32);
        let inside = t.world_cells(kind).iter().all(|&[cx, cy, cz]| board.is_within_bounds(cx, cy, cz));
        let field = Playfield::Discrete(board);
        prop_assert_eq!(field.is_legal(kind, &t, None), inside);
    }

    #[test]
    fn empty_arena_accepts_in_bounds(kind in kind_strategy(), x in -5.0f32..5.0, y in -1.0f32..12.0, z in -5.0f32..5.0) {
        let field = Playfield::Geometric(Arena::new(4.5));
        let t = at(x, y, z);
        let inside = t.world_points(kind).iter().all(|p| {
            p.x - 0.5 >= -4.5 && p.x + 0.5 <= 4.5 && p.z - 0.5 >= -4.5 && p.z + 0.5 <= 4.5 && p.y - 0.5 >= 0.0
        });
        prop_assert_eq!(field.is_legal(kind, &t, None), inside);
    }

    #[test]
    fn repeated_lock_adds_nothing(kind in kind_strategy(), x in -2.0f32..2.0, y in 0.0f32..10.0, z in -2.0f32..2.0) {
        let mut board = Board::new(BoardDims::default());
        let first = board.lock(&kind.offsets(), Vec3::new(x, y, z));
        let cells = board.occupied_cells();
        let second = board.lock(&kind.offsets(), Vec3::new(x, y, z));
        prop_assert_eq!(board.occupied_cells(), cells);
        prop_assert_eq!(first, second);
        prop_assert_eq!(board.filled_count(), first.written);
    }

    #[test]
    fn level_candidate_keeps_height(
        kind in kind_strategy(),
        x in -4.0f32..4.0,
        z in -4.0f32..4.0,
        dx in -1.0f32..1.0,
        dz in -1.0f32..1.0,
        yaw in -0.5f32..0.5,
        blocker in -4.0f32..4.0,
    ) {
        let mut field = Playfield::Geometric(Arena::new(4.5));
        field.lock(PieceKind::I, &at(blocker, 4.0, 0.0), None);
        let current = at(x, 5.0, z);
        prop_assume!(field.is_legal(kind, &current, None));
        let candidate = Transform::new(Vec3::new(x + dx, 5.0, z + dz), Orientation::yaw(yaw));
        match resolve(&field, kind, None, &current, &candidate, &[Axis::X, Axis::Z]) {
            Resolution::Commit(t) | Resolution::Slide(t) => {
                prop_assert_eq!(t.position.y, 5.0);
                prop_assert!(field.is_legal(kind, &t, None));
            }
            Resolution::Lock => prop_assert!(false, "a level move must never lock"),
        }
    }

    #[test]
    fn active_piece_is_always_legal(
        mode in prop_oneof![Just(GameMode::Grid), Just(GameMode::Free), Just(GameMode::Wall)],
        seed in any::<u64>(),
        frames in prop::collection::vec((input_strategy(), 0.0f32..2000.0), 1..40),
    ) {
        let settings = GameSettings {
            seed: Some(seed),
            randomizer: RandomizerKind::TrueRandom,
            ..GameSettings::with_mode(mode)
        };
        let mut game = Game::new(settings).unwrap();
        for i in 0..600 {
            let (input, dt) = &frames[i % frames.len()];
            let before = game.snapshot();
            let event = game.tick(*dt, input);
            let after = game.snapshot();
            match event {
                TickEvent::Locked { .. } => {
                    prop_assert_eq!(after.pieces_locked, before.pieces_locked + 1);
                    let steered =
                        input.sideways() != 0.0 || input.depthwise() != 0.0 || input.turn() != 0.0;
                    if !steered {
                        prop_assert!(
                            lock_is_supported(&before, &after),
                            "floating lock after a {} ms frame",
                            dt
                        );
                    }
                }
                _ => prop_assert_eq!(after.pieces_locked, before.pieces_locked),
            }
            if let Some(piece) = game.active() {
                prop_assert!(game.field().is_legal(piece.kind, &piece.transform, piece.face));
            }
            prop_assert!(after.grid_cells.len() >= before.grid_cells.len());
            if game.is_board_full() {
                break;
            }
        }
    }
}

#[test]
fn grid_bounds_reject_each_side() {
    let field = Playfield::Discrete(Board::new(BoardDims::default()));
    let kind = PieceKind::I;
    // I spans x = ox, y = oy-3..=oy, z = oz.
    assert!(field.is_legal(kind, &at(-2.0, 3.0, 0.0), None));
    assert!(!field.is_legal(kind, &at(-3.0, 3.0, 0.0), None));
    assert!(field.is_legal(kind, &at(2.0, 3.0, 0.0), None));
    assert!(!field.is_legal(kind, &at(3.0, 3.0, 0.0), None));
    assert!(!field.is_legal(kind, &at(0.0, 2.0, 0.0), None));
    assert!(field.is_legal(kind, &at(0.0, 9.0, 0.0), None));
    assert!(!field.is_legal(kind, &at(0.0, 10.0, 0.0), None));
    assert!(field.is_legal(kind, &at(0.0, 3.0, -2.0), None));
    assert!(!field.is_legal(kind, &at(0.0, 3.0, -3.0), None));
    assert!(field.is_legal(kind, &at(0.0, 3.0, 2.0), None));
    assert!(!field.is_legal(kind, &at(0.0, 3.0, 3.0), None));
}

#[test]
fn arena_bounds_reject_each_side() {
    let field = Playfield::Geometric(Arena::new(4.5));
    let kind = PieceKind::I;
    assert!(field.is_legal(kind, &at(-4.0, 5.0, 0.0), None));
    assert!(!field.is_legal(kind, &at(-4.1, 5.0, 0.0), None));
    assert!(field.is_legal(kind, &at(4.0, 5.0, 0.0), None));
    assert!(!field.is_legal(kind, &at(4.1, 5.0, 0.0), None));
    assert!(field.is_legal(kind, &at(0.0, 5.0, -4.0), None));
    assert!(!field.is_legal(kind, &at(0.0, 5.0, -4.1), None));
    assert!(field.is_legal(kind, &at(0.0, 5.0, 4.0), None));
    assert!(!field.is_legal(kind, &at(0.0, 5.0, 4.1), None));
    assert!(field.is_legal(kind, &at(0.0, 3.5, 0.0), None));
    assert!(!field.is_legal(kind, &at(0.0, 3.4, 0.0), None));
}
