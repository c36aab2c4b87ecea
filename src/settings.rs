use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::board::BoardDims;
use crate::collision::{BLOCK_HALF_SIZE, CollisionPolicy};
use crate::input::ControlBindings;
use crate::randomizer::RandomizerKind;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub enum GameMode {
    /// Rounded cells on a fixed occupancy grid.
    #[default]
    Grid,
    /// Continuous blocks in an open box.
    Free,
    /// Continuous blocks sliding down the inner faces of the box, one face
    /// per piece.
    Wall,
}

impl GameMode {
    pub fn policy(self) -> CollisionPolicy {
        match self {
            GameMode::Grid => CollisionPolicy::Discrete,
            GameMode::Free | GameMode::Wall => CollisionPolicy::Geometric,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSettings {
    pub mode: GameMode,
    /// Grid mode only.
    pub board: BoardDims,
    /// Free and wall modes: the box spans `-half..=half` on x and z.
    pub arena_half_extent: f32,
    /// Free and wall modes: origin height of a fresh piece.
    pub spawn_height: f32,
    /// Units per second.
    pub move_speed: f32,
    /// Radians per second.
    pub rotate_speed: f32,
    /// Units per second, always applied.
    pub fall_speed: f32,
    /// Extra units per second while fast drop is held.
    pub fast_drop_speed: f32,
    /// Wall mode: pause between a lock and the next spawn.
    pub lock_cooldown_ms: f32,
    pub randomizer: RandomizerKind,
    pub seed: Option<u64>,
    pub bindings: ControlBindings,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::Grid,
            board: BoardDims::default(),
            arena_half_extent: 4.5,
            spawn_height: 8.0,
            move_speed: 5.0,
            rotate_speed: PI,
            fall_speed: 2.0,
            fast_drop_speed: 8.0,
            lock_cooldown_ms: 150.0,
            randomizer: RandomizerKind::default(),
            seed: None,
            bindings: ControlBindings::default(),
        }
    }
}

impl GameSettings {
    pub fn with_mode(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.board.validate()?;
        let speeds = [
            ("moveSpeed", self.move_speed),
            ("rotateSpeed", self.rotate_speed),
            ("fallSpeed", self.fall_speed),
            ("fastDropSpeed", self.fast_drop_speed),
            ("lockCooldownMs", self.lock_cooldown_ms),
        ];
        for (name, value) in speeds {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        if !self.arena_half_extent.is_finite() || self.arena_half_extent < BLOCK_HALF_SIZE {
            return Err(format!(
                "arenaHalfExtent must fit at least one block, got {}",
                self.arena_half_extent
            ));
        }
        if !self.spawn_height.is_finite() || self.spawn_height < 0.0 {
            return Err(format!("spawnHeight must be non-negative, got {}", self.spawn_height));
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        let settings: GameSettings = serde_json::from_str(text).map_err(|e| e.to_string())?;
        settings.validate()?;
        Ok(settings)
    }
}
