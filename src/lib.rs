use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

pub mod board;
pub mod collision;
pub mod game;
pub mod input;
pub mod math;
pub mod randomizer;
pub mod settings;
pub mod shape;
pub mod wall;

pub use board::{Board, BoardDims, LockReport};
pub use collision::{
    Arena, CollisionKind, CollisionPolicy, LockedPiece, Playfield, Resolution, Transform, classify,
    resolve,
};
pub use game::{ActivePiece, FrameView, Game, Phase, PhaseName, PieceView, TickEvent};
pub use input::{ControlBindings, InputFrame};
pub use math::{Axis, Orientation, Vec3};
pub use randomizer::RandomizerKind;
pub use settings::{GameMode, GameSettings};
pub use shape::PieceKind;
pub use wall::{WallFace, WallProfile};

#[wasm_bindgen(start)]
pub fn bootstrap() {
    console_error_panic_hook::set_once();
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn log(msg: &str) {
    eprintln!("{msg}");
}

/// Browser-facing handle: the render loop feeds it keys and frame times and
/// draws whatever `tick` hands back.
#[wasm_bindgen]
pub struct GameClient {
    game: Game,
    input: InputFrame,
}

#[wasm_bindgen]
impl GameClient {
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<GameClient, JsValue> {
        let settings: GameSettings = if settings.is_undefined() || settings.is_null() {
            GameSettings::default()
        } else {
            from_value(settings).unwrap_or_else(|e| {
                log(&format!("[client] unreadable settings, using defaults: {e}"));
                GameSettings::default()
            })
        };
        let game = Game::new(settings).map_err(|e| JsValue::from_str(&e))?;
        Ok(Self {
            game,
            input: InputFrame::default(),
        })
    }

    #[wasm_bindgen(js_name = tick)]
    pub fn tick(&mut self, dt_ms: f32) -> Result<JsValue, JsValue> {
        self.game.tick(dt_ms, &self.input);
        to_value(&self.game.snapshot()).map_err(|e| e.into())
    }

    #[wasm_bindgen(js_name = setInput)]
    pub fn set_input(&mut self, input: JsValue) -> Result<(), JsValue> {
        self.input = from_value(input)?;
        Ok(())
    }

    /// Takes the list of `KeyboardEvent.code`s currently held.
    #[wasm_bindgen(js_name = setPressedKeys)]
    pub fn set_pressed_keys(&mut self, keys: JsValue) -> Result<(), JsValue> {
        let keys: Vec<String> = from_value(keys)?;
        self.input = self.game.settings().bindings.frame_from_pressed(keys.as_slice());
        Ok(())
    }

    #[wasm_bindgen(js_name = snapshot)]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_value(&self.game.snapshot()).map_err(|e| e.into())
    }

    #[wasm_bindgen(js_name = bindings)]
    pub fn bindings(&self) -> Result<JsValue, JsValue> {
        to_value(&self.game.settings().bindings).map_err(|e| e.into())
    }

    #[wasm_bindgen(js_name = isBoardFull)]
    pub fn is_board_full(&self) -> bool {
        self.game.is_board_full()
    }

    #[wasm_bindgen(js_name = reset)]
    pub fn reset(&mut self) {
        self.game.reset();
        self.input = InputFrame::default();
        log("[client] new game");
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
