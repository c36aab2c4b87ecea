use serde::{Deserialize, Serialize};

/// Logical actions held during one frame.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct InputFrame {
    pub move_left: bool,
    pub move_right: bool,
    pub move_forward: bool,
    pub move_backward: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub fast_drop: bool,
}

impl InputFrame {
    /// -1, 0 or 1 along the left/right axis; opposite presses cancel.
    pub fn sideways(&self) -> f32 {
        axis_value(self.move_left, self.move_right)
    }

    /// -1 for forward, 1 for backward.
    pub fn depthwise(&self) -> f32 {
        axis_value(self.move_forward, self.move_backward)
    }

    /// Positive turns left (counter-clockwise seen from above).
    pub fn turn(&self) -> f32 {
        axis_value(self.rotate_right, self.rotate_left)
    }
}

fn axis_value(negative: bool, positive: bool) -> f32 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// Browser `KeyboardEvent.code` values for each action.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlBindings {
    pub move_left: Vec<String>,
    pub move_right: Vec<String>,
    pub move_forward: Vec<String>,
    pub move_backward: Vec<String>,
    pub rotate_left: Vec<String>,
    pub rotate_right: Vec<String>,
    pub fast_drop: Vec<String>,
}

impl Default for ControlBindings {
    fn default() -> Self {
        let keys = |ks: &[&str]| ks.iter().map(|k| k.to_string()).collect();
        Self {
            move_left: keys(&["ArrowLeft", "KeyA"]),
            move_right: keys(&["ArrowRight", "KeyD"]),
            move_forward: keys(&["ArrowUp", "KeyW"]),
            move_backward: keys(&["ArrowDown", "KeyS"]),
            rotate_left: keys(&["KeyQ"]),
            rotate_right: keys(&["KeyE"]),
            fast_drop: keys(&["Space"]),
        }
    }
}

impl ControlBindings {
    pub fn frame_from_pressed<S: AsRef<str>>(&self, pressed: &[S]) -> InputFrame {
        let held = |bound: &[String]| {
            pressed
                .iter()
                .any(|p| bound.iter().any(|b| b == p.as_ref()))
        };
        InputFrame {
            move_left: held(&self.move_left),
            move_right: held(&self.move_right),
            move_forward: held(&self.move_forward),
            move_backward: held(&self.move_backward),
            rotate_left: held(&self.rotate_left),
            rotate_right: held(&self.rotate_right),
            fast_drop: held(&self.fast_drop),
        }
    }
}
