//! Argument payloads carried through the node event delegates.
//!
//! Every payload implements `Default` so a dispatch entry point can
//! synthesize a transient argument when the caller supplies none.

use crate::canvas::DrawCommand;
use brio_structs::{Point, Rect};

/// Per-frame timing payload for the update delegate.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateArgs {
    /// Seconds since the previous frame.
    pub dt: f64,
}

/// Payload for the render delegate. `target_area` is the node's resolved
/// rectangle in output coordinates; commands pushed by handlers are flushed
/// to the canvas after the delegate runs.
#[derive(Debug, Clone, Default)]
pub struct RenderArgs {
    pub target_area: Rect,
    pub commands: Vec<DrawCommand>,
}

impl RenderArgs {
    pub fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

/// Payload for key-down and key-up delegates.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyArgs {
    pub keycode: u32,
    pub scancode: u32,
    /// True when the event comes from key auto-repeat.
    pub repeat: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    Unknown,
    Left,
    Middle,
    Right,
    X1,
    X2,
}

/// Payload for mouse button delegates. `local_position` is re-expressed in
/// each receiving node's own coordinate space as the event descends the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseButtonArgs {
    pub local_position: Point,
    pub button: MouseButton,
    pub clicks: u8,
}

/// Payload for the mouse wheel delegate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseWheelArgs {
    pub delta_x: i32,
    pub delta_y: i32,
    pub precise_x: f32,
    pub precise_y: f32,
    /// True when the platform reports a flipped (natural) scroll direction.
    pub flipped: bool,
}

/// Payload for mouse motion delegates; same local-space convention as
/// `MouseButtonArgs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseMotionArgs {
    pub local_position: Point,
    pub delta_x: i32,
    pub delta_y: i32,
}
