//! Drawing seam between the node tree and whatever actually rasterizes.
//!
//! Dispatch never talks to a window or a GPU; it emits draw calls through
//! the `Canvas` trait. `DrawList` is the recording implementation used by
//! tests and by the headless runtime.

use brio_ids::TextureId;
use brio_structs::{Color, Rect};

/// Target surface for node rendering.
pub trait Canvas {
    fn set_draw_color(&mut self, color: Color);
    fn fill_rect(&mut self, area: Rect);
    fn draw_texture(&mut self, area: Rect, texture: TextureId);

    fn apply(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::SetDrawColor(color) => self.set_draw_color(color),
            DrawCommand::FillRect(area) => self.fill_rect(area),
            DrawCommand::DrawTexture(area, texture) => self.draw_texture(area, texture),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    SetDrawColor(Color),
    FillRect(Rect),
    DrawTexture(Rect, TextureId),
}

/// Canvas that records commands instead of drawing them.
#[derive(Debug, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for DrawList {
    fn set_draw_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetDrawColor(color));
    }

    fn fill_rect(&mut self, area: Rect) {
        self.commands.push(DrawCommand::FillRect(area));
    }

    fn draw_texture(&mut self, area: Rect, texture: TextureId) {
        self.commands.push(DrawCommand::DrawTexture(area, texture));
    }
}
