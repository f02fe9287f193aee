//! Node tree: arena-owned nodes, anchored geometry, recursive event
//! dispatch, and typed script attachment.

pub mod arena;
pub mod args;
pub mod canvas;
pub mod dispatch;
pub mod node;
pub mod script;

pub use arena::NodeArena;
pub use args::{
    KeyArgs, MouseButton, MouseButtonArgs, MouseMotionArgs, MouseWheelArgs, RenderArgs, UpdateArgs,
};
pub use canvas::{Canvas, DrawCommand, DrawList};
pub use node::{Node, NodeEvents};
pub use script::{Script, ScriptCtx, ScriptSet};

pub mod prelude {
    pub use crate::arena::NodeArena;
    pub use crate::args::{
        KeyArgs, MouseButton, MouseButtonArgs, MouseMotionArgs, MouseWheelArgs, RenderArgs,
        UpdateArgs,
    };
    pub use crate::canvas::{Canvas, DrawCommand, DrawList};
    pub use crate::node::{Node, NodeEvents};
    pub use crate::script::{Script, ScriptCtx};
}
