//! The tree element itself: geometry, flags, delegates and attached scripts.

use crate::args::{
    KeyArgs, MouseButtonArgs, MouseMotionArgs, MouseWheelArgs, RenderArgs, UpdateArgs,
};
use crate::script::ScriptSet;
use brio_events::EventCaller;
use brio_ids::{NodeId, TextureId};
use brio_structs::{Alignment, Color, Point, Rect, Size};
use std::fmt;

/// The hookable delegates of a node, one `EventCaller` per event kind.
///
/// Mouse events come in pairs: the `global_*` caller always fires, the plain
/// caller only fires when the pointer is inside the node's own rectangle.
#[derive(Debug, Default)]
pub struct NodeEvents {
    pub update: EventCaller<Node, UpdateArgs>,
    pub render: EventCaller<Node, RenderArgs>,
    pub key_down: EventCaller<Node, KeyArgs>,
    pub key_up: EventCaller<Node, KeyArgs>,
    pub mouse_scroll: EventCaller<Node, MouseWheelArgs>,
    pub global_mouse_down: EventCaller<Node, MouseButtonArgs>,
    pub mouse_down: EventCaller<Node, MouseButtonArgs>,
    pub global_mouse_up: EventCaller<Node, MouseButtonArgs>,
    pub mouse_up: EventCaller<Node, MouseButtonArgs>,
    pub global_mouse_moved: EventCaller<Node, MouseMotionArgs>,
    pub mouse_moved: EventCaller<Node, MouseMotionArgs>,
}

impl NodeEvents {
    /// Move every handler out of `other` onto this set, per event,
    /// preserving registration order on both sides. Used by dispatch to
    /// merge back handlers registered while the delegates were running.
    pub fn absorb(&mut self, other: &mut NodeEvents) {
        self.update.absorb(&mut other.update);
        self.render.absorb(&mut other.render);
        self.key_down.absorb(&mut other.key_down);
        self.key_up.absorb(&mut other.key_up);
        self.mouse_scroll.absorb(&mut other.mouse_scroll);
        self.global_mouse_down.absorb(&mut other.global_mouse_down);
        self.mouse_down.absorb(&mut other.mouse_down);
        self.global_mouse_up.absorb(&mut other.global_mouse_up);
        self.mouse_up.absorb(&mut other.mouse_up);
        self.global_mouse_moved.absorb(&mut other.global_mouse_moved);
        self.mouse_moved.absorb(&mut other.mouse_moved);
    }
}

/// A node in the scene tree.
///
/// Geometry is local: `position` is an offset from the anchor point selected
/// by `alignment` inside the parent's resolved rectangle. Parent/child links
/// are arena IDs, never references; the graph operations on `NodeArena` keep
/// both directions of each link consistent.
pub struct Node {
    pub name: String,
    /// Disabled nodes are skipped entirely during recursive dispatch.
    pub enabled: bool,
    /// Gates input events only; rendering and updates ignore it.
    pub handle_input: bool,
    pub render_background: bool,
    pub position: Point,
    pub size: Size,
    pub alignment: Alignment,
    pub background_color: Color,
    pub background_texture: Option<TextureId>,
    pub events: NodeEvents,
    pub(crate) parent: NodeId,
    pub(crate) children: Vec<NodeId>,
    pub(crate) scripts: ScriptSet,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            handle_input: true,
            render_background: true,
            position: Point::ZERO,
            size: Size::ZERO,
            alignment: Alignment::TopLeft,
            background_color: Color::EMPTY,
            background_texture: None,
            events: NodeEvents::default(),
            parent: NodeId::nil(),
            children: Vec::new(),
            scripts: ScriptSet::default(),
        }
    }

    /// Local rectangle: `position` + `size`, before anchor resolution.
    pub fn area(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    /// Parent link, `NodeId::nil()` when the node is a root.
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("area", &self.area())
            .field("alignment", &self.alignment)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("scripts", &self.scripts.len())
            .finish()
    }
}
