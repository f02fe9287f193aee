//! The world: one node arena, one scene registry, and the frame entry
//! points that drive the current scene through them.
//!
//! Everything that used to be reachable from anywhere is reachable from
//! here and only here; callers thread `&mut World` (or one of its two
//! halves) to whatever needs it.

use crate::registry::{SceneError, SceneRegistry};
use brio_ids::{NodeId, SceneId};
use brio_nodes::{
    Canvas, KeyArgs, MouseButtonArgs, MouseMotionArgs, MouseWheelArgs, Node, NodeArena,
    RenderArgs, Script,
};
use brio_structs::{Color, Rect};
use log::debug;

#[derive(Debug, Default)]
pub struct World {
    pub nodes: NodeArena,
    pub scenes: SceneRegistry,
}

impl World {
    /// A world with an initialized (but empty) scene registry.
    pub fn new() -> Self {
        let mut world = Self::default();
        world.scenes.initialize();
        world
    }

    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(name))
    }

    /// Full node teardown: children are orphaned (not destroyed), the
    /// parent link is severed, every script gets its `on_stop`, scene
    /// memberships are dropped, and the slot is freed. Returns false for
    /// an ID that no longer resolves.
    pub fn destroy_node(&mut self, id: NodeId) -> bool {
        if !self.nodes.contains(id) {
            return false;
        }
        self.nodes.detach_all_children(id);
        self.nodes.set_parent(id, NodeId::nil());
        self.nodes.destroy_all_scripts(id);
        self.scenes.for_each_scene(|scene| {
            scene.remove(id);
        });
        let removed = self.nodes.remove(id).is_some();
        debug!("node {id} destroyed");
        removed
    }

    pub fn create_scene(&mut self, name: impl Into<String>) -> Result<SceneId, SceneError> {
        self.scenes.create_scene(name)
    }

    pub fn add_script<T: Script + Default>(&mut self, id: NodeId) {
        self.nodes.add_script::<T>(id);
    }

    pub fn destroy_script<T: Script>(&mut self, id: NodeId) -> bool {
        self.nodes.destroy_script::<T>(id)
    }

    pub fn get_script<T: Script>(&self, id: NodeId) -> Option<&T> {
        self.nodes.get_script(id)
    }

    pub fn get_script_mut<T: Script>(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_script_mut(id)
    }

    pub fn contains_script<T: Script>(&self, id: NodeId) -> bool {
        self.nodes.contains_script::<T>(id)
    }

    /// Members of the current scene, bottom layer first.
    fn current_members(&self) -> Vec<NodeId> {
        self.scenes
            .current_scene()
            .map(|scene| scene.members())
            .unwrap_or_default()
    }

    /// Advance the current scene by `dt` seconds, layer by layer.
    pub fn update(&mut self, dt: f64) {
        for member in self.current_members() {
            if self.nodes.get(member).is_some_and(|n| n.enabled) {
                self.nodes.raise_update_event(member, dt, true);
            }
        }
    }

    /// Draw the current scene onto `canvas`. The scene background (when it
    /// has one) covers the viewport first; then each member's rectangle is
    /// anchored inside `viewport`, layers bottom first so higher layers
    /// paint over lower ones.
    pub fn render(&mut self, canvas: &mut dyn Canvas, viewport: Rect) {
        if let Some(scene) = self.scenes.current_scene() {
            if scene.background_color != Color::EMPTY || scene.background_texture.is_some() {
                canvas.set_draw_color(scene.background_color);
                canvas.fill_rect(viewport);
                if let Some(texture) = scene.background_texture {
                    canvas.draw_texture(viewport, texture);
                }
            }
        }
        for member in self.current_members() {
            let Some(node) = self.nodes.get(member) else {
                continue;
            };
            if !node.enabled {
                continue;
            }
            let mut args = RenderArgs {
                target_area: viewport.anchor(node.area(), node.alignment),
                commands: Vec::new(),
            };
            self.nodes
                .raise_render_event(member, canvas, Some(&mut args), true);
        }
    }

    pub fn raise_key_down(&mut self, args: &mut KeyArgs) {
        for member in self.input_members() {
            self.nodes.raise_key_down_event(member, Some(args), true);
        }
    }

    pub fn raise_key_up(&mut self, args: &mut KeyArgs) {
        for member in self.input_members() {
            self.nodes.raise_key_up_event(member, Some(args), true);
        }
    }

    pub fn raise_mouse_scroll(&mut self, args: &mut MouseWheelArgs) {
        for member in self.input_members() {
            self.nodes.raise_mouse_scroll_event(member, Some(args), true);
        }
    }

    /// Route a mouse press into the current scene. `args.local_position`
    /// is in viewport space; each member receives a copy re-expressed in
    /// its own space.
    pub fn raise_mouse_down(&mut self, viewport: Rect, args: MouseButtonArgs) {
        for member in self.input_members() {
            let Some(area) = self.member_area(member, viewport) else {
                continue;
            };
            let mut member_args = args;
            member_args.local_position -= area.top_left() - viewport.top_left();
            self.nodes
                .raise_mouse_down_event(member, Some(&mut member_args), true);
        }
    }

    pub fn raise_mouse_up(&mut self, viewport: Rect, args: MouseButtonArgs) {
        for member in self.input_members() {
            let Some(area) = self.member_area(member, viewport) else {
                continue;
            };
            let mut member_args = args;
            member_args.local_position -= area.top_left() - viewport.top_left();
            self.nodes
                .raise_mouse_up_event(member, Some(&mut member_args), true);
        }
    }

    pub fn raise_mouse_moved(&mut self, viewport: Rect, args: MouseMotionArgs) {
        for member in self.input_members() {
            let Some(area) = self.member_area(member, viewport) else {
                continue;
            };
            let mut member_args = args;
            member_args.local_position -= area.top_left() - viewport.top_left();
            self.nodes
                .raise_mouse_moved_event(member, Some(&mut member_args), true);
        }
    }

    fn input_members(&self) -> Vec<NodeId> {
        self.current_members()
            .into_iter()
            .filter(|&id| {
                self.nodes
                    .get(id)
                    .is_some_and(|n| n.enabled && n.handle_input)
            })
            .collect()
    }

    fn member_area(&self, member: NodeId, viewport: Rect) -> Option<Rect> {
        let node = self.nodes.get(member)?;
        Some(viewport.anchor(node.area(), node.alignment))
    }
}
