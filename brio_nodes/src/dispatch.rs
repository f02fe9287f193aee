//! Recursive event dispatch over the node tree.
//!
//! Every `raise_*` entry point follows the same shape: run the node's own
//! hooks and delegates, then walk a snapshot of the child list so handlers
//! can re-shape the tree mid-dispatch without invalidating the walk.
//! Delegates are moved out of the node while they run; handlers registered
//! during the call are merged back afterwards and fire from the next raise.
//!
//! Mouse events fire in pairs: the `global_*` delegate unconditionally, the
//! plain one only when the pointer lands inside the node's own rectangle.
//! Siblings never occlude each other; every overlapping child gets its hit.

use crate::arena::NodeArena;
use crate::args::{KeyArgs, MouseButtonArgs, MouseMotionArgs, MouseWheelArgs, RenderArgs, UpdateArgs};
use crate::canvas::Canvas;
use crate::node::{Node, NodeEvents};
use brio_events::EventCaller;
use brio_ids::NodeId;
use brio_structs::{Point, Rect};

impl NodeArena {
    /// Invoke one delegate with the take/merge-back discipline.
    fn fire<A: Default>(
        &mut self,
        id: NodeId,
        select: impl Fn(&mut NodeEvents) -> &mut EventCaller<Node, A>,
        args: &mut A,
    ) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let mut events = std::mem::take(&mut node.events);
        select(&mut events).call(node, Some(args));
        events.absorb(&mut node.events);
        node.events = events;
    }

    /// Advance the node and its subtree by `dt` seconds.
    ///
    /// Order: script `on_early_update`, script `on_update`, the update
    /// delegate, enabled children (when `recursive`), then script
    /// `on_late_update` — the late hook runs after the whole subtree and
    /// runs even when recursion is off.
    pub fn raise_update_event(&mut self, id: NodeId, dt: f64, recursive: bool) {
        if !self.contains(id) {
            return;
        }
        self.each_script(id, dt, |script, ctx| script.on_early_update(ctx));
        self.each_script(id, dt, |script, ctx| script.on_update(ctx));

        let mut args = UpdateArgs { dt };
        self.fire(id, |e| &mut e.update, &mut args);

        if recursive {
            for child in self.children_snapshot(id) {
                if self.get(child).is_some_and(|c| c.enabled) {
                    self.raise_update_event(child, dt, true);
                }
            }
        }

        self.each_script(id, dt, |script, ctx| script.on_late_update(ctx));
    }

    /// Draw the node and its subtree onto `canvas`.
    ///
    /// The built-in background pass runs first (when `render_background` is
    /// set), then the render delegate; commands the delegate pushed into the
    /// args are flushed to the canvas before children draw on top.
    /// Children are placed by anchoring their local rectangle inside this
    /// node's `target_area`.
    pub fn raise_render_event(
        &mut self,
        id: NodeId,
        canvas: &mut dyn Canvas,
        args: Option<&mut RenderArgs>,
        recursive: bool,
    ) {
        let mut transient = RenderArgs::default();
        let args = args.unwrap_or(&mut transient);

        let Some(node) = self.get(id) else {
            return;
        };
        if node.render_background {
            canvas.set_draw_color(node.background_color);
            canvas.fill_rect(args.target_area);
            if let Some(texture) = node.background_texture {
                canvas.draw_texture(args.target_area, texture);
            }
        }

        self.fire(id, |e| &mut e.render, args);
        for command in args.commands.drain(..) {
            canvas.apply(command);
        }

        if recursive {
            let target_area = args.target_area;
            for child in self.children_snapshot(id) {
                let Some(child_node) = self.get(child) else {
                    continue;
                };
                if !child_node.enabled {
                    continue;
                }
                let mut child_args = RenderArgs {
                    target_area: target_area.anchor(child_node.area(), child_node.alignment),
                    commands: Vec::new(),
                };
                self.raise_render_event(child, canvas, Some(&mut child_args), true);
            }
        }
    }

    /// Walk the enabled, input-handling children with the same shared args.
    fn raise_input_children<A: Default>(
        &mut self,
        id: NodeId,
        args: &mut A,
        raise: impl Fn(&mut Self, NodeId, &mut A),
    ) {
        for child in self.children_snapshot(id) {
            if self
                .get(child)
                .is_some_and(|c| c.enabled && c.handle_input)
            {
                raise(self, child, args);
            }
        }
    }

    pub fn raise_key_down_event(&mut self, id: NodeId, args: Option<&mut KeyArgs>, recursive: bool) {
        let mut transient = KeyArgs::default();
        let args = args.unwrap_or(&mut transient);
        if !self.contains(id) {
            return;
        }
        self.fire(id, |e| &mut e.key_down, args);
        if recursive {
            self.raise_input_children(id, args, |arena, child, args| {
                arena.raise_key_down_event(child, Some(args), true);
            });
        }
    }

    pub fn raise_key_up_event(&mut self, id: NodeId, args: Option<&mut KeyArgs>, recursive: bool) {
        let mut transient = KeyArgs::default();
        let args = args.unwrap_or(&mut transient);
        if !self.contains(id) {
            return;
        }
        self.fire(id, |e| &mut e.key_up, args);
        if recursive {
            self.raise_input_children(id, args, |arena, child, args| {
                arena.raise_key_up_event(child, Some(args), true);
            });
        }
    }

    pub fn raise_mouse_scroll_event(
        &mut self,
        id: NodeId,
        args: Option<&mut MouseWheelArgs>,
        recursive: bool,
    ) {
        let mut transient = MouseWheelArgs::default();
        let args = args.unwrap_or(&mut transient);
        if !self.contains(id) {
            return;
        }
        self.fire(id, |e| &mut e.mouse_scroll, args);
        if recursive {
            self.raise_input_children(id, args, |arena, child, args| {
                arena.raise_mouse_scroll_event(child, Some(args), true);
            });
        }
    }

    /// Whether `point`, expressed in the node's local space, lands inside
    /// the node's own rectangle. Checked after the global delegate runs, so
    /// a handler that resizes the node changes its own hit test.
    fn local_hit(&self, id: NodeId, point: Point) -> bool {
        self.get(id)
            .is_some_and(|node| Rect::from_parts(Point::ZERO, node.size).contains(point))
    }

    /// Each qualifying child gets a copy of the args with `local_position`
    /// re-expressed in that child's space. Copies, not shares: a child's
    /// handler mutating its args never leaks into a sibling's view.
    fn raise_pointer_children<A: Copy>(
        &mut self,
        id: NodeId,
        args: &A,
        shift: impl Fn(&mut A, Point),
        raise: impl Fn(&mut Self, NodeId, &mut A),
    ) {
        let Some(parent) = self.get(id) else {
            return;
        };
        let local_space = Rect::from_parts(Point::ZERO, parent.size);
        for child in self.children_snapshot(id) {
            let Some(child_node) = self.get(child) else {
                continue;
            };
            if !child_node.enabled || !child_node.handle_input {
                continue;
            }
            let child_area = local_space.anchor(child_node.area(), child_node.alignment);
            let mut child_args = *args;
            shift(&mut child_args, child_area.top_left());
            raise(self, child, &mut child_args);
        }
    }

    pub fn raise_mouse_down_event(
        &mut self,
        id: NodeId,
        args: Option<&mut MouseButtonArgs>,
        recursive: bool,
    ) {
        let mut transient = MouseButtonArgs::default();
        let args = args.unwrap_or(&mut transient);
        if !self.contains(id) {
            return;
        }
        self.fire(id, |e| &mut e.global_mouse_down, args);
        if self.local_hit(id, args.local_position) {
            self.fire(id, |e| &mut e.mouse_down, args);
        }
        if recursive {
            self.raise_pointer_children(
                id,
                args,
                |a, top_left| a.local_position -= top_left,
                |arena, child, args| arena.raise_mouse_down_event(child, Some(args), true),
            );
        }
    }

    pub fn raise_mouse_up_event(
        &mut self,
        id: NodeId,
        args: Option<&mut MouseButtonArgs>,
        recursive: bool,
    ) {
        let mut transient = MouseButtonArgs::default();
        let args = args.unwrap_or(&mut transient);
        if !self.contains(id) {
            return;
        }
        self.fire(id, |e| &mut e.global_mouse_up, args);
        if self.local_hit(id, args.local_position) {
            self.fire(id, |e| &mut e.mouse_up, args);
        }
        if recursive {
            self.raise_pointer_children(
                id,
                args,
                |a, top_left| a.local_position -= top_left,
                |arena, child, args| arena.raise_mouse_up_event(child, Some(args), true),
            );
        }
    }

    pub fn raise_mouse_moved_event(
        &mut self,
        id: NodeId,
        args: Option<&mut MouseMotionArgs>,
        recursive: bool,
    ) {
        let mut transient = MouseMotionArgs::default();
        let args = args.unwrap_or(&mut transient);
        if !self.contains(id) {
            return;
        }
        self.fire(id, |e| &mut e.global_mouse_moved, args);
        if self.local_hit(id, args.local_position) {
            self.fire(id, |e| &mut e.mouse_moved, args);
        }
        if recursive {
            self.raise_pointer_children(
                id,
                args,
                |a, top_left| a.local_position -= top_left,
                |arena, child, args| arena.raise_mouse_moved_event(child, Some(args), true),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList};
    use crate::script::{Script, ScriptCtx};
    use brio_ids::ScriptKey;
    use brio_structs::{Alignment, Color, Size};
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    thread_local! {
        static PHASES: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    }

    #[derive(Default)]
    struct PhaseScript;

    impl Script for PhaseScript {
        fn key() -> ScriptKey {
            ScriptKey::from_name("PhaseScript")
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        fn on_early_update(&mut self, _ctx: &mut ScriptCtx<'_>) {
            PHASES.with_borrow_mut(|p| p.push("early"));
        }
        fn on_update(&mut self, _ctx: &mut ScriptCtx<'_>) {
            PHASES.with_borrow_mut(|p| p.push("update"));
        }
        fn on_late_update(&mut self, _ctx: &mut ScriptCtx<'_>) {
            PHASES.with_borrow_mut(|p| p.push("late"));
        }
    }

    #[test]
    fn update_phases_run_in_order_around_the_subtree() {
        PHASES.with_borrow_mut(|p| p.clear());
        let mut arena = NodeArena::new();
        let root = arena.insert(Node::new("root"));
        let child = arena.insert(Node::new("child"));
        arena.add_child(root, child);
        arena.add_script::<PhaseScript>(root);

        arena
            .get_mut(child)
            .unwrap()
            .events
            .update
            .register(|_, _| PHASES.with_borrow_mut(|p| p.push("child-delegate")));
        arena
            .get_mut(root)
            .unwrap()
            .events
            .update
            .register(|_, _| PHASES.with_borrow_mut(|p| p.push("delegate")));

        arena.raise_update_event(root, 0.016, true);
        PHASES.with_borrow(|p| {
            assert_eq!(*p, ["early", "update", "delegate", "child-delegate", "late"]);
        });
    }

    #[test]
    fn late_update_fires_even_without_recursion() {
        PHASES.with_borrow_mut(|p| p.clear());
        let mut arena = NodeArena::new();
        let root = arena.insert(Node::new("root"));
        arena.add_script::<PhaseScript>(root);

        arena.raise_update_event(root, 0.016, false);
        PHASES.with_borrow(|p| assert_eq!(*p, ["early", "update", "late"]));
    }

    thread_local! {
        static VANISHED_STOPS: RefCell<u32> = const { RefCell::new(0) };
    }

    #[derive(Default)]
    struct SelfDestruct;

    impl Script for SelfDestruct {
        fn key() -> ScriptKey {
            ScriptKey::from_name("SelfDestruct")
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        fn on_update(&mut self, ctx: &mut ScriptCtx<'_>) {
            ctx.nodes.remove(ctx.target);
        }
        fn on_stop(&mut self, _ctx: &mut ScriptCtx<'_>) {
            VANISHED_STOPS.with_borrow_mut(|stops| *stops += 1);
        }
    }

    #[test]
    fn scripts_on_a_node_removed_mid_update_still_get_their_stop() {
        VANISHED_STOPS.with_borrow_mut(|stops| *stops = 0);
        let mut arena = NodeArena::new();
        let doomed = arena.insert(Node::new("doomed"));
        arena.add_script::<SelfDestruct>(doomed);

        arena.raise_update_event(doomed, 0.1, false);
        assert!(!arena.contains(doomed));
        VANISHED_STOPS.with_borrow(|stops| assert_eq!(*stops, 1));
    }

    #[test]
    fn disabled_children_are_skipped_by_update() {
        let mut arena = NodeArena::new();
        let root = arena.insert(Node::new("root"));
        let off = arena.insert(Node::new("off"));
        arena.get_mut(off).unwrap().enabled = false;
        arena.add_child(root, off);

        let seen = log();
        let seen2 = Rc::clone(&seen);
        arena
            .get_mut(off)
            .unwrap()
            .events
            .update
            .register(move |_, _| seen2.borrow_mut().push("off".into()));

        arena.raise_update_event(root, 0.1, true);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn update_delegate_sees_the_frame_dt() {
        let mut arena = NodeArena::new();
        let root = arena.insert(Node::new("root"));
        let dt_seen = Rc::new(RefCell::new(0.0));
        let dt_seen2 = Rc::clone(&dt_seen);
        arena
            .get_mut(root)
            .unwrap()
            .events
            .update
            .register(move |_, args| *dt_seen2.borrow_mut() = args.dt);

        arena.raise_update_event(root, 0.25, false);
        assert_eq!(*dt_seen.borrow(), 0.25);
    }

    #[test]
    fn handlers_registered_mid_dispatch_fire_next_raise() {
        let mut arena = NodeArena::new();
        let root = arena.insert(Node::new("root"));
        let seen = log();
        let seen2 = Rc::clone(&seen);
        arena.get_mut(root).unwrap().events.update.register(move |node, _| {
            seen2.borrow_mut().push("outer".into());
            let seen3 = Rc::clone(&seen2);
            node.events
                .update
                .register(move |_, _| seen3.borrow_mut().push("inner".into()));
        });

        arena.raise_update_event(root, 0.1, false);
        assert_eq!(*seen.borrow(), ["outer"]);
        arena.raise_update_event(root, 0.1, false);
        assert_eq!(*seen.borrow(), ["outer", "outer", "inner"]);
    }

    #[test]
    fn render_draws_background_then_delegate_commands_then_children() {
        let mut arena = NodeArena::new();
        let root = arena.insert(Node::new("root"));
        {
            let node = arena.get_mut(root).unwrap();
            node.size = Size::new(100, 60);
            node.background_color = Color::rgb(10, 20, 30);
            node.events.render.register(|_, args| {
                args.draw(DrawCommand::SetDrawColor(Color::WHITE));
            });
        }
        let child = arena.insert(Node::new("child"));
        {
            let node = arena.get_mut(child).unwrap();
            node.size = Size::new(20, 10);
            node.alignment = Alignment::BottomRight;
            node.background_color = Color::BLACK;
        }
        arena.add_child(root, child);

        let mut canvas = DrawList::new();
        let mut args = RenderArgs {
            target_area: Rect::new(0, 0, 100, 60),
            commands: Vec::new(),
        };
        arena.raise_render_event(root, &mut canvas, Some(&mut args), true);

        assert_eq!(
            canvas.commands,
            vec![
                DrawCommand::SetDrawColor(Color::rgb(10, 20, 30)),
                DrawCommand::FillRect(Rect::new(0, 0, 100, 60)),
                DrawCommand::SetDrawColor(Color::WHITE),
                DrawCommand::SetDrawColor(Color::BLACK),
                DrawCommand::FillRect(Rect::new(80, 50, 20, 10)),
            ]
        );
    }

    #[test]
    fn render_background_flag_suppresses_the_builtin_pass() {
        let mut arena = NodeArena::new();
        let root = arena.insert(Node::new("root"));
        arena.get_mut(root).unwrap().render_background = false;

        let mut canvas = DrawList::new();
        arena.raise_render_event(root, &mut canvas, None, false);
        assert!(canvas.commands.is_empty());
    }

    fn pointer_node(arena: &mut NodeArena, name: &str, area: Rect, alignment: Alignment) -> NodeId {
        let mut node = Node::new(name);
        node.position = area.position();
        node.size = area.size();
        node.alignment = alignment;
        arena.insert(node)
    }

    fn record_mouse_down(arena: &mut NodeArena, id: NodeId, seen: &Log, tag: &str) {
        let seen = Rc::clone(seen);
        let tag = tag.to_string();
        arena
            .get_mut(id)
            .unwrap()
            .events
            .mouse_down
            .register(move |_, args| {
                seen.borrow_mut()
                    .push(format!("{tag}@{},{}", args.local_position.x, args.local_position.y));
            });
    }

    #[test]
    fn global_pair_always_fires_and_local_pair_needs_a_hit() {
        let mut arena = NodeArena::new();
        let root = pointer_node(&mut arena, "root", Rect::new(0, 0, 100, 100), Alignment::TopLeft);
        let seen = log();
        let seen_global = Rc::clone(&seen);
        arena
            .get_mut(root)
            .unwrap()
            .events
            .global_mouse_down
            .register(move |_, _| seen_global.borrow_mut().push("global".into()));
        record_mouse_down(&mut arena, root, &seen, "local");

        let mut miss = MouseButtonArgs {
            local_position: Point::new(150, 10),
            ..Default::default()
        };
        arena.raise_mouse_down_event(root, Some(&mut miss), false);
        assert_eq!(*seen.borrow(), ["global"]);

        let mut hit = MouseButtonArgs {
            local_position: Point::new(99, 99),
            ..Default::default()
        };
        arena.raise_mouse_down_event(root, Some(&mut hit), false);
        assert_eq!(*seen.borrow(), ["global", "global", "local@99,99"]);
    }

    #[test]
    fn overlapping_siblings_both_receive_the_hit() {
        let mut arena = NodeArena::new();
        let root = pointer_node(&mut arena, "root", Rect::new(0, 0, 200, 200), Alignment::TopLeft);
        // Both children cover (50, 50) in root space.
        let a = pointer_node(&mut arena, "a", Rect::new(0, 0, 100, 100), Alignment::TopLeft);
        let b = pointer_node(&mut arena, "b", Rect::new(40, 40, 100, 100), Alignment::TopLeft);
        arena.add_children(root, &[a, b]);

        let seen = log();
        record_mouse_down(&mut arena, a, &seen, "a");
        record_mouse_down(&mut arena, b, &seen, "b");

        let mut args = MouseButtonArgs {
            local_position: Point::new(50, 50),
            ..Default::default()
        };
        arena.raise_mouse_down_event(root, Some(&mut args), true);
        // a sees root coordinates unchanged; b sees them shifted by its origin.
        assert_eq!(*seen.borrow(), ["a@50,50", "b@10,10"]);
    }

    #[test]
    fn pointer_position_translates_through_alignment() {
        let mut arena = NodeArena::new();
        let root = pointer_node(&mut arena, "root", Rect::new(0, 0, 200, 100), Alignment::TopLeft);
        let corner = pointer_node(
            &mut arena,
            "corner",
            Rect::new(0, 0, 50, 40),
            Alignment::BottomRight,
        );
        arena.add_child(root, corner);

        let seen = log();
        record_mouse_down(&mut arena, corner, &seen, "corner");

        // The child occupies (150..=199, 60..=99) in root space.
        let mut args = MouseButtonArgs {
            local_position: Point::new(150, 60),
            ..Default::default()
        };
        arena.raise_mouse_down_event(root, Some(&mut args), true);
        assert_eq!(*seen.borrow(), ["corner@0,0"]);
    }

    #[test]
    fn input_gating_skips_non_input_children_but_not_update() {
        let mut arena = NodeArena::new();
        let root = pointer_node(&mut arena, "root", Rect::new(0, 0, 100, 100), Alignment::TopLeft);
        let deaf = pointer_node(&mut arena, "deaf", Rect::new(0, 0, 100, 100), Alignment::TopLeft);
        arena.get_mut(deaf).unwrap().handle_input = false;
        arena.add_child(root, deaf);

        let seen = log();
        record_mouse_down(&mut arena, deaf, &seen, "deaf");
        let seen_update = Rc::clone(&seen);
        arena
            .get_mut(deaf)
            .unwrap()
            .events
            .update
            .register(move |_, _| seen_update.borrow_mut().push("update".into()));

        let mut args = MouseButtonArgs {
            local_position: Point::new(10, 10),
            ..Default::default()
        };
        arena.raise_mouse_down_event(root, Some(&mut args), true);
        arena.raise_update_event(root, 0.1, true);
        assert_eq!(*seen.borrow(), ["update"]);
    }

    #[test]
    fn key_events_share_one_args_object_down_the_tree() {
        let mut arena = NodeArena::new();
        let root = arena.insert(Node::new("root"));
        let child = arena.insert(Node::new("child"));
        arena.add_child(root, child);

        let seen = log();
        let seen_child = Rc::clone(&seen);
        arena
            .get_mut(child)
            .unwrap()
            .events
            .key_down
            .register(move |_, args| {
                seen_child.borrow_mut().push(format!("key:{}", args.keycode))
            });
        arena
            .get_mut(root)
            .unwrap()
            .events
            .key_down
            .register(|_, args| args.keycode += 1);

        let mut args = KeyArgs {
            keycode: 41,
            ..Default::default()
        };
        arena.raise_key_down_event(root, Some(&mut args), true);
        assert_eq!(*seen.borrow(), ["key:42"]);
    }

    #[test]
    fn raising_on_a_stale_id_is_a_no_op() {
        let mut arena = NodeArena::new();
        let root = arena.insert(Node::new("root"));
        arena.remove(root);
        arena.raise_update_event(root, 0.1, true);
        let mut canvas = DrawList::new();
        arena.raise_render_event(root, &mut canvas, None, true);
        arena.raise_mouse_down_event(root, None, true);
        assert!(canvas.commands.is_empty());
    }
}
