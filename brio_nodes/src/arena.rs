//! Generational arena owning every node, plus the graph and script
//! operations that need to touch more than one node at a time.
//!
//! Slots are reused through a free list; each reuse bumps the slot's
//! generation, so an ID held across a destroy simply stops resolving
//! instead of aliasing the new occupant.

use crate::node::Node;
use crate::script::{Script, ScriptCtx};
use brio_ids::NodeId;
use log::{debug, trace};

#[derive(Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Default)]
pub struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Store a node and return its ID. IDs are 1-based so `NodeId::nil()`
    /// never collides with a slot.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let index = match self.free.pop() {
            Some(index) => index as usize,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        slot.node = Some(node);
        self.live += 1;
        let id = NodeId::from_parts(index as u32 + 1, slot.generation);
        trace!("node {id} created");
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let index = (id.index() as usize).checked_sub(1)?;
        let slot = self.slots.get(index)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let index = (id.index() as usize).checked_sub(1)?;
        let slot = self.slots.get_mut(index)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    /// Free the slot and invalidate the ID. Links and scripts are NOT torn
    /// down here; use `World::destroy_node` for the full teardown.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let index = (id.index() as usize).checked_sub(1)?;
        let slot = self.slots.get_mut(index)?;
        if slot.generation != id.generation() {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index as u32);
        self.live -= 1;
        trace!("node {id} removed");
        Some(node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let node = slot.node.as_ref()?;
            Some((NodeId::from_parts(index as u32 + 1, slot.generation), node))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut Node)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| {
                let id = NodeId::from_parts(index as u32 + 1, slot.generation);
                Some((id, slot.node.as_mut()?))
            })
    }

    /// First live node with this name, in slot order.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.find_node_if(|node| node.name == name)
    }

    pub fn find_node_if(&self, mut predicate: impl FnMut(&Node) -> bool) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| predicate(node))
            .map(|(id, _)| id)
    }

    // ---- tree links ------------------------------------------------------

    /// Re-parent `child`. Passing `NodeId::nil()` detaches it. Both sides of
    /// the old and new link are updated; re-parenting to the current parent
    /// is a no-op and a node can never become its own parent.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) {
        if child == parent || !self.contains(child) {
            return;
        }
        if !parent.is_nil() && !self.contains(parent) {
            return;
        }

        let Some(child_node) = self.get_mut(child) else {
            return;
        };
        let old = std::mem::replace(&mut child_node.parent, parent);
        if !old.is_nil() && old != parent {
            if let Some(old_parent) = self.get_mut(old) {
                old_parent.children.retain(|c| *c != child);
            }
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if !parent_node.children.contains(&child) {
                parent_node.children.push(child);
            }
        }
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.set_parent(child, parent);
    }

    pub fn add_children(&mut self, parent: NodeId, children: &[NodeId]) {
        for &child in children {
            self.set_parent(child, parent);
        }
    }

    /// Detach `child` from `parent`, if it is currently a child of it.
    pub fn detach_child(&mut self, parent: NodeId, child: NodeId) {
        if self.get(child).is_some_and(|c| c.parent == parent) {
            self.set_parent(child, NodeId::nil());
        }
    }

    pub fn detach_all_children(&mut self, parent: NodeId) {
        for child in self.children_snapshot(parent) {
            self.detach_child(parent, child);
        }
    }

    /// Detach every child satisfying `predicate`; stale child IDs are pruned
    /// from the list but not counted. Returns how many were detached.
    pub fn detach_children_if(
        &mut self,
        parent: NodeId,
        mut predicate: impl FnMut(&Node) -> bool,
    ) -> usize {
        let mut detached = 0;
        for child in self.children_snapshot(parent) {
            match self.get(child) {
                Some(node) => {
                    if predicate(node) {
                        self.detach_child(parent, child);
                        detached += 1;
                    }
                }
                None => {
                    if let Some(parent_node) = self.get_mut(parent) {
                        parent_node.children.retain(|c| *c != child);
                    }
                }
            }
        }
        detached
    }

    /// Whether `child` is a child of `parent`; with `recursive`, anywhere in
    /// the subtree below it.
    pub fn contains_child(&self, parent: NodeId, child: NodeId, recursive: bool) -> bool {
        let Some(parent_node) = self.get(parent) else {
            return false;
        };
        if parent_node.children.contains(&child) {
            return true;
        }
        if recursive {
            for &c in &parent_node.children {
                if self.contains_child(c, child, true) {
                    return true;
                }
            }
        }
        false
    }

    /// Run `action` on each direct child; returns how many ran.
    pub fn for_each_child(&mut self, parent: NodeId, mut action: impl FnMut(&mut Node)) -> usize {
        self.for_each_child_if(parent, |_| true, &mut action)
    }

    /// Run `action` on each direct child satisfying `predicate`.
    pub fn for_each_child_if(
        &mut self,
        parent: NodeId,
        mut predicate: impl FnMut(&Node) -> bool,
        mut action: impl FnMut(&mut Node),
    ) -> usize {
        let mut visited = 0;
        for child in self.children_snapshot(parent) {
            if let Some(node) = self.get_mut(child) {
                if predicate(node) {
                    action(node);
                    visited += 1;
                }
            }
        }
        visited
    }

    /// First direct child with this name, in child order.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.find_child_if(parent, |node| node.name == name)
    }

    pub fn find_child_if(
        &self,
        parent: NodeId,
        mut predicate: impl FnMut(&Node) -> bool,
    ) -> Option<NodeId> {
        self.get(parent)?
            .children
            .iter()
            .copied()
            .find(|&child| self.get(child).is_some_and(&mut predicate))
    }

    /// Copy of the child list, so callers can mutate the tree while walking.
    pub(crate) fn children_snapshot(&self, parent: NodeId) -> Vec<NodeId> {
        self.get(parent)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    // ---- scripts ---------------------------------------------------------

    /// Attach a `T` to the node, constructing it with `Default`: the script
    /// is stored under its key first, then its `on_start` hook runs. A hook
    /// that looks the node up therefore already finds the script attached,
    /// and a re-entrant `add_script::<T>` for the same key is a no-op.
    /// If the node already carries a script with `T::key()` the existing
    /// one is kept and nothing happens.
    pub fn add_script<T: Script + Default>(&mut self, id: NodeId) {
        let key = T::key();
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if node.scripts.contains(key) {
            debug!("node {id} already has script {key:?}, keeping the existing one");
            return;
        }
        node.scripts.push(key, Box::new(T::default()));

        // The box is lifted for the duration of the hook; the key stays
        // registered so the one-script-per-key rule holds re-entrantly.
        let Some(mut script) = self
            .get_mut(id)
            .and_then(|node| node.scripts.lift(key))
        else {
            return;
        };
        let mut ctx = ScriptCtx {
            nodes: self,
            target: id,
            dt: 0.0,
        };
        script.on_start(&mut ctx);
        match self.get_mut(id) {
            Some(node) => node.scripts.restore(key, script),
            // The hook destroyed its own node; give the script its stop.
            None => {
                let mut ctx = ScriptCtx {
                    nodes: self,
                    target: id,
                    dt: 0.0,
                };
                script.on_stop(&mut ctx);
            }
        }
    }

    /// Detach the node's `T`: its `on_stop` hook runs first, while the
    /// script still counts as attached, and only then is the key
    /// unregistered. Returns false when no such script was attached.
    pub fn destroy_script<T: Script>(&mut self, id: NodeId) -> bool {
        let key = T::key();
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        let Some(mut script) = node.scripts.lift(key) else {
            return false;
        };
        let mut ctx = ScriptCtx {
            nodes: self,
            target: id,
            dt: 0.0,
        };
        script.on_stop(&mut ctx);
        if let Some(node) = self.get_mut(id) {
            node.scripts.unregister(key);
        }
        true
    }

    pub fn contains_script<T: Script>(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|node| node.scripts.contains(T::key()))
    }

    pub fn get_script<T: Script>(&self, id: NodeId) -> Option<&T> {
        self.get(id)?.scripts.get()
    }

    pub fn get_script_mut<T: Script>(&mut self, id: NodeId) -> Option<&mut T> {
        self.get_mut(id)?.scripts.get_mut()
    }

    /// Run `action` on every script attached to the node, in attachment
    /// order; returns how many ran. For lifecycle hooks use the raise
    /// entry points, which supply a `ScriptCtx`.
    pub fn for_each_script(
        &mut self,
        id: NodeId,
        mut action: impl FnMut(&mut dyn Script),
    ) -> usize {
        let Some(node) = self.get_mut(id) else {
            return 0;
        };
        let mut visited = 0;
        for (_, script) in node.scripts.iter_mut() {
            action(script);
            visited += 1;
        }
        visited
    }

    /// Run `on_stop` for every script on the node and drop them all.
    /// Part of node teardown.
    pub fn destroy_all_scripts(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let mut scripts = std::mem::take(&mut node.scripts);
        for (_, mut script) in scripts.drain() {
            let mut ctx = ScriptCtx {
                nodes: self,
                target: id,
                dt: 0.0,
            };
            script.on_stop(&mut ctx);
        }
    }

    /// Run `hook` on every script attached to the node, each call seeing the
    /// whole arena through a fresh `ScriptCtx`. The set is moved out of the
    /// node for the duration; scripts attached by a hook are merged back in
    /// afterwards (an existing key wins over a duplicate).
    pub(crate) fn each_script(
        &mut self,
        id: NodeId,
        dt: f64,
        mut hook: impl FnMut(&mut dyn Script, &mut ScriptCtx<'_>),
    ) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let mut scripts = std::mem::take(&mut node.scripts);
        for (_, script) in scripts.iter_mut() {
            let mut ctx = ScriptCtx {
                nodes: self,
                target: id,
                dt,
            };
            hook(script, &mut ctx);
        }
        match self.get_mut(id) {
            Some(node) => {
                scripts.absorb(&mut node.scripts);
                node.scripts = scripts;
            }
            // A hook destroyed the node; the taken scripts still get their
            // stop before dropping, so teardown stays exactly-once.
            None => {
                for (_, mut script) in scripts.drain() {
                    let mut ctx = ScriptCtx {
                        nodes: self,
                        target: id,
                        dt: 0.0,
                    };
                    script.on_stop(&mut ctx);
                }
            }
        }
    }
}

impl std::fmt::Debug for NodeArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeArena")
            .field("live", &self.live)
            .field("slots", &self.slots.len())
            .field("free", &self.free.len())
            .finish()
    }
}
