//! A scene: ordered layers of root nodes.
//!
//! Layers are draw/update order, bottom first. Within a layer, nodes keep
//! insertion order. A node appears in at most one layer of a scene; adding
//! it again moves it instead of duplicating it.

use brio_ids::{NodeId, TextureId};
use brio_nodes::{Node, NodeArena};
use brio_structs::Color;
use indexmap::IndexSet;

#[derive(Debug)]
pub struct Scene {
    pub name: String,
    /// Painted over the whole viewport before any layer draws.
    pub background_color: Color,
    pub background_texture: Option<TextureId>,
    layers: Vec<IndexSet<NodeId>>,
}

impl Scene {
    /// A scene always has at least one layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background_color: Color::EMPTY,
            background_texture: None,
            layers: vec![IndexSet::new()],
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Insert an empty layer at `at`, or on top when `at` is `None` or past
    /// the end. Returns the new layer's index.
    pub fn add_layer(&mut self, at: Option<usize>) -> usize {
        let index = at.unwrap_or(self.layers.len()).min(self.layers.len());
        self.layers.insert(index, IndexSet::new());
        index
    }

    /// Remove a layer and its memberships, the top layer when `layer` is
    /// `None`. The last remaining layer is never removed; it is cleared in
    /// place instead.
    pub fn remove_layer(&mut self, layer: Option<usize>) {
        let layer = layer.unwrap_or(self.layers.len() - 1);
        if layer >= self.layers.len() {
            return;
        }
        if self.layers.len() == 1 {
            self.layers[0].clear();
        } else {
            self.layers.remove(layer);
        }
    }

    pub fn clear_layer(&mut self, layer: usize) {
        if let Some(set) = self.layers.get_mut(layer) {
            set.clear();
        }
    }

    /// Exchange the stacking order of two layers.
    pub fn swap_layers(&mut self, a: usize, b: usize) {
        if a < self.layers.len() && b < self.layers.len() {
            self.layers.swap(a, b);
        }
    }

    /// The layer a node currently sits in, if any.
    pub fn node_layer(&self, id: NodeId) -> Option<usize> {
        self.layers.iter().position(|set| set.contains(&id))
    }

    /// Put a node into `layer`, the current top layer when `None`, removing
    /// it from whatever layer held it before. Returns false when the layer
    /// does not exist.
    pub fn add(&mut self, id: NodeId, layer: Option<usize>) -> bool {
        let layer = layer.unwrap_or(self.layers.len() - 1);
        if layer >= self.layers.len() {
            return false;
        }
        self.remove(id);
        self.layers[layer].insert(id);
        true
    }

    /// Drop a node from the scene. Returns false when it was not a member.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let mut removed = false;
        for set in &mut self.layers {
            removed |= set.shift_remove(&id);
        }
        removed
    }

    /// Drop every member satisfying `predicate`. Members whose ID no longer
    /// resolves are pruned but not counted. Returns how many were removed.
    pub fn remove_if(
        &mut self,
        nodes: &NodeArena,
        mut predicate: impl FnMut(&Node) -> bool,
    ) -> usize {
        let mut removed = 0;
        for id in self.members() {
            match nodes.get(id) {
                Some(node) => {
                    if predicate(node) {
                        self.remove(id);
                        removed += 1;
                    }
                }
                None => {
                    self.remove(id);
                }
            }
        }
        removed
    }

    pub fn clear(&mut self) {
        for set in &mut self.layers {
            set.clear();
        }
    }

    /// Total number of members across all layers.
    pub fn count(&self) -> usize {
        self.layers.iter().map(IndexSet::len).sum()
    }

    pub fn count_in_layer(&self, layer: usize) -> usize {
        self.layers.get(layer).map_or(0, IndexSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(IndexSet::is_empty)
    }

    /// Every member, bottom layer first, insertion order within a layer.
    pub fn members(&self) -> Vec<NodeId> {
        self.layers
            .iter()
            .flat_map(|set| set.iter().copied())
            .collect()
    }

    pub fn members_of_layer(&self, layer: usize) -> Vec<NodeId> {
        self.layers
            .get(layer)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether the node is a member; with `recursive`, whether it sits
    /// anywhere in a member's subtree.
    pub fn contains(&self, nodes: &NodeArena, id: NodeId, recursive: bool) -> bool {
        if self.node_layer(id).is_some() {
            return true;
        }
        recursive
            && self
                .members()
                .iter()
                .any(|&member| nodes.contains_child(member, id, true))
    }

    /// Run `action` on each member node; returns how many ran.
    pub fn for_each(&self, nodes: &mut NodeArena, mut action: impl FnMut(&mut Node)) -> usize {
        self.for_each_if(nodes, |_| true, &mut action)
    }

    pub fn for_each_if(
        &self,
        nodes: &mut NodeArena,
        mut predicate: impl FnMut(&Node) -> bool,
        mut action: impl FnMut(&mut Node),
    ) -> usize {
        let mut visited = 0;
        for id in self.members() {
            if let Some(node) = nodes.get_mut(id) {
                if predicate(node) {
                    action(node);
                    visited += 1;
                }
            }
        }
        visited
    }

    pub fn for_each_in_layer(
        &self,
        nodes: &mut NodeArena,
        layer: usize,
        mut action: impl FnMut(&mut Node),
    ) -> usize {
        self.for_each_in_layer_if(nodes, layer, |_| true, &mut action)
    }

    pub fn for_each_in_layer_if(
        &self,
        nodes: &mut NodeArena,
        layer: usize,
        mut predicate: impl FnMut(&Node) -> bool,
        mut action: impl FnMut(&mut Node),
    ) -> usize {
        let mut visited = 0;
        for id in self.members_of_layer(layer) {
            if let Some(node) = nodes.get_mut(id) {
                if predicate(node) {
                    action(node);
                    visited += 1;
                }
            }
        }
        visited
    }

    /// First member with this name, in layer order.
    pub fn find(&self, nodes: &NodeArena, name: &str) -> Option<NodeId> {
        self.find_if(nodes, |node| node.name == name)
    }

    pub fn find_if(
        &self,
        nodes: &NodeArena,
        mut predicate: impl FnMut(&Node) -> bool,
    ) -> Option<NodeId> {
        self.members()
            .into_iter()
            .find(|&id| nodes.get(id).is_some_and(&mut predicate))
    }

    pub fn find_in_layer(&self, nodes: &NodeArena, layer: usize, name: &str) -> Option<NodeId> {
        self.find_in_layer_if(nodes, layer, |node| node.name == name)
    }

    pub fn find_in_layer_if(
        &self,
        nodes: &NodeArena,
        layer: usize,
        mut predicate: impl FnMut(&Node) -> bool,
    ) -> Option<NodeId> {
        self.members_of_layer(layer)
            .into_iter()
            .find(|&id| nodes.get(id).is_some_and(&mut predicate))
    }
}
