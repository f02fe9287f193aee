//! Script attachment: typed behaviors keyed by a stable `ScriptKey`.
//!
//! Each script type declares its own key (a const hash of a name the author
//! picks), so lookup does not depend on compiler type IDs and stays stable
//! across builds. A node holds at most one script per key.

use crate::arena::NodeArena;
use crate::node::Node;
use brio_ids::{NodeId, ScriptKey};
use std::any::Any;

/// What a script sees while one of its lifecycle hooks runs.
///
/// The script itself is moved out of the node for the duration of the call,
/// so the arena (including the script's own node) is freely mutable here.
pub struct ScriptCtx<'w> {
    pub nodes: &'w mut NodeArena,
    /// The node this script is attached to.
    pub target: NodeId,
    /// Seconds since the previous frame; zero outside the update phase.
    pub dt: f64,
}

impl ScriptCtx<'_> {
    /// The node this script is attached to. `None` if the node was destroyed
    /// by an earlier hook in the same dispatch.
    pub fn node(&mut self) -> Option<&mut Node> {
        self.nodes.get_mut(self.target)
    }
}

/// A behavior attachable to a node. All hooks are optional.
///
/// `key()` must return the same value for every instance of the type;
/// declare it once with `ScriptKey::from_name`.
pub trait Script: Any {
    fn key() -> ScriptKey
    where
        Self: Sized;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Runs once, right after the script is attached.
    fn on_start(&mut self, _ctx: &mut ScriptCtx<'_>) {}
    /// Runs before `on_update` each frame.
    fn on_early_update(&mut self, _ctx: &mut ScriptCtx<'_>) {}
    fn on_update(&mut self, _ctx: &mut ScriptCtx<'_>) {}
    /// Runs after the node's subtree has been updated.
    fn on_late_update(&mut self, _ctx: &mut ScriptCtx<'_>) {}
    /// Runs once, when the script is detached or its node destroyed.
    fn on_stop(&mut self, _ctx: &mut ScriptCtx<'_>) {}
}

/// The scripts attached to one node, in attachment order.
///
/// An entry's box is lifted out while one of its own lifecycle hooks runs,
/// but the key stays registered, so re-entrant `contains`/`add_script`
/// calls from inside the hook still see the script as attached.
#[derive(Default)]
pub struct ScriptSet {
    entries: Vec<(ScriptKey, Option<Box<dyn Script>>)>,
}

impl ScriptSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: ScriptKey) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    pub fn get<T: Script>(&self) -> Option<&T> {
        self.entries
            .iter()
            .find(|(k, _)| *k == T::key())
            .and_then(|(_, s)| s.as_ref()?.as_any().downcast_ref())
    }

    pub fn get_mut<T: Script>(&mut self) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(k, _)| *k == T::key())
            .and_then(|(_, s)| s.as_mut()?.as_any_mut().downcast_mut())
    }

    /// Append without checking for duplicates; callers enforce the
    /// one-script-per-key rule first.
    pub(crate) fn push(&mut self, key: ScriptKey, script: Box<dyn Script>) {
        self.entries.push((key, Some(script)));
    }

    /// Take the box out of the keyed entry, leaving the key registered.
    /// `None` when the key is absent or its box is already lifted.
    pub(crate) fn lift(&mut self, key: ScriptKey) -> Option<Box<dyn Script>> {
        self.entries
            .iter_mut()
            .find(|(k, _)| *k == key)?
            .1
            .take()
    }

    /// Put a lifted box back into its entry. If the entry vanished in the
    /// meantime the script is dropped.
    pub(crate) fn restore(&mut self, key: ScriptKey, script: Box<dyn Script>) {
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            if slot.is_none() {
                *slot = Some(script);
            }
        }
    }

    /// Remove the keyed entry entirely, lifted or not.
    pub(crate) fn unregister(&mut self, key: ScriptKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.len() != before
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (ScriptKey, &mut dyn Script)> {
        self.entries
            .iter_mut()
            .filter_map(|(k, s)| Some((*k, s.as_mut()?.as_mut())))
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (ScriptKey, Box<dyn Script>)> + '_ {
        self.entries.drain(..).filter_map(|(k, s)| Some((k, s?)))
    }

    /// Merge scripts attached while this set was moved out of its node.
    /// An entry whose key is already present is dropped; the original wins.
    pub(crate) fn absorb(&mut self, other: &mut ScriptSet) {
        for (key, script) in other.entries.drain(..) {
            if !self.contains(key) {
                self.entries.push((key, script));
            }
        }
    }
}

impl std::fmt::Debug for ScriptSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptSet")
            .field("entries", &self.entries.len())
            .finish()
    }
}
