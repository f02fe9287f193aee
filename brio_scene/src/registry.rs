//! Scene ownership and the current-scene selection.
//!
//! The registry must be initialized before scenes can be created; frame
//! drivers check this once at startup instead of every caller guessing.
//! From initialization on there is always a valid current scene: `initialize`
//! installs a fresh one and destroying the current scene replaces it with a
//! fresh empty one. Scene slots are generational, same scheme as the node
//! arena.

use crate::scene::Scene;
use brio_ids::SceneId;
use log::{debug, info};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene registry used before initialization")]
    RegistryUninitialized,
    #[error("unknown or destroyed scene {0}")]
    UnknownScene(SceneId),
}

#[derive(Default)]
struct Slot {
    generation: u32,
    scene: Option<Scene>,
}

#[derive(Default)]
pub struct SceneRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    current: SceneId,
    initialized: bool,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the registry ready for use: any prior scenes are destroyed and a
    /// fresh default scene becomes current. Calling again re-initializes.
    pub fn initialize(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
        self.current = SceneId::nil();
        self.initialized = true;
        self.current = self.install(Scene::new("default"));
        info!("scene registry initialized");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn install(&mut self, scene: Scene) -> SceneId {
        let index = match self.free.pop() {
            Some(index) => index as usize,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        debug!("scene '{}' created", scene.name);
        slot.scene = Some(scene);
        self.live += 1;
        SceneId::from_parts(index as u32 + 1, slot.generation)
    }

    /// Create an empty scene. It does not become current on its own; select
    /// it with `set_current`.
    pub fn create_scene(&mut self, name: impl Into<String>) -> Result<SceneId, SceneError> {
        if !self.initialized {
            return Err(SceneError::RegistryUninitialized);
        }
        Ok(self.install(Scene::new(name)))
    }

    /// Destroy a scene. Destroying the current scene installs a fresh empty
    /// scene in its place and makes it current, so there is always a scene
    /// to drive.
    pub fn destroy_scene(&mut self, id: SceneId) -> Result<Scene, SceneError> {
        let index = (id.index() as usize)
            .checked_sub(1)
            .ok_or(SceneError::UnknownScene(id))?;
        let slot = self
            .slots
            .get_mut(index)
            .filter(|slot| slot.generation == id.generation())
            .ok_or(SceneError::UnknownScene(id))?;
        let scene = slot.scene.take().ok_or(SceneError::UnknownScene(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index as u32);
        self.live -= 1;
        debug!("scene '{}' destroyed", scene.name);

        if self.current == id {
            self.current = self.install(Scene::new("default"));
        }
        Ok(scene)
    }

    pub fn contains(&self, id: SceneId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: SceneId) -> Option<&Scene> {
        let index = (id.index() as usize).checked_sub(1)?;
        let slot = self.slots.get(index)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.scene.as_ref()
    }

    pub fn get_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        let index = (id.index() as usize).checked_sub(1)?;
        let slot = self.slots.get_mut(index)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.scene.as_mut()
    }

    /// The scene frame dispatch drives; nil when none exists.
    pub fn current(&self) -> SceneId {
        self.current
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.get(self.current)
    }

    pub fn current_scene_mut(&mut self) -> Option<&mut Scene> {
        self.get_mut(self.current)
    }

    /// Returns false (and keeps the old selection) for an unknown ID.
    pub fn set_current(&mut self, id: SceneId) -> bool {
        if self.contains(id) {
            self.current = id;
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SceneId, &Scene)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let scene = slot.scene.as_ref()?;
            Some((SceneId::from_parts(index as u32 + 1, slot.generation), scene))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SceneId, &mut Scene)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| {
                let id = SceneId::from_parts(index as u32 + 1, slot.generation);
                Some((id, slot.scene.as_mut()?))
            })
    }

    pub fn find_scene(&self, name: &str) -> Option<SceneId> {
        self.find_scene_if(|scene| scene.name == name)
    }

    pub fn find_scene_if(&self, mut predicate: impl FnMut(&Scene) -> bool) -> Option<SceneId> {
        self.iter()
            .find(|(_, scene)| predicate(scene))
            .map(|(id, _)| id)
    }

    /// Run `action` on every scene; returns how many ran.
    pub fn for_each_scene(&mut self, mut action: impl FnMut(&mut Scene)) -> usize {
        self.for_each_scene_if(|_| true, &mut action)
    }

    pub fn for_each_scene_if(
        &mut self,
        mut predicate: impl FnMut(&Scene) -> bool,
        mut action: impl FnMut(&mut Scene),
    ) -> usize {
        let mut visited = 0;
        for (_, scene) in self.iter_mut() {
            if predicate(scene) {
                action(scene);
                visited += 1;
            }
        }
        visited
    }
}

impl std::fmt::Debug for SceneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRegistry")
            .field("live", &self.live)
            .field("current", &self.current)
            .field("initialized", &self.initialized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_before_initialize_is_an_error() {
        let mut registry = SceneRegistry::new();
        assert_eq!(
            registry.create_scene("main"),
            Err(SceneError::RegistryUninitialized)
        );
        registry.initialize();
        assert!(registry.create_scene("main").is_ok());
    }

    #[test]
    fn initialize_installs_a_current_scene() {
        let mut registry = SceneRegistry::new();
        registry.initialize();
        assert!(registry.is_initialized());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.current_scene().unwrap().name, "default");

        let menu = registry.create_scene("menu").unwrap();
        // Creation alone does not steal the current slot.
        assert_ne!(registry.current(), menu);
        assert!(registry.set_current(menu));
        assert_eq!(registry.current_scene().unwrap().name, "menu");
    }

    #[test]
    fn reinitializing_destroys_prior_scenes() {
        let mut registry = SceneRegistry::new();
        registry.initialize();
        let menu = registry.create_scene("menu").unwrap();
        registry.initialize();
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains(menu));
        assert_eq!(registry.current_scene().unwrap().name, "default");
    }

    #[test]
    fn destroying_the_current_scene_installs_a_fresh_one() {
        let mut registry = SceneRegistry::new();
        registry.initialize();
        let game = registry.create_scene("game").unwrap();
        registry.set_current(game);

        registry.destroy_scene(game).unwrap();
        let current = registry.current();
        assert!(registry.contains(current));
        assert_ne!(current, game);
        assert_eq!(registry.current_scene().unwrap().name, "default");
        assert!(registry.current_scene().unwrap().is_empty());
    }

    #[test]
    fn destroying_a_background_scene_keeps_the_current_one() {
        let mut registry = SceneRegistry::new();
        registry.initialize();
        let spare = registry.create_scene("spare").unwrap();
        let before = registry.current();
        registry.destroy_scene(spare).unwrap();
        assert_eq!(registry.current(), before);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn destroyed_ids_go_stale() {
        let mut registry = SceneRegistry::new();
        registry.initialize();
        let id = registry.create_scene("gone").unwrap();
        registry.destroy_scene(id).unwrap();

        assert_eq!(
            registry.destroy_scene(id).unwrap_err(),
            SceneError::UnknownScene(id)
        );
        assert!(!registry.set_current(id));

        let reused = registry.create_scene("new").unwrap();
        assert_eq!(reused.index(), id.index());
        assert!(registry.get(id).is_none());
        assert!(registry.get(reused).is_some());
    }

    #[test]
    fn find_and_for_each_cover_every_scene() {
        let mut registry = SceneRegistry::new();
        registry.initialize();
        registry.create_scene("a").unwrap();
        let b = registry.create_scene("b").unwrap();

        assert_eq!(registry.find_scene("b"), Some(b));
        assert_eq!(registry.find_scene("zzz"), None);

        // "default" + "a" + "b".
        assert_eq!(registry.for_each_scene(|_| {}), 3);
        let touched = registry.for_each_scene_if(
            |scene| scene.name.len() == 1,
            |scene| scene.name.push('!'),
        );
        assert_eq!(touched, 2);
        assert_eq!(registry.find_scene("b!"), Some(b));
    }
}
