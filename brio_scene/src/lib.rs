//! Scenes, the scene registry, and the world that ties the node arena and
//! registry together into one frame-drivable object.

pub mod registry;
pub mod scene;
pub mod world;

pub use registry::{SceneError, SceneRegistry};
pub use scene::Scene;
pub use world::World;

pub mod prelude {
    pub use crate::registry::{SceneError, SceneRegistry};
    pub use crate::scene::Scene;
    pub use crate::world::World;
}
