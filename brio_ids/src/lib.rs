pub mod ids;
pub use ids::*;

pub mod prelude {
    pub use crate::ids::{NodeId, SceneId, ScriptKey, TextureId, string_to_u64};
}
