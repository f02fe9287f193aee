//! Timed behaviors: the playback timeline and the script that drives it
//! from a node's update phase.

pub mod script;
pub mod timeline;

pub use script::{AnimationArgs, AnimationEvents, AnimationScript};
pub use timeline::{MIN_DURATION, Timeline};

pub mod prelude {
    pub use crate::script::{AnimationArgs, AnimationScript};
    pub use crate::timeline::Timeline;
}
