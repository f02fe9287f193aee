pub mod color;
pub mod interp;
pub mod point;
pub mod rect;

pub use color::Color;
pub use point::{Point, Size};
pub use rect::{Alignment, Rect};

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::interp;
    pub use crate::point::{Point, Size};
    pub use crate::rect::{Alignment, Rect};
}
