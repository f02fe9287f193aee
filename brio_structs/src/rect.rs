use crate::point::{Point, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The nine anchor positions a child rectangle can take against its parent:
/// corners, edge midpoints and center.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Integer rectangle with inclusive sides. `x`/`y` is the origin corner;
/// negative `width`/`height` grow the rectangle left/up from that corner.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_parts(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub const fn position(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    pub const fn abs_size(self) -> Size {
        self.size().abs()
    }

    pub const fn is_empty(self) -> bool {
        self.size().is_empty()
    }

    /// X of the leftmost column covered by the rectangle.
    pub const fn left_side(self) -> i32 {
        if self.width < 0 {
            self.x + self.width + 1
        } else {
            self.x
        }
    }

    /// X of the rightmost column covered by the rectangle (inclusive).
    pub const fn right_side(self) -> i32 {
        if self.width > 0 {
            self.x + self.width - 1
        } else {
            self.x
        }
    }

    pub const fn center_side(self) -> i32 {
        self.x + self.width / 2
    }

    /// Y of the topmost row covered by the rectangle.
    pub const fn top_side(self) -> i32 {
        if self.height < 0 {
            self.y + self.height + 1
        } else {
            self.y
        }
    }

    /// Y of the bottommost row covered by the rectangle (inclusive).
    pub const fn bottom_side(self) -> i32 {
        if self.height > 0 {
            self.y + self.height - 1
        } else {
            self.y
        }
    }

    pub const fn middle_side(self) -> i32 {
        self.y + self.height / 2
    }

    pub const fn top_left(self) -> Point {
        Point::new(self.left_side(), self.top_side())
    }

    pub const fn bottom_right(self) -> Point {
        Point::new(self.right_side(), self.bottom_side())
    }

    pub const fn center(self) -> Point {
        Point::new(self.center_side(), self.middle_side())
    }

    /// Point-in-rectangle test, inclusive of all four sides.
    pub const fn contains(self, p: Point) -> bool {
        p.x >= self.left_side()
            && p.x <= self.right_side()
            && p.y >= self.top_side()
            && p.y <= self.bottom_side()
    }

    /// Re-express a position local to this rectangle (0,0 = top-left corner)
    /// in the parent coordinate space.
    pub const fn local_to_global(self, local: Point) -> Point {
        Point::new(local.x + self.left_side(), local.y + self.top_side())
    }

    /// Place a child rectangle inside this one: the child's box is anchored at
    /// the selected corner/edge/center of `self`, then displaced by the
    /// child's own origin. The result is normalized (non-negative extents).
    /// With `Alignment::TopLeft` and a child origin of (0,0) the result's
    /// top-left is exactly `self`'s top-left.
    pub const fn anchor(self, local: Rect, alignment: Alignment) -> Rect {
        let w = self.width.abs();
        let h = self.height.abs();
        let lw = local.width.abs();
        let lh = local.height.abs();

        let dx = match alignment {
            Alignment::TopLeft | Alignment::MiddleLeft | Alignment::BottomLeft => 0,
            Alignment::TopCenter | Alignment::MiddleCenter | Alignment::BottomCenter => {
                (w - lw) / 2
            }
            Alignment::TopRight | Alignment::MiddleRight | Alignment::BottomRight => w - lw,
        };
        let dy = match alignment {
            Alignment::TopLeft | Alignment::TopCenter | Alignment::TopRight => 0,
            Alignment::MiddleLeft | Alignment::MiddleCenter | Alignment::MiddleRight => {
                (h - lh) / 2
            }
            Alignment::BottomLeft | Alignment::BottomCenter | Alignment::BottomRight => h - lh,
        };

        Rect::new(
            self.left_side() + local.left_side() + dx,
            self.top_side() + local.top_side() + dy,
            lw,
            lh,
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect(x:{}, y:{}, w:{}, h:{})",
            self.x, self.y, self.width, self.height
        )
    }
}
