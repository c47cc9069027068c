use serde::{Deserialize, Serialize};

/// Single coordinate axis used for grid size, rows and columns.
pub type Coord = u8;

/// Count type used for card counts and pair counts.
pub type CardCount = u16;

/// Grid coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Identifier shared by exactly two cards of a grid.
pub type PairId = CardCount;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CardCount {
    let a = a as CardCount;
    let b = b as CardCount;
    a.saturating_mul(b)
}

/// Pointer position in pixels, as reported by the display.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict containment: points on the border are outside.
    pub const fn contains(&self, point: Point) -> bool {
        self.x < point.x
            && point.x < self.x.saturating_add(self.width)
            && self.y < point.y
            && point.y < self.y.saturating_add(self.height)
    }
}
