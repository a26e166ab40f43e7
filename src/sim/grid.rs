//! Integer grid geometry shared by actors and the resolver

use glam::Vec2;

/// A cell in grid space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Nearest cell to a continuous position (halves round away from zero)
    #[inline]
    pub fn from_vec(pos: Vec2) -> Self {
        Self {
            x: pos.x.round() as i32,
            y: pos.y.round() as i32,
        }
    }

    #[inline]
    pub fn as_vec(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Chebyshev (king-move) distance
    #[inline]
    pub fn chebyshev(self, other: Point) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// True when the cells are equal or adjacent, diagonals included
    #[inline]
    pub fn touches(self, other: Point) -> bool {
        self.chebyshev(other) <= 1
    }
}

/// Grid dimensions as read from the surface this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Degenerate grids turn every actor operation into a no-op
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    /// Rounded cell for `pos`, if it lies on the grid
    #[inline]
    pub fn cell(&self, pos: Vec2) -> Option<Point> {
        let p = Point::from_vec(pos);
        self.contains(p).then_some(p)
    }
}

impl From<(i32, i32)> for GridSize {
    fn from((width, height): (i32, i32)) -> Self {
        Self { width, height }
    }
}
