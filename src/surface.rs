//! Character grid contract shared by every renderer
//!
//! Actors draw through [`Surface`]; the terminal backend and the in-memory
//! [`CellBuffer`] both implement it. Writes outside the grid are dropped.

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

/// Glyphs used by the actors
pub mod glyph {
    pub const BLOCK: char = '█';
    pub const BULLET: char = '·';
    pub const HLINE: char = '─';
    pub const BLANK: char = ' ';
}

/// Named terminal colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Terminal default
    #[default]
    Reset,
    White,
    Gray,
    DarkGray,
    Red,
    DarkRed,
    Maroon,
    Brown,
    Orange,
    Yellow,
    Lime,
    Green,
    Teal,
    Aqua,
    Blue,
    Navy,
    Purple,
    Fuchsia,
}

impl Color {
    /// RGB value, `None` for the terminal default
    pub fn rgb(self) -> Option<(u8, u8, u8)> {
        let rgb = match self {
            Color::Reset => return None,
            Color::White => (255, 255, 255),
            Color::Gray => (128, 128, 128),
            Color::DarkGray => (169, 169, 169),
            Color::Red => (255, 0, 0),
            Color::DarkRed => (139, 0, 0),
            Color::Maroon => (128, 0, 0),
            Color::Brown => (165, 42, 42),
            Color::Orange => (255, 165, 0),
            Color::Yellow => (255, 255, 0),
            Color::Lime => (0, 255, 0),
            Color::Green => (0, 128, 0),
            Color::Teal => (0, 128, 128),
            Color::Aqua => (0, 255, 255),
            Color::Blue => (0, 0, 255),
            Color::Navy => (0, 0, 128),
            Color::Purple => (128, 0, 128),
            Color::Fuchsia => (255, 0, 255),
        };
        Some(rgb)
    }
}

/// Foreground/background pair for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
}

impl Style {
    /// Foreground-only style on the default background
    pub const fn fg(fg: Color) -> Self {
        Self {
            fg,
            bg: Color::Reset,
        }
    }

    pub const fn with_bg(self, bg: Color) -> Self {
        Self { fg: self.fg, bg }
    }
}

/// A W×H cell buffer the simulation draws into
///
/// The simulation never allocates or resizes a surface. It reads `size()`
/// every tick, since the grid may change between ticks.
pub trait Surface {
    /// Current (width, height) in cells
    fn size(&self) -> (i32, i32);

    /// Write one cell; out-of-range coordinates are ignored
    fn set_cell(&mut self, x: i32, y: i32, glyph: char, style: Style);

    /// Blank every cell
    fn clear(&mut self);

    /// Push the finished frame to its destination
    fn present(&mut self) -> io::Result<()>;
}

/// Write a cell only when it falls inside the surface
#[inline]
pub fn plot(surface: &mut dyn Surface, x: i32, y: i32, glyph: char, style: Style) {
    let (width, height) = surface.size();
    if x < 0 || y < 0 || x >= width || y >= height {
        return;
    }
    surface.set_cell(x, y, glyph, style);
}

/// Fill the 3×3 block centred on (x, y), clipping at the edges
pub fn plot_block(surface: &mut dyn Surface, x: i32, y: i32, glyph: char, style: Style) {
    for dy in -1..=1 {
        for dx in -1..=1 {
            plot(surface, x + dx, y + dy, glyph, style);
        }
    }
}

/// One cell of a [`CellBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub style: Style,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: glyph::BLANK,
        style: Style::fg(Color::Reset),
    };

    pub fn is_blank(&self) -> bool {
        *self == Self::BLANK
    }
}

/// In-memory surface used for headless runs, tests and terminal diffing
#[derive(Debug, Clone, PartialEq)]
pub struct CellBuffer {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    presents: u64,
}

/// Cell count for a grid, computed without i32 overflow
fn cell_count(width: i32, height: i32) -> usize {
    width.max(0) as usize * height.max(0) as usize
}

impl CellBuffer {
    /// Create a blank buffer (negative dimensions become zero)
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; cell_count(width, height)],
            presents: 0,
        }
    }

    /// Change dimensions, blanking every cell
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.cells.clear();
        self.cells
            .resize(cell_count(self.width, self.height), Cell::BLANK);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Cell at (x, y), `None` outside the grid
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Glyph at (x, y), blank outside the grid
    pub fn glyph_at(&self, x: i32, y: i32) -> char {
        self.get(x, y).map_or(glyph::BLANK, |c| c.glyph)
    }

    /// Number of non-blank cells
    pub fn painted(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_blank()).count()
    }

    /// Number of completed `present` calls
    pub fn presents(&self) -> u64 {
        self.presents
    }

    /// Row-major cells with their coordinates
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i as i32 % width, i as i32 / width, *cell))
    }
}

impl Surface for CellBuffer {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn set_cell(&mut self, x: i32, y: i32, glyph: char, style: Style) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { glyph, style };
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn present(&mut self) -> io::Result<()> {
        self.presents += 1;
        Ok(())
    }
}

impl fmt::Display for CellBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            let row: String = (0..self.width).map(|x| self.glyph_at(x, y)).collect();
            f.write_str(row.trim_end())?;
        }
        Ok(())
    }
}
