//! Short burst drawn where a laser caught its prey

use super::grid::Point;
use crate::surface::{Color, Style, Surface, glyph, plot};

pub const EXPLOSION_TICKS: u32 = 6;

#[derive(Debug, Clone, Default)]
pub struct Explosion {
    ticks: u32,
    at: Point,
}

impl Explosion {
    pub fn start(&mut self, at: Point) {
        self.ticks = EXPLOSION_TICKS;
        self.at = at;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.ticks > 0
    }

    /// Burn one tick; true while the explosion still owns the actor
    pub fn advance(&mut self) -> bool {
        if self.ticks == 0 {
            return false;
        }
        self.ticks -= 1;
        true
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if self.ticks == 0 {
            return;
        }
        // Fades from yellow to red in the last two ticks
        let fg = if self.ticks <= 2 { Color::Red } else { Color::Yellow };
        for dy in -1..=1 {
            for dx in -1..=1 {
                plot(surface, self.at.x + dx, self.at.y + dy, glyph::BULLET, Style::fg(fg));
            }
        }
    }
}
