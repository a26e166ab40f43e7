//! Bouncing square: fixed velocity, elastic reflection off all four walls

use glam::IVec2;

use super::actor::TickContext;
use crate::surface::{Color, Style, Surface, glyph, plot};

#[derive(Debug, Clone)]
pub struct Square {
    /// Top-left corner
    pos: IVec2,
    vel: IVec2,
    len: i32,
}

impl Square {
    pub fn new(pos: IVec2, vel: IVec2, len: i32) -> Self {
        Self {
            pos,
            vel,
            len: len.max(1),
        }
    }

    pub fn position(&self) -> IVec2 {
        self.pos
    }

    pub fn velocity(&self) -> IVec2 {
        self.vel
    }

    pub fn advance(&mut self, ctx: &TickContext) {
        let size = ctx.size;
        if size.is_empty() {
            return;
        }
        self.pos += self.vel;
        if self.pos.x < 0 {
            self.pos.x = 0;
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < 0 {
            self.pos.y = 0;
            self.vel.y = -self.vel.y;
        }
        if self.pos.x + self.len >= size.width {
            self.pos.x = size.width - self.len;
            self.vel.x = -self.vel.x;
        }
        if self.pos.y + self.len >= size.height {
            self.pos.y = size.height - self.len;
            self.vel.y = -self.vel.y;
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        let style = Style::fg(Color::Red).with_bg(Color::White);
        for y in self.pos.y..self.pos.y + self.len {
            for x in self.pos.x..self.pos.x + self.len {
                plot(surface, x, y, glyph::HLINE, style);
            }
        }
    }
}
