//! Laser dot chasing random waypoints
//!
//! Speed eases toward a base value with dash bursts and brief pauses. When
//! the resolver reports a hit, a flickering beam is drawn from the emitter at
//! the bottom centre of the screen to the dot for a few ticks.

use glam::Vec2;

use super::actor::TickContext;
use super::grid::{GridSize, Point};
use super::lifecycle::{LifeStep, Lifecycle};
use super::rng::SimRng;
use crate::approach;
use crate::settings::LaserSettings;
use crate::surface::{Color, Style, Surface, glyph, plot};

/// Minimum ticks the beam stays visible after a hit
pub const FIRE_TICKS: u32 = 3;
/// Distance at which a waypoint counts as reached
const ARRIVE_DISTANCE: f32 = 1.2;

#[derive(Debug, Clone)]
pub struct Laser {
    color: Color,
    life: Lifecycle,

    pos: Vec2,
    target: Vec2,
    base_speed: f32,
    speed: f32,
    pause_ticks: u32,
    dash_ticks: u32,
    beam_phase: f32,
    fire_ticks: u32,
}

impl Laser {
    pub fn new(settings: &LaserSettings) -> Self {
        Self {
            color: settings.color.unwrap_or(Color::Red),
            life: Lifecycle::new(settings.initial_delay_max.max(0) as u32),
            pos: Vec2::ZERO,
            target: Vec2::ZERO,
            base_speed: 1.0,
            speed: 1.0,
            pause_ticks: 0,
            dash_ticks: 0,
            beam_phase: 0.0,
            fire_ticks: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.life.is_active()
    }

    pub fn is_firing(&self) -> bool {
        self.fire_ticks > 0
    }

    pub fn fire_ticks(&self) -> u32 {
        self.fire_ticks
    }

    pub fn advance(&mut self, ctx: &TickContext, rng: &mut SimRng) {
        let size = ctx.size;
        if size.is_empty() {
            return;
        }
        match self.life.step(rng) {
            LifeStep::Dormant => return,
            LifeStep::Spawned => {
                self.spawn(size, rng);
                return;
            }
            LifeStep::Active => {}
        }

        if self.pause_ticks > 0 {
            self.pause_ticks -= 1;
            return;
        }
        if self.fire_ticks > 0 {
            self.fire_ticks -= 1;
        }
        self.beam_phase += 0.35;

        if self.dash_ticks > 0 {
            self.dash_ticks -= 1;
            self.speed = rng.range(2.5, 4.0);
        } else {
            self.speed = approach(self.speed, self.base_speed, 0.12);
            if rng.chance(0.01) {
                self.pause_ticks = rng.ticks(4, 8);
            }
            if rng.chance(0.05) {
                self.dash_ticks = rng.ticks(6, 12);
            }
        }

        let to = self.target - self.pos;
        let dist = to.length();
        if dist < ARRIVE_DISTANCE || rng.chance(0.04) {
            self.target = random_waypoint(size, rng);
            return;
        }
        self.pos += to * (self.speed / dist.max(0.001));
    }

    fn spawn(&mut self, size: GridSize, rng: &mut SimRng) {
        self.base_speed = rng.range(1.0, 2.2);
        self.speed = self.base_speed;
        self.pos = random_waypoint(size, rng);
        self.target = random_waypoint(size, rng);
        self.pause_ticks = 0;
        self.dash_ticks = 0;
        log::debug!("laser switched on at ({:.1}, {:.1})", self.pos.x, self.pos.y);
    }

    /// Dot cell while active and on the grid
    pub fn position(&self, size: GridSize) -> Option<Point> {
        if !self.life.is_active() {
            return None;
        }
        size.cell(self.pos)
    }

    /// Show the beam for at least [`FIRE_TICKS`] ticks
    pub fn trigger_fire(&mut self) {
        self.fire_ticks = self.fire_ticks.max(FIRE_TICKS);
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if !self.life.is_active() {
            return;
        }
        let (width, height) = surface.size();
        let size = GridSize::new(width, height);
        let Some(dot) = size.cell(self.pos) else {
            return;
        };

        let glow = Style::fg(Color::DarkRed);
        let fg = Style::fg(self.color);
        if self.fire_ticks > 0 {
            let emitter = Point::new(width / 2, height - 1);
            let (beam_glyph, beam_style) = if self.beam_phase.sin() > 0.0 {
                (glyph::BLOCK, fg)
            } else {
                (glyph::HLINE, glow)
            };
            for p in beam_line(emitter, dot) {
                plot(surface, p.x, p.y, beam_glyph, beam_style);
            }
        }

        plot(surface, dot.x, dot.y, glyph::BLOCK, fg);
        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            plot(surface, dot.x + dx, dot.y + dy, glyph::BLOCK, glow);
        }
        for (dx, dy) in [(-1, -1), (1, -1), (-1, 1), (1, 1)] {
            plot(surface, dot.x + dx, dot.y + dy, glyph::BULLET, glow);
        }
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, at: Point) {
        self.life.force_active();
        self.pos = at.as_vec();
        self.target = at.as_vec();
    }
}

/// Random waypoint one cell inside the border
fn random_waypoint(size: GridSize, rng: &mut SimRng) -> Vec2 {
    Vec2::new(
        rng.range(1.0, (size.width - 2) as f32),
        rng.range(1.0, (size.height - 2) as f32),
    )
}

/// Bresenham cells from `from` to `to`, both ends included
pub fn beam_line(from: Point, to: Point) -> Vec<Point> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (from.x, from.y);

    let mut cells = Vec::with_capacity((dx - dy + 1) as usize);
    loop {
        cells.push(Point::new(x, y));
        if x == to.x && y == to.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}
