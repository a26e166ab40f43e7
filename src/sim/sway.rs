//! Hanging string that grows, sways and shrinks away
//!
//! Purely cosmetic. Length follows a triangular envelope over the lifespan;
//! each point is pushed sideways by a traveling wave, a slower bend and an
//! occasional breeze.

use std::f32::consts::TAU;

use glam::Vec2;

use super::actor::TickContext;
use super::grid::{GridSize, Point};
use super::lifecycle::{LifeStep, Lifecycle};
use super::rng::SimRng;
use crate::settings::StringSettings;
use crate::surface::{Color, Style, Surface, glyph, plot_block};

const PALETTE: [Color; 13] = [
    Color::Red,
    Color::Orange,
    Color::Yellow,
    Color::Green,
    Color::Teal,
    Color::Aqua,
    Color::Blue,
    Color::Navy,
    Color::Purple,
    Color::Fuchsia,
    Color::Maroon,
    Color::Lime,
    Color::White,
];

#[derive(Debug, Clone)]
pub struct SwayString {
    min_len: u32,
    max_len: u32,
    configured_color: Option<Color>,
    color: Color,
    life: Lifecycle,

    step: u32,
    life_steps: u32,
    length: u32,
    phase: f32,
    breeze_phase: f32,
    breeze_ticks: u32,
    breeze_dir: f32,
    swing_amp: f32,

    anchor: Point,
    /// Unit vector from anchor toward the tip
    dir: Vec2,
    /// Unit vector the string sways along
    perp: Vec2,
}

impl SwayString {
    pub fn new(settings: &StringSettings) -> Self {
        let min_len = settings.min_len.max(1) as u32;
        let max_len = (settings.max_len.max(0) as u32).max(min_len);
        Self {
            min_len,
            max_len,
            configured_color: settings.color,
            color: settings.color.unwrap_or(Color::White),
            life: Lifecycle::new(settings.initial_delay_max.max(0) as u32),
            step: 0,
            life_steps: 0,
            length: 0,
            phase: 0.0,
            breeze_phase: 0.0,
            breeze_ticks: 0,
            breeze_dir: 0.0,
            swing_amp: 0.0,
            anchor: Point::default(),
            dir: Vec2::X,
            perp: Vec2::Y,
        }
    }

    pub fn is_active(&self) -> bool {
        self.life.is_active()
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn length(&self) -> u32 {
        self.length
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

        self.step += 1;
        self.phase += 0.25;
        self.breeze_phase += 0.12;
        if self.breeze_ticks > 0 {
            self.breeze_ticks -= 1;
        } else if rng.chance(0.015) {
            self.breeze_ticks = rng.ticks(40, 80);
            self.breeze_dir = rng.range(-1.0, 1.0);
        }
        if self.step >= self.life_steps {
            self.life.despawn(rng.ticks(20, 60));
        }
    }

    fn spawn(&mut self, size: GridSize, rng: &mut SimRng) {
        self.length = self.min_len + rng.below(self.max_len - self.min_len + 1);
        self.life_steps = rng.ticks(40, 80);
        self.step = 0;
        self.phase = rng.range(0.0, TAU);
        self.breeze_phase = rng.range(0.0, TAU);
        self.breeze_ticks = 0;
        self.breeze_dir = rng.range(-1.0, 1.0);
        self.swing_amp = rng.range(1.5, 6.5);
        self.color = self
            .configured_color
            .unwrap_or_else(|| rng.pick(&PALETTE));

        let w = size.width as u32;
        let h = size.height as u32;
        let (anchor, dir) = match rng.below(4) {
            0 => (Point::new(0, rng.below(h) as i32), Vec2::X),
            1 => (Point::new(size.width - 1, rng.below(h) as i32), Vec2::NEG_X),
            2 => (Point::new(rng.below(w) as i32, 0), Vec2::Y),
            _ => (Point::new(rng.below(w) as i32, size.height - 1), Vec2::NEG_Y),
        };
        self.anchor = anchor;
        self.dir = dir;
        self.perp = dir.perp();
        log::trace!("string spawned at ({}, {}), length {}", anchor.x, anchor.y, self.length);
    }

    /// Normalized lifetime in [0, 1]
    fn lifetime(&self) -> f32 {
        self.step as f32 / self.life_steps.saturating_sub(1).max(1) as f32
    }

    /// Visible length at the current point of the lifespan
    pub fn current_len(&self) -> u32 {
        let u = self.lifetime();
        let envelope = 1.0 - (1.0 - 2.0 * u).abs();
        (self.length as f32 * envelope).round().max(0.0) as u32
    }

    /// Cells along the string, root first
    pub fn points(&self) -> Vec<Point> {
        let cur_len = self.current_len();
        if cur_len < 1 {
            return Vec::new();
        }
        let u = self.lifetime();
        let breeze = if self.breeze_ticks > 0 {
            self.breeze_phase.sin()
                * (0.8 + 0.4 * (self.breeze_phase * 0.5).sin())
                * self.swing_amp
                * self.breeze_dir
        } else {
            0.0
        };

        let span = cur_len.saturating_sub(1).max(1) as f32;
        (0..cur_len)
            .map(|i| {
                let fi = i as f32;
                let flex = fi / span;
                let swing = (self.phase + u * TAU + fi * 0.45).sin()
                    * self.swing_amp
                    * (0.2 + 0.8 * flex);
                let bend = (self.phase * 0.7 + fi * 0.25).sin() * (0.15 + 0.85 * flex);
                let wind = breeze * (0.2 + 0.8 * flex);
                let offset = self.dir * fi + self.perp * (swing + bend + wind);
                Point::new(
                    self.anchor.x + offset.x.round() as i32,
                    self.anchor.y + offset.y.round() as i32,
                )
            })
            .collect()
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if !self.life.is_active() {
            return;
        }
        let style = Style::fg(self.color);
        for p in self.points() {
            plot_block(surface, p.x, p.y, glyph::BLOCK, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CellBuffer;

    fn settings() -> StringSettings {
        StringSettings {
            count: 1,
            min_len: 10,
            max_len: 12,
            initial_delay_max: 0,
            color: Some(Color::Teal),
        }
    }

    #[test]
    fn test_length_envelope_peaks_mid_life() {
        let mut rng = SimRng::new(21);
        let mut string = SwayString::new(&settings());
        let ctx = TickContext::new(GridSize::new(80, 30));
        string.advance(&ctx, &mut rng);
        assert!(string.is_active());
        assert_eq!(string.current_len(), 0);

        let mut lens = Vec::new();
        while string.is_active() {
            lens.push(string.current_len());
            string.advance(&ctx, &mut rng);
        }
        let peak = *lens.iter().max().unwrap();
        assert!(peak >= 9 && peak <= 12);
        let peak_at = lens.iter().position(|&l| l == peak).unwrap();
        assert!(peak_at > 0 && peak_at < lens.len() - 1);
    }

    #[test]
    fn test_string_anchors_on_edge() {
        let mut rng = SimRng::new(8);
        let size = GridSize::new(30, 12);
        let ctx = TickContext::new(size);
        for _ in 0..20 {
            let mut string = SwayString::new(&settings());
            string.advance(&ctx, &mut rng);
            let a = string.anchor();
            assert!(size.contains(a));
            assert!(a.x == 0 || a.y == 0 || a.x == 29 || a.y == 11);
            assert!((10..=12).contains(&string.length()));
        }
    }

    #[test]
    fn test_first_point_is_anchor() {
        let mut rng = SimRng::new(4);
        let mut string = SwayString::new(&settings());
        let ctx = TickContext::new(GridSize::new(40, 20));
        string.advance(&ctx, &mut rng);
        for _ in 0..10 {
            string.advance(&ctx, &mut rng);
        }
        let points = string.points();
        assert!(!points.is_empty());
        // swing and bend are scaled down at the root but never vanish entirely
        assert!(points[0].chebyshev(string.anchor()) <= 3);

        let mut buf = CellBuffer::new(40, 20);
        string.render(&mut buf);
        assert!(buf.painted() > 0);
    }
}
