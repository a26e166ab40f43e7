//! Butterfly: flutter/dart flight plus externally triggered states
//!
//! The resolver drives three transitions from outside:
//! - [`Butterfly::hit`]: laser strike, explosion then respawn
//! - [`Butterfly::stick_to_web`]: entangled, flight suspended, visible as prey
//! - [`Butterfly::be_eaten`]: consumed by a spider, silently gone

use std::f32::consts::TAU;

use super::actor::TickContext;
use super::explosion::Explosion;
use super::grid::{GridSize, Point};
use super::lifecycle::{LifeStep, Lifecycle};
use super::rng::SimRng;
use crate::clamp;
use crate::settings::ButterflySettings;
use crate::surface::{Color, Style, Surface, plot};

const PALETTE: [Color; 7] = [
    Color::Fuchsia,
    Color::Purple,
    Color::Orange,
    Color::Yellow,
    Color::Aqua,
    Color::Lime,
    Color::White,
];

#[derive(Debug, Clone)]
pub struct Butterfly {
    configured_color: Option<Color>,
    color: Color,
    life: Lifecycle,
    explosion: Explosion,

    x: f32,
    base_y: f32,
    vx: f32,
    wave_amp: f32,
    wave_phase: f32,
    flap_phase: f32,
    dir: f32,
    flutter_ticks: u32,
    burst_ticks: u32,
    turn_bias: f32,

    stuck: bool,
    /// Ticks left before an uneaten butterfly struggles free
    stuck_ticks: u32,
}

impl Butterfly {
    pub fn new(settings: &ButterflySettings) -> Self {
        Self {
            configured_color: settings.color,
            color: settings.color.unwrap_or(Color::Fuchsia),
            life: Lifecycle::new(settings.initial_delay_max.max(0) as u32),
            explosion: Explosion::default(),
            x: 0.0,
            base_y: 0.0,
            vx: 0.0,
            wave_amp: 0.0,
            wave_phase: 0.0,
            flap_phase: 0.0,
            dir: 1.0,
            flutter_ticks: 0,
            burst_ticks: 0,
            turn_bias: 0.0,
            stuck: false,
            stuck_ticks: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.life.is_active()
    }

    pub fn is_stuck(&self) -> bool {
        self.stuck
    }

    pub fn is_exploding(&self) -> bool {
        self.explosion.is_active()
    }

    pub fn respawn_wait(&self) -> u32 {
        self.life.respawn_wait()
    }

    pub fn advance(&mut self, ctx: &TickContext, rng: &mut SimRng) {
        let size = ctx.size;
        if size.is_empty() {
            return;
        }
        if self.explosion.advance() {
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

        if self.stuck {
            // Struggling in the web: wings beat, body stays put
            self.flap_phase += 0.9 + rng.unit() * 0.4;
            if self.stuck_ticks > 0 {
                self.stuck_ticks -= 1;
            } else {
                self.stuck = false;
                self.burst_ticks = rng.ticks(10, 12);
                log::debug!("butterfly struggled free of the web");
            }
            return;
        }

        // Flutter and dart for prey-like motion
        self.wave_phase += 0.18 + rng.unit() * 0.08;
        self.flap_phase += 0.7 + rng.unit() * 0.25;

        if self.flutter_ticks > 0 {
            self.flutter_ticks -= 1;
            self.vx = rng.range(0.3, 0.8);
            self.wave_amp = clamp(self.wave_amp + rng.range(-0.15, 0.15), 0.5, 4.0);
        } else if self.burst_ticks > 0 {
            self.burst_ticks -= 1;
            self.vx = rng.range(1.6, 2.6);
            if rng.chance(0.15) {
                self.turn_bias = -self.turn_bias;
            }
        } else {
            if rng.chance(0.02) {
                self.flutter_ticks = rng.ticks(10, 18);
            }
            if rng.chance(0.02) {
                self.burst_ticks = rng.ticks(6, 12);
            }
            self.vx = clamp(self.vx + rng.range(-0.08, 0.08), 0.5, 1.6);
        }

        if rng.chance(0.01) {
            self.turn_bias = rng.range(-1.0, 1.0);
        }

        self.x += self.vx * self.dir;

        let gone_right = self.dir > 0.0 && self.x > (size.width + 2) as f32;
        let gone_left = self.dir < 0.0 && self.x < -2.0;
        if gone_right || gone_left {
            self.life.despawn(rng.ticks(40, 80));
        }
    }

    fn spawn(&mut self, size: GridSize, rng: &mut SimRng) {
        self.wave_phase = rng.range(0.0, TAU);
        self.flap_phase = rng.range(0.0, TAU);
        self.wave_amp = rng.range(0.5, 2.5);
        self.vx = rng.range(0.6, 1.4);
        self.dir = rng.sign();
        self.base_y = rng.between(1, size.height - 2) as f32;
        self.x = if self.dir > 0.0 {
            -2.0
        } else {
            (size.width + 2) as f32
        };
        self.flutter_ticks = 0;
        self.burst_ticks = 0;
        self.turn_bias = rng.range(-1.0, 1.0);
        self.stuck = false;
        self.stuck_ticks = 0;
        self.color = self
            .configured_color
            .unwrap_or_else(|| rng.pick(&PALETTE));
        log::debug!("butterfly spawned at row {}", self.base_y);
    }

    /// Body cell before clipping
    fn body(&self) -> Point {
        let wobble = (self.wave_phase * 1.7).sin() * 0.8;
        let y = self.base_y + self.wave_phase.sin() * self.wave_amp + wobble;
        Point::new(self.x.round() as i32, y.round() as i32)
    }

    /// Body cell for collision tests; `None` while inactive or off the grid
    pub fn hit_point(&self, size: GridSize) -> Option<Point> {
        if !self.life.is_active() {
            return None;
        }
        let p = self.body();
        size.contains(p).then_some(p)
    }

    /// Laser strike: freeze, explode at `at`, respawn later
    pub fn hit(&mut self, at: Point, rng: &mut SimRng) {
        self.stuck = false;
        self.explosion.start(at);
        self.life.despawn(rng.ticks(40, 80));
        log::debug!("butterfly hit at ({}, {})", at.x, at.y);
    }

    /// Caught in a web: suspend flight and wait for the spider
    pub fn stick_to_web(&mut self, rng: &mut SimRng) {
        if self.stuck || !self.life.is_active() {
            return;
        }
        self.stuck = true;
        self.stuck_ticks = rng.ticks(240, 120);
        log::debug!("butterfly stuck in a web");
    }

    /// Consumed by a spider: deactivate without an explosion
    pub fn be_eaten(&mut self, rng: &mut SimRng) {
        self.stuck = false;
        self.life.despawn(rng.ticks(40, 80));
        log::debug!("butterfly eaten");
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if self.explosion.is_active() {
            self.explosion.render(surface);
            return;
        }
        if !self.life.is_active() {
            return;
        }
        let (width, height) = surface.size();
        let c = self.body();
        if !GridSize::new(width, height).contains(c) {
            return;
        }

        let fg = Style::fg(self.color);
        let bright = Style::fg(if self.color == Color::White {
            Color::Aqua
        } else {
            Color::White
        });

        let open = (self.flap_phase + self.turn_bias).sin() > 0.0;
        let (rising, falling) = if open { ('\\', '/') } else { ('/', '\\') };
        for (reach, style) in [(1, fg), (2, bright)] {
            plot(surface, c.x - reach, c.y - reach, rising, style);
            plot(surface, c.x + reach, c.y - reach, falling, style);
            plot(surface, c.x - reach, c.y + reach, falling, style);
            plot(surface, c.x + reach, c.y + reach, rising, style);
        }
    }

    /// Activate at exactly `at`, motionless wave so the body stays on that cell
    #[cfg(test)]
    pub(crate) fn place(&mut self, at: Point) {
        self.life.force_active();
        self.x = at.x as f32;
        self.base_y = at.y as f32;
        self.wave_phase = 0.0;
        self.wave_amp = 1.0;
        self.dir = 1.0;
    }
}
