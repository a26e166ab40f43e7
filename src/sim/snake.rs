//! Sinuous snake with a steering state machine
//!
//! The head moves through a fractional progress accumulator so steering
//! happens once per whole cell travelled, whatever the current speed. The
//! body is a FIFO window of the last `max_len` head cells.
//!
//! Speed modes:
//! - cruise: target drifts in 0.4..=1.6
//! - zoom: short burst with target 2.5..5.0
//! - zoom-off: steer hard at a random edge point at high speed so the snake
//!   leaves the screen and respawns elsewhere

use std::collections::VecDeque;
use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use super::actor::TickContext;
use super::grid::{GridSize, Point};
use super::lifecycle::{LifeStep, Lifecycle};
use super::rng::SimRng;
use crate::settings::SnakeSettings;
use crate::surface::{Color, Style, Surface, glyph, plot_block};
use crate::{approach, clamp, normalize_angle, turn_toward};

/// Web points closer than this push the snake away
const AVOID_RADIUS: f32 = 4.0;

const PALETTE: [Color; 12] = [
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
];

#[derive(Debug, Clone)]
pub struct Snake {
    max_len: usize,
    configured_color: Option<Color>,
    color: Color,
    life: Lifecycle,

    body: VecDeque<Point>,
    cur_len: usize,
    steps: usize,
    phase: f32,
    progress: f32,

    speed: f32,
    speed_target: f32,
    zoom_ticks: u32,
    zoom_off_ticks: u32,
    zoom_off_target: Option<Vec2>,

    pos: Vec2,
    heading: f32,
    turn_target: f32,
    turn_speed: f32,
    amplitude: f32,
    amplitude_target: f32,
}

impl Snake {
    pub fn new(settings: &SnakeSettings) -> Self {
        let max_len = settings.max_len.max(1) as usize;
        Self {
            max_len,
            configured_color: settings.color,
            color: settings.color.unwrap_or(Color::Green),
            life: Lifecycle::new(settings.initial_delay_max.max(0) as u32),
            body: VecDeque::new(),
            cur_len: 0,
            steps: 0,
            phase: 0.0,
            progress: 0.0,
            speed: 1.0,
            speed_target: 1.0,
            zoom_ticks: 0,
            zoom_off_ticks: 0,
            zoom_off_target: None,
            pos: Vec2::ZERO,
            heading: 0.0,
            turn_target: 0.0,
            turn_speed: 0.05,
            amplitude: 1.0,
            amplitude_target: 1.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.life.is_active()
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
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

        self.update_speed(rng);
        self.progress += self.speed;
        while self.progress >= 1.0 {
            self.progress -= 1.0;
            self.update_steering(ctx, rng);
            self.phase += 0.4;
            self.steps += 1;

            self.pos += Vec2::from_angle(self.heading);
            let head = self.next_head();
            self.body.push_back(head);
            if self.cur_len < self.max_len {
                self.cur_len += 1;
            }
            while self.body.len() > self.cur_len {
                self.body.pop_front();
            }
        }

        if self.should_reset(size) {
            let wait = rng.ticks(20, 40);
            log::debug!("snake left the screen after {} steps, respawning in {wait} ticks", self.steps);
            self.life.despawn(wait);
            self.body.clear();
        }
    }

    fn spawn(&mut self, size: GridSize, rng: &mut SimRng) {
        let mut max_amp = 6;
        if size.width < max_amp * 2 {
            max_amp = (size.width / 4).max(1);
        }
        if size.height < max_amp * 2 {
            max_amp = (size.height / 4).max(1);
        }

        self.amplitude = max_amp.max(1) as f32;
        self.amplitude_target = self.amplitude;
        self.phase = 0.0;
        self.steps = 0;
        self.cur_len = 1;
        self.progress = 0.0;
        self.speed = 1.0;
        self.speed_target = 1.0;
        self.zoom_ticks = 0;
        self.zoom_off_ticks = 0;
        self.zoom_off_target = None;
        self.body.clear();
        self.color = self
            .configured_color
            .unwrap_or_else(|| rng.pick(&PALETTE));

        let w = size.width as f32;
        let h = size.height as f32;
        let (pos, base_heading) = match rng.below(4) {
            // left -> right
            0 => (Vec2::new(-1.0, rng.range(0.0, (h - 1.0).max(1.0))), 0.0),
            // right -> left
            1 => (Vec2::new(w, rng.range(0.0, (h - 1.0).max(1.0))), PI),
            // top -> bottom
            2 => (Vec2::new(rng.range(0.0, (w - 1.0).max(1.0)), -1.0), FRAC_PI_2),
            // bottom -> top
            _ => (Vec2::new(rng.range(0.0, (w - 1.0).max(1.0)), h), -FRAC_PI_2),
        };
        self.pos = pos;
        self.heading = base_heading + rng.range(-0.6, 0.6);
        self.turn_target = self.heading;
        self.turn_speed = rng.range(0.03, 0.12);
        log::debug!("snake spawned at ({:.1}, {:.1})", pos.x, pos.y);
    }

    fn update_speed(&mut self, rng: &mut SimRng) {
        if self.zoom_off_ticks > 0 {
            self.zoom_off_ticks -= 1;
            self.speed_target = rng.range(6.0, 9.0);
        } else if self.zoom_ticks > 0 {
            self.zoom_ticks -= 1;
        } else {
            // Small random drift while cruising
            self.speed_target = clamp(self.speed_target + (rng.unit() - 0.5) * 0.05, 0.4, 1.6);
            if rng.chance(0.02) {
                self.speed_target = rng.range(2.5, 5.0);
                self.zoom_ticks = rng.ticks(10, 20);
            }
            // Rare zoom-off to exit
            if rng.chance(0.006) {
                self.zoom_off_ticks = rng.ticks(20, 30);
                self.zoom_off_target = None;
            }
        }
        self.speed = approach(self.speed, self.speed_target, 0.1);
    }

    fn update_steering(&mut self, ctx: &TickContext, rng: &mut SimRng) {
        if self.zoom_off_ticks > 0 {
            let target = *self
                .zoom_off_target
                .get_or_insert_with(|| random_edge_point(ctx.size, rng));
            let to = target - self.pos;
            self.turn_target = to.y.atan2(to.x);
            self.turn_speed = 0.25;
            self.amplitude_target = 1.0;
            self.heading = turn_toward(self.heading, self.turn_target, self.turn_speed);
            return;
        }

        // Drift the target heading a bit for chaos
        self.turn_target += (rng.unit() - 0.5) * 0.08 + self.phase.sin() * 0.01;
        // Occasional bigger turn
        if rng.chance(0.03) {
            self.turn_target = self.heading + rng.range(-1.2, 1.2);
        }
        // Sometimes aim at a random edge so any exit is possible
        if rng.chance(0.015) {
            let to = random_edge_point(ctx.size, rng) - self.pos;
            self.turn_target = to.y.atan2(to.x);
        }
        if let Some(away) = self.flee_heading(ctx.avoid) {
            self.turn_target = away;
        }

        if rng.chance(0.02) {
            self.amplitude_target = rng.range(2.0, 10.0);
        }
        self.amplitude = approach(self.amplitude, self.amplitude_target, 0.05);

        self.heading = turn_toward(self.heading, self.turn_target, self.turn_speed);
    }

    /// Heading pointing away from the nearest web point in range
    fn flee_heading(&self, avoid: &[Point]) -> Option<f32> {
        let mut nearest: Option<(f32, Vec2)> = None;
        for p in avoid {
            let away = self.pos - p.as_vec();
            let dist = away.length();
            if dist < AVOID_RADIUS && nearest.is_none_or(|(d, _)| dist < d) {
                nearest = Some((dist, away));
            }
        }
        nearest.map(|(dist, away)| {
            if dist < f32::EPSILON {
                normalize_angle(self.heading + PI)
            } else {
                away.y.atan2(away.x)
            }
        })
    }

    fn next_head(&self) -> Point {
        let perp = Vec2::from_angle(self.heading).perp();
        let offset = self.phase.sin() * self.amplitude;
        Point::from_vec(self.pos + perp * offset)
    }

    /// True once the snake has fully travelled and no body cell is visible
    fn should_reset(&self, size: GridSize) -> bool {
        if self.steps <= self.max_len {
            return false;
        }
        !self.body.iter().any(|&p| size.contains(p))
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if !self.life.is_active() {
            return;
        }
        let style = Style::fg(self.color);
        for p in &self.body {
            plot_block(surface, p.x, p.y, glyph::BLOCK, style);
        }
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, pos: Vec2, heading: f32, steps: usize, body: &[Point]) {
        self.life.force_active();
        self.pos = pos;
        self.heading = heading;
        self.turn_target = heading;
        self.steps = steps;
        self.body = body.iter().copied().collect();
        self.cur_len = body.len().min(self.max_len);
        self.speed = 1.0;
        self.speed_target = 1.0;
        self.progress = 0.0;
    }
}

/// Random point just outside one of the four edges
fn random_edge_point(size: GridSize, rng: &mut SimRng) -> Vec2 {
    if size.is_empty() {
        return Vec2::ZERO;
    }
    let w = size.width as f32;
    let h = size.height as f32;
    match rng.below(4) {
        0 => Vec2::new(-1.0, rng.range(0.0, h - 1.0)),
        1 => Vec2::new(w, rng.range(0.0, h - 1.0)),
        2 => Vec2::new(rng.range(0.0, w - 1.0), -1.0),
        _ => Vec2::new(rng.range(0.0, w - 1.0), h),
    }
}
