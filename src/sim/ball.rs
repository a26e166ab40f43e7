//! Bouncing ball that hops across the floor like startled prey
//!
//! Gravity plus an inelastic floor bounce, with pause/dart/twitch modifiers
//! nudging a target horizontal speed that the real speed eases toward.

use glam::Vec2;

use super::actor::TickContext;
use super::grid::{GridSize, Point};
use super::lifecycle::{LifeStep, Lifecycle};
use super::rng::SimRng;
use crate::settings::BallSettings;
use crate::surface::{Color, Style, Surface, glyph, plot};
use crate::{approach, clamp};

pub const BALL_RADIUS: i32 = 3;
const GRAVITY: f32 = 0.35;
const BOUNCE_DAMPING: f32 = 0.7;
/// Rate at which vx chases its target each tick
const VX_EASE: f32 = 0.12;

#[derive(Debug, Clone)]
pub struct Ball {
    life: Lifecycle,
    pos: Vec2,
    vel: Vec2,
    /// Travel direction, +1 rightward or -1 leftward
    dir: f32,
    target_vx: f32,
    pause_ticks: u32,
    dart_ticks: u32,
    twitch_ticks: u32,
    wiggle_phase: f32,
    wiggle_amp: f32,
}

impl Ball {
    pub fn new(settings: &BallSettings) -> Self {
        Self {
            life: Lifecycle::new(settings.initial_delay_max.max(0) as u32),
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            dir: 1.0,
            target_vx: 0.0,
            pause_ticks: 0,
            dart_ticks: 0,
            twitch_ticks: 0,
            wiggle_phase: 0.0,
            wiggle_amp: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.life.is_active()
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
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

        self.update_target_speed(rng);
        self.vel.x = approach(self.vel.x, self.target_vx, VX_EASE);

        self.vel.y += GRAVITY;
        self.pos += self.vel;

        let ground = (size.height - 1) as f32;
        let radius = BALL_RADIUS as f32;
        if self.pos.y + radius >= ground {
            self.pos.y = ground - radius;
            self.vel.y = -self.vel.y * BOUNCE_DAMPING;
            if self.vel.y.abs() < 0.6 {
                self.vel.y = -rng.range(2.5, 4.0);
            }
            if rng.chance(0.05) {
                self.vel.y = -rng.range(2.0, 3.2);
            }
        }

        self.wiggle_phase += 0.35;
        if rng.chance(0.02) {
            self.wiggle_amp = rng.range(0.0, 0.8);
        }

        let gone_right = self.dir > 0.0 && self.pos.x - radius > size.width as f32;
        let gone_left = self.dir < 0.0 && self.pos.x + radius < 0.0;
        if gone_right || gone_left {
            let wait = rng.ticks(60, 140);
            log::debug!("ball left the screen, respawning in {wait} ticks");
            self.life.despawn(wait);
        }
    }

    /// Occasional pause or dart for prey-like movement
    fn update_target_speed(&mut self, rng: &mut SimRng) {
        if self.pause_ticks > 0 {
            self.pause_ticks -= 1;
            self.target_vx = 0.1 * self.dir;
        } else if self.dart_ticks > 0 {
            self.dart_ticks -= 1;
            self.target_vx = rng.range(4.0, 6.0) * self.dir;
            if self.dart_ticks == 0 {
                self.target_vx = rng.range(1.2, 3.0) * self.dir;
            }
        } else {
            let drift = (rng.unit() - 0.5) * 0.08;
            self.target_vx = clamp(self.target_vx.abs() + drift, 0.8, 3.4) * self.dir;
            if rng.chance(0.015) {
                self.pause_ticks = rng.ticks(6, 12);
            }
            if rng.chance(0.02) {
                self.dart_ticks = rng.ticks(8, 14);
            }
        }

        if self.twitch_ticks > 0 {
            self.twitch_ticks -= 1;
            self.target_vx *= 1.15;
        } else if rng.chance(0.01) {
            self.twitch_ticks = rng.ticks(6, 10);
        }
    }

    fn spawn(&mut self, size: GridSize, rng: &mut SimRng) {
        self.dir = rng.sign();
        // Cross the screen in a few bounces
        self.vel = Vec2::new(rng.range(1.8, 3.2) * self.dir, -rng.range(3.0, 5.0));
        self.target_vx = self.vel.x;
        let radius = BALL_RADIUS as f32;
        let x = if self.dir > 0.0 {
            -radius
        } else {
            (size.width + BALL_RADIUS) as f32
        };
        self.pos = Vec2::new(x, (size.height - 1) as f32 - radius);
        self.pause_ticks = 0;
        self.dart_ticks = 0;
        self.twitch_ticks = 0;
        self.wiggle_phase = rng.range(0.0, std::f32::consts::TAU);
        self.wiggle_amp = rng.range(0.2, 0.6);
        log::debug!("ball spawned heading {}", if self.dir > 0.0 { "right" } else { "left" });
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if !self.life.is_active() {
            return;
        }
        let mut center = Point::from_vec(self.pos);
        center.x += (self.wiggle_phase.sin() * self.wiggle_amp).round() as i32;

        let style = Style::fg(Color::White);
        let r2 = BALL_RADIUS * BALL_RADIUS;
        for dy in -BALL_RADIUS..=BALL_RADIUS {
            for dx in -BALL_RADIUS..=BALL_RADIUS {
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                plot(surface, center.x + dx, center.y + dy, glyph::BLOCK, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CellBuffer;

    fn settings(delay: i32) -> BallSettings {
        BallSettings {
            count: 1,
            initial_delay_max: delay,
        }
    }

    #[test]
    fn test_ball_spawns_at_edge_and_stays_above_floor() {
        let mut rng = SimRng::new(5);
        let mut ball = Ball::new(&settings(0));
        let ctx = TickContext::new(GridSize::new(60, 20));

        ball.advance(&ctx, &mut rng);
        assert!(ball.is_active());
        let x = ball.position().x;
        assert!(x == -3.0 || x == 63.0);

        for _ in 0..200 {
            ball.advance(&ctx, &mut rng);
            if ball.is_active() {
                assert!(ball.position().y + BALL_RADIUS as f32 <= 19.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_ball_eventually_crosses_and_despawns() {
        let mut rng = SimRng::new(77);
        let mut ball = Ball::new(&settings(0));
        let ctx = TickContext::new(GridSize::new(40, 15));
        ball.advance(&ctx, &mut rng);

        let mut despawned = false;
        for _ in 0..2000 {
            ball.advance(&ctx, &mut rng);
            if !ball.is_active() {
                despawned = true;
                break;
            }
        }
        assert!(despawned);

        // Respawn wait is at least 60 ticks: nothing moves meanwhile
        let (pos, vel) = (ball.position(), ball.velocity());
        for _ in 0..50 {
            ball.advance(&ctx, &mut rng);
            assert!(!ball.is_active());
            assert_eq!(ball.position(), pos);
            assert_eq!(ball.velocity(), vel);
        }
        let mut buf = CellBuffer::new(40, 15);
        ball.render(&mut buf);
        assert_eq!(buf.painted(), 0);
    }

    #[test]
    fn test_floor_bounce_sends_ball_up() {
        let mut rng = SimRng::new(1);
        let mut ball = Ball::new(&settings(0));
        let ctx = TickContext::new(GridSize::new(200, 20));
        ball.advance(&ctx, &mut rng);
        ball.pos = Vec2::new(100.0, 15.5);
        ball.vel = Vec2::new(0.0, 3.0);

        ball.advance(&ctx, &mut rng);
        assert!(ball.velocity().y < 0.0);
        assert_eq!(ball.position().y, 19.0 - BALL_RADIUS as f32);
    }

    #[test]
    fn test_dormant_ball_draws_nothing() {
        let ball = Ball::new(&settings(0));
        let mut buf = CellBuffer::new(20, 10);
        ball.render(&mut buf);
        assert_eq!(buf.painted(), 0);
    }
}
