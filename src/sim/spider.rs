//! Web-building spider
//!
//! ```text
//! (spawn) -> Dropping -> Building -> Done -> Climbing -> (despawn, web cleared)
//!                           |          |
//!                           +----------+-> Hunting -> Eating -> Building (web unfinished)
//!                                                           \-> Done (back at the hub)
//! ```
//!
//! The web is built on a fixed schedule, one step per tick: eight spokes,
//! then four rings. Butterflies that touch a spoke or ring cell get stuck and
//! the spider walks over to eat them.

use std::f32::consts::TAU;

use glam::Vec2;

use super::actor::TickContext;
use super::explosion::Explosion;
use super::grid::{GridSize, Point};
use super::lifecycle::{LifeStep, Lifecycle};
use super::rng::SimRng;
use crate::settings::SpiderSettings;
use crate::surface::{Color, Style, Surface, plot};

pub const SPOKES: u32 = 8;
pub const RINGS: u32 = 4;
/// Ticks spent laying each spoke
pub const SPOKE_STEPS: u32 = 25;
/// Ticks spent laying each ring
pub const RING_STEPS: u32 = 50;
pub const WEB_RADIUS: f32 = 8.0;
const SPOKE_PHASE_END: u32 = SPOKES * SPOKE_STEPS;
const BUILD_STEPS: u32 = SPOKE_PHASE_END + RINGS * RING_STEPS;

const DROP_SPEED: f32 = 0.8;
const CLIMB_SPEED: f32 = 0.8;
const HUNT_SPEED: f32 = 1.5;
const RETURN_SPEED: f32 = 1.0;
const EATING_TICKS: u32 = 20;

const PALETTE: [Color; 5] = [
    Color::Gray,
    Color::DarkGray,
    Color::Maroon,
    Color::Brown,
    Color::DarkRed,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WebState {
    #[default]
    Dropping,
    Building,
    Done,
    Hunting,
    Eating,
    Climbing,
}

/// Where one building step puts the spider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuildStage {
    Spoke { index: u32, radius: f32, angle: f32 },
    Ring { index: u32, radius: f32, angle: f32 },
    Complete,
}

/// Position of building step `step` on the schedule
pub fn build_stage(step: u32) -> BuildStage {
    if step < SPOKE_PHASE_END {
        let index = step / SPOKE_STEPS;
        let progress = (step % SPOKE_STEPS) as f32 / SPOKE_STEPS as f32;
        return BuildStage::Spoke {
            index,
            radius: WEB_RADIUS * progress,
            angle: index as f32 / SPOKES as f32 * TAU,
        };
    }
    if step < BUILD_STEPS {
        let ring_step = step - SPOKE_PHASE_END;
        let index = ring_step / RING_STEPS;
        return BuildStage::Ring {
            index,
            radius: WEB_RADIUS * (index + 1) as f32 / RINGS as f32,
            angle: (ring_step % RING_STEPS) as f32 / RING_STEPS as f32 * TAU,
        };
    }
    BuildStage::Complete
}

/// Silk laid by one spider
#[derive(Debug, Clone, Default)]
pub struct Web {
    /// Drop thread; drawn but never sticky
    pub silk: Vec<Point>,
    pub spokes: Vec<Point>,
    pub rings: Vec<Point>,
}

impl Web {
    pub fn clear(&mut self) {
        self.silk.clear();
        self.spokes.clear();
        self.rings.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.silk.is_empty() && self.spokes.is_empty() && self.rings.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Spider {
    configured_color: Option<Color>,
    color: Color,
    life: Lifecycle,
    explosion: Explosion,

    pos: Vec2,
    center: Vec2,
    drop_target_y: f32,
    leg_phase: f32,
    pause_ticks: u32,

    state: WebState,
    build_step: u32,
    web: Web,

    prey: Vec2,
    eating_ticks: u32,
    web_incomplete: bool,
}

impl Spider {
    pub fn new(settings: &SpiderSettings) -> Self {
        Self {
            configured_color: settings.color,
            color: settings.color.unwrap_or(Color::DarkGray),
            life: Lifecycle::new(settings.initial_delay_max.max(0) as u32),
            explosion: Explosion::default(),
            pos: Vec2::ZERO,
            center: Vec2::ZERO,
            drop_target_y: 0.0,
            leg_phase: 0.0,
            pause_ticks: 0,
            state: WebState::default(),
            build_step: 0,
            web: Web::default(),
            prey: Vec2::ZERO,
            eating_ticks: 0,
            web_incomplete: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.life.is_active()
    }

    pub fn is_exploding(&self) -> bool {
        self.explosion.is_active()
    }

    pub fn state(&self) -> WebState {
        self.state
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn web(&self) -> &Web {
        &self.web
    }

    /// Target of the current hunt, if any
    pub fn prey(&self) -> Option<Vec2> {
        self.is_hunting().then_some(self.prey)
    }

    pub fn respawn_wait(&self) -> u32 {
        self.life.respawn_wait()
    }

    /// Sticky cells: spokes then rings
    pub fn web_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.web.spokes.iter().chain(self.web.rings.iter()).copied()
    }

    pub fn is_hunting(&self) -> bool {
        self.life.is_active() && matches!(self.state, WebState::Hunting | WebState::Eating)
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

        self.leg_phase += 0.5;

        match self.state {
            WebState::Dropping => {
                self.pos.y += DROP_SPEED;
                let cell = Point::from_vec(self.pos);
                if self.web.silk.last() != Some(&cell) {
                    self.web.silk.push(cell);
                }
                if self.pos.y >= self.drop_target_y {
                    self.center = self.pos;
                    self.build_step = 0;
                    self.state = WebState::Building;
                    log::debug!("spider building web at ({:.0}, {:.0})", self.pos.x, self.pos.y);
                }
            }
            WebState::Building => self.build(size, rng),
            WebState::Done => {
                if self.pause_ticks > 0 {
                    self.pause_ticks -= 1;
                } else {
                    self.pos = self.center;
                    self.state = WebState::Climbing;
                }
            }
            WebState::Hunting => {
                let to = self.prey - self.pos;
                let dist = to.length();
                if dist < 1.0 {
                    self.state = WebState::Eating;
                    self.eating_ticks = EATING_TICKS;
                } else {
                    self.pos += to / dist * HUNT_SPEED;
                }
            }
            WebState::Eating => {
                if self.eating_ticks > 0 {
                    self.eating_ticks -= 1;
                } else if self.web_incomplete {
                    self.web_incomplete = false;
                    self.state = WebState::Building;
                } else {
                    let to = self.center - self.pos;
                    let dist = to.length();
                    if dist < 1.0 {
                        self.pos = self.center;
                        self.state = WebState::Done;
                        self.pause_ticks = rng.ticks(100, 100);
                    } else {
                        self.pos += to / dist * RETURN_SPEED;
                    }
                }
            }
            WebState::Climbing => {
                self.pos.y -= CLIMB_SPEED;
                if self.pos.y <= 0.0 {
                    self.web.clear();
                    self.life.despawn(rng.ticks(200, 300));
                    log::debug!("spider climbed away");
                }
            }
        }
    }

    fn build(&mut self, size: GridSize, rng: &mut SimRng) {
        let (radius, angle, on_spoke) = match build_stage(self.build_step) {
            BuildStage::Spoke { radius, angle, .. } => (radius, angle, true),
            BuildStage::Ring { radius, angle, .. } => (radius, angle, false),
            BuildStage::Complete => {
                self.pos = self.center;
                self.state = WebState::Done;
                self.pause_ticks = rng.ticks(300, 200);
                log::debug!(
                    "spider finished web: {} spoke cells, {} ring cells",
                    self.web.spokes.len(),
                    self.web.rings.len()
                );
                return;
            }
        };

        self.pos = self.center + Vec2::from_angle(angle) * radius;
        if let Some(cell) = size.cell(self.pos) {
            if on_spoke {
                self.web.spokes.push(cell);
            } else {
                self.web.rings.push(cell);
            }
        }
        self.build_step += 1;
    }

    fn spawn(&mut self, size: GridSize, rng: &mut SimRng) {
        let (w, h) = (size.width as f32, size.height as f32);
        self.pos = Vec2::new(rng.range(w / 4.0, 3.0 * w / 4.0), 0.0);
        self.drop_target_y = rng.range(h / 4.0, 3.0 * h / 4.0);
        self.center = self.pos;
        self.state = WebState::Dropping;
        self.pause_ticks = 0;
        self.leg_phase = rng.range(0.0, TAU);
        self.build_step = 0;
        self.eating_ticks = 0;
        self.web_incomplete = false;
        self.web.clear();
        self.color = self
            .configured_color
            .unwrap_or_else(|| rng.pick(&PALETTE));
        log::debug!("spider dropping from column {:.0}", self.pos.x);
    }

    /// Rounded body cell while active and on the grid
    pub fn hit_point(&self, size: GridSize) -> Option<Point> {
        if !self.life.is_active() {
            return None;
        }
        size.cell(self.pos)
    }

    /// Laser strike: explode at `at`, drop the whole web, respawn later
    pub fn hit(&mut self, at: Point, rng: &mut SimRng) {
        self.explosion.start(at);
        self.web.clear();
        self.state = WebState::Dropping;
        self.web_incomplete = false;
        self.life.despawn(rng.ticks(40, 80));
        log::debug!("spider hit at ({}, {})", at.x, at.y);
    }

    /// Start hunting prey at `at`; ignored unless resting or building
    pub fn hunt_prey(&mut self, at: Point) {
        if !matches!(self.state, WebState::Done | WebState::Building) {
            return;
        }
        self.web_incomplete = self.state == WebState::Building;
        self.prey = at.as_vec();
        self.state = WebState::Hunting;
        log::trace!("spider hunting toward ({}, {})", at.x, at.y);
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if self.explosion.is_active() {
            self.explosion.render(surface);
            return;
        }

        let spoke = Style::fg(Color::DarkGray);
        let ring = Style::fg(Color::Gray);
        for p in self.web.silk.iter().chain(&self.web.spokes) {
            plot(surface, p.x, p.y, '|', spoke);
        }
        for p in &self.web.rings {
            plot(surface, p.x, p.y, '-', ring);
        }

        if !self.life.is_active() {
            return;
        }
        let (width, height) = surface.size();
        let Some(c) = GridSize::new(width, height).cell(self.pos) else {
            return;
        };

        let fg = Style::fg(self.color);
        let leg = self.leg_phase.sin().round() as i32;
        plot(surface, c.x, c.y, 'o', fg);
        plot(surface, c.x - 1, c.y + leg, '-', fg);
        plot(surface, c.x + 1, c.y - leg, '-', fg);
        plot(surface, c.x - 1, c.y - 1 + leg, '/', fg);
        plot(surface, c.x + 1, c.y - 1 - leg, '\\', fg);
        plot(surface, c.x - 1, c.y + 1 + leg, '\\', fg);
        plot(surface, c.x + 1, c.y + 1 - leg, '/', fg);
    }

    /// Active and resting at `at` with the given sticky cells as spokes
    #[cfg(test)]
    pub(crate) fn place_resting(&mut self, at: Point, spokes: Vec<Point>) {
        self.life.force_active();
        self.pos = at.as_vec();
        self.center = self.pos;
        self.state = WebState::Done;
        self.pause_ticks = 400;
        self.web.spokes = spokes;
    }

    /// Active and hunting, already standing at `at`
    #[cfg(test)]
    pub(crate) fn place_hunting(&mut self, at: Point) {
        self.life.force_active();
        self.pos = at.as_vec();
        self.center = self.pos;
        self.prey = self.pos;
        self.state = WebState::Hunting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CellBuffer;

    fn settings() -> SpiderSettings {
        SpiderSettings {
            count: 1,
            initial_delay_max: 0,
            color: Some(Color::Brown),
        }
    }

    fn run_until(
        spider: &mut Spider,
        ctx: &TickContext,
        rng: &mut SimRng,
        limit: u32,
        done: impl Fn(&Spider) -> bool,
    ) -> bool {
        for _ in 0..limit {
            if done(spider) {
                return true;
            }
            spider.advance(ctx, rng);
        }
        done(spider)
    }

    #[test]
    fn test_build_schedule() {
        for step in 0..SPOKE_PHASE_END {
            match build_stage(step) {
                BuildStage::Spoke { index, radius, .. } => {
                    assert_eq!(index, step / 25);
                    assert!(index < SPOKES);
                    assert!(radius < WEB_RADIUS);
                }
                other => panic!("step {step} gave {other:?}"),
            }
        }
        for step in SPOKE_PHASE_END..BUILD_STEPS {
            match build_stage(step) {
                BuildStage::Ring { index, radius, .. } => {
                    assert_eq!(index, (step - 200) / 50);
                    assert!(index < RINGS);
                    assert!((radius - WEB_RADIUS * (index + 1) as f32 / 4.0).abs() < 1e-5);
                }
                other => panic!("step {step} gave {other:?}"),
            }
        }
        assert_eq!(build_stage(400), BuildStage::Complete);
    }

    #[test]
    fn test_spider_builds_full_web() {
        let mut rng = SimRng::new(40);
        let size = GridSize::new(60, 30);
        let ctx = TickContext::new(size);
        let mut spider = Spider::new(&settings());

        spider.advance(&ctx, &mut rng);
        assert!(spider.is_active());
        assert_eq!(spider.state(), WebState::Dropping);

        assert!(run_until(&mut spider, &ctx, &mut rng, 100, |s| {
            s.state() == WebState::Building
        }));
        assert!(!spider.web().silk.is_empty());

        assert!(run_until(&mut spider, &ctx, &mut rng, 500, |s| {
            s.state() == WebState::Done
        }));
        assert!(spider.web().spokes.len() <= (SPOKES * SPOKE_STEPS) as usize);
        assert!(spider.web().rings.len() <= (RINGS * RING_STEPS) as usize);
        assert!(!spider.web().rings.is_empty());
        assert_eq!(spider.position(), spider.center());

        let mut buf = CellBuffer::new(60, 30);
        spider.render(&mut buf);
        let c = Point::from_vec(spider.center());
        assert_eq!(buf.glyph_at(c.x, c.y), 'o');
    }

    #[test]
    fn test_spider_climbs_away_and_clears_web() {
        let mut rng = SimRng::new(41);
        let ctx = TickContext::new(GridSize::new(60, 30));
        let mut spider = Spider::new(&settings());
        spider.place_resting(Point::new(20, 12), vec![Point::new(21, 12)]);

        assert!(run_until(&mut spider, &ctx, &mut rng, 500, |s| {
            s.state() == WebState::Climbing
        }));
        assert!(run_until(&mut spider, &ctx, &mut rng, 100, |s| !s.is_active()));
        assert!(spider.web().is_empty());
        assert!(spider.respawn_wait() >= 199);
    }

    #[test]
    fn test_hunt_then_return_to_hub() {
        let mut rng = SimRng::new(42);
        let ctx = TickContext::new(GridSize::new(40, 30));
        let mut spider = Spider::new(&settings());
        spider.place_resting(Point::new(12, 8), vec![Point::new(12, 8)]);

        spider.hunt_prey(Point::new(15, 12));
        assert!(spider.is_hunting());
        assert_eq!(spider.prey(), Some(Vec2::new(15.0, 12.0)));

        assert!(run_until(&mut spider, &ctx, &mut rng, 20, |s| {
            s.state() == WebState::Eating
        }));
        // A second prey while eating is ignored
        spider.hunt_prey(Point::new(1, 1));
        assert_eq!(spider.state(), WebState::Eating);

        assert!(run_until(&mut spider, &ctx, &mut rng, 60, |s| {
            s.state() == WebState::Done
        }));
        assert_eq!(spider.position(), Vec2::new(12.0, 8.0));
        assert!(!spider.is_hunting());
    }

    #[test]
    fn test_hunt_interrupts_building_then_resumes() {
        let mut rng = SimRng::new(43);
        let size = GridSize::new(60, 30);
        let ctx = TickContext::new(size);
        let mut spider = Spider::new(&settings());
        assert!(run_until(&mut spider, &ctx, &mut rng, 100, |s| {
            s.state() == WebState::Building
        }));
        for _ in 0..30 {
            spider.advance(&ctx, &mut rng);
        }
        let spokes = spider.web().spokes.len();

        let hub = Point::from_vec(spider.center());
        let prey = Point::new(hub.x + 2, hub.y);
        spider.hunt_prey(prey);
        assert_eq!(spider.state(), WebState::Hunting);
        assert!(run_until(&mut spider, &ctx, &mut rng, 100, |s| {
            s.state() == WebState::Building
        }));
        assert_eq!(spider.web().spokes.len(), spokes);
        spider.advance(&ctx, &mut rng);
        assert_eq!(spider.web().spokes.len(), spokes + 1);
    }

    #[test]
    fn test_hit_mid_building_clears_web_and_respawns() {
        let mut rng = SimRng::new(44);
        let size = GridSize::new(40, 20);
        let ctx = TickContext::new(size);
        let mut spider = Spider::new(&settings());
        assert!(run_until(&mut spider, &ctx, &mut rng, 100, |s| {
            s.state() == WebState::Building
        }));
        for _ in 0..60 {
            spider.advance(&ctx, &mut rng);
        }
        assert!(!spider.web().spokes.is_empty());

        let at = spider.hit_point(size).unwrap_or_default();
        spider.hit(at, &mut rng);
        assert!(!spider.is_active());
        assert!(spider.is_exploding());
        assert!(spider.web().is_empty());
        assert_eq!(spider.web_points().count(), 0);
        assert!(spider.respawn_wait() >= 40);

        // Burn the explosion, then a dormant tick changes nothing but the countdown
        for _ in 0..6 {
            spider.advance(&ctx, &mut rng);
        }
        let (pos, state, wait) = (spider.position(), spider.state(), spider.respawn_wait());
        spider.advance(&ctx, &mut rng);
        assert_eq!(spider.position(), pos);
        assert_eq!(spider.state(), state);
        assert_eq!(spider.respawn_wait(), wait - 1);
        assert_eq!(spider.hit_point(size), None);
        let mut buf = CellBuffer::new(40, 20);
        spider.render(&mut buf);
        assert_eq!(buf.painted(), 0);

        assert!(run_until(&mut spider, &ctx, &mut rng, 200, |s| s.is_active()));
        assert_eq!(spider.state(), WebState::Dropping);
        assert_eq!(spider.position().y, 0.0);
        let x = spider.position().x;
        assert!((10.0..=30.0).contains(&x));
    }

    #[test]
    fn test_empty_grid_is_noop() {
        let mut rng = SimRng::new(45);
        let ctx = TickContext::new(GridSize::new(0, 10));
        let mut spider = Spider::new(&settings());
        for _ in 0..20 {
            spider.advance(&ctx, &mut rng);
        }
        assert!(!spider.is_active());
        let mut buf = CellBuffer::new(0, 10);
        spider.render(&mut buf);
        assert_eq!(buf.painted(), 0);
    }
}
