//! Owns every actor and the shared generator
//!
//! One [`Playground::tick`] advances all actors in list order, then resolves
//! interactions. [`Playground::draw`] renders them in the same order.

use glam::IVec2;

use super::actor::{Actor, TickContext};
use super::ball::Ball;
use super::butterfly::Butterfly;
use super::grid::{GridSize, Point};
use super::interact::{Interaction, resolve};
use super::laser::Laser;
use super::rng::SimRng;
use super::snake::Snake;
use super::spider::Spider;
use super::square::Square;
use super::sway::SwayString;
use crate::settings::Settings;
use crate::surface::Surface;

#[derive(Debug, Clone)]
pub struct Playground {
    actors: Vec<Actor>,
    rng: SimRng,
    laser_hits_spiders: bool,
    tick_count: u64,
    /// Interactions applied during the last tick
    events: Vec<Interaction>,
}

impl Playground {
    /// Build actors in the order snakes, strings, butterflies, lasers,
    /// spiders, balls, squares
    ///
    /// Settings are normalized first, so negative counts build nothing and
    /// non-positive start delays fall back to their defaults.
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let settings = settings.clone().normalized();
        let mut rng = SimRng::new(seed);
        let count = |n: i32| n as usize;

        let mut actors = Vec::with_capacity(settings.actor_count());
        for _ in 0..count(settings.snakes.count) {
            actors.push(Actor::Snake(Snake::new(&settings.snakes)));
        }
        for _ in 0..count(settings.strings.count) {
            actors.push(Actor::Sway(SwayString::new(&settings.strings)));
        }
        for _ in 0..count(settings.butterflies.count) {
            actors.push(Actor::Butterfly(Butterfly::new(&settings.butterflies)));
        }
        for _ in 0..count(settings.lasers.count) {
            actors.push(Actor::Laser(Laser::new(&settings.lasers)));
        }
        for _ in 0..count(settings.spiders.count) {
            actors.push(Actor::Spider(Spider::new(&settings.spiders)));
        }
        for _ in 0..count(settings.balls.count) {
            actors.push(Actor::Ball(Ball::new(&settings.balls)));
        }
        for i in 0..count(settings.squares.count) as i32 {
            let pos = IVec2::new(1 + 3 * i, 1 + 2 * i);
            let vel = IVec2::new(rng.sign() as i32, rng.sign() as i32);
            actors.push(Actor::Square(Square::new(pos, vel, settings.squares.size)));
        }

        log::info!("Playground seeded with {seed}: {} actors", actors.len());

        Self {
            actors,
            rng,
            laser_hits_spiders: settings.laser_hits_spiders,
            tick_count: 0,
            events: Vec::new(),
        }
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn events(&self) -> &[Interaction] {
        &self.events
    }

    /// Sticky web cells of every spider, in actor order
    pub fn web_points(&self) -> Vec<Point> {
        self.actors
            .iter()
            .filter_map(|a| match a {
                Actor::Spider(s) => Some(s.web_points()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Advance one tick on a grid of `size`
    pub fn tick(&mut self, size: GridSize) {
        let web = self.web_points();
        let ctx = TickContext::with_avoid(size, &web);
        for actor in &mut self.actors {
            actor.advance(&ctx, &mut self.rng);
        }

        self.events.clear();
        resolve(
            &mut self.actors,
            size,
            self.laser_hits_spiders,
            &mut self.rng,
            &mut self.events,
        );
        for event in &self.events {
            log::trace!("tick {}: {event:?}", self.tick_count);
        }
        self.tick_count += 1;
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for actor in &self.actors {
            actor.render(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CellBuffer;
    use proptest::prelude::*;

    fn kinds(p: &Playground) -> Vec<&'static str> {
        p.actors().iter().map(Actor::kind).collect()
    }

    #[test]
    fn test_build_order() {
        let mut s = Settings::default();
        s.balls.count = 1;
        s.squares.count = 1;
        let p = Playground::new(&s, 1);
        assert_eq!(
            kinds(&p),
            [
                "snake", "snake", "string", "string", "butterfly", "laser", "spider", "ball",
                "square"
            ]
        );
    }

    #[test]
    fn test_negative_counts_build_nothing() {
        let mut s = Settings::default();
        s.snakes.count = -2;
        s.strings.count = -1;
        s.butterflies.count = 0;
        let p = Playground::new(&s, 2);
        assert_eq!(kinds(&p), ["laser", "spider"]);
    }

    #[test]
    fn test_zero_start_delay_uses_default() {
        let mut s = Settings::default();
        s.snakes.count = 0;
        s.strings.count = 0;
        s.lasers.count = 0;
        s.spiders.count = 0;
        s.butterflies.initial_delay_max = 0;

        // With no fallback every butterfly would appear on the first tick
        let waiting = (0..20u64)
            .filter(|&seed| {
                let mut p = Playground::new(&s, seed);
                p.tick(GridSize::new(40, 20));
                !p.actors()[0].is_active()
            })
            .count();
        assert!(waiting > 0);
    }

    #[test]
    fn test_same_seed_same_frames() {
        let s = Settings::default();
        let mut a = Playground::new(&s, 77);
        let mut b = Playground::new(&s, 77);
        let size = GridSize::new(60, 25);
        let mut fa = CellBuffer::new(60, 25);
        let mut fb = CellBuffer::new(60, 25);
        for _ in 0..400 {
            a.tick(size);
            b.tick(size);
        }
        a.draw(&mut fa);
        b.draw(&mut fb);
        assert_eq!(fa, fb);
        assert_eq!(a.tick_count(), 400);
        assert_eq!(a.seed(), 77);
    }

    #[test]
    fn test_something_appears() {
        let s = Settings::default();
        let mut p = Playground::new(&s, 5);
        let size = GridSize::new(80, 24);
        let mut frame = CellBuffer::new(80, 24);
        let mut painted = 0;
        for _ in 0..200 {
            p.tick(size);
            frame.clear();
            p.draw(&mut frame);
            painted = painted.max(frame.painted());
        }
        assert!(painted > 0);
    }

    #[test]
    fn test_grid_can_change_between_ticks() {
        let s = Settings::default();
        let mut p = Playground::new(&s, 9);
        for i in 0..300 {
            let size = if i % 50 < 25 {
                GridSize::new(80, 24)
            } else {
                GridSize::new(20, 6)
            };
            p.tick(size);
            let mut frame = CellBuffer::new(size.width, size.height);
            p.draw(&mut frame);
        }
        assert_eq!(p.tick_count(), 300);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn playground_never_panics(seed in any::<u64>(), w in 0i32..90, h in 0i32..40) {
            let mut s = Settings::default();
            s.balls.count = 1;
            s.squares.count = 1;
            s.laser_hits_spiders = true;
            let mut p = Playground::new(&s, seed);
            let size = GridSize::new(w, h);
            let mut frame = CellBuffer::new(w, h);
            for _ in 0..300 {
                p.tick(size);
                frame.clear();
                p.draw(&mut frame);
            }
            if w == 0 || h == 0 {
                prop_assert_eq!(frame.painted(), 0);
            }
        }
    }
}
