//! Uniform advance/render contract over every actor kind

use super::ball::Ball;
use super::butterfly::Butterfly;
use super::grid::{GridSize, Point};
use super::laser::Laser;
use super::rng::SimRng;
use super::snake::Snake;
use super::spider::Spider;
use super::square::Square;
use super::sway::SwayString;
use crate::surface::Surface;

/// Read-only inputs for one tick
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    /// Grid size read from the surface this tick
    pub size: GridSize,
    /// Web cells collected before anything moved
    pub avoid: &'a [Point],
}

impl TickContext<'static> {
    pub fn new(size: GridSize) -> Self {
        Self { size, avoid: &[] }
    }
}

impl<'a> TickContext<'a> {
    pub fn with_avoid(size: GridSize, avoid: &'a [Point]) -> Self {
        Self { size, avoid }
    }
}

#[derive(Debug, Clone)]
pub enum Actor {
    Ball(Ball),
    Square(Square),
    Snake(Snake),
    Sway(SwayString),
    Butterfly(Butterfly),
    Laser(Laser),
    Spider(Spider),
}

impl Actor {
    pub fn kind(&self) -> &'static str {
        match self {
            Actor::Ball(_) => "ball",
            Actor::Square(_) => "square",
            Actor::Snake(_) => "snake",
            Actor::Sway(_) => "string",
            Actor::Butterfly(_) => "butterfly",
            Actor::Laser(_) => "laser",
            Actor::Spider(_) => "spider",
        }
    }

    /// Squares never despawn
    pub fn is_active(&self) -> bool {
        match self {
            Actor::Ball(a) => a.is_active(),
            Actor::Square(_) => true,
            Actor::Snake(a) => a.is_active(),
            Actor::Sway(a) => a.is_active(),
            Actor::Butterfly(a) => a.is_active(),
            Actor::Laser(a) => a.is_active(),
            Actor::Spider(a) => a.is_active(),
        }
    }

    pub fn advance(&mut self, ctx: &TickContext, rng: &mut SimRng) {
        match self {
            Actor::Ball(a) => a.advance(ctx, rng),
            Actor::Square(a) => a.advance(ctx),
            Actor::Snake(a) => a.advance(ctx, rng),
            Actor::Sway(a) => a.advance(ctx, rng),
            Actor::Butterfly(a) => a.advance(ctx, rng),
            Actor::Laser(a) => a.advance(ctx, rng),
            Actor::Spider(a) => a.advance(ctx, rng),
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        match self {
            Actor::Ball(a) => a.render(surface),
            Actor::Square(a) => a.render(surface),
            Actor::Snake(a) => a.render(surface),
            Actor::Sway(a) => a.render(surface),
            Actor::Butterfly(a) => a.render(surface),
            Actor::Laser(a) => a.render(surface),
            Actor::Spider(a) => a.render(surface),
        }
    }
}
