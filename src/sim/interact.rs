//! Cross-actor interactions, resolved once per tick after every advance
//!
//! Two passes over the actor list, both first-match-wins in list order:
//! 1. Laser hits: prey within one cell of an active laser dot is shot
//! 2. Web collisions: butterflies touching a web stick, hunting spiders eat
//!    stuck butterflies they reach
//!
//! Every transition is applied immediately through the actor's own methods
//! and reported as an [`Interaction`].

use super::actor::Actor;
use super::grid::{GridSize, Point};
use super::rng::SimRng;

/// One applied transition; indices point into the actor list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    LaserHit { laser: usize, prey: usize, at: Point },
    Stuck { butterfly: usize, spider: usize, at: Point },
    Eaten { butterfly: usize, spider: usize },
}

/// Apply every interaction for this tick, appending events to `events`
pub fn resolve(
    actors: &mut [Actor],
    size: GridSize,
    laser_hits_spiders: bool,
    rng: &mut SimRng,
    events: &mut Vec<Interaction>,
) {
    if size.is_empty() {
        return;
    }
    resolve_laser_hits(actors, size, laser_hits_spiders, rng, events);
    resolve_web_collisions(actors, size, rng, events);
}

fn resolve_laser_hits(
    actors: &mut [Actor],
    size: GridSize,
    laser_hits_spiders: bool,
    rng: &mut SimRng,
    events: &mut Vec<Interaction>,
) {
    let lasers: Vec<(usize, Point)> = actors
        .iter()
        .enumerate()
        .filter_map(|(i, a)| match a {
            Actor::Laser(l) => l.position(size).map(|p| (i, p)),
            _ => None,
        })
        .collect();
    if lasers.is_empty() {
        return;
    }

    // Butterflies first, then spiders
    for spider_pass in [false, true] {
        if spider_pass && !laser_hits_spiders {
            break;
        }
        for prey in 0..actors.len() {
            let wanted = match &actors[prey] {
                Actor::Butterfly(_) => !spider_pass,
                Actor::Spider(_) => spider_pass,
                _ => false,
            };
            if !wanted {
                continue;
            }
            let Some(at) = prey_point(&actors[prey], size) else {
                continue;
            };
            let Some(&(laser, _)) = lasers.iter().find(|(_, dot)| dot.touches(at)) else {
                continue;
            };

            if let Actor::Laser(l) = &mut actors[laser] {
                l.trigger_fire();
            }
            match &mut actors[prey] {
                Actor::Butterfly(b) => b.hit(at, rng),
                Actor::Spider(s) => s.hit(at, rng),
                _ => {}
            }
            log::debug!("laser {laser} hit {} at ({}, {})", actors[prey].kind(), at.x, at.y);
            events.push(Interaction::LaserHit { laser, prey, at });
        }
    }
}

fn resolve_web_collisions(
    actors: &mut [Actor],
    size: GridSize,
    rng: &mut SimRng,
    events: &mut Vec<Interaction>,
) {
    for spider in 0..actors.len() {
        let Actor::Spider(s) = &actors[spider] else {
            continue;
        };

        if s.is_hunting() {
            let at = Point::from_vec(s.position());
            let meal = actors.iter().enumerate().find_map(|(i, a)| match a {
                Actor::Butterfly(b) if b.is_stuck() => {
                    b.hit_point(size).filter(|p| p.touches(at)).map(|_| i)
                }
                _ => None,
            });
            if let Some(butterfly) = meal {
                if let Actor::Butterfly(b) = &mut actors[butterfly] {
                    b.be_eaten(rng);
                }
                log::debug!("spider {spider} ate butterfly {butterfly}");
                events.push(Interaction::Eaten { butterfly, spider });
            }
            continue;
        }

        let web: Vec<Point> = s.web_points().collect();
        if web.is_empty() {
            continue;
        }
        for butterfly in 0..actors.len() {
            let Actor::Butterfly(b) = &mut actors[butterfly] else {
                continue;
            };
            if b.is_stuck() {
                continue;
            }
            let Some(at) = b.hit_point(size) else {
                continue;
            };
            if !web.iter().any(|p| p.touches(at)) {
                continue;
            }
            b.stick_to_web(rng);
            if let Actor::Spider(s) = &mut actors[spider] {
                s.hunt_prey(at);
            }
            log::debug!("butterfly {butterfly} stuck in web of spider {spider}");
            events.push(Interaction::Stuck {
                butterfly,
                spider,
                at,
            });
        }
    }
}

fn prey_point(actor: &Actor, size: GridSize) -> Option<Point> {
    match actor {
        Actor::Butterfly(b) => b.hit_point(size),
        Actor::Spider(s) => s.hit_point(size),
        _ => None,
    }
}
