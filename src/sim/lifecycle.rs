//! Spawn/despawn cycle shared by every spawning actor
//!
//! `AwaitingInitialDelay -> Dormant(countdown) -> Active -> Dormant(countdown) -> ...`
//!
//! The one-time start jitter keeps several actors of one kind from popping
//! into existence on the same tick.

use super::rng::SimRng;

/// What an actor should do with the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeStep {
    /// Counting down; no motion, nothing drawn
    Dormant,
    /// Just became active; re-randomize state, no motion this tick
    Spawned,
    /// Normal behaviour
    Active,
}

#[derive(Debug, Clone)]
pub struct Lifecycle {
    active: bool,
    respawn_wait: u32,
    initial_delay_set: bool,
    initial_delay_max: u32,
}

impl Lifecycle {
    pub fn new(initial_delay_max: u32) -> Self {
        Self {
            active: false,
            respawn_wait: 0,
            initial_delay_set: false,
            initial_delay_max,
        }
    }

    /// Advance the cycle by one tick
    pub fn step(&mut self, rng: &mut SimRng) -> LifeStep {
        if !self.active && !self.initial_delay_set {
            self.respawn_wait = rng.below(self.initial_delay_max + 1);
            self.initial_delay_set = true;
        }
        if self.respawn_wait > 0 {
            self.respawn_wait -= 1;
            return LifeStep::Dormant;
        }
        if !self.active {
            self.active = true;
            return LifeStep::Spawned;
        }
        LifeStep::Active
    }

    /// Go dormant for `wait` ticks
    pub fn despawn(&mut self, wait: u32) {
        self.active = false;
        self.respawn_wait = wait;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn respawn_wait(&self) -> u32 {
        self.respawn_wait
    }

    /// Skip the start jitter and become active immediately
    #[cfg(test)]
    pub(crate) fn force_active(&mut self) {
        self.active = true;
        self.initial_delay_set = true;
        self.respawn_wait = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_delay_then_spawn() {
        let mut rng = SimRng::new(3);
        let mut life = Lifecycle::new(10);

        let mut dormant = 0;
        loop {
            match life.step(&mut rng) {
                LifeStep::Dormant => dormant += 1,
                LifeStep::Spawned => break,
                LifeStep::Active => panic!("active before spawning"),
            }
        }
        assert!(dormant <= 10);
        assert!(life.is_active());
        assert_eq!(life.step(&mut rng), LifeStep::Active);
    }

    #[test]
    fn test_zero_delay_spawns_first_tick() {
        let mut rng = SimRng::new(3);
        let mut life = Lifecycle::new(0);
        assert_eq!(life.step(&mut rng), LifeStep::Spawned);
    }

    #[test]
    fn test_respawn_countdown() {
        let mut rng = SimRng::new(9);
        let mut life = Lifecycle::new(0);
        life.force_active();

        life.despawn(3);
        assert!(!life.is_active());
        for remaining in (0..3).rev() {
            assert_eq!(life.step(&mut rng), LifeStep::Dormant);
            assert_eq!(life.respawn_wait(), remaining);
        }
        assert_eq!(life.step(&mut rng), LifeStep::Spawned);
    }

    #[test]
    fn test_initial_delay_sampled_once() {
        let mut rng = SimRng::new(11);
        let mut life = Lifecycle::new(0);
        assert_eq!(life.step(&mut rng), LifeStep::Spawned);
        life.despawn(0);
        // No fresh start jitter on the second cycle
        assert_eq!(life.step(&mut rng), LifeStep::Spawned);
    }
}
