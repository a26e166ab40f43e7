//! Deterministic simulation module
//!
//! Everything that moves lives here. Given a seed and the sequence of grid
//! sizes, a run is fully reproducible:
//! - One seeded generator per playground, injected into every `advance`
//! - Stable iteration order (actor list order)
//! - No terminal or timing dependencies

pub mod actor;
pub mod ball;
pub mod butterfly;
pub mod explosion;
pub mod grid;
pub mod interact;
pub mod laser;
pub mod lifecycle;
pub mod playground;
pub mod rng;
pub mod snake;
pub mod spider;
pub mod square;
pub mod sway;

pub use actor::{Actor, TickContext};
pub use grid::{GridSize, Point};
pub use interact::{Interaction, resolve};
pub use playground::Playground;
pub use rng::SimRng;
pub use spider::WebState;
