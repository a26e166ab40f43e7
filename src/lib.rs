//! Kitty Play - ambient terminal animation for an audience of cats
//!
//! Core modules:
//! - `sim`: Seeded simulation (actors, lifecycle, interactions)
//! - `surface`: Character grid contract and in-memory cell buffer
//! - `terminal`: crossterm-backed surface and quit-key watcher
//! - `settings`: Actor counts and tunables
//! - `cli`: Command-line flags layered over settings
//! - `app`: Fixed-rate frame loop

pub mod app;
pub mod cli;
pub mod error;
pub mod settings;
pub mod sim;
pub mod surface;
pub mod terminal;

pub use app::CancelToken;
pub use error::AppError;
pub use settings::Settings;

/// Playback configuration constants
pub mod consts {
    /// Sleep between frames (soft frame-rate cap, ~18 fps)
    pub const FRAME_INTERVAL_MS: u64 = 55;
    /// How often the key watcher wakes up to check for cancellation
    pub const INPUT_POLL_MS: u64 = 100;

    /// Headless defaults
    pub const HEADLESS_WIDTH: i32 = 80;
    pub const HEADLESS_HEIGHT: i32 = 24;
    pub const HEADLESS_TICKS: u64 = 200;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Move `current` a fraction of the way toward `target`
#[inline]
pub fn approach(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}

/// Clamp that tolerates inverted bounds (lower bound wins)
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Rotate `heading` toward `target` by at most `max_step` radians
#[inline]
pub fn turn_toward(heading: f32, target: f32, max_step: f32) -> f32 {
    let delta = normalize_angle(target - heading);
    normalize_angle(heading + clamp(delta, -max_step, max_step))
}
