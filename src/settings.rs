//! Actor counts and tunables
//!
//! Defaults come from [`Settings::default`]. A JSON file may override any
//! subset of fields, and command-line flags are applied on top of that.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::FRAME_INTERVAL_MS;
use crate::error::AppError;
use crate::surface::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeSettings {
    pub count: i32,
    /// Body length in cells
    pub max_len: i32,
    pub initial_delay_max: i32,
    /// Fixed color; random per spawn when unset
    pub color: Option<Color>,
}

impl Default for SnakeSettings {
    fn default() -> Self {
        Self {
            count: 2,
            max_len: 10,
            initial_delay_max: 40,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringSettings {
    pub count: i32,
    pub min_len: i32,
    pub max_len: i32,
    pub initial_delay_max: i32,
    pub color: Option<Color>,
}

impl Default for StringSettings {
    fn default() -> Self {
        Self {
            count: 2,
            min_len: 18,
            max_len: 36,
            initial_delay_max: 40,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButterflySettings {
    pub count: i32,
    pub initial_delay_max: i32,
    pub color: Option<Color>,
}

impl Default for ButterflySettings {
    fn default() -> Self {
        Self {
            count: 1,
            initial_delay_max: 80,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserSettings {
    pub count: i32,
    pub initial_delay_max: i32,
    pub color: Option<Color>,
}

impl Default for LaserSettings {
    fn default() -> Self {
        Self {
            count: 1,
            initial_delay_max: 80,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiderSettings {
    pub count: i32,
    pub initial_delay_max: i32,
    pub color: Option<Color>,
}

impl Default for SpiderSettings {
    fn default() -> Self {
        Self {
            count: 1,
            initial_delay_max: 60,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSettings {
    pub count: i32,
    pub initial_delay_max: i32,
}

impl Default for BallSettings {
    fn default() -> Self {
        Self {
            count: 0,
            initial_delay_max: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquareSettings {
    pub count: i32,
    /// Side length in cells
    pub size: i32,
}

impl Default for SquareSettings {
    fn default() -> Self {
        Self { count: 0, size: 2 }
    }
}

/// Everything a playground is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub snakes: SnakeSettings,
    pub strings: StringSettings,
    pub butterflies: ButterflySettings,
    pub lasers: LaserSettings,
    pub spiders: SpiderSettings,
    pub balls: BallSettings,
    pub squares: SquareSettings,

    /// Let the laser shoot spiders as well as butterflies
    pub laser_hits_spiders: bool,
    /// Sleep between frames
    pub frame_interval_ms: u64,
    /// Fixed seed; random when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snakes: SnakeSettings::default(),
            strings: StringSettings::default(),
            butterflies: ButterflySettings::default(),
            lasers: LaserSettings::default(),
            spiders: SpiderSettings::default(),
            balls: BallSettings::default(),
            squares: SquareSettings::default(),
            laser_hits_spiders: false,
            frame_interval_ms: FRAME_INTERVAL_MS,
            seed: None,
        }
    }
}

/// Non-positive delays fall back to the kind's default
fn delay_or(value: i32, default: i32) -> i32 {
    if value <= 0 { default } else { value }
}

impl Settings {
    /// Read a JSON settings file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Clamp counts to zero and repair out-of-range tunables
    pub fn normalized(mut self) -> Self {
        let d = Settings::default();

        self.snakes.count = self.snakes.count.max(0);
        self.snakes.max_len = self.snakes.max_len.max(1);
        self.snakes.initial_delay_max =
            delay_or(self.snakes.initial_delay_max, d.snakes.initial_delay_max);

        self.strings.count = self.strings.count.max(0);
        self.strings.min_len = self.strings.min_len.max(1);
        self.strings.max_len = self.strings.max_len.max(self.strings.min_len);
        self.strings.initial_delay_max =
            delay_or(self.strings.initial_delay_max, d.strings.initial_delay_max);

        self.butterflies.count = self.butterflies.count.max(0);
        self.butterflies.initial_delay_max = delay_or(
            self.butterflies.initial_delay_max,
            d.butterflies.initial_delay_max,
        );

        self.lasers.count = self.lasers.count.max(0);
        self.lasers.initial_delay_max =
            delay_or(self.lasers.initial_delay_max, d.lasers.initial_delay_max);

        self.spiders.count = self.spiders.count.max(0);
        self.spiders.initial_delay_max =
            delay_or(self.spiders.initial_delay_max, d.spiders.initial_delay_max);

        self.balls.count = self.balls.count.max(0);
        self.balls.initial_delay_max =
            delay_or(self.balls.initial_delay_max, d.balls.initial_delay_max);

        self.squares.count = self.squares.count.max(0);
        self.squares.size = self.squares.size.max(1);

        self
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Total number of actors a playground will hold
    pub fn actor_count(&self) -> usize {
        [
            self.snakes.count,
            self.strings.count,
            self.butterflies.count,
            self.lasers.count,
            self.spiders.count,
            self.balls.count,
            self.squares.count,
        ]
        .iter()
        .map(|&n| n.max(0) as usize)
        .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.snakes.count, 2);
        assert_eq!(s.snakes.max_len, 10);
        assert_eq!(s.strings.min_len, 18);
        assert_eq!(s.strings.max_len, 36);
        assert_eq!(s.butterflies.initial_delay_max, 80);
        assert_eq!(s.spiders.initial_delay_max, 60);
        assert_eq!(s.balls.count, 0);
        assert!(!s.laser_hits_spiders);
        assert_eq!(s.frame_interval(), Duration::from_millis(55));
        assert_eq!(s.actor_count(), 7);
    }

    #[test]
    fn test_negative_counts_clamp_to_zero() {
        let mut s = Settings::default();
        s.snakes.count = -3;
        s.lasers.count = -1;
        s.squares.count = -9;
        let s = s.normalized();
        assert_eq!(s.snakes.count, 0);
        assert_eq!(s.lasers.count, 0);
        assert_eq!(s.squares.count, 0);
    }

    #[test]
    fn test_non_positive_delay_falls_back() {
        let mut s = Settings::default();
        s.butterflies.initial_delay_max = 0;
        s.snakes.initial_delay_max = -5;
        s.lasers.initial_delay_max = 7;
        let s = s.normalized();
        assert_eq!(s.butterflies.initial_delay_max, 80);
        assert_eq!(s.snakes.initial_delay_max, 40);
        assert_eq!(s.lasers.initial_delay_max, 7);
    }

    #[test]
    fn test_json_overrides_defaults() {
        let json = r#"{
            "snakes": { "count": 5 },
            "spiders": { "color": "maroon" },
            "laser_hits_spiders": true,
            "seed": 42
        }"#;
        let s = Settings::from_json(json).unwrap();
        assert_eq!(s.snakes.count, 5);
        assert_eq!(s.snakes.max_len, 10);
        assert_eq!(s.spiders.color, Some(Color::Maroon));
        assert!(s.laser_hits_spiders);
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.strings, StringSettings::default());
    }

    #[test]
    fn test_load_reports_missing_and_malformed_files() {
        let dir = std::env::temp_dir();
        let missing = dir.join("kitty-play-settings-does-not-exist.json");
        assert!(matches!(
            Settings::load(&missing),
            Err(AppError::ConfigRead { .. })
        ));

        let bad = dir.join(format!("kitty-play-bad-{}.json", std::process::id()));
        fs::write(&bad, "{ not json").unwrap();
        let result = Settings::load(&bad);
        let _ = fs::remove_file(&bad);
        assert!(matches!(result, Err(AppError::ConfigParse { .. })));
    }

    #[test]
    fn test_string_lengths_repaired() {
        let mut s = Settings::default();
        s.strings.min_len = 30;
        s.strings.max_len = 10;
        let s = s.normalized();
        assert_eq!(s.strings.max_len, 30);
    }
}
