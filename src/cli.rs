//! Command-line flags
//!
//! Flags override the settings file, which overrides the built-in defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::consts::{HEADLESS_HEIGHT, HEADLESS_TICKS, HEADLESS_WIDTH};
use crate::error::AppError;
use crate::settings::Settings;

/// Largest headless grid side accepted on the command line
const MAX_HEADLESS_SIDE: i64 = 4096;

#[derive(Parser, Debug)]
#[command(
    name = "kitty-play",
    version,
    about = "Snakes, strings, butterflies, lasers and spiders for your cat to watch"
)]
pub struct Cli {
    /// Number of snakes
    #[arg(long, allow_negative_numbers = true)]
    pub snakes: Option<i32>,
    /// Snake body length in cells
    #[arg(long)]
    pub snake_max_len: Option<i32>,
    /// Upper bound of the random delay before the first snake appears
    #[arg(long)]
    pub snake_initial_delay_max: Option<i32>,

    /// Number of swaying strings
    #[arg(long, allow_negative_numbers = true)]
    pub strings: Option<i32>,
    #[arg(long)]
    pub string_min_len: Option<i32>,
    #[arg(long)]
    pub string_max_len: Option<i32>,
    #[arg(long)]
    pub string_initial_delay_max: Option<i32>,

    /// Number of butterflies
    #[arg(long, allow_negative_numbers = true)]
    pub butterflies: Option<i32>,
    #[arg(long)]
    pub butterfly_initial_delay_max: Option<i32>,

    /// Number of laser dots
    #[arg(long, allow_negative_numbers = true)]
    pub lasers: Option<i32>,
    #[arg(long)]
    pub laser_initial_delay_max: Option<i32>,

    /// Number of spiders
    #[arg(long, allow_negative_numbers = true)]
    pub spiders: Option<i32>,
    #[arg(long)]
    pub spider_initial_delay_max: Option<i32>,

    /// Number of bouncing balls
    #[arg(long, allow_negative_numbers = true)]
    pub balls: Option<i32>,
    /// Number of bouncing squares
    #[arg(long, allow_negative_numbers = true)]
    pub squares: Option<i32>,

    /// Lasers shoot spiders too
    #[arg(long)]
    pub laser_hits_spiders: bool,

    /// Milliseconds between frames
    #[arg(long)]
    pub frame_ms: Option<u64>,
    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON settings file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Run without a terminal and print the final frame
    #[arg(long)]
    pub headless: bool,
    /// Ticks to simulate in headless mode
    #[arg(long, default_value_t = HEADLESS_TICKS)]
    pub ticks: u64,
    /// Grid width in headless mode
    #[arg(
        long,
        default_value_t = HEADLESS_WIDTH,
        value_parser = clap::value_parser!(i32).range(0..=MAX_HEADLESS_SIDE)
    )]
    pub width: i32,
    /// Grid height in headless mode
    #[arg(
        long,
        default_value_t = HEADLESS_HEIGHT,
        value_parser = clap::value_parser!(i32).range(0..=MAX_HEADLESS_SIDE)
    )]
    pub height: i32,
}

impl Cli {
    /// Defaults, then the settings file, then flags; normalized
    pub fn settings(&self) -> Result<Settings, AppError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        self.apply(&mut settings);
        Ok(settings.normalized())
    }

    /// Overwrite every field that was given on the command line
    pub fn apply(&self, s: &mut Settings) {
        fn set<T: Copy>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        set(&mut s.snakes.count, self.snakes);
        set(&mut s.snakes.max_len, self.snake_max_len);
        set(&mut s.snakes.initial_delay_max, self.snake_initial_delay_max);

        set(&mut s.strings.count, self.strings);
        set(&mut s.strings.min_len, self.string_min_len);
        set(&mut s.strings.max_len, self.string_max_len);
        set(&mut s.strings.initial_delay_max, self.string_initial_delay_max);

        set(&mut s.butterflies.count, self.butterflies);
        set(
            &mut s.butterflies.initial_delay_max,
            self.butterfly_initial_delay_max,
        );

        set(&mut s.lasers.count, self.lasers);
        set(&mut s.lasers.initial_delay_max, self.laser_initial_delay_max);

        set(&mut s.spiders.count, self.spiders);
        set(&mut s.spiders.initial_delay_max, self.spider_initial_delay_max);

        set(&mut s.balls.count, self.balls);
        set(&mut s.squares.count, self.squares);

        if self.laser_hits_spiders {
            s.laser_hits_spiders = true;
        }
        set(&mut s.frame_interval_ms, self.frame_ms);
        if self.seed.is_some() {
            s.seed = self.seed;
        }
    }
}
