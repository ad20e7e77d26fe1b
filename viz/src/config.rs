//! Command-line arguments and the validated [`Config`] built from them.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::FOOTER_ROWS;

pub const DEFAULT_ROWS: i32 = 20;
pub const DEFAULT_DELAY_MS: u64 = 8;
pub const DEFAULT_DENSITY: f64 = 0.25;

#[derive(Parser, Debug, Clone)]
#[command(name = "stargrid")]
#[command(about = "Watch A* find a shortest path on a grid you draw")]
pub struct Args {
    /// Grid size (rows = columns); clamped to the terminal
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: i32,

    /// Pause after each rendered search step, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// Obstacle probability used by `g`
    #[arg(long, default_value_t = DEFAULT_DENSITY)]
    pub density: f64,

    /// Seed for `g`; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// ASCII layout to start from (`.` empty, `#` obstacle, `S` start, `E` end)
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Do not capture the mouse
    #[arg(long)]
    pub no_mouse: bool,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level filter for the log file
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("--rows must be at least 2, got {0}")]
    TooFewRows(i32),
    #[error("--density must be within [0, 1], got {0}")]
    Density(f64),
    #[error("terminal of {width}x{height} is too small for a grid")]
    TerminalTooSmall { width: i32, height: i32 },
    #[error("layout is {dimension}x{dimension} but the terminal fits at most {max}x{max}")]
    LayoutTooLarge { dimension: i32, max: i32 },
}

/// Validated visualizer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rows: i32,
    pub frame_delay: Duration,
    pub density: f64,
    pub seed: u64,
    pub layout: Option<PathBuf>,
    pub mouse: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            frame_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            density: DEFAULT_DENSITY,
            seed: 0,
            layout: None,
            mouse: true,
        }
    }
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        if args.rows < 2 {
            return Err(ConfigError::TooFewRows(args.rows));
        }
        if !(0.0..=1.0).contains(&args.density) {
            return Err(ConfigError::Density(args.density));
        }
        Ok(Self {
            rows: args.rows,
            frame_delay: Duration::from_millis(args.delay_ms),
            density: args.density,
            seed: args.seed.unwrap_or_else(rand::random),
            layout: args.layout.clone(),
            mouse: !args.no_mouse,
        })
    }

    /// Largest grid that fits a `width` × `height` terminal with room for
    /// the footer.
    pub fn max_rows(width: i32, height: i32) -> i32 {
        width.min(height - FOOTER_ROWS)
    }

    /// Shrink `rows` to fit the terminal.
    pub fn fit(&mut self, width: i32, height: i32) -> Result<(), ConfigError> {
        let max = Self::max_rows(width, height);
        if max < 2 {
            return Err(ConfigError::TerminalTooSmall { width, height });
        }
        if self.rows > max {
            log::warn!("--rows {} does not fit the terminal, using {max}", self.rows);
            self.rows = max;
        }
        Ok(())
    }

    /// Adopt the dimension of a loaded layout, which cannot be shrunk.
    pub fn fit_layout(&mut self, dimension: i32, width: i32, height: i32) -> Result<(), ConfigError> {
        let max = Self::max_rows(width, height);
        if dimension > max {
            return Err(ConfigError::LayoutTooLarge { dimension, max });
        }
        self.rows = dimension;
        Ok(())
    }
}
