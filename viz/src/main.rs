//! `stargrid`: draw a grid in the terminal and watch A* search it.
//!
//! Run: cargo run -- --rows 20 --log-file stargrid.log

use std::fs::{self, File};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

use stargrid_core::{App, AppConfig, Grid};
use stargrid_crossterm::CrosstermDriver;
use stargrid_viz::{Args, Config, Visualizer};

/// The UI owns the terminal, so logs only go to a file.
fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let level: LevelFilter = args
        .log_level
        .parse()
        .with_context(|| format!("invalid --log-level {:?}", args.log_level))?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    SubscriberBuilder::default()
        .with_max_level(level)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    let mut config = Config::from_args(&args)?;

    let (width, height) = CrosstermDriver::size().context("reading terminal size")?;
    let visualizer = match config.layout.clone() {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading layout {}", path.display()))?;
            let grid = Grid::from_ascii(&text, 1)
                .with_context(|| format!("parsing layout {}", path.display()))?;
            config.fit_layout(grid.dimension(), width, height)?;
            Visualizer::with_grid(grid, &config)
        }
        None => {
            config.fit(width, height)?;
            Visualizer::new(&config)
        }
    };

    let mut app = App::new(AppConfig {
        model: visualizer,
        driver: CrosstermDriver::new().with_mouse(config.mouse),
        width,
        height,
        frame_delay: config.frame_delay,
    });
    app.run().map_err(|e| anyhow!("terminal error: {e}"))?;

    if let Some(run) = app.model().last_run() {
        log::info!("last search: {run:?}");
    }
    Ok(())
}
