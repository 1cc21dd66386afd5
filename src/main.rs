//! Chainrx — Chain Reaction board game in the terminal.

mod animation;
mod app;
mod board;
mod engine;
mod event;
mod game;
mod input;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::path::Path;

/// Options derived from CLI that affect game behaviour (tick pacing, animation).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub players: usize,
    pub tick_rate: f64,
    pub frame_rate: f64,
    pub animation_speed: f32,
    pub animations: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logger(path)?;
    }
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        log::warn!("theme not loaded, using defaults: {e}");
        theme::Theme::default_for_palette(args.palette)
    });
    let config = GameConfig {
        players: usize::from(args.players),
        tick_rate: args.tick_rate.max(0.5),
        frame_rate: args.frame_rate.max(1.0),
        animation_speed: args.animation_speed,
        animations: !args.no_animation,
    };
    log::info!("chainrx starting: {config:?}");
    let mut app = App::new(&args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Route `log` output to a file; the terminal itself is busy drawing the board.
fn init_logger(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("logger already initialised")?;
    Ok(())
}

/// Chain Reaction in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "chainrx",
    version,
    about = "Chain Reaction board game in the terminal. Place orbs, overload cells, capture the board.",
    long_about = "Chainrx is a terminal take on the Chain Reaction board game.\n\n\
        Players take turns placing orbs on a 6x6 grid. A cell explodes when its orb count reaches \
        its critical mass (2 in a corner, 3 on an edge, 4 inside), throwing one orb into each \
        neighbour and capturing it. Explosions chain. The last player with orbs wins.\n\n\
        CONTROLS:\n  Arrows / hjkl  Move cursor    Enter / Space  Place orb    Mouse  Click a cell\n  \
        R              Reset game     P              Pause          Q / Esc  Quit menu"
)]
pub struct Args {
    /// Number of players (2-4). Used directly with --no-menu, preselected otherwise.
    #[arg(short, long, default_value = "2", value_parser = clap::value_parser!(u8).range(2..=4))]
    pub players: u8,

    /// Skip main menu and start a game immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Game ticks per second. Each tick resolves at most one explosion of a chain.
    #[arg(long, default_value = "12.0", value_name = "RATE")]
    pub tick_rate: f64,

    /// Target render frames per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Animation speed multiplier (2.0 = twice as fast).
    #[arg(long, default_value = "1.0", value_name = "FACTOR")]
    pub animation_speed: f32,

    /// Disable explosion and orb-flight animations.
    #[arg(long)]
    pub no_animation: bool,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write a debug log of moves, explosions and wins to this file (filter with RUST_LOG).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<std::path::PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
