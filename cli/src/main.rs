use anyhow::Result;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::Verbosity;
use sapper_core::{CellCount, Coord, MatchMode};
use std::path::PathBuf;

mod config;
mod render;
mod session;

use config::{FileConfig, Overrides, Settings};
use session::Session;

/// Two-player hot-seat minesweeper: one player lays the mines, the other clears them.
#[derive(Parser, Debug)]
#[command(name = "sapper", version, long_about = None)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity,

    /// TOML file with `mode`, `display_width` and a `[board]` table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Match mode; asked interactively when omitted
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Pick the board preset for a display of this width in pixels
    #[arg(long, conflicts_with = "rows")]
    display_width: Option<u32>,

    /// Board rows, together with `--cols` and `--mines`
    #[arg(long, requires_all = ["cols", "mines"])]
    rows: Option<Coord>,

    #[arg(long, requires_all = ["rows", "mines"])]
    cols: Option<Coord>,

    /// Mines the placing player has to lay
    #[arg(long, requires_all = ["rows", "cols"])]
    mines: Option<CellCount>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Classic,
    Tournament,
}

impl From<ModeArg> for MatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Classic => MatchMode::Classic,
            ModeArg::Tournament => MatchMode::Tournament,
        }
    }
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let board = match (self.rows, self.cols, self.mines) {
            (Some(rows), Some(cols), Some(mines)) => Some((rows, cols, mines)),
            _ => None,
        };
        Overrides {
            mode: self.mode.map(MatchMode::from),
            display_width: self.display_width,
            board,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbose.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(file, cli.overrides())?;
    log::debug!("Starting with {:?}", settings);

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    Session::new(settings, stdin, stdout).run()
}
