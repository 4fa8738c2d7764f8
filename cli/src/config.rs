use anyhow::{Context, Result};
use sapper_core::{CellCount, Coord, DisplayClass, GameConfig, MatchMode};
use serde::Deserialize;
use std::path::Path;

/// Settings read from a TOML file, every key optional.
///
/// ```toml
/// mode = "tournament"
/// display_width = 800
///
/// [board]
/// rows = 8
/// cols = 10
/// mine_capacity = 12
/// ```
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub mode: Option<MatchMode>,
    pub display_width: Option<u32>,
    pub board: Option<GameConfig>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Values given on the command line; they take precedence over the file.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Overrides {
    pub mode: Option<MatchMode>,
    pub display_width: Option<u32>,
    pub board: Option<(Coord, Coord, CellCount)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Asked interactively when unset.
    pub mode: Option<MatchMode>,
    pub board: GameConfig,
}

impl Settings {
    /// Explicit dimensions win over a display width, flags win over the file,
    /// and the mobile preset is the fallback.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let board = if let Some((rows, cols, mines)) = overrides.board {
            GameConfig::new(rows, cols, mines).with_context(|| {
                format!("cannot play {mines} mines on a {rows}x{cols} board")
            })?
        } else if let Some(width) = overrides.display_width {
            DisplayClass::from_width(width).config()
        } else if let Some(board) = file.board {
            board
        } else {
            file.display_width
                .map(|width| DisplayClass::from_width(width).config())
                .unwrap_or_default()
        };

        Ok(Self {
            mode: overrides.mode.or(file.mode),
            board,
        })
    }
}
