//! Level descriptions loaded from TOML.

use std::{collections::HashSet, fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use thiserror::Error;
use vortex_defence_core::{
    GridCoordinate, GridDimensions, GridLayout, ShipKind, TurretKind, Wave, WaveElement,
    DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_TILE_SIZE,
};
use vortex_defence_world::{DEFAULT_DESTINATION, DEFAULT_ORIGIN};

/// Level file format understood by this build.
pub const SUPPORTED_LEVEL_VERSION: u32 = 1;

/// Turret requested by a level.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurretPlacement {
    /// Type of turret to mount.
    pub kind: TurretKind,
    /// Cell holding the supporting structure.
    pub cell: GridCoordinate,
}

/// Ship released by a level's wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaveEntry {
    /// Type of ship to spawn.
    pub ship: ShipKind,
    /// Milliseconds to wait after the previous release.
    #[serde(default)]
    pub delay_ms: u64,
}

/// Complete description of a playable level.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelConfig {
    /// Format version of the level file.
    pub version: u32,
    /// Number of grid columns.
    #[serde(default = "default_columns")]
    pub columns: u32,
    /// Number of grid rows.
    #[serde(default = "default_rows")]
    pub rows: u32,
    /// Side length of a tile in pixels.
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// Cell of the portal ships emerge from.
    #[serde(default = "default_origin")]
    pub origin: GridCoordinate,
    /// Cell of the portal ships try to reach.
    #[serde(default = "default_destination")]
    pub destination: GridCoordinate,
    /// Structures built before the attack starts, in placement order.
    #[serde(default)]
    pub structures: Vec<GridCoordinate>,
    /// Turrets mounted on the structures.
    #[serde(default)]
    pub turrets: Vec<TurretPlacement>,
    /// Ships released during the attack.
    #[serde(default)]
    pub wave: Vec<WaveEntry>,
}

/// Reasons a parsed level is unusable.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum LevelConfigError {
    /// The grid has no cells.
    #[error("grid must have at least one column and one row, got {columns}x{rows}")]
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// Tiles must have a positive finite size.
    #[error("tile size must be a positive number, got {0}")]
    InvalidTileSize(f32),
    /// A coordinate in the level lies outside the grid.
    #[error("{what} at {coordinate} lies outside the grid")]
    OutOfBounds {
        /// Element of the level that is misplaced.
        what: &'static str,
        /// Offending coordinate.
        coordinate: GridCoordinate,
    },
    /// Both portals share a cell.
    #[error("origin and destination portals share cell {0}")]
    SharedPortal(GridCoordinate),
    /// A structure is listed twice.
    #[error("structure at {0} is listed more than once")]
    DuplicateStructure(GridCoordinate),
}

impl LevelConfig {
    /// Reads and validates a level from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read level file at {}", path.display()))?;
        Self::parse(&contents)
    }

    /// Parses and validates a level from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let level: Self = toml::from_str(contents).context("failed to parse level toml contents")?;
        if level.version != SUPPORTED_LEVEL_VERSION {
            bail!(
                "unsupported level version {}; expected {}",
                level.version,
                SUPPORTED_LEVEL_VERSION
            );
        }
        level.validate()?;
        Ok(level)
    }

    /// Checks the level for contradictions that the world would reject late.
    pub fn validate(&self) -> Result<(), LevelConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(LevelConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(LevelConfigError::InvalidTileSize(self.tile_size));
        }

        let dimensions = self.dimensions();
        let check = |what: &'static str, coordinate: GridCoordinate| {
            if dimensions.contains(coordinate) {
                Ok(())
            } else {
                Err(LevelConfigError::OutOfBounds { what, coordinate })
            }
        };
        check("origin portal", self.origin)?;
        check("destination portal", self.destination)?;
        if self.origin == self.destination {
            return Err(LevelConfigError::SharedPortal(self.origin));
        }

        let mut seen = HashSet::new();
        for structure in &self.structures {
            check("structure", *structure)?;
            if !seen.insert(*structure) {
                return Err(LevelConfigError::DuplicateStructure(*structure));
            }
        }
        for turret in &self.turrets {
            check("turret", turret.cell)?;
        }
        Ok(())
    }

    /// Grid size in cells.
    #[must_use]
    pub fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.columns, self.rows)
    }

    /// Pixel layout of the level's grid.
    #[must_use]
    pub fn layout(&self) -> GridLayout {
        GridLayout::new(self.dimensions(), self.tile_size, 0.0, 0.0)
    }

    /// Wave released during the attack.
    #[must_use]
    pub fn wave(&self) -> Wave {
        Wave::new(
            self.wave
                .iter()
                .map(|entry| WaveElement {
                    ship: entry.ship,
                    delay_before_creation: Duration::from_millis(entry.delay_ms),
                })
                .collect(),
        )
    }
}

impl Default for LevelConfig {
    /// Open field with three scouts released back to back.
    fn default() -> Self {
        Self {
            version: SUPPORTED_LEVEL_VERSION,
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            tile_size: DEFAULT_TILE_SIZE,
            origin: DEFAULT_ORIGIN,
            destination: DEFAULT_DESTINATION,
            structures: Vec::new(),
            turrets: Vec::new(),
            wave: vec![
                WaveEntry {
                    ship: ShipKind::SmallScout,
                    delay_ms: 0,
                };
                3
            ],
        }
    }
}

fn default_columns() -> u32 {
    DEFAULT_COLUMNS
}

fn default_rows() -> u32 {
    DEFAULT_ROWS
}

fn default_tile_size() -> f32 {
    DEFAULT_TILE_SIZE
}

fn default_origin() -> GridCoordinate {
    DEFAULT_ORIGIN
}

fn default_destination() -> GridCoordinate {
    DEFAULT_DESTINATION
}
