#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder-mode system responsible for emitting structure and turret commands.

use vortex_defence_core::{
    Command, EntityId, EntityKind, Event, GridCoordinate, PlayMode, TurretKind,
};

/// Construction tool currently selected by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildTool {
    /// Toggles structures on empty cells.
    Structure,
    /// Mounts turrets of the given kind on bare structures.
    Turret(TurretKind),
}

/// What a grid cell holds, as far as construction is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellContents {
    /// Nothing occupies the cell.
    Empty,
    /// A lone structure.
    Structure,
    /// A structure carrying a turret.
    Turret {
        /// Identifier of the mounted turret.
        turret: EntityId,
    },
    /// Portals, ships, or anything else construction may not touch.
    Other,
}

impl CellContents {
    /// Classifies a cell from the identifiers and kinds of its occupants.
    #[must_use]
    pub fn classify<I>(occupants: I) -> Self
    where
        I: IntoIterator<Item = (EntityId, EntityKind)>,
    {
        let occupants: Vec<(EntityId, EntityKind)> = occupants.into_iter().collect();
        match occupants.as_slice() {
            [] => Self::Empty,
            [(_, EntityKind::Structure)] => Self::Structure,
            [(_, EntityKind::Structure), (turret, EntityKind::Turret(_))]
            | [(turret, EntityKind::Turret(_)), (_, EntityKind::Structure)] => Self::Turret {
                turret: *turret,
            },
            _ => Self::Other,
        }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Indicates whether the player applied the selected tool on this frame.
    pub confirm_action: bool,
    /// Indicates whether the player requested turret removal on this frame.
    pub remove_action: bool,
    /// Cell currently hovered by the cursor in builder mode.
    pub cursor_cell: Option<GridCoordinate>,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        confirm_action: bool,
        remove_action: bool,
        cursor_cell: Option<GridCoordinate>,
    ) -> Self {
        Self {
            confirm_action,
            remove_action,
            cursor_cell,
        }
    }
}

/// Builder-mode system that translates the selected tool and input into commands.
#[derive(Debug, Clone)]
pub struct Builder {
    play_mode: PlayMode,
    tool: BuildTool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a new builder system with the structure tool selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            play_mode: PlayMode::Attack,
            tool: BuildTool::Structure,
        }
    }

    /// Selects the tool applied on subsequent confirm actions.
    pub fn select_tool(&mut self, tool: BuildTool) {
        self.tool = tool;
    }

    /// Consumes world events and adapter-derived input to emit builder commands.
    ///
    /// The `contents_at` closure should report what the world's occupancy
    /// query holds at the hovered cell. Cells outside the grid are expected
    /// to be filtered by the adapter before they reach `cursor_cell`.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        mut contents_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(GridCoordinate) -> CellContents,
    {
        for event in events {
            if let Event::PlayModeChanged { mode } = event {
                self.play_mode = *mode;
            }
        }

        if self.play_mode != PlayMode::Builder {
            return;
        }

        let Some(cell) = input.cursor_cell else {
            return;
        };

        if input.confirm_action {
            match (self.tool, contents_at(cell)) {
                (BuildTool::Structure, CellContents::Empty) => {
                    out.push(Command::PlaceStructure { cell });
                }
                (BuildTool::Structure, CellContents::Structure) => {
                    out.push(Command::RemoveStructure { cell });
                }
                (BuildTool::Turret(kind), CellContents::Structure) => {
                    out.push(Command::PlaceTurret { kind, cell });
                }
                _ => {}
            }
        }

        if input.remove_action {
            if let CellContents::Turret { turret } = contents_at(cell) {
                out.push(Command::RemoveTurret { turret });
            }
        }
    }
}
