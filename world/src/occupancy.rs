//! Dense occupancy grids indexed by `row * columns + column`.

use vortex_defence_core::{EntityId, EntityKind, GridCoordinate, GridDimensions, GridError};

/// Entity registered in a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Occupant {
    id: EntityId,
    kind: EntityKind,
}

impl Occupant {
    /// Creates an occupant record.
    #[must_use]
    pub const fn new(id: EntityId, kind: EntityKind) -> Self {
        Self { id, kind }
    }

    /// Identifier of the entity.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Kind tag of the entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }
}

/// Grid holding at most one occupant per cell, used for path planning.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleOccupancyGrid {
    dimensions: GridDimensions,
    cells: Vec<Option<Occupant>>,
}

impl SingleOccupancyGrid {
    /// Creates an empty grid with the provided dimensions.
    #[must_use]
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![None; dimensions.cell_count()],
        }
    }

    /// Dimensions of the grid in cells.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Places an occupant into an empty cell.
    pub fn add_occupant(
        &mut self,
        occupant: Occupant,
        coordinate: GridCoordinate,
    ) -> Result<(), GridError> {
        let index = self.dimensions.index(coordinate)?;
        let slot = &mut self.cells[index];
        if slot.is_some() {
            return Err(GridError::CellOccupied { coordinate });
        }
        *slot = Some(occupant);
        Ok(())
    }

    /// Clears the cell if it holds the entity; otherwise does nothing.
    pub fn remove_occupant(
        &mut self,
        id: EntityId,
        coordinate: GridCoordinate,
    ) -> Result<(), GridError> {
        let index = self.dimensions.index(coordinate)?;
        let slot = &mut self.cells[index];
        if slot.is_some_and(|occupant| occupant.id() == id) {
            *slot = None;
        }
        Ok(())
    }

    /// Occupant stored in the cell, if any.
    pub fn occupant_at(&self, coordinate: GridCoordinate) -> Result<Option<Occupant>, GridError> {
        let index = self.dimensions.index(coordinate)?;
        Ok(self.cells[index])
    }

    /// Occupants of the cell as a slice holding zero or one entry.
    pub fn occupants_at(&self, coordinate: GridCoordinate) -> Result<&[Occupant], GridError> {
        let index = self.dimensions.index(coordinate)?;
        Ok(self.cells[index].as_slice())
    }

    /// Reports whether the cell holds no occupant.
    pub fn is_empty_at(&self, coordinate: GridCoordinate) -> Result<bool, GridError> {
        self.occupant_at(coordinate).map(|occupant| occupant.is_none())
    }

    /// Reports whether the coordinate lies outside the grid.
    #[must_use]
    pub const fn is_out_of_grid(&self, coordinate: GridCoordinate) -> bool {
        !self.dimensions.contains(coordinate)
    }
}

/// Grid holding an ordered list of occupants per cell, used for live simulation.
///
/// Turrets share a cell with their structure and ships may overlap while
/// passing each other, so cells keep every occupant in insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiOccupancyGrid {
    dimensions: GridDimensions,
    cells: Vec<Vec<Occupant>>,
}

impl MultiOccupancyGrid {
    /// Creates an empty grid with the provided dimensions.
    #[must_use]
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![Vec::new(); dimensions.cell_count()],
        }
    }

    /// Dimensions of the grid in cells.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Appends an occupant to the cell. Re-adding an entity already in the
    /// cell leaves it untouched.
    pub fn add_occupant(
        &mut self,
        occupant: Occupant,
        coordinate: GridCoordinate,
    ) -> Result<(), GridError> {
        let index = self.dimensions.index(coordinate)?;
        let cell = &mut self.cells[index];
        if !cell.iter().any(|existing| existing.id() == occupant.id()) {
            cell.push(occupant);
        }
        Ok(())
    }

    /// Removes the entity from the cell; a missing entity is a no-op.
    pub fn remove_occupant(
        &mut self,
        id: EntityId,
        coordinate: GridCoordinate,
    ) -> Result<(), GridError> {
        let index = self.dimensions.index(coordinate)?;
        self.cells[index].retain(|occupant| occupant.id() != id);
        Ok(())
    }

    /// Occupants of the cell in insertion order.
    pub fn occupants_at(&self, coordinate: GridCoordinate) -> Result<&[Occupant], GridError> {
        let index = self.dimensions.index(coordinate)?;
        Ok(&self.cells[index])
    }

    /// Reports whether the cell holds no occupant.
    pub fn is_empty_at(&self, coordinate: GridCoordinate) -> Result<bool, GridError> {
        self.occupants_at(coordinate).map(<[Occupant]>::is_empty)
    }

    /// Reports whether the coordinate lies outside the grid.
    #[must_use]
    pub const fn is_out_of_grid(&self, coordinate: GridCoordinate) -> bool {
        !self.dimensions.contains(coordinate)
    }

    /// Moves the entity from one cell to another.
    ///
    /// Both coordinates are validated before anything changes. An entity that
    /// is not registered in `from` is left alone.
    pub fn move_occupant(
        &mut self,
        id: EntityId,
        from: GridCoordinate,
        to: GridCoordinate,
    ) -> Result<(), GridError> {
        let from_index = self.dimensions.index(from)?;
        let to_index = self.dimensions.index(to)?;
        if from_index == to_index {
            return Ok(());
        }

        let source = &mut self.cells[from_index];
        let Some(position) = source.iter().position(|occupant| occupant.id() == id) else {
            return Ok(());
        };
        let occupant = source.remove(position);
        let destination = &mut self.cells[to_index];
        if !destination.iter().any(|existing| existing.id() == id) {
            destination.push(occupant);
        }
        Ok(())
    }

    /// Projects the grid onto a single-occupant grid for path planning.
    ///
    /// Each cell keeps its first occupant that blocks the path or marks a
    /// portal; ships and turrets are left out.
    #[must_use]
    pub fn planning_grid(&self) -> SingleOccupancyGrid {
        let cells = self
            .cells
            .iter()
            .map(|cell| {
                cell.iter()
                    .copied()
                    .find(|occupant| occupant.kind().blocks_path() || occupant.kind().is_portal())
            })
            .collect();
        SingleOccupancyGrid {
            dimensions: self.dimensions,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vortex_defence_core::{ShipKind, TurretKind};

    fn structure(id: u32) -> Occupant {
        Occupant::new(EntityId::new(id), EntityKind::Structure)
    }

    fn ship(id: u32) -> Occupant {
        Occupant::new(EntityId::new(id), EntityKind::Ship(ShipKind::SmallScout))
    }

    #[test]
    fn single_grid_refuses_second_occupant() {
        let mut grid = SingleOccupancyGrid::new(GridDimensions::default());
        let cell = GridCoordinate::new(4, 3);
        grid.add_occupant(structure(1), cell).expect("empty cell");

        let error = grid
            .add_occupant(structure(2), cell)
            .expect_err("cell already holds an occupant");
        assert_eq!(error, GridError::CellOccupied { coordinate: cell });
        assert_eq!(grid.occupants_at(cell).expect("in range"), &[structure(1)]);
    }

    #[test]
    fn out_of_range_coordinates_fail_every_operation() {
        let mut grid = SingleOccupancyGrid::new(GridDimensions::new(3, 3));
        let outside = GridCoordinate::new(3, 0);
        assert!(grid.is_out_of_grid(outside));
        assert!(grid.add_occupant(structure(1), outside).is_err());
        assert!(grid.remove_occupant(EntityId::new(1), outside).is_err());
        assert!(grid.is_empty_at(outside).is_err());

        let mut multi = MultiOccupancyGrid::new(GridDimensions::new(3, 3));
        assert!(multi.add_occupant(ship(1), outside).is_err());
        assert!(multi.occupants_at(outside).is_err());
        assert!(multi
            .move_occupant(EntityId::new(1), GridCoordinate::new(0, 0), outside)
            .is_err());
    }

    #[test]
    fn removing_missing_occupant_is_noop() {
        let mut grid = SingleOccupancyGrid::new(GridDimensions::default());
        let cell = GridCoordinate::new(1, 1);
        grid.remove_occupant(EntityId::new(7), cell)
            .expect("empty removal succeeds");
        grid.add_occupant(structure(1), cell).expect("empty cell");
        grid.remove_occupant(EntityId::new(7), cell)
            .expect("foreign removal succeeds");
        assert_eq!(grid.is_empty_at(cell), Ok(false));
    }

    #[test]
    fn multi_grid_keeps_insertion_order() {
        let mut grid = MultiOccupancyGrid::new(GridDimensions::default());
        let cell = GridCoordinate::new(2, 2);
        let turret = Occupant::new(EntityId::new(2), EntityKind::Turret(TurretKind::DoubleGuns));
        grid.add_occupant(structure(1), cell).expect("in range");
        grid.add_occupant(turret, cell).expect("in range");
        assert_eq!(grid.occupants_at(cell).expect("in range"), &[structure(1), turret]);
    }

    #[test]
    fn move_occupant_relocates_entity() {
        let mut grid = MultiOccupancyGrid::new(GridDimensions::default());
        let from = GridCoordinate::new(0, 0);
        let to = GridCoordinate::new(1, 0);
        grid.add_occupant(ship(5), from).expect("in range");

        grid.move_occupant(EntityId::new(5), from, to)
            .expect("both cells in range");

        assert_eq!(grid.is_empty_at(from), Ok(true));
        assert_eq!(grid.occupants_at(to).expect("in range"), &[ship(5)]);
    }

    #[test]
    fn planning_grid_keeps_only_blocking_and_portal_occupants() {
        let mut grid = MultiOccupancyGrid::new(GridDimensions::default());
        let portal = Occupant::new(EntityId::new(1), EntityKind::Vortex);
        grid.add_occupant(portal, GridCoordinate::new(0, 0))
            .expect("in range");
        grid.add_occupant(ship(2), GridCoordinate::new(0, 0))
            .expect("in range");
        grid.add_occupant(ship(3), GridCoordinate::new(5, 5))
            .expect("in range");
        grid.add_occupant(structure(4), GridCoordinate::new(6, 5))
            .expect("in range");

        let planning = grid.planning_grid();
        assert_eq!(
            planning.occupant_at(GridCoordinate::new(0, 0)),
            Ok(Some(portal))
        );
        assert_eq!(planning.occupant_at(GridCoordinate::new(5, 5)), Ok(None));
        assert_eq!(
            planning.occupant_at(GridCoordinate::new(6, 5)),
            Ok(Some(structure(4)))
        );
    }
}
