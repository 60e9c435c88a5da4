//! Shortest-route search over the planning grid.

use std::collections::VecDeque;

use vortex_defence_core::{GridCoordinate, GridDimensions, GridError, Path};

use crate::occupancy::SingleOccupancyGrid;

const UNREACHABLE: u32 = u32::MAX;

/// Finds the shortest contiguous route from `start` to `end` that avoids
/// occupied cells.
///
/// Cells holding a portal remain traversable, as does the start cell itself.
/// When several routes share the minimal length, each step prefers the
/// neighbour enumerated first in the order left, right, top, bottom.
///
/// Returns `Ok(None)` when the end cannot be reached and an error when either
/// endpoint lies outside the grid.
pub fn find_shortest_path(
    grid: &SingleOccupancyGrid,
    start: GridCoordinate,
    end: GridCoordinate,
) -> Result<Option<Path>, GridError> {
    let dimensions = grid.dimensions();
    let start_index = dimensions.index(start)?;
    let _ = dimensions.index(end)?;

    if start == end {
        return Ok(Some(Path::single(start)));
    }

    let field = DistanceField::towards(grid, start, end)?;
    if field.distances[start_index] == UNREACHABLE {
        return Ok(None);
    }

    let mut route = Vec::with_capacity(field.distances[start_index] as usize + 1);
    let mut current = start;
    route.push(current);
    while current != end {
        let remaining = field.distance(current);
        let next = in_bounds_neighbors(dimensions, current)
            .find(|neighbor| field.distance(*neighbor).checked_add(1) == Some(remaining));
        let Some(next) = next else {
            return Ok(None);
        };
        route.push(next);
        current = next;
    }

    Ok(Path::from_coordinates(route).ok())
}

/// Reverse breadth-first distances to the end cell, stored row-major.
struct DistanceField {
    dimensions: GridDimensions,
    distances: Vec<u32>,
}

impl DistanceField {
    fn towards(
        grid: &SingleOccupancyGrid,
        start: GridCoordinate,
        end: GridCoordinate,
    ) -> Result<Self, GridError> {
        let dimensions = grid.dimensions();
        let mut distances = vec![UNREACHABLE; dimensions.cell_count()];
        let mut queue = VecDeque::new();

        if is_traversable(grid, end)? {
            distances[dimensions.index(end)?] = 0;
            queue.push_back(end);
        }

        while let Some(cell) = queue.pop_front() {
            let next_distance = distances[dimensions.index(cell)?] + 1;
            for neighbor in in_bounds_neighbors(dimensions, cell) {
                let index = dimensions.index(neighbor)?;
                if distances[index] != UNREACHABLE {
                    continue;
                }

                if neighbor == start {
                    // The route begins here; nothing routes through it.
                    distances[index] = next_distance;
                    continue;
                }

                if !is_traversable(grid, neighbor)? {
                    continue;
                }

                distances[index] = next_distance;
                queue.push_back(neighbor);
            }
        }

        Ok(Self {
            dimensions,
            distances,
        })
    }

    fn distance(&self, cell: GridCoordinate) -> u32 {
        self.dimensions
            .index(cell)
            .ok()
            .and_then(|index| self.distances.get(index).copied())
            .unwrap_or(UNREACHABLE)
    }
}

fn is_traversable(grid: &SingleOccupancyGrid, cell: GridCoordinate) -> Result<bool, GridError> {
    Ok(grid
        .occupant_at(cell)?
        .map_or(true, |occupant| occupant.kind().is_portal()))
}

fn in_bounds_neighbors(
    dimensions: GridDimensions,
    cell: GridCoordinate,
) -> impl Iterator<Item = GridCoordinate> {
    cell.neighbors()
        .filter(move |neighbor| dimensions.contains(*neighbor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::Occupant;
    use vortex_defence_core::{EntityId, EntityKind};

    fn grid_with_structures(cells: &[(u32, u32)]) -> SingleOccupancyGrid {
        let mut grid = SingleOccupancyGrid::new(GridDimensions::default());
        for (offset, (column, row)) in cells.iter().enumerate() {
            let occupant = Occupant::new(EntityId::new(offset as u32 + 100), EntityKind::Structure);
            grid.add_occupant(occupant, GridCoordinate::new(*column, *row))
                .expect("structure inside grid");
        }
        grid
    }

    #[test]
    fn start_equal_to_end_yields_zero_moves() {
        let grid = grid_with_structures(&[]);
        let cell = GridCoordinate::new(3, 3);
        let path = find_shortest_path(&grid, cell, cell)
            .expect("in range")
            .expect("trivially reachable");
        assert_eq!(path.moves(), 0);
    }

    #[test]
    fn out_of_range_endpoints_are_errors() {
        let grid = grid_with_structures(&[]);
        let inside = GridCoordinate::new(0, 0);
        let outside = GridCoordinate::new(0, 7);
        assert!(find_shortest_path(&grid, inside, outside).is_err());
        assert!(find_shortest_path(&grid, outside, inside).is_err());
    }

    #[test]
    fn ties_prefer_left_then_right_then_top_then_bottom() {
        let grid = grid_with_structures(&[]);
        let path = find_shortest_path(&grid, GridCoordinate::new(2, 2), GridCoordinate::new(3, 3))
            .expect("in range")
            .expect("reachable");
        assert_eq!(
            path.coordinates(),
            &[
                GridCoordinate::new(2, 2),
                GridCoordinate::new(3, 2),
                GridCoordinate::new(3, 3),
            ]
        );

        let path = find_shortest_path(&grid, GridCoordinate::new(3, 3), GridCoordinate::new(2, 2))
            .expect("in range")
            .expect("reachable");
        assert_eq!(
            path.coordinates(),
            &[
                GridCoordinate::new(3, 3),
                GridCoordinate::new(2, 3),
                GridCoordinate::new(2, 2),
            ]
        );
    }

    #[test]
    fn walled_off_end_is_unreachable() {
        let grid = grid_with_structures(&[(10, 6), (11, 5)]);
        let result = find_shortest_path(&grid, GridCoordinate::new(0, 0), GridCoordinate::new(11, 6))
            .expect("in range");
        assert!(result.is_none());
    }

    #[test]
    fn occupied_end_is_unreachable() {
        let grid = grid_with_structures(&[(5, 5)]);
        let result = find_shortest_path(&grid, GridCoordinate::new(0, 0), GridCoordinate::new(5, 5))
            .expect("in range");
        assert!(result.is_none());
    }
}
