//! Validated routes through the grid.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::GridCoordinate;

/// Reasons a list of coordinates cannot form a [`Path`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathError {
    /// A path must hold at least its start coordinate.
    #[error("a path requires at least one coordinate")]
    Empty,
    /// The coordinate appears more than once.
    #[error("coordinate {coordinate} appears more than once")]
    Repeated {
        /// Coordinate that was visited twice.
        coordinate: GridCoordinate,
    },
    /// Two consecutive coordinates do not share an edge.
    #[error("{from} and {to} are not orthogonal neighbours")]
    Discontinuous {
        /// Coordinate preceding the gap.
        from: GridCoordinate,
        /// Coordinate following the gap.
        to: GridCoordinate,
    },
}

/// Ordered, start-to-end inclusive route of grid coordinates.
///
/// Every path is non-empty, free of repeated coordinates, and contiguous.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<GridCoordinate>", into = "Vec<GridCoordinate>")]
pub struct Path {
    coordinates: Vec<GridCoordinate>,
}

impl Path {
    /// Validates the coordinates and wraps them into a path.
    pub fn from_coordinates(coordinates: Vec<GridCoordinate>) -> Result<Self, PathError> {
        if coordinates.is_empty() {
            return Err(PathError::Empty);
        }

        let mut seen = HashSet::with_capacity(coordinates.len());
        for coordinate in &coordinates {
            if !seen.insert(*coordinate) {
                return Err(PathError::Repeated {
                    coordinate: *coordinate,
                });
            }
        }

        for pair in coordinates.windows(2) {
            if !pair[0].is_neighbor_of(pair[1]) {
                return Err(PathError::Discontinuous {
                    from: pair[0],
                    to: pair[1],
                });
            }
        }

        Ok(Self { coordinates })
    }

    /// Path that starts and ends on the same coordinate.
    #[must_use]
    pub fn single(coordinate: GridCoordinate) -> Self {
        Self {
            coordinates: vec![coordinate],
        }
    }

    /// Coordinates of the path from start to end.
    #[must_use]
    pub fn coordinates(&self) -> &[GridCoordinate] {
        &self.coordinates
    }

    /// Number of coordinates, including both endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Paths are never empty; provided for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Number of moves required to walk the path.
    #[must_use]
    pub fn moves(&self) -> usize {
        self.coordinates.len().saturating_sub(1)
    }

    /// First coordinate.
    #[must_use]
    pub fn start(&self) -> GridCoordinate {
        self.coordinates[0]
    }

    /// Last coordinate.
    #[must_use]
    pub fn end(&self) -> GridCoordinate {
        self.coordinates[self.coordinates.len() - 1]
    }

    /// Coordinate at the provided waypoint index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<GridCoordinate> {
        self.coordinates.get(index).copied()
    }

    /// Reports whether the path visits the coordinate.
    #[must_use]
    pub fn contains(&self, coordinate: GridCoordinate) -> bool {
        self.coordinates.contains(&coordinate)
    }
}

impl TryFrom<Vec<GridCoordinate>> for Path {
    type Error = PathError;

    fn try_from(value: Vec<GridCoordinate>) -> Result<Self, Self::Error> {
        Self::from_coordinates(value)
    }
}

impl From<Path> for Vec<GridCoordinate> {
    fn from(value: Path) -> Self {
        value.coordinates
    }
}
