//! Grid addresses, pixel positions and the conversions between them.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::GridError;

/// Number of columns in the default playing field.
pub const DEFAULT_COLUMNS: u32 = 12;
/// Number of rows in the default playing field.
pub const DEFAULT_ROWS: u32 = 7;
/// Side length of a default tile measured in pixels.
pub const DEFAULT_TILE_SIZE: f32 = 64.0;

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoordinate {
    column: u32,
    row: u32,
}

impl GridCoordinate {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Cell directly to the left, absent on column zero.
    #[must_use]
    pub fn left(self) -> Option<Self> {
        self.column
            .checked_sub(1)
            .map(|column| Self::new(column, self.row))
    }

    /// Cell directly to the right.
    #[must_use]
    pub fn right(self) -> Option<Self> {
        self.column
            .checked_add(1)
            .map(|column| Self::new(column, self.row))
    }

    /// Cell directly above, absent on row zero.
    #[must_use]
    pub fn top(self) -> Option<Self> {
        self.row.checked_sub(1).map(|row| Self::new(self.column, row))
    }

    /// Cell directly below.
    #[must_use]
    pub fn bottom(self) -> Option<Self> {
        self.row.checked_add(1).map(|row| Self::new(self.column, row))
    }

    /// Orthogonal neighbours enumerated left, right, top, bottom.
    ///
    /// The order is part of the path finder's contract: it decides which of
    /// several equally short routes is returned.
    pub fn neighbors(self) -> impl Iterator<Item = GridCoordinate> {
        [self.left(), self.right(), self.top(), self.bottom()]
            .into_iter()
            .flatten()
    }

    /// Reports whether the two cells share an edge.
    #[must_use]
    pub fn is_neighbor_of(self, other: GridCoordinate) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCoordinate) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.column, self.row)
    }
}

/// Pixel-space location of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalPosition {
    x: f32,
    y: f32,
}

impl PhysicalPosition {
    /// Creates a position from pixel coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal pixel coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical pixel coordinate, growing downward.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Converts the position into a vector for arithmetic.
    #[must_use]
    pub const fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Straight-line distance to another position.
    #[must_use]
    pub fn distance_to(self, other: PhysicalPosition) -> f32 {
        self.to_vec2().distance(other.to_vec2())
    }

    /// Returns the position displaced by the provided vector.
    #[must_use]
    pub fn offset_by(self, delta: Vec2) -> Self {
        Self::from(self.to_vec2() + delta)
    }
}

impl From<Vec2> for PhysicalPosition {
    fn from(value: Vec2) -> Self {
        Self::new(value.x, value.y)
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalRect {
    min: Vec2,
    max: Vec2,
}

impl PhysicalRect {
    /// Builds a rectangle of the given size centred on `center`.
    #[must_use]
    pub fn centered(center: PhysicalPosition, width: f32, height: f32) -> Self {
        let half = Vec2::new(width / 2.0, height / 2.0);
        let center = center.to_vec2();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Builds a rectangle from its top-left corner and size.
    #[must_use]
    pub fn from_origin(origin: PhysicalPosition, width: f32, height: f32) -> Self {
        let min = origin.to_vec2();
        Self {
            min,
            max: min + Vec2::new(width, height),
        }
    }

    /// Reports whether the position lies inside the rectangle; the right and
    /// bottom edges are exclusive.
    #[must_use]
    pub fn contains(&self, position: PhysicalPosition) -> bool {
        position.x() >= self.min.x
            && position.y() >= self.min.y
            && position.x() < self.max.x
            && position.y() < self.max.y
    }

    /// Reports whether the two rectangles overlap with a non-zero area.
    #[must_use]
    pub fn intersects(&self, other: &PhysicalRect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Fixed dimensions of a grid measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    columns: u32,
    rows: u32,
}

impl GridDimensions {
    /// Creates grid dimensions from explicit column and row counts.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(0)
    }

    /// Reports whether the coordinate lies within `[0, columns) × [0, rows)`.
    #[must_use]
    pub const fn contains(&self, coordinate: GridCoordinate) -> bool {
        coordinate.column() < self.columns && coordinate.row() < self.rows
    }

    /// Row-major offset of the coordinate, or an out-of-range error.
    pub fn index(&self, coordinate: GridCoordinate) -> Result<usize, GridError> {
        if !self.contains(coordinate) {
            return Err(self.out_of_range(coordinate));
        }

        let width = usize::try_from(self.columns).map_err(|_| self.out_of_range(coordinate))?;
        let row = usize::try_from(coordinate.row()).map_err(|_| self.out_of_range(coordinate))?;
        let column =
            usize::try_from(coordinate.column()).map_err(|_| self.out_of_range(coordinate))?;
        Ok(row * width + column)
    }

    /// Builds the error reported for a coordinate outside these dimensions.
    #[must_use]
    pub const fn out_of_range(&self, coordinate: GridCoordinate) -> GridError {
        GridError::OutOfRange {
            coordinate,
            columns: self.columns,
            rows: self.rows,
        }
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS, DEFAULT_ROWS)
    }
}

/// Maps grid cells to pixels using a tile size and the grid's pixel offset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    dimensions: GridDimensions,
    tile_size: f32,
    x_offset: f32,
    y_offset: f32,
}

impl GridLayout {
    /// Creates a layout for a grid drawn with its top-left corner at the offset.
    #[must_use]
    pub const fn new(dimensions: GridDimensions, tile_size: f32, x_offset: f32, y_offset: f32) -> Self {
        Self {
            dimensions,
            tile_size,
            x_offset,
            y_offset,
        }
    }

    /// Cell dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Side length of a square tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Top-left pixel of the cell.
    pub fn top_left_pixel(&self, coordinate: GridCoordinate) -> Result<PhysicalPosition, GridError> {
        if !self.dimensions.contains(coordinate) {
            return Err(self.dimensions.out_of_range(coordinate));
        }

        Ok(PhysicalPosition::new(
            coordinate.column() as f32 * self.tile_size + self.x_offset,
            coordinate.row() as f32 * self.tile_size + self.y_offset,
        ))
    }

    /// Centre pixel of the cell.
    pub fn center_pixel(&self, coordinate: GridCoordinate) -> Result<PhysicalPosition, GridError> {
        let half = self.tile_size / 2.0;
        self.top_left_pixel(coordinate)
            .map(|corner| corner.offset_by(Vec2::splat(half)))
    }

    /// Centre pixel of a coordinate already known to lie inside the grid.
    ///
    /// The projection is not bounds checked; cells outside the grid map onto
    /// the plane beyond its edges.
    #[must_use]
    pub fn cell_center(&self, coordinate: GridCoordinate) -> PhysicalPosition {
        PhysicalPosition::new(
            (coordinate.column() as f32 + 0.5) * self.tile_size + self.x_offset,
            (coordinate.row() as f32 + 0.5) * self.tile_size + self.y_offset,
        )
    }

    /// Cell containing the pixel, absent when the pixel is outside the grid.
    #[must_use]
    pub fn coordinate_at(&self, position: PhysicalPosition) -> Option<GridCoordinate> {
        if self.tile_size <= 0.0 {
            return None;
        }

        let column = ((position.x() - self.x_offset) / self.tile_size).floor();
        let row = ((position.y() - self.y_offset) / self.tile_size).floor();
        if column < 0.0 || row < 0.0 {
            return None;
        }

        let coordinate = GridCoordinate::new(column as u32, row as u32);
        self.dimensions.contains(coordinate).then_some(coordinate)
    }

    /// Pixel rectangle covered by the whole grid.
    #[must_use]
    pub fn bounds(&self) -> PhysicalRect {
        PhysicalRect::from_origin(
            PhysicalPosition::new(self.x_offset, self.y_offset),
            self.dimensions.columns() as f32 * self.tile_size,
            self.dimensions.rows() as f32 * self.tile_size,
        )
    }

    /// Reports whether the pixel lies outside the grid's physical bounds.
    #[must_use]
    pub fn is_outside(&self, position: PhysicalPosition) -> bool {
        !self.bounds().contains(position)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(GridDimensions::default(), DEFAULT_TILE_SIZE, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_follow_left_right_top_bottom_order() {
        let cell = GridCoordinate::new(3, 2);
        let neighbors: Vec<_> = cell.neighbors().collect();
        assert_eq!(
            neighbors,
            vec![
                GridCoordinate::new(2, 2),
                GridCoordinate::new(4, 2),
                GridCoordinate::new(3, 1),
                GridCoordinate::new(3, 3),
            ]
        );
    }

    #[test]
    fn corner_cell_omits_underflowing_neighbors() {
        let neighbors: Vec<_> = GridCoordinate::new(0, 0).neighbors().collect();
        assert_eq!(
            neighbors,
            vec![GridCoordinate::new(1, 0), GridCoordinate::new(0, 1)]
        );
    }

    #[test]
    fn cell_center_matches_checked_projection() {
        let layout = GridLayout::new(GridDimensions::new(4, 3), 10.0, 5.0, 7.0);
        let cell = GridCoordinate::new(3, 2);
        assert_eq!(layout.center_pixel(cell), Ok(layout.cell_center(cell)));
        assert_eq!(layout.cell_center(cell), PhysicalPosition::new(40.0, 32.0));
    }

    #[test]
    fn center_pixel_respects_offset() {
        let layout = GridLayout::new(GridDimensions::new(4, 4), 32.0, 10.0, 20.0);
        let center = layout
            .center_pixel(GridCoordinate::new(1, 2))
            .expect("inside grid");
        assert_eq!(center, PhysicalPosition::new(58.0, 100.0));
        let corner = layout
            .top_left_pixel(GridCoordinate::new(1, 2))
            .expect("inside grid");
        assert_eq!(corner, PhysicalPosition::new(42.0, 84.0));
    }

    #[test]
    fn pixel_conversion_rejects_cells_outside_grid() {
        let layout = GridLayout::default();
        let error = layout
            .center_pixel(GridCoordinate::new(12, 0))
            .expect_err("column 12 lies outside a 12 column grid");
        assert_eq!(
            error,
            GridError::OutOfRange {
                coordinate: GridCoordinate::new(12, 0),
                columns: 12,
                rows: 7,
            }
        );
    }

    #[test]
    fn coordinate_at_maps_pixels_back_to_cells() {
        let layout = GridLayout::new(GridDimensions::new(12, 7), 64.0, 8.0, 0.0);
        assert_eq!(
            layout.coordinate_at(PhysicalPosition::new(8.0, 0.0)),
            Some(GridCoordinate::new(0, 0))
        );
        assert_eq!(
            layout.coordinate_at(PhysicalPosition::new(135.9, 127.0)),
            Some(GridCoordinate::new(1, 1))
        );
        assert_eq!(layout.coordinate_at(PhysicalPosition::new(7.0, 10.0)), None);
        assert_eq!(
            layout.coordinate_at(PhysicalPosition::new(8.0 + 12.0 * 64.0, 10.0)),
            None
        );
    }

    #[test]
    fn bounds_exclude_far_edges() {
        let layout = GridLayout::default();
        assert!(!layout.is_outside(PhysicalPosition::new(0.0, 0.0)));
        assert!(!layout.is_outside(PhysicalPosition::new(767.9, 447.9)));
        assert!(layout.is_outside(PhysicalPosition::new(768.0, 10.0)));
        assert!(layout.is_outside(PhysicalPosition::new(10.0, -0.1)));
    }

    #[test]
    fn rectangles_intersect_only_when_overlapping() {
        let a = PhysicalRect::centered(PhysicalPosition::new(10.0, 10.0), 10.0, 10.0);
        let b = PhysicalRect::centered(PhysicalPosition::new(18.0, 10.0), 10.0, 10.0);
        let c = PhysicalRect::centered(PhysicalPosition::new(20.0, 10.0), 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn dimensions_index_is_row_major() {
        let dimensions = GridDimensions::new(12, 7);
        assert_eq!(dimensions.index(GridCoordinate::new(3, 2)), Ok(27));
        assert_eq!(dimensions.index(GridCoordinate::new(11, 6)), Ok(83));
        assert!(dimensions.index(GridCoordinate::new(0, 7)).is_err());
    }
}
