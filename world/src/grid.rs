//! Fixed placement grid exposing cell identity and derived world geometry.

use gridkeep_core::{CellCoord, WorldPoint};

/// Finite set of addressable placement cells laid out on the ground plane.
///
/// The grid is passive: it produces cell geometry and identity but owns no
/// placement state. World positions derive from cell coordinates through a
/// fixed affine mapping that centers the grid on the world origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cell_length: f32,
}

impl Grid {
    /// Creates a new grid description.
    #[must_use]
    pub(crate) const fn new(columns: u32, rows: u32, cell_length: f32) -> Self {
        Self {
            columns,
            rows,
            cell_length,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell expressed in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Total depth of the grid measured in world units.
    #[must_use]
    pub fn depth(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Reports whether the coordinate addresses a cell inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Ground-plane center of the provided cell.
    ///
    /// Columns map to x and rows to z, each shifted so the whole grid is
    /// centered on the world origin.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> WorldPoint {
        WorldPoint::new(
            self.axis_center(cell.column(), self.columns),
            0.0,
            self.axis_center(cell.row(), self.rows),
        )
    }

    fn axis_center(&self, index: u32, extent: u32) -> f32 {
        let half_span = (extent.saturating_sub(1)) as f32 / 2.0;
        (index as f32 - half_span) * self.cell_length
    }

    /// Iterator over every cell coordinate in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }
}
