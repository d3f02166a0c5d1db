//! Court section extents and the fragments inside them.

use super::geometry::{contains, Rectangle, Vertex};
use super::grid::Grid;
use super::{Annotation, LayoutError};

/// The rectangle of the board belonging to grid cell (row, col).
///
/// A section spans from its own anchor to the anchors of its right, lower and
/// lower-right neighbours. Where a neighbour is missing (last column, last
/// row, or the short final row) the edge is extrapolated with the spacing of
/// the first row and column, which assumes a uniform grid.
pub fn section_rectangle(grid: &Grid, row: usize, col: usize) -> Result<Rectangle, LayoutError> {
    let top_left = grid.get(row, col).ok_or_else(|| LayoutError::DegenerateGrid {
        reason: format!("no landmark at row {} column {}", row, col),
    })?;

    let top_right = match grid.get(row, col + 1) {
        Some(vertex) => vertex,
        None => extrapolate(top_left, base_width(grid)?, 0, row, col)?,
    };

    let bottom_left = match grid.get(row + 1, col) {
        Some(vertex) => vertex,
        None => extrapolate(top_left, 0, base_height(grid)?, row, col)?,
    };

    let bottom_right = grid
        .get(row + 1, col + 1)
        .unwrap_or_else(|| Vertex::new(top_right.x, bottom_left.y));

    Ok(Rectangle {
        top_left,
        top_right,
        bottom_left,
        bottom_right,
    })
}

fn extrapolate(
    anchor: Vertex,
    dx: i32,
    dy: i32,
    row: usize,
    col: usize,
) -> Result<Vertex, LayoutError> {
    anchor
        .checked_offset(dx, dy)
        .ok_or_else(|| LayoutError::DegenerateGrid {
            reason: format!("section edge at row {} column {} is out of range", row, col),
        })
}

fn base_width(grid: &Grid) -> Result<i32, LayoutError> {
    grid.base_width().ok_or_else(|| LayoutError::DegenerateGrid {
        reason: "need at least two landmarks in the first row, a representable distance apart, to size the last column".to_string(),
    })
}

fn base_height(grid: &Grid) -> Result<i32, LayoutError> {
    grid.base_height().ok_or_else(|| LayoutError::DegenerateGrid {
        reason: "need at least two rows of landmarks, a representable distance apart, to size the last row".to_string(),
    })
}

/// Fragments whose box lies inside `section`, in input order.
pub fn annotations_in_section<'a>(
    annotations: &'a [Annotation],
    section: &Rectangle,
) -> Vec<&'a Annotation> {
    annotations
        .iter()
        .filter(|a| contains(section, &a.rectangle))
        .collect()
}
