//! Locates the board's court grid from repeated landmark labels.

use super::geometry::{area, Vertex};
use super::{Annotation, LayoutError};

/// Row-major grid of section anchors (the top-left corner of each landmark).
///
/// Every row has `courts_per_row` cells except possibly the last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Vertex>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Vertex>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Vertex>] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Vertex> {
        self.rows.get(row)?.get(col).copied()
    }

    /// All (row, col) positions in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| (0..cells.len()).map(move |col| (row, col)))
    }

    /// Horizontal distance between the first two anchors of the first row.
    pub fn base_width(&self) -> Option<i32> {
        self.get(0, 1)?.x.checked_sub(self.get(0, 0)?.x)
    }

    /// Vertical distance between the first anchors of the first two rows.
    pub fn base_height(&self) -> Option<i32> {
        self.get(1, 0)?.y.checked_sub(self.get(0, 0)?.y)
    }
}

/// Returns the top-left vertices of the `count` largest fragments whose text
/// is exactly `landmark`, largest first.
///
/// OCR often reports ghost copies of a label that are smaller than the real
/// glyphs, so keeping only the largest matches discards them.
pub fn find_largest_landmarks(
    annotations: &[Annotation],
    landmark: &str,
    count: usize,
) -> Result<Vec<Vertex>, LayoutError> {
    let mut matches: Vec<&Annotation> = annotations
        .iter()
        .filter(|a| a.text == landmark)
        .collect();

    if matches.len() < count {
        return Err(LayoutError::InsufficientLandmarks {
            landmark: landmark.to_string(),
            expected: count,
            found: matches.len(),
        });
    }

    matches.sort_by_key(|a| std::cmp::Reverse(area(&a.rectangle)));

    Ok(matches
        .into_iter()
        .take(count)
        .map(|a| a.rectangle.top_left)
        .collect())
}

/// Sorts vertices top to bottom, chunks them into rows of `per_row`, and
/// sorts each row left to right.
pub fn vertices_as_grid(vertices: &[Vertex], per_row: usize) -> Vec<Vec<Vertex>> {
    if per_row == 0 {
        return Vec::new();
    }

    let mut sorted = vertices.to_vec();
    sorted.sort_by_key(|v| v.y);

    sorted
        .chunks(per_row)
        .map(|chunk| {
            let mut row = chunk.to_vec();
            row.sort_by_key(|v| v.x);
            row
        })
        .collect()
}

/// Finds the landmark grid for a board with `count` courts, `per_row` per row.
pub fn locate_grid(
    annotations: &[Annotation],
    landmark: &str,
    count: usize,
    per_row: usize,
) -> Result<Grid, LayoutError> {
    if per_row == 0 {
        return Err(LayoutError::InvalidCourtsPerRow);
    }

    let anchors = find_largest_landmarks(annotations, landmark, count)?;
    let grid = Grid::new(vertices_as_grid(&anchors, per_row));

    log::debug!(
        "Located {} \"{}\" landmarks in {} rows",
        anchors.len(),
        landmark,
        grid.rows().len()
    );

    Ok(grid)
}
