//! Pixel-space geometry for OCR bounding boxes.
//!
//! OCR providers return each fragment's box as four vertices in no particular
//! order. `to_rectangle` sorts them into named corners once, and everything
//! downstream works with the named corners.

use serde::{Deserialize, Serialize};

/// A point in image pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

impl Vertex {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this vertex shifted by (dx, dy), or `None` if either
    /// coordinate leaves the `i32` range.
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

/// A quadrilateral with its corners sorted into left/right and top/bottom.
///
/// OCR boxes are close to axis-aligned, so `top_left.x <= top_right.x` and
/// `top_left.y <= bottom_left.y` hold for every rectangle built by
/// [`to_rectangle`], but the sides are not guaranteed to be exactly parallel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub top_left: Vertex,
    pub top_right: Vertex,
    pub bottom_left: Vertex,
    pub bottom_right: Vertex,
}

impl Rectangle {
    /// Builds an axis-aligned rectangle from its left/top edge and size.
    pub fn from_origin(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            top_left: Vertex::new(x, y),
            top_right: Vertex::new(x + width, y),
            bottom_left: Vertex::new(x, y + height),
            bottom_right: Vertex::new(x + width, y + height),
        }
    }

    /// Corners in drawing order (clockwise from top-left).
    pub fn vertices(&self) -> [Vertex; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }
}

/// Sorts four vertices into a [`Rectangle`].
///
/// Returns `None` when the quad does not have exactly four vertices. The two
/// vertices with the smallest x form the left edge and the other two the
/// right edge; each edge is then ordered top to bottom by y.
pub fn to_rectangle(vertices: &[Vertex]) -> Option<Rectangle> {
    let mut sorted: [Vertex; 4] = vertices.try_into().ok()?;

    // Tie-break on y so any permutation of the input produces the same corners
    sorted.sort_by_key(|v| (v.x, v.y));
    let (mut left, mut right) = ([sorted[0], sorted[1]], [sorted[2], sorted[3]]);
    left.sort_by_key(|v| (v.y, v.x));
    right.sort_by_key(|v| (v.y, v.x));

    Some(Rectangle {
        top_left: left[0],
        bottom_left: left[1],
        top_right: right[0],
        bottom_right: right[1],
    })
}

/// Width of the top edge times height of the left edge.
pub fn area(rect: &Rectangle) -> i64 {
    let width = i64::from(rect.top_right.x) - i64::from(rect.top_left.x);
    let height = i64::from(rect.bottom_left.y) - i64::from(rect.top_left.y);
    width * height
}

/// Loose containment test: every corner of `inner` lies on the inside of the
/// matching corner of `outer`.
///
/// This is a per-corner bounds check, not a polygon test, which is enough for
/// near axis-aligned OCR boxes.
pub fn contains(outer: &Rectangle, inner: &Rectangle) -> bool {
    outer.top_left.x <= inner.top_left.x
        && outer.top_left.y <= inner.top_left.y
        && outer.bottom_left.x <= inner.bottom_left.x
        && outer.bottom_left.y >= inner.bottom_left.y
        && outer.top_right.x >= inner.top_right.x
        && outer.top_right.y <= inner.top_right.y
        && outer.bottom_right.x >= inner.bottom_right.x
        && outer.bottom_right.y >= inner.bottom_right.y
}
