//! Court Board
//!
//! Reads photos of a venue's electronic court sign-up board and reconstructs
//! who is on each court, who is queued, and when each group plays.
//!
//! The photo goes through a [`ocr::TextDetector`], which returns loose text
//! fragments with pixel boxes. [`layout::process_annotations`] rebuilds the
//! board's court grid from those fragments and produces one
//! [`layout::CourtSignup`] per group on court or in line.

pub mod layout;
pub mod ocr;
pub mod paths;
pub mod snapshot;
pub mod venue;

pub use layout::{
    process_annotations, process_annotations_with, CourtDebugInfo, CourtSignup, LayoutError,
    LayoutResult, RawAnnotation,
};
pub use ocr::{read_board, TextDetector};
pub use snapshot::SignupSnapshot;
pub use venue::{VenueConfig, VenueRegistry};
