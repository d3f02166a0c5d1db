//! Text detection: the collaborator that turns a board photo into positioned
//! text fragments.
//!
//! The layout engine never talks to an OCR provider itself. Callers hand it
//! fragments from any [`TextDetector`]: the local Tesseract engine, a saved
//! Google Cloud Vision response, or a [`CachedDetector`] wrapping either.

pub mod cache;
pub mod engine;
pub mod preprocess;
pub mod setup;
pub mod vision;

pub use cache::{CachedDetector, MAX_REQUESTS_PER_MONTH};
pub use engine::TesseractDetector;
pub use preprocess::threshold_bright_pixels;
pub use setup::ensure_tesseract;
pub use vision::{load_annotations, parse_vision_response};

use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::Path;

use crate::layout::{process_annotations, LayoutResult, RawAnnotation};
use crate::venue::VenueConfig;

/// Anything that can find text fragments in an image.
pub trait TextDetector {
    /// Returns every text fragment found in the image, in no particular order.
    fn detect_text(&self, image: &Path) -> Result<Vec<RawAnnotation>>;
}

impl<T: TextDetector + ?Sized> TextDetector for &T {
    fn detect_text(&self, image: &Path) -> Result<Vec<RawAnnotation>> {
        (**self).detect_text(image)
    }
}

/// High-level function: board photo → court signups.
///
/// Runs text detection, then reconstructs the board for the given venue.
pub fn read_board(
    detector: &dyn TextDetector,
    image: &Path,
    taken_at: DateTime<Local>,
    venue: &VenueConfig,
) -> Result<LayoutResult> {
    log::info!(
        "Reading {} board from {}",
        venue.display_name,
        image.display()
    );

    let annotations = detector.detect_text(image)?;
    log::debug!("Text detection returned {} fragments", annotations.len());

    Ok(process_annotations(&annotations, taken_at, venue)?)
}
