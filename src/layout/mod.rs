//! Board layout reconstruction.
//!
//! Turns the flat list of OCR fragments from a photo of the venue's sign-up
//! board into per-court signups:
//!
//! raw fragments → landmark grid → per-court section → reading-order lines →
//! section scan → normalized names → timed signups
//!
//! Everything here is a pure function of its inputs. Fetching the fragments is
//! the job of a [`crate::ocr::TextDetector`].

pub mod classify;
pub mod geometry;
pub mod grid;
pub mod lines;
pub mod names;
pub mod region;
pub mod signup;

pub use classify::{classify_section, Countdown, ScanState, SignupCandidate};
pub use geometry::{area, contains, to_rectangle, Rectangle, Vertex};
pub use grid::{locate_grid, Grid};
pub use lines::group_into_lines;
pub use names::{normalize_name, NameNormalizer};
pub use region::{annotations_in_section, section_rectangle};
pub use signup::{format_signups, synthesize, CourtSignup, COURT_SESSION_MINUTES};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::venue::VenueConfig;

/// Failures that stop a whole board from being reconstructed.
///
/// Bad individual fragments never end up here; they are dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error(
        "Expected at least {expected} instances of \"{landmark}\" but only got {found}. Is the whole screen in the picture?"
    )]
    InsufficientLandmarks {
        landmark: String,
        expected: usize,
        found: usize,
    },
    #[error("Courts per row must be at least 1")]
    InvalidCourtsPerRow,
    #[error("Cannot derive court sections from the landmark grid: {reason}")]
    DegenerateGrid { reason: String },
}

/// A vertex as delivered by the OCR provider. Providers omit coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVertex {
    #[serde(default)]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: Option<i32>,
}

impl From<Vertex> for RawVertex {
    fn from(v: Vertex) -> Self {
        Self {
            x: Some(v.x),
            y: Some(v.y),
        }
    }
}

/// One OCR fragment exactly as the provider returned it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnnotation {
    pub text: String,
    #[serde(default)]
    pub bounding_quad: Option<Vec<RawVertex>>,
}

/// An OCR fragment with a usable bounding rectangle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub rectangle: Rectangle,
}

impl Annotation {
    pub fn new(text: impl Into<String>, rectangle: Rectangle) -> Self {
        Self {
            text: text.into(),
            rectangle,
        }
    }

    /// Converts a provider fragment, or `None` if its box is unusable
    /// (missing, not four vertices, or a vertex without both coordinates).
    pub fn from_raw(raw: &RawAnnotation) -> Option<Self> {
        let vertices = raw
            .bounding_quad
            .as_ref()?
            .iter()
            .map(|v| Some(Vertex::new(v.x?, v.y?)))
            .collect::<Option<Vec<_>>>()?;
        let rectangle = to_rectangle(&vertices)?;
        Some(Self::new(raw.text.clone(), rectangle))
    }
}

/// Diagnostic view of one court section, for inspecting misreads by hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtDebugInfo {
    pub court: u32,
    pub section_rectangle: [Vertex; 4],
    pub all_bounding_boxes_in_section: Vec<[Vertex; 4]>,
    pub lines_of_text: Vec<Vec<String>>,
}

/// Everything reconstructed from one photo.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub court_signups: Vec<CourtSignup>,
    pub court_debug_info: Vec<CourtDebugInfo>,
}

/// Reconstructs court signups from one photo's OCR fragments.
pub fn process_annotations(
    annotations: &[RawAnnotation],
    taken_at: DateTime<Local>,
    venue: &VenueConfig,
) -> Result<LayoutResult, LayoutError> {
    process_annotations_with(annotations, taken_at, venue, &NameNormalizer::default())
}

/// Same as [`process_annotations`] with a caller-chosen name normalizer.
pub fn process_annotations_with(
    annotations: &[RawAnnotation],
    taken_at: DateTime<Local>,
    venue: &VenueConfig,
    normalizer: &NameNormalizer,
) -> Result<LayoutResult, LayoutError> {
    let usable: Vec<Annotation> = annotations
        .iter()
        .filter_map(|raw| {
            let annotation = Annotation::from_raw(raw);
            if annotation.is_none() {
                log::debug!("Dropping fragment {:?} with unusable bounding box", raw.text);
            }
            annotation
        })
        .collect();

    log::debug!(
        "{} of {} fragments have usable boxes",
        usable.len(),
        annotations.len()
    );

    let grid = locate_grid(
        &usable,
        &venue.landmark,
        venue.court_count,
        venue.courts_per_row,
    )?;

    let mut result = LayoutResult::default();

    for (row, col) in grid.cells() {
        let court = (row * venue.courts_per_row + col + 1) as u32;
        let section = section_rectangle(&grid, row, col)?;
        let in_section = annotations_in_section(&usable, &section);
        let lines = group_into_lines(&in_section);

        let candidates = classify_section(&lines, normalizer);
        let before = result.court_signups.len();
        result.court_signups.extend(
            candidates
                .into_iter()
                .filter_map(|candidate| synthesize(court, candidate, taken_at)),
        );

        log::debug!(
            "Court {}: {} fragments, {} lines, {} signups",
            court,
            in_section.len(),
            lines.len(),
            result.court_signups.len() - before
        );

        result.court_debug_info.push(CourtDebugInfo {
            court,
            section_rectangle: section.vertices(),
            all_bounding_boxes_in_section: in_section
                .iter()
                .map(|a| a.rectangle.vertices())
                .collect(),
            lines_of_text: lines,
        });
    }

    log::info!(
        "Reconstructed {} signups across {} courts",
        result.court_signups.len(),
        result.court_debug_info.len()
    );

    Ok(result)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use chrono::{Duration, TimeZone};

    const SECTION_WIDTH: i32 = 400;
    const SECTION_HEIGHT: i32 = 300;

    fn taken_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2023, 6, 1, 10, 0, 0).unwrap()
    }

    /// A 14-court board, 4 per row. `contents` supplies the lines for a court
    /// (1-based); every other court only has its landmark.
    fn board(contents: &[(u32, &[&str])]) -> Vec<RawAnnotation> {
        let mut out = Vec::new();
        for court in 1..=14u32 {
            let row = ((court - 1) / 4) as i32;
            let col = ((court - 1) % 4) as i32;
            let x = 100 + col * SECTION_WIDTH;
            let y = 50 + row * SECTION_HEIGHT;
            // Landmark label sits on the section's top-left corner
            out.push(raw("Court", x, y, 60, 25));
            if let Some((_, lines)) = contents.iter().find(|(c, _)| *c == court) {
                out.extend(section(x, y + 30, lines));
            }
        }
        out
    }

    #[test]
    fn test_end_to_end_current_and_queue() {
        let annotations = board(&[(
            3,
            &[
                "Court 3",
                "5 Left",
                "Current Players",
                "ann bo",
                "Queue",
                "cy dee",
                "",
                "",
            ],
        )]);

        let result = process_annotations(&annotations, taken_at(), &VenueConfig::default()).unwrap();

        assert_eq!(result.court_debug_info.len(), 14);
        assert_eq!(result.court_signups.len(), 2);

        let current = &result.court_signups[0];
        assert_eq!(current.court, 3);
        assert_eq!(current.queue_position, 0);
        assert_eq!(current.players, vec!["ann", "bo"]);
        assert_eq!(current.ends_at, Some(taken_at() + Duration::minutes(5)));

        let queued = &result.court_signups[1];
        assert_eq!(queued.court, 3);
        assert_eq!(queued.queue_position, 1);
        assert_eq!(queued.players, vec!["cy", "dee"]);
        assert_eq!(queued.ends_at, Some(taken_at() + Duration::minutes(35)));
        assert_eq!(queued.starts_at, Some(taken_at() + Duration::minutes(5)));
    }

    #[test]
    fn test_courts_are_numbered_row_major() {
        let annotations = board(&[
            (1, &["Current Players: amy"]),
            (6, &["Current Players: ben"]),
            (14, &["Current Players: cat"]),
        ]);

        let result = process_annotations(&annotations, taken_at(), &VenueConfig::default()).unwrap();

        let courts: Vec<(u32, &str)> = result
            .court_signups
            .iter()
            .map(|s| (s.court, s.players[0].as_str()))
            .collect();
        assert_eq!(courts, vec![(1, "amy"), (6, "ben"), (14, "cat")]);

        let numbers: Vec<u32> = result.court_debug_info.iter().map(|d| d.court).collect();
        assert_eq!(numbers, (1..=14).collect::<Vec<_>>());
    }

    #[test]
    fn test_reserved_court_without_players() {
        let annotations = board(&[(
            9,
            &["Reserved from 6pm", "Current Players", "Queue", "", "", ""],
        )]);

        let result = process_annotations(&annotations, taken_at(), &VenueConfig::default()).unwrap();

        assert_eq!(result.court_signups.len(), 1);
        let signup = &result.court_signups[0];
        assert_eq!(signup.court, 9);
        assert_eq!(signup.queue_position, 0);
        assert!(signup.players.is_empty());
        assert_eq!(signup.starts_at, None);
        assert_eq!(signup.ends_at, None);
    }

    #[test]
    fn test_misread_countdown_does_not_abort_board() {
        let annotations = board(&[
            (2, &["9999999999999 Left", "Current Players: ann"]),
            (3, &["-9999999999999 Left", "Current Players: bo", "Queue", "cy"]),
            (4, &["6 Left", "Current Players: dee"]),
        ]);

        let result = process_annotations(&annotations, taken_at(), &VenueConfig::default()).unwrap();

        assert_eq!(result.court_debug_info.len(), 14);
        assert_eq!(result.court_signups.len(), 1);
        assert_eq!(result.court_signups[0].court, 4);
        assert_eq!(result.court_signups[0].players, vec!["dee"]);
        assert_eq!(
            result.court_signups[0].ends_at,
            Some(taken_at() + Duration::minutes(6))
        );
    }

    #[test]
    fn test_insufficient_landmarks() {
        let mut annotations = board(&[]);
        annotations.retain(|a| a.text != "Court");
        annotations.push(raw("Court", 0, 0, 10, 10));

        let err = process_annotations(&annotations, taken_at(), &VenueConfig::default()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InsufficientLandmarks {
                landmark: "Court".to_string(),
                expected: 14,
                found: 1,
            }
        );
        assert!(err.to_string().contains("Is the whole screen in the picture?"));
    }

    #[test]
    fn test_unusable_fragments_are_dropped() {
        let mut annotations = board(&[(2, &["Current Players: dan"])]);
        annotations.push(RawAnnotation {
            text: "ghost".to_string(),
            bounding_quad: None,
        });
        annotations.push(RawAnnotation {
            text: "partial".to_string(),
            bounding_quad: Some(vec![
                RawVertex { x: Some(1), y: None },
                RawVertex { x: Some(2), y: Some(2) },
                RawVertex { x: Some(1), y: Some(2) },
                RawVertex { x: Some(2), y: Some(1) },
            ]),
        });

        let result = process_annotations(&annotations, taken_at(), &VenueConfig::default()).unwrap();
        assert_eq!(result.court_signups.len(), 1);
        assert_eq!(result.court_signups[0].players, vec!["dan"]);
    }

    #[test]
    fn test_debug_info_lists_section_lines() {
        let annotations = board(&[(5, &["7 Left", "Current Players: eve"])]);
        let result = process_annotations(&annotations, taken_at(), &VenueConfig::default()).unwrap();

        let info = &result.court_debug_info[4];
        assert_eq!(info.court, 5);
        // The landmark of court 5 is inside its own section
        assert_eq!(
            info.lines_of_text,
            vec![
                vec!["Court".to_string()],
                vec!["7".to_string(), "Left".to_string()],
                vec!["Current".to_string(), "Players:".to_string(), "eve".to_string()],
            ]
        );
        assert_eq!(info.all_bounding_boxes_in_section.len(), 6);
        assert_eq!(info.section_rectangle[0], Vertex::new(100, 350));
        assert_eq!(info.section_rectangle[2], Vertex::new(500, 650));
    }

    #[test]
    fn test_from_raw_requires_four_complete_vertices() {
        assert!(Annotation::from_raw(&raw("ok", 0, 0, 5, 5)).is_some());
        assert!(Annotation::from_raw(&RawAnnotation {
            text: "three".to_string(),
            bounding_quad: Some(vec![RawVertex::default(); 3]),
        })
        .is_none());
        assert!(Annotation::from_raw(&RawAnnotation::default()).is_none());
    }
}
