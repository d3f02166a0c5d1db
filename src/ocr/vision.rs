//! Saved text detection responses.
//!
//! Accepts the Google Cloud Vision `textDetection` payload, which is what the
//! production uploader stores, or a plain array of fragments.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::layout::{RawAnnotation, RawVertex};

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Fragments(Vec<RawAnnotation>),
    Vision(VisionResponse),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VisionResponse {
    #[serde(default)]
    text_annotations: Option<Vec<EntityAnnotation>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityAnnotation {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    bounding_poly: Option<BoundingPoly>,
}

#[derive(Deserialize)]
struct BoundingPoly {
    #[serde(default)]
    vertices: Vec<RawVertex>,
}

/// Parses a text detection payload into fragments.
///
/// Vision entities without a description are skipped. The first Vision
/// entity is the whole detected text block; it is kept like any other
/// fragment and falls out later because it fits inside no single section.
pub fn parse_vision_response(json: &str) -> Result<Vec<RawAnnotation>> {
    let payload: Payload =
        serde_json::from_str(json).context("Failed to parse text detection response")?;

    match payload {
        Payload::Fragments(fragments) => Ok(fragments),
        Payload::Vision(response) => {
            let entities = response
                .text_annotations
                .ok_or_else(|| anyhow!("textAnnotations was null in the text detection response"))?;

            Ok(entities
                .into_iter()
                .filter_map(|entity| {
                    Some(RawAnnotation {
                        text: entity.description?,
                        bounding_quad: entity.bounding_poly.map(|poly| poly.vertices),
                    })
                })
                .collect())
        }
    }
}

/// Reads and parses a saved text detection response.
pub fn load_annotations(path: &Path) -> Result<Vec<RawAnnotation>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read annotations from {}", path.display()))?;
    parse_vision_response(&contents)
}
