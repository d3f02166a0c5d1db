use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;

use super::preprocess::threshold_bright_pixels;
use super::setup::{find_tessdata_dir, find_tesseract_executable};
use super::TextDetector;
use crate::layout::{RawAnnotation, RawVertex};

/// Text detection with a local Tesseract install.
///
/// Reports one fragment per recognized word with its pixel box, which is the
/// granularity the layout engine expects.
#[derive(Clone, Debug, Default)]
pub struct TesseractDetector {
    /// Keep only pixels brighter than this before recognition. Sign-up boards
    /// are light text on a dark screen, so this removes most glare and frame.
    pub threshold: Option<u8>,
    /// Words below this confidence (0-100) are dropped
    pub min_confidence: f32,
}

impl TesseractDetector {
    pub fn new(threshold: Option<u8>) -> Self {
        Self {
            threshold,
            min_confidence: 0.0,
        }
    }
}

impl TextDetector for TesseractDetector {
    fn detect_text(&self, image: &Path) -> Result<Vec<RawAnnotation>> {
        let tesseract_exe = find_tesseract_executable()?;

        // Tesseract reads the file itself unless we need to preprocess it
        let preprocessed = match self.threshold {
            Some(threshold) => {
                let img = image::open(image)
                    .with_context(|| format!("Failed to open image {}", image.display()))?
                    .to_rgba8();
                let binary = threshold_bright_pixels(&img, threshold);
                let temp_input = NamedTempFile::with_suffix(".png")?;
                binary.save(temp_input.path())?;
                Some(temp_input)
            }
            None => None,
        };
        let input_path = preprocessed
            .as_ref()
            .map(|f| f.path())
            .unwrap_or(image);

        // Create temporary output file (Tesseract adds .tsv extension)
        let temp_output = NamedTempFile::new()?;
        let output_base = temp_output.path().to_string_lossy().to_string();

        let mut command = Command::new(&tesseract_exe);
        command.arg(input_path).arg(&output_base);
        if let Some(tessdata_dir) = find_tessdata_dir() {
            command.arg("--tessdata-dir").arg(tessdata_dir);
        }
        let output = command
            .arg("-l")
            .arg("eng")
            .arg("--psm")
            .arg("11") // Sparse text: the board is a grid of short labels
            .arg("tsv")
            .output()
            .with_context(|| format!("Failed to run {}", tesseract_exe.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr));
        }

        let tsv_path = format!("{}.tsv", output_base);
        let tsv_content = std::fs::read_to_string(&tsv_path)
            .map_err(|e| anyhow!("Failed to read Tesseract output: {}", e))?;
        let _ = std::fs::remove_file(&tsv_path);

        let annotations = parse_tsv_output(&tsv_content, self.min_confidence);
        log::debug!(
            "Tesseract found {} words in {}",
            annotations.len(),
            image.display()
        );
        Ok(annotations)
    }
}

/// Parses Tesseract TSV output into one fragment per word.
///
/// TSV fields: level, page_num, block_num, par_num, line_num, word_num,
/// left, top, width, height, conf, text. Only level 5 (word) rows carry text.
fn parse_tsv_output(tsv: &str, min_confidence: f32) -> Vec<RawAnnotation> {
    let mut annotations = Vec::new();

    // Skip header
    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        let level: i32 = fields[0].parse().unwrap_or(-1);
        let conf: f32 = fields[10].parse().unwrap_or(-1.0);
        let text = fields[11].trim();

        if level != 5 || text.is_empty() || conf < 0.0 || conf < min_confidence {
            continue;
        }

        let [left, top, width, height] =
            [fields[6], fields[7], fields[8], fields[9]].map(|f| f.parse::<i32>().ok());

        // A word without a complete box is passed through as unusable
        let bounding_quad = match (left, top, width, height) {
            (Some(left), Some(top), Some(width), Some(height)) => Some(
                [
                    (left, top),
                    (left + width, top),
                    (left + width, top + height),
                    (left, top + height),
                ]
                .map(|(x, y)| RawVertex {
                    x: Some(x),
                    y: Some(y),
                })
                .to_vec(),
            ),
            _ => None,
        };

        annotations.push(RawAnnotation {
            text: text.to_string(),
            bounding_quad,
        });
    }

    annotations
}
