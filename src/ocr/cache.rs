//! Content-addressed cache and monthly quota around a text detector.
//!
//! Paid OCR providers bill per request, and the same photo is often processed
//! more than once (re-uploads, debugging). Each image is keyed by the SHA-256
//! of its bytes; a detection result is stored once per key and reused.
//! Every new key counts against the calendar month's quota, even if the
//! detection call itself then fails.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use super::TextDetector;
use crate::layout::RawAnnotation;

/// Default monthly request budget (the provider's free tier is 1000).
pub const MAX_REQUESTS_PER_MONTH: usize = 900;

/// One image's detection request, stored as `<cache_dir>/<hash>.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct DetectionRequest {
    file_name: String,
    image_hash: String,
    created_at: DateTime<Local>,
    /// `None` until the wrapped detector has answered
    result: Option<Vec<RawAnnotation>>,
}

/// Wraps a detector with a per-image result cache and a monthly quota.
pub struct CachedDetector<D> {
    inner: D,
    cache_dir: PathBuf,
    max_requests_per_month: usize,
}

impl<D: TextDetector> CachedDetector<D> {
    pub fn new(inner: D, cache_dir: impl Into<PathBuf>, max_requests_per_month: usize) -> Self {
        Self {
            inner,
            cache_dir: cache_dir.into(),
            max_requests_per_month,
        }
    }

    fn record_path(&self, image_hash: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", image_hash))
    }

    fn load_request(&self, image_hash: &str) -> Result<Option<DetectionRequest>> {
        let path = self.record_path(image_hash);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry {}", path.display()))?;
        let request = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache entry {}", path.display()))?;
        Ok(Some(request))
    }

    fn save_request(&self, request: &DetectionRequest) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)
            .with_context(|| format!("Failed to create {}", self.cache_dir.display()))?;
        let path = self.record_path(&request.image_hash);
        let json = serde_json::to_string(request)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write cache entry {}", path.display()))
    }

    /// Number of requests created in the same calendar month as `now`.
    fn count_requests_in_month(&self, now: DateTime<Local>) -> Result<usize> {
        if !self.cache_dir.exists() {
            return Ok(0);
        }

        let mut count = 0;
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let request: DetectionRequest = match fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|contents| Ok(serde_json::from_str(&contents)?))
            {
                Ok(request) => request,
                Err(e) => {
                    log::warn!("Skipping unreadable cache entry {}: {}", path.display(), e);
                    continue;
                }
            };

            let created = request.created_at;
            if created.year() == now.year() && created.month() == now.month() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Returns the existing request for this image, or records a new one if
    /// the month's quota allows it.
    fn get_or_create_request(
        &self,
        image: &Path,
        image_hash: &str,
        now: DateTime<Local>,
    ) -> Result<DetectionRequest> {
        if let Some(existing) = self.load_request(image_hash)? {
            log::debug!("Found existing detection request for hash {}", image_hash);
            return Ok(existing);
        }

        let count = self.count_requests_in_month(now)?;
        log::info!("Found {} requests for the month.", count);
        if count >= self.max_requests_per_month {
            return Err(anyhow!(
                "We've hit the limit for requests this month ({} of {}).",
                count,
                self.max_requests_per_month
            ));
        }

        let request = DetectionRequest {
            file_name: image.display().to_string(),
            image_hash: image_hash.to_string(),
            created_at: now,
            result: None,
        };
        self.save_request(&request)?;
        Ok(request)
    }

    fn detect_at(&self, image: &Path, now: DateTime<Local>) -> Result<Vec<RawAnnotation>> {
        let bytes =
            fs::read(image).with_context(|| format!("Failed to read image {}", image.display()))?;
        let image_hash = hash_image(&bytes);

        let mut request = self.get_or_create_request(image, &image_hash, now)?;
        if let Some(result) = request.result {
            log::info!("Returning cached result for hash {}", image_hash);
            return Ok(result);
        }

        log::info!("Calling text detection for {}...", image.display());
        let result = self.inner.detect_text(image)?;
        log::info!("Text detection returned {} fragments", result.len());

        request.result = Some(result.clone());
        self.save_request(&request)?;
        log::debug!("Cached response for hash {}", image_hash);

        Ok(result)
    }
}

impl<D: TextDetector> TextDetector for CachedDetector<D> {
    fn detect_text(&self, image: &Path) -> Result<Vec<RawAnnotation>> {
        self.detect_at(image, Local::now())
    }
}

/// Lowercase hex SHA-256 of the image bytes.
fn hash_image(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
