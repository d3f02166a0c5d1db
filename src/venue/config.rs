//! Venue board parameters, loaded from venues.json.
//!
//! The built-in venues are always available. A venues.json file can add
//! venues or override built-ins by id; if it can't be read or parsed, the
//! built-ins are used as is.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Id of the venue used when none (or an unknown one) is requested.
pub const DEFAULT_VENUE_ID: &str = "bintang_burlingame";

/// Layout parameters for one venue's sign-up board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueConfig {
    pub id: String,
    pub display_name: String,
    /// Number of court sections on the board
    pub court_count: usize,
    /// Court sections per row of the board
    pub courts_per_row: usize,
    /// Label printed once at the top-left of every court section
    #[serde(default = "default_landmark")]
    pub landmark: String,
}

fn default_landmark() -> String {
    "Court".to_string()
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_VENUE_ID.to_string(),
            display_name: "Bintang Burlingame".to_string(),
            court_count: 14,
            courts_per_row: 4,
            landmark: default_landmark(),
        }
    }
}

impl VenueConfig {
    fn bintang_san_carlos() -> Self {
        Self {
            id: "bintang_san_carlos".to_string(),
            display_name: "Bintang San Carlos".to_string(),
            court_count: 7,
            courts_per_row: 4,
            landmark: default_landmark(),
        }
    }
}

/// All known venues, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VenueRegistry {
    venues: Vec<VenueConfig>,
}

impl Default for VenueRegistry {
    fn default() -> Self {
        Self {
            venues: vec![VenueConfig::default(), VenueConfig::bintang_san_carlos()],
        }
    }
}

impl VenueRegistry {
    /// Loads venues from a JSON array file merged over the built-ins, or the
    /// built-ins alone if the file is missing or invalid.
    pub fn load(config_path: &Path) -> Self {
        let mut registry = Self::default();

        if !config_path.exists() {
            log::debug!(
                "{} not found. Using built-in venues.",
                config_path.display()
            );
            return registry;
        }

        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str::<Vec<VenueConfig>>(&contents) {
                Ok(venues) => {
                    log::info!(
                        "Loaded {} venues from {}",
                        venues.len(),
                        config_path.display()
                    );
                    for venue in venues {
                        registry.insert(venue);
                    }
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse {}: {}. Using built-in venues.",
                        config_path.display(),
                        e
                    );
                }
            },
            Err(e) => {
                log::warn!(
                    "Failed to read {}: {}. Using built-in venues.",
                    config_path.display(),
                    e
                );
            }
        }

        registry
    }

    /// Adds a venue, replacing any existing venue with the same id.
    pub fn insert(&mut self, venue: VenueConfig) {
        match self.venues.iter_mut().find(|v| v.id == venue.id) {
            Some(existing) => *existing = venue,
            None => self.venues.push(venue),
        }
    }

    pub fn get(&self, id: &str) -> Option<&VenueConfig> {
        self.venues.iter().find(|v| v.id == id)
    }

    /// Looks up a venue, falling back to the default venue for unknown ids.
    pub fn get_or_default(&self, id: &str) -> VenueConfig {
        if let Some(venue) = self.get(id) {
            return venue.clone();
        }

        log::warn!("Unknown venue \"{}\", using {}", id, DEFAULT_VENUE_ID);
        self.get(DEFAULT_VENUE_ID).cloned().unwrap_or_default()
    }

    pub fn venues(&self) -> &[VenueConfig] {
        &self.venues
    }
}
