//! Venue configuration.
//!
//! Each venue's board has a fixed number of court sections laid out in rows
//! of a fixed width, each headed by the same landmark label.

pub mod config;

pub use config::{VenueConfig, VenueRegistry, DEFAULT_VENUE_ID};
