//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the API layer and the view layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownRover;

/// One of the Mars rovers the dashboard can query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoverName {
    Curiosity,
    Opportunity,
    Spirit,
}

impl RoverName {
    /// Every rover, in the order the selector lists them
    pub const ALL: [RoverName; 3] = [
        RoverName::Curiosity,
        RoverName::Opportunity,
        RoverName::Spirit,
    ];

    /// Display name (also the value carried by selection events)
    pub fn as_str(&self) -> &'static str {
        match self {
            RoverName::Curiosity => "Curiosity",
            RoverName::Opportunity => "Opportunity",
            RoverName::Spirit => "Spirit",
        }
    }

    /// Lower-case path segment used by the NASA Mars photos API
    pub fn slug(&self) -> &'static str {
        match self {
            RoverName::Curiosity => "curiosity",
            RoverName::Opportunity => "opportunity",
            RoverName::Spirit => "spirit",
        }
    }

    /// Case-insensitive lookup for URL path segments
    pub fn from_slug(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|rover| rover.slug().eq_ignore_ascii_case(segment))
    }
}

impl fmt::Display for RoverName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoverName {
    type Err = UnknownRover;

    /// Exact, case-sensitive match on the display name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rover| rover.as_str() == s)
            .ok_or_else(|| UnknownRover(s.to_string()))
    }
}

/// Mission summary for the selected rover
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoverInfo {
    pub launch_date: String,
    pub landing_date: String,
    pub status: String,
}

impl RoverInfo {
    /// The info card is only shown once every field has a value
    pub fn is_present(&self) -> bool {
        !self.launch_date.is_empty() && !self.landing_date.is_empty() && !self.status.is_empty()
    }
}

/// Camera that took a photo, as reported by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    /// Short camera code (e.g., "FHAZ")
    pub name: String,
    /// Human-readable camera name (e.g., "Front Hazard Avoidance Camera")
    #[serde(default)]
    pub full_name: Option<String>,
}

/// A single rover photo shown in the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Full URL of the image
    pub src: String,
    pub camera: Camera,
    /// Earth date the photo was taken
    pub date: NaiveDate,
}

/// The whole application state
///
/// A snapshot is never modified once built. Updates go through
/// [`crate::state::merge`], which returns a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationState {
    rovers: [RoverName; 3],
    selected_rover: Option<RoverName>,
    rover: RoverInfo,
    photos: Vec<Photo>,
}

impl ApplicationState {
    /// Initial state: every rover listed, nothing selected, no photos
    pub fn new() -> Self {
        Self {
            rovers: RoverName::ALL,
            selected_rover: None,
            rover: RoverInfo::default(),
            photos: Vec::new(),
        }
    }

    pub fn rovers(&self) -> &[RoverName] {
        &self.rovers
    }

    pub fn selected_rover(&self) -> Option<RoverName> {
        self.selected_rover
    }

    pub fn rover(&self) -> &RoverInfo {
        &self.rover
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    // Field writers for the store's merge; `rovers` has none.
    pub(super) fn set_selected_rover(&mut self, rover: Option<RoverName>) {
        self.selected_rover = rover;
    }

    pub(super) fn set_rover(&mut self, rover: RoverInfo) {
        self.rover = rover;
    }

    pub(super) fn set_photos(&mut self, photos: Vec<Photo>) {
        self.photos = photos;
    }
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self::new()
    }
}
