//! Wire types for the rover photos payload.
//!
//! Shape of `GET /rovers/<name>` (relayed unchanged from the NASA API):
//! `{ "photos": [ { "img_src", "camera": { "name", ... }, "earth_date", "rover": { ... } } ] }`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::state::Camera;

/// Envelope around the photo list; the entries are decoded lazily so that
/// only the kept ones have to be well formed.
#[derive(Debug, Deserialize)]
pub struct PhotoEnvelope {
    pub photos: Vec<serde_json::Value>,
}

/// One photo result as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPhoto {
    #[serde(default)]
    pub id: Option<u64>,
    pub img_src: String,
    pub camera: Camera,
    pub earth_date: NaiveDate,
    pub rover: RawRover,
}

/// The rover object nested in every photo result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRover {
    #[serde(default)]
    pub name: String,
    pub launch_date: String,
    pub landing_date: String,
    pub status: String,
}
