//! Fixtures and fakes shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api::{PhotoSource, RawPhoto, PHOTO_LIMIT};
use crate::error::FetchError;
use crate::state::RoverName;

/// Nested rover object for `rover`, with mission dates per rover
pub fn rover_json(rover: &str) -> Value {
    let (launch, landing, status) = match rover {
        "Curiosity" => ("2011-11-26", "2012-08-06", "active"),
        "Opportunity" => ("2003-07-07", "2004-01-25", "complete"),
        _ => ("2003-06-10", "2004-01-04", "complete"),
    };
    json!({
        "id": 5,
        "name": rover,
        "launch_date": launch,
        "landing_date": landing,
        "status": status,
    })
}

/// One upstream photo entry with id `id`
pub fn photo_json(rover: &str, id: u64) -> Value {
    json!({
        "id": id,
        "sol": 30,
        "camera": { "id": 20, "name": "FHAZ", "rover_id": 5, "full_name": "Front Hazard Avoidance Camera" },
        "img_src": format!("https://mars.nasa.gov/msl-raw-images/{id}.JPG"),
        "earth_date": "2012-09-05",
        "rover": rover_json(rover),
    })
}

/// `{ "photos": [...] }` with ids `1..=count`
pub fn photos_payload(rover: &str, count: u64) -> Value {
    json!({ "photos": (1..=count).map(|id| photo_json(rover, id)).collect::<Vec<_>>() })
}

/// Decoded photos with ids `1..=count`
pub fn raw_photos(rover: RoverName, count: u64) -> Vec<RawPhoto> {
    (1..=count)
        .map(|id| serde_json::from_value(photo_json(rover.as_str(), id)).unwrap())
        .collect()
}

/// Photo source answering from a fixed script and recording every call
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<HashMap<RoverName, Option<Vec<RawPhoto>>>>,
    calls: Mutex<Vec<RoverName>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `rover` with `count` photos
    pub fn succeed(self, rover: RoverName, count: u64) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(rover, Some(raw_photos(rover, count)));
        self
    }

    /// Answer `rover` with an explicit photo list
    pub fn respond(self, rover: RoverName, photos: Vec<RawPhoto>) -> Self {
        self.responses.lock().unwrap().insert(rover, Some(photos));
        self
    }

    /// Fail every request for `rover`
    pub fn fail(self, rover: RoverName) -> Self {
        self.responses.lock().unwrap().insert(rover, None);
        self
    }

    pub fn calls(&self) -> Vec<RoverName> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhotoSource for ScriptedSource {
    async fn fetch_rover_photos(&self, rover: RoverName) -> Result<Vec<RawPhoto>, FetchError> {
        self.calls.lock().unwrap().push(rover);
        match self.responses.lock().unwrap().get(&rover).cloned().flatten() {
            Some(photos) => Ok(photos.into_iter().take(PHOTO_LIMIT).collect()),
            None => Err(FetchError::Malformed {
                reason: format!("scripted failure for {rover}"),
            }),
        }
    }
}
