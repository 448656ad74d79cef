/// Data-fetch module
///
/// This module handles talking to the proxy server:
/// - Wire types for the photos payload (types.rs)
/// - The HTTP client (client.rs)

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::state::RoverName;

pub use client::ProxyClient;
pub use types::{RawPhoto, RawRover};

/// Most photos kept per selection
pub const PHOTO_LIMIT: usize = 5;

/// Where the dashboard gets rover photos from
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// At most [`PHOTO_LIMIT`] photos for `rover`, in received order
    async fn fetch_rover_photos(&self, rover: RoverName) -> Result<Vec<RawPhoto>, FetchError>;
}
