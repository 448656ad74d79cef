//! Immutable state store
//!
//! The store holds exactly one [`ApplicationState`] snapshot. Every change
//! builds a new snapshot by shallow-merging a [`StateUpdate`] over the
//! current one and swaps it in whole. Snapshots already handed out are
//! never touched.

use std::sync::Arc;

use super::data::{ApplicationState, Photo, RoverInfo, RoverName};

/// A partial application state
///
/// Each field that is set replaces the matching field of the current
/// state. There is no `rovers` field: the rover list is fixed at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateUpdate {
    selected_rover: Option<Option<RoverName>>,
    rover: Option<RoverInfo>,
    photos: Option<Vec<Photo>>,
}

impl StateUpdate {
    /// An update that changes nothing
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_rover(mut self, rover: Option<RoverName>) -> Self {
        self.selected_rover = Some(rover);
        self
    }

    pub fn rover(mut self, info: RoverInfo) -> Self {
        self.rover = Some(info);
        self
    }

    pub fn photos(mut self, photos: Vec<Photo>) -> Self {
        self.photos = Some(photos);
        self
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.selected_rover.is_none() && self.rover.is_none() && self.photos.is_none()
    }
}

/// Shallow merge: returns `current` with every field set in `partial` replaced
///
/// Nested values (the rover info, the photo list) are replaced whole, never
/// merged field by field.
pub fn merge(current: &ApplicationState, partial: StateUpdate) -> ApplicationState {
    let mut next = current.clone();

    if let Some(selected) = partial.selected_rover {
        next.set_selected_rover(selected);
    }
    if let Some(info) = partial.rover {
        next.set_rover(info);
    }
    if let Some(photos) = partial.photos {
        next.set_photos(photos);
    }

    next
}

/// Owner of the current snapshot
#[derive(Debug, Clone, Default)]
pub struct Store {
    current: Arc<ApplicationState>,
}

impl Store {
    /// Create a store holding the initial state
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<ApplicationState> {
        Arc::clone(&self.current)
    }

    /// Replace the current snapshot with `merge(current, update)`
    pub fn apply(&mut self, update: StateUpdate) -> Arc<ApplicationState> {
        self.current = Arc::new(merge(&self.current, update));
        self.snapshot()
    }
}
