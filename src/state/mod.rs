/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The immutable snapshot store and partial updates (store.rs)

pub mod data;
pub mod store;

pub use data::{ApplicationState, Camera, Photo, RoverInfo, RoverName};
pub use store::{merge, StateUpdate, Store};
