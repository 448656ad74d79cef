/// User interface module
///
/// This module turns application state into HTML:
/// - Pure view functions (views.rs)
/// - Mount points and the render entry point (render.rs)
/// - The page shell the mount lives in (page.rs)

pub mod page;
pub mod render;
pub mod views;

pub use render::{render, FileMount, Mount, SharedMount};
