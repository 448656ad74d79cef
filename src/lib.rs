//! Mars rover photo dashboard.
//!
//! The dashboard keeps one immutable state snapshot, renders it to HTML with
//! pure view functions, and refreshes it by fetching rover photos through a
//! small proxy that keeps the NASA API key on the server.

#![forbid(unsafe_code)]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod ui;

#[cfg(test)]
mod test_support;
