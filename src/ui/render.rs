//! Rendering into a mount point
//!
//! A render serializes the whole state and replaces everything inside the
//! mount. There is no diffing: the gallery never holds more than a handful
//! of photos.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::page;
use super::views::compose_app;
use crate::state::ApplicationState;

/// A sink for rendered markup
pub trait Mount: Send + Sync {
    /// Replace all markup inside the mount
    fn replace(&self, markup: String) -> io::Result<()>;
}

/// Render `state` into `mount`, replacing its previous content
pub fn render(mount: &dyn Mount, state: &ApplicationState) -> io::Result<()> {
    mount.replace(compose_app(state))
}

/// In-memory mount shared with the HTTP handler that serves the page
#[derive(Debug, Clone, Default)]
pub struct SharedMount {
    markup: Arc<RwLock<String>>,
}

impl SharedMount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current markup inside the mount
    pub fn markup(&self) -> String {
        self.markup
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Mount for SharedMount {
    fn replace(&self, markup: String) -> io::Result<()> {
        let mut slot = self
            .markup
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = markup;
        Ok(())
    }
}

/// Mount backed by an HTML file that is rewritten on every render
#[derive(Debug, Clone)]
pub struct FileMount {
    path: PathBuf,
}

impl FileMount {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Mount for FileMount {
    fn replace(&self, markup: String) -> io::Result<()> {
        std::fs::write(&self.path, page::document(&markup))
    }
}
