//! File Store
//!
//! In-memory content of the playground files plus the "current" pointer.
//! The key set is fixed by [`FileName`]; only contents change.

use std::sync::Arc;

use super::defaults::Defaults;
use super::file::FileName;

/// Current content of every recognized file
#[derive(Debug, Clone)]
pub struct FileStore {
    contents: [String; 3],
    current: FileName,
    defaults: Arc<Defaults>,
}

impl FileStore {
    /// Create a store seeded from the defaults, with the HTML file current
    pub fn new(defaults: Arc<Defaults>) -> Self {
        let contents = FileName::ALL.map(|name| defaults.get(name).to_string());
        Self {
            contents,
            current: FileName::Html,
            defaults,
        }
    }

    pub fn get(&self, name: FileName) -> &str {
        &self.contents[name.index()]
    }

    /// Replace the content of a file. Content is stored as-is.
    pub fn set(&mut self, name: FileName, content: impl Into<String>) {
        self.contents[name.index()] = content.into();
    }

    /// Restore every file from the defaults. The current file is kept.
    pub fn reset_all(&mut self) {
        for name in FileName::ALL {
            self.contents[name.index()] = self.defaults.get(name).to_string();
        }
    }

    pub fn current(&self) -> FileName {
        self.current
    }

    pub fn set_current(&mut self, name: FileName) {
        self.current = name;
    }

    pub fn current_content(&self) -> &str {
        self.get(self.current)
    }

    /// Whether a file still holds its default content
    pub fn is_default(&self, name: FileName) -> bool {
        self.get(name) == self.defaults.get(name)
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// All files in tab order
    pub fn iter(&self) -> impl Iterator<Item = (FileName, &str)> {
        FileName::ALL
            .into_iter()
            .map(move |name| (name, self.get(name)))
    }
}
