//! External Surfaces
//!
//! The session drives three collaborators it does not own the behavior of:
//! the editor that shows a file, the preview that renders the composite
//! document, and the download sink for exports. The in-memory
//! implementations here record what they receive.

use anyhow::Result;

use crate::core::FileName;
use crate::export::Artifact;
use crate::preview::PreviewUpdate;

/// Text editor showing one file at a time
pub trait EditingSurface {
    /// Load `content` of `name` into the editor
    fn show(&mut self, name: FileName, content: &str) -> Result<()>;

    /// Update a file the editor holds but is not showing. Editors that only
    /// ever hold the shown file have nothing to do.
    fn sync(&mut self, _name: FileName, _content: &str) -> Result<()> {
        Ok(())
    }
}

/// Isolated document renderer plus title/icon display
pub trait RenderSurface {
    fn publish(&mut self, update: &PreviewUpdate) -> Result<()>;
}

/// Download sink
pub trait ExportSurface {
    fn deliver(&mut self, artifact: &Artifact) -> Result<()>;
}

/// The three surfaces a session talks to
#[derive(Debug, Default)]
pub struct Surfaces<E, R, X> {
    pub editor: E,
    pub preview: R,
    pub downloads: X,
}

/// Editor that remembers what it was asked to show
#[derive(Debug, Default)]
pub struct MemoryEditor {
    pub shown: Vec<(FileName, String)>,
    /// Background updates of files that were not shown
    pub synced: Vec<(FileName, String)>,
}

impl MemoryEditor {
    /// The file and text currently displayed
    pub fn visible(&self) -> Option<(FileName, &str)> {
        self.shown
            .last()
            .map(|(name, content)| (*name, content.as_str()))
    }
}

impl EditingSurface for MemoryEditor {
    fn show(&mut self, name: FileName, content: &str) -> Result<()> {
        self.shown.push((name, content.to_string()));
        Ok(())
    }

    fn sync(&mut self, name: FileName, content: &str) -> Result<()> {
        self.synced.push((name, content.to_string()));
        Ok(())
    }
}

/// Preview that keeps every published update
#[derive(Debug, Default)]
pub struct MemoryPreview {
    pub updates: Vec<PreviewUpdate>,
}

impl MemoryPreview {
    pub fn latest(&self) -> Option<&PreviewUpdate> {
        self.updates.last()
    }
}

impl RenderSurface for MemoryPreview {
    fn publish(&mut self, update: &PreviewUpdate) -> Result<()> {
        self.updates.push(update.clone());
        Ok(())
    }
}

/// Download sink that collects artifacts
#[derive(Debug, Default)]
pub struct MemoryDownloads {
    pub artifacts: Vec<Artifact>,
}

impl ExportSurface for MemoryDownloads {
    fn deliver(&mut self, artifact: &Artifact) -> Result<()> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}
