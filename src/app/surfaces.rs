//! Filesystem-backed surfaces used by the `playground` binary.
//!
//! - the workspace directory is the editing surface
//! - the preview directory is the rendering surface
//! - the export directory receives downloads

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::FileName;
use crate::export::Artifact;
use crate::preview::PreviewUpdate;
use crate::session::{EditingSurface, ExportSurface, RenderSurface};

pub const PREVIEW_DOCUMENT: &str = "index.html";
pub const PREVIEW_METADATA: &str = "preview.json";

/// Shows files by writing them into the workspace, where the user's own
/// editor picks them up
#[derive(Debug, Clone)]
pub struct WorkspaceEditor {
    dir: PathBuf,
}

impl WorkspaceEditor {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl WorkspaceEditor {
    fn write_if_changed(&self, name: FileName, content: &str) -> Result<()> {
        let path = self.dir.join(name.as_str());

        // Leave the file alone when it already shows this content
        let on_disk = fs::read_to_string(&path).ok();
        if on_disk.as_deref() != Some(content) {
            fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::debug!("Wrote {} to {}", name, path.display());
        }
        Ok(())
    }
}

impl EditingSurface for WorkspaceEditor {
    fn show(&mut self, name: FileName, content: &str) -> Result<()> {
        self.write_if_changed(name, content)?;
        log::info!("Editing {}", name);
        Ok(())
    }

    /// Every file in the workspace is visible to the user's editor
    fn sync(&mut self, name: FileName, content: &str) -> Result<()> {
        self.write_if_changed(name, content)
    }
}

/// Writes the composite document and its metadata into a directory
#[derive(Debug, Clone)]
pub struct PreviewDir {
    dir: PathBuf,
}

impl PreviewDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn document_path(&self) -> PathBuf {
        self.dir.join(PREVIEW_DOCUMENT)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(PREVIEW_METADATA)
    }
}

impl RenderSurface for PreviewDir {
    fn publish(&mut self, update: &PreviewUpdate) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create preview directory: {}", self.dir.display()))?;

        let document_path = self.document_path();
        fs::write(&document_path, &update.document)
            .with_context(|| format!("Failed to write {}", document_path.display()))?;

        let metadata = serde_json::to_string_pretty(&update.metadata)
            .context("Failed to serialize preview metadata")?;
        let metadata_path = self.metadata_path();
        fs::write(&metadata_path, metadata)
            .with_context(|| format!("Failed to write {}", metadata_path.display()))?;

        log::info!(
            "Preview updated: \"{}\" ({} bytes)",
            update.metadata.title,
            update.document.len()
        );
        Ok(())
    }
}

/// Saves downloads into a directory
#[derive(Debug, Clone)]
pub struct ExportDir {
    dir: PathBuf,
}

impl ExportDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, artifact: &Artifact) -> PathBuf {
        self.dir.join(&artifact.file_name)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSurface for ExportDir {
    fn deliver(&mut self, artifact: &Artifact) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create export directory: {}", self.dir.display()))?;

        let path = self.path_for(artifact);
        fs::write(&path, &artifact.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Saved {} ({})", path.display(), artifact.mime);
        Ok(())
    }
}
