//! Export
//!
//! Produces downloadable artifacts from the file store. Exporting never
//! mutates the store.
//!
//! The all-files export is polymorphic: when archive support is compiled in
//! and enabled, every file goes into one archive; otherwise each file
//! becomes its own artifact. The variant is chosen once, at startup.

#[cfg(feature = "archive")]
pub mod archive;
pub mod per_file;

#[cfg(feature = "archive")]
pub use archive::ArchiveExporter;
pub use per_file::PerFileExporter;

use anyhow::Result;

use crate::core::{FileName, FileStore};

pub const DEFAULT_ARCHIVE_NAME: &str = "playground.zip";

/// One downloadable payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested file name for the download
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Artifact for a single playground file
    pub fn from_file(name: FileName, content: &str) -> Self {
        Self {
            file_name: name.as_str().to_string(),
            mime: name.mime().to_string(),
            bytes: content.as_bytes().to_vec(),
        }
    }
}

/// Export the current file of the store
pub fn export_current(store: &FileStore) -> Artifact {
    Artifact::from_file(store.current(), store.current_content())
}

/// Which all-files strategy an exporter implements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExporterKind {
    Archive,
    PerFile,
}

/// Strategy for exporting every file at once
pub trait Exporter {
    fn kind(&self) -> ExporterKind;

    /// Produce the artifacts for every file in the store
    fn export_all(&self, store: &FileStore) -> Result<Vec<Artifact>>;
}

/// Export settings resolved from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Bundle all files into one archive when archive support is available
    pub archive: bool,
    pub archive_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            archive: true,
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }
}

/// Whether this build can produce archives
pub fn archive_supported() -> bool {
    cfg!(feature = "archive")
}

/// Pick the all-files exporter for this build and configuration
pub fn select_exporter(options: &ExportOptions) -> Box<dyn Exporter> {
    #[cfg(feature = "archive")]
    if options.archive {
        log::debug!("Using archive exporter ({})", options.archive_name);
        return Box::new(ArchiveExporter::new(options.archive_name.clone()));
    }

    if options.archive && !archive_supported() {
        log::info!("Archive support not built in, exporting files individually");
    }
    Box::new(PerFileExporter)
}
