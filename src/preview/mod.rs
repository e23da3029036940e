//! Preview Pipeline
//!
//! Turns the file store into what the preview surface displays:
//! - `assemble`: the composite document
//! - `metadata`: title and icon for the preview chrome
//! - `scheduler`: when a refresh actually runs

pub mod assemble;
pub mod metadata;
pub mod scheduler;

pub use assemble::{assemble, assemble_store, looks_like_document};
pub use metadata::{extract_metadata, MetadataOptions, PreviewMetadata};
pub use scheduler::{RefreshPolicy, RefreshScheduler, RefreshTicket, Schedule};

use crate::core::{FileName, FileStore};

/// Everything the rendering surface needs for one refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewUpdate {
    pub document: String,
    pub metadata: PreviewMetadata,
}

/// Builds preview updates from store contents
#[derive(Debug, Clone, Default)]
pub struct PreviewAssembler {
    options: MetadataOptions,
}

impl PreviewAssembler {
    pub fn new(options: MetadataOptions) -> Self {
        Self { options }
    }

    /// Recompute the composite document and metadata
    pub fn render(&self, store: &FileStore) -> PreviewUpdate {
        PreviewUpdate {
            document: assemble_store(store),
            metadata: extract_metadata(store.get(FileName::Html), &self.options),
        }
    }
}
