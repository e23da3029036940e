//! Per-file export: one artifact for every file, in tab order.

use anyhow::Result;

use super::{Artifact, Exporter, ExporterKind};
use crate::core::FileStore;

/// Exports each file as its own download
#[derive(Debug, Clone, Copy, Default)]
pub struct PerFileExporter;

impl Exporter for PerFileExporter {
    fn kind(&self) -> ExporterKind {
        ExporterKind::PerFile
    }

    fn export_all(&self, store: &FileStore) -> Result<Vec<Artifact>> {
        Ok(store
            .iter()
            .map(|(name, content)| Artifact::from_file(name, content))
            .collect())
    }
}
