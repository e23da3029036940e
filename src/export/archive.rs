//! Archive export: every file bundled into one zip download.

use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{Artifact, Exporter, ExporterKind};
use crate::core::FileStore;

const ARCHIVE_MIME: &str = "application/zip";

/// Bundles all files into a single zip archive
#[derive(Debug, Clone)]
pub struct ArchiveExporter {
    archive_name: String,
}

impl ArchiveExporter {
    pub fn new(archive_name: impl Into<String>) -> Self {
        Self {
            archive_name: archive_name.into(),
        }
    }
}

impl Exporter for ArchiveExporter {
    fn kind(&self) -> ExporterKind {
        ExporterKind::Archive
    }

    fn export_all(&self, store: &FileStore) -> Result<Vec<Artifact>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, content) in store.iter() {
            writer
                .start_file(name.as_str(), options)
                .with_context(|| format!("Failed to add {} to archive", name))?;
            writer
                .write_all(content.as_bytes())
                .with_context(|| format!("Failed to write {} to archive", name))?;
        }

        let bytes = writer
            .finish()
            .context("Failed to finish archive")?
            .into_inner();

        Ok(vec![Artifact {
            file_name: self.archive_name.clone(),
            mime: ARCHIVE_MIME.to_string(),
            bytes,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Defaults, FileName};
    use std::io::Read;
    use std::sync::Arc;

    #[test]
    fn test_archive_contains_every_file() {
        let mut store = FileStore::new(Arc::new(Defaults::builtin()));
        store.set(FileName::Html, "<h1>edited</h1>");

        let artifacts = ArchiveExporter::new("bundle.zip")
            .export_all(&store)
            .expect("export");
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].file_name, "bundle.zip");
        assert_eq!(artifacts[0].mime, "application/zip");

        let mut archive =
            zip::ZipArchive::new(Cursor::new(artifacts[0].bytes.clone())).expect("open archive");
        assert_eq!(archive.len(), 3);
        for name in FileName::ALL {
            let mut entry = archive.by_name(name.as_str()).expect("archive entry");
            let mut content = String::new();
            entry.read_to_string(&mut content).expect("read entry");
            assert_eq!(content, store.get(name));
        }
    }
}
