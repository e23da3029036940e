//! Live Preview Playground
//!
//! Edit an HTML file, a stylesheet and a script, and get one
//! self-contained preview document that stays in sync as you type.
//!
//! This library provides:
//! - The file store and its defaults snapshot
//! - Document assembly, metadata extraction and refresh scheduling
//! - Single-file and all-files export
//! - The session tying them to editor, preview and download surfaces
//! - Configuration management and the command-line front end

pub mod app;
pub mod config;
pub mod core;
pub mod export;
pub mod preview;
pub mod session;

// Re-exports for clean public API
pub use config::Config;
pub use crate::core::{Defaults, FileName, FileStore};
pub use export::{Artifact, Exporter, ExporterKind};
pub use preview::{assemble, extract_metadata, PreviewAssembler, PreviewUpdate, RefreshPolicy};
pub use session::{Session, SessionOptions};
