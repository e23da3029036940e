//! Core Data Model
//!
//! Recognized file names, the defaults snapshot and the file store.

pub mod defaults;
pub mod file;
pub mod store;

pub use defaults::{DefaultSource, Defaults};
pub use file::FileName;
pub use store::FileStore;
