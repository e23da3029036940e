//! Defaults Snapshot
//!
//! The immutable starting content of every file. It is captured once at
//! startup and only ever read afterwards (store creation and resets).
//!
//! Loading priority: built-in < user template dir < `--template` dir.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::file::FileName;

const BUILTIN_HTML: &str = include_str!("../../resources/defaults/index.html");
const BUILTIN_CSS: &str = include_str!("../../resources/defaults/styles.css");
const BUILTIN_JS: &str = include_str!("../../resources/defaults/script.js");

/// Where a default came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultSource {
    BuiltIn,
    Template(PathBuf),
}

/// Immutable default content for every recognized file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    contents: [String; 3],
    sources: [DefaultSource; 3],
}

impl Default for Defaults {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Defaults {
    /// The defaults embedded in the binary
    pub fn builtin() -> Self {
        Self {
            contents: [
                BUILTIN_HTML.to_string(),
                BUILTIN_CSS.to_string(),
                BUILTIN_JS.to_string(),
            ],
            sources: [
                DefaultSource::BuiltIn,
                DefaultSource::BuiltIn,
                DefaultSource::BuiltIn,
            ],
        }
    }

    /// Build defaults from explicit contents (useful for testing)
    pub fn from_contents(html: &str, css: &str, js: &str) -> Self {
        Self {
            contents: [html.to_string(), css.to_string(), js.to_string()],
            sources: [
                DefaultSource::BuiltIn,
                DefaultSource::BuiltIn,
                DefaultSource::BuiltIn,
            ],
        }
    }

    /// Start from the built-in defaults and override each file found in the
    /// template directories. Later directories win; missing directories are
    /// skipped.
    pub async fn load(template_dirs: &[PathBuf]) -> Result<Self> {
        let mut defaults = Self::builtin();
        for dir in template_dirs {
            defaults.load_template_dir(dir).await?;
        }
        Ok(defaults)
    }

    async fn load_template_dir(&mut self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Ok(());
        }

        for name in FileName::ALL {
            let path = dir.join(name.as_str());
            if !path.is_file() {
                continue;
            }

            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read template file: {}", path.display()))?;
            log::debug!("Default for {} taken from {}", name, path.display());
            self.contents[name.index()] = content;
            self.sources[name.index()] = DefaultSource::Template(path);
        }

        Ok(())
    }

    pub fn get(&self, name: FileName) -> &str {
        &self.contents[name.index()]
    }

    pub fn source(&self, name: FileName) -> &DefaultSource {
        &self.sources[name.index()]
    }
}
