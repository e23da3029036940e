//! Configuration management for the playground.
//!
//! Handles:
//! - Command-line argument parsing
//! - Project configuration (`.playground.toml` in the workspace)
//! - Template directories for the default file contents
//!
//! Precedence: command line > project config > built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use url::Url;

use crate::core::FileName;
use crate::export::{ExportOptions, DEFAULT_ARCHIVE_NAME};
use crate::preview::metadata::{DEFAULT_FALLBACK_ICON, DEFAULT_FALLBACK_TITLE};
use crate::preview::{MetadataOptions, RefreshPolicy};
use crate::session::{KeyBinding, SessionOptions};

/// Name of the project configuration file looked up in the workspace
pub const PROJECT_CONFIG_FILE: &str = ".playground.toml";

const DEFAULT_PREVIEW_DIR: &str = ".playground/preview";
const DEFAULT_EXPORT_DIR: &str = "exports";

/// Command-line arguments for the playground
#[derive(Debug, Parser)]
#[command(name = "playground")]
#[command(about = "Live preview playground for an HTML, CSS and JavaScript file set")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Workspace directory holding index.html, styles.css and script.js
    #[arg(long, global = true, help = "Workspace directory (default: current directory)")]
    pub dir: Option<PathBuf>,

    /// Explicit project configuration file
    #[arg(long, global = true, help = "Path to a playground TOML config file")]
    pub config: Option<PathBuf>,

    /// Directory with default file contents used for reset
    #[arg(long, global = true, help = "Template directory overriding the default files")]
    pub template: Option<PathBuf>,

    /// Ignore `<config_dir>/playground/template`
    #[arg(long, global = true, help = "Skip the user template directory")]
    pub no_user_template: bool,

    /// Log level for the playground
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Write the default files into the workspace
    Init {
        /// Overwrite files that already exist
        #[arg(long)]
        force: bool,
    },
    /// Assemble the preview document once
    Build {
        /// Output file, `-` for stdout (default: <preview dir>/index.html)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Watch the workspace and keep the preview up to date
    Watch {
        /// Directory receiving index.html and preview.json
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Quiet window before a refresh, in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
        /// Refresh on every change instead of debouncing
        #[arg(long, conflicts_with = "debounce_ms")]
        immediate: bool,
    },
    /// Export one file or the whole file set
    Export {
        /// File to export (default: index.html)
        #[arg(long, conflicts_with = "all")]
        file: Option<FileName>,
        /// Export every file
        #[arg(long)]
        all: bool,
        /// Destination directory
        #[arg(long)]
        dest: Option<PathBuf>,
        /// Export files individually even when archives are supported
        #[arg(long)]
        no_archive: bool,
    },
}

/// Contents of `.playground.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub preview: PreviewSection,
    pub export: ExportSection,
    pub keys: KeysSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewSection {
    pub debounce_ms: Option<u64>,
    pub fallback_title: Option<String>,
    pub fallback_icon: Option<String>,
    pub base_url: Option<String>,
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSection {
    pub archive: Option<bool>,
    pub archive_name: Option<String>,
    pub dest: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeysSection {
    pub save: Option<String>,
}

impl ProjectConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse playground config TOML")
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the playground files
    pub workspace_dir: PathBuf,
    /// Project config that was loaded, if any
    pub project_config_path: Option<PathBuf>,
    /// Template directories, lowest priority first
    pub template_dirs: Vec<PathBuf>,
    pub refresh_policy: RefreshPolicy,
    pub metadata: MetadataOptions,
    pub export: ExportOptions,
    /// Where exports are written
    pub export_dir: PathBuf,
    /// Where the watch/build preview is written
    pub preview_dir: PathBuf,
    pub save_binding: KeyBinding,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<(Self, Command)> {
        let args = Args::parse();
        let config = Self::from_args(&args)?;
        Ok((config, args.command))
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: &Args) -> Result<Self> {
        let workspace_dir = args.dir.clone().unwrap_or_else(|| PathBuf::from("."));

        let project_config_path = match &args.config {
            Some(path) => Some(path.clone()),
            None => Some(workspace_dir.join(PROJECT_CONFIG_FILE)).filter(|path| path.is_file()),
        };
        let project = match &project_config_path {
            Some(path) => ProjectConfig::load(path)?,
            None => ProjectConfig::default(),
        };

        let mut template_dirs = Vec::new();
        if let Some(config_dir) = dirs::config_dir().filter(|_| !args.no_user_template) {
            template_dirs.push(config_dir.join("playground").join("template"));
        }
        if let Some(template) = &args.template {
            template_dirs.push(template.clone());
        }

        let base_url = project
            .preview
            .base_url
            .as_deref()
            .map(|raw| Url::parse(raw).with_context(|| format!("Invalid base_url '{}'", raw)))
            .transpose()?;
        let metadata = MetadataOptions {
            fallback_title: project
                .preview
                .fallback_title
                .clone()
                .unwrap_or_else(|| DEFAULT_FALLBACK_TITLE.to_string()),
            fallback_icon: project
                .preview
                .fallback_icon
                .clone()
                .unwrap_or_else(|| DEFAULT_FALLBACK_ICON.to_string()),
            base_url,
        };

        let save_binding = match &project.keys.save {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid save key binding '{}'", raw))?,
            None => KeyBinding::SAVE,
        };

        let mut config = Config {
            refresh_policy: project
                .preview
                .debounce_ms
                .map(RefreshPolicy::from_millis)
                .unwrap_or_default(),
            metadata,
            export: ExportOptions {
                archive: project.export.archive.unwrap_or(true),
                archive_name: project
                    .export
                    .archive_name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string()),
            },
            export_dir: workspace_dir.join(
                project
                    .export
                    .dest
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR)),
            ),
            preview_dir: workspace_dir.join(
                project
                    .preview
                    .out_dir
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_PREVIEW_DIR)),
            ),
            save_binding,
            log_level: args.log_level.clone(),
            template_dirs,
            project_config_path,
            workspace_dir,
        };

        config.apply_command(&args.command);
        Ok(config)
    }

    /// Command-line flags of the subcommand win over everything else
    fn apply_command(&mut self, command: &Command) {
        match command {
            Command::Watch {
                out_dir,
                debounce_ms,
                immediate,
            } => {
                if let Some(out_dir) = out_dir {
                    self.preview_dir = out_dir.clone();
                }
                if *immediate {
                    self.refresh_policy = RefreshPolicy::Immediate;
                } else if let Some(millis) = debounce_ms {
                    self.refresh_policy = RefreshPolicy::from_millis(*millis);
                }
            }
            Command::Export {
                dest, no_archive, ..
            } => {
                if let Some(dest) = dest {
                    self.export_dir = dest.clone();
                }
                if *no_archive {
                    self.export.archive = false;
                }
            }
            Command::Init { .. } | Command::Build { .. } => {}
        }
    }

    pub fn has_project_config(&self) -> bool {
        self.project_config_path.is_some()
    }

    /// Path of a playground file inside the workspace
    pub fn file_path(&self, name: FileName) -> PathBuf {
        self.workspace_dir.join(name.as_str())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            metadata: self.metadata.clone(),
            export: self.export.clone(),
            save_binding: self.save_binding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_project_config() {
        let project = ProjectConfig::from_toml_str(
            r#"
[preview]
debounce_ms = 0
fallback_title = "Untitled"
base_url = "https://play.example/"

[export]
archive = false
dest = "out"

[keys]
save = "ctrl+s"
"#,
        )
        .expect("parse config");

        assert_eq!(project.preview.debounce_ms, Some(0));
        assert_eq!(project.preview.fallback_title.as_deref(), Some("Untitled"));
        assert_eq!(project.preview.fallback_icon, None);
        assert_eq!(project.export.archive, Some(false));
        assert_eq!(project.export.dest, Some(PathBuf::from("out")));
        assert_eq!(project.keys.save.as_deref(), Some("ctrl+s"));
    }

    #[test]
    fn test_empty_project_config() {
        let project = ProjectConfig::from_toml_str("").expect("parse config");
        assert_eq!(project, ProjectConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(ProjectConfig::from_toml_str("[preview]\ndebounce = 5\n").is_err());
    }
}
