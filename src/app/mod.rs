//! Command-line front end
//!
//! Wires configuration, logging and the filesystem surfaces to the
//! playground core, one function per subcommand.

pub mod console;
pub mod surfaces;
pub mod watch;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{Command, Config};
use crate::core::{Defaults, FileName, FileStore};
use crate::preview::{PreviewAssembler, RefreshPolicy, RefreshScheduler};
use crate::session::{MemoryEditor, MemoryPreview, RenderSurface, Session, Surfaces};
use surfaces::{ExportDir, PreviewDir};

/// Parse arguments, set up logging and run the requested subcommand
pub async fn run() -> Result<()> {
    let (config, command) = Config::from_args_and_env()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    if let Some(path) = &config.project_config_path {
        log::debug!("Using project config {}", path.display());
    }

    execute(&config, &command).await
}

/// Run a subcommand with an already resolved configuration
pub async fn execute(config: &Config, command: &Command) -> Result<()> {
    match command {
        Command::Init { force } => init_workspace(config, *force).await,
        Command::Build { out } => build(config, out.as_deref()).await,
        Command::Watch { .. } => watch::watch(config).await,
        Command::Export { file, all, .. } => export(config, *file, *all).await,
    }
}

/// Defaults from the template directories, overlaid with whatever playground
/// files exist in the workspace
pub async fn load_store(config: &Config) -> Result<FileStore> {
    let defaults = Arc::new(Defaults::load(&config.template_dirs).await?);
    let mut store = FileStore::new(defaults);

    for name in FileName::ALL {
        let path = config.file_path(name);
        if !path.is_file() {
            continue;
        }
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        store.set(name, content);
    }

    Ok(store)
}

/// Write the default files into the workspace. Existing files are kept
/// unless `force` is set.
pub async fn init_workspace(config: &Config, force: bool) -> Result<()> {
    let defaults = Defaults::load(&config.template_dirs).await?;
    tokio::fs::create_dir_all(&config.workspace_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create workspace directory: {}",
                config.workspace_dir.display()
            )
        })?;

    for name in FileName::ALL {
        let path = config.file_path(name);
        if path.exists() && !force {
            log::info!("Keeping existing {}", path.display());
            continue;
        }
        tokio::fs::write(&path, defaults.get(name))
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Created {}", path.display());
    }

    Ok(())
}

/// Assemble the preview once
pub async fn build(config: &Config, out: Option<&Path>) -> Result<()> {
    let store = load_store(config).await?;
    let update = PreviewAssembler::new(config.metadata.clone()).render(&store);

    match out {
        Some(path) if path == Path::new("-") => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(update.document.as_bytes())
                .context("Failed to write preview to stdout")?;
            stdout.flush()?;
        }
        Some(path) => {
            tokio::fs::write(path, &update.document)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => PreviewDir::new(&config.preview_dir).publish(&update)?,
    }

    log::info!("Title: {}", update.metadata.title);
    log::info!("Icon: {}", update.metadata.icon);
    Ok(())
}

/// One-shot export of the workspace files
pub async fn export(config: &Config, file: Option<FileName>, all: bool) -> Result<()> {
    let store = load_store(config).await?;
    let (scheduler, _ticks) = RefreshScheduler::new(RefreshPolicy::Immediate);
    let surfaces = Surfaces {
        editor: MemoryEditor::default(),
        preview: MemoryPreview::default(),
        downloads: ExportDir::new(&config.export_dir),
    };
    let mut session = Session::new(store, config.session_options(), scheduler, surfaces);

    if all {
        let count = session.export_all()?;
        println!(
            "Exported {} artifact(s) to {}",
            count,
            session.downloads().dir().display()
        );
    } else {
        session.select(file.unwrap_or(FileName::Html));
        session.export_current()?;
        println!(
            "Exported {} to {}",
            session.current(),
            session.downloads().dir().display()
        );
    }

    Ok(())
}
