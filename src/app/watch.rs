//! Live mode: watch the workspace, keep the preview in sync and serve the
//! console on stdin.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::console::{Console, ConsoleFlow, HELP};
use super::surfaces::{ExportDir, PreviewDir, WorkspaceEditor};
use super::load_store;
use crate::config::Config;
use crate::core::FileName;
use crate::preview::RefreshScheduler;
use crate::session::{EditingSurface, ExportSurface, RenderSurface, Session, Surfaces};

/// Events from the file watcher
#[derive(Debug)]
pub enum WatcherEvent {
    FileChanged(FileName),
    WatcherError(notify::Error),
}

/// Watches the workspace directory for changes to playground files
pub struct WorkspaceWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<WatcherEvent>,
}

impl WorkspaceWatcher {
    pub fn start(dir: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let EventKind::Create(_) | EventKind::Modify(_) = event.kind {
                        for path in event.paths {
                            if let Some(name) = recognized_file(&path) {
                                let _ = tx.send(WatcherEvent::FileChanged(name));
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatcherEvent::WatcherError(e));
                }
            },
            NotifyConfig::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    pub async fn recv(&mut self) -> Option<WatcherEvent> {
        self.rx.recv().await
    }
}

fn recognized_file(path: &Path) -> Option<FileName> {
    path.file_name()?.to_str()?.parse().ok()
}

/// Run the live session until `quit` or end of input
pub async fn watch(config: &Config) -> Result<()> {
    tokio::fs::create_dir_all(&config.workspace_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create workspace directory: {}",
                config.workspace_dir.display()
            )
        })?;

    let store = load_store(config).await?;
    let (scheduler, mut ticks) = RefreshScheduler::new(config.refresh_policy);
    let surfaces = Surfaces {
        editor: WorkspaceEditor::new(&config.workspace_dir),
        preview: PreviewDir::new(&config.preview_dir),
        downloads: ExportDir::new(&config.export_dir),
    };
    let mut session = Session::new(store, config.session_options(), scheduler, surfaces);
    session.start();

    let mut watcher = WorkspaceWatcher::start(&config.workspace_dir)?;
    log::info!(
        "Watching {} ({:?}), preview at {}",
        config.workspace_dir.display(),
        config.refresh_policy,
        config.preview_dir.display()
    );
    println!("{}", HELP);

    let mut console = Console::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(ticket) = ticks.recv() => {
                session.on_refresh_due(ticket);
            }
            Some(event) = watcher.recv() => {
                handle_watcher_event(&mut session, config, event).await;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let reply = console.handle_line(&mut session, &line);
                    if let Some(message) = reply.message {
                        println!("{}", message);
                    }
                    if reply.flow == ConsoleFlow::Quit {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    log::warn!("Failed to read console input: {}", e);
                    break;
                }
            },
        }
    }

    log::info!("Session ended");
    Ok(())
}

/// Feed a changed workspace file into the session
pub async fn handle_watcher_event<E, R, X>(
    session: &mut Session<E, R, X>,
    config: &Config,
    event: WatcherEvent,
) where
    E: EditingSurface,
    R: RenderSurface,
    X: ExportSurface,
{
    match event {
        WatcherEvent::FileChanged(name) => {
            let path = config.file_path(name);
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    log::debug!("Skipping change to {}: {}", path.display(), e);
                    return;
                }
            };

            // Echo of our own write, or a save without changes
            if content == session.store().get(name) {
                return;
            }

            log::info!("{} changed on disk", name);
            session.edit(name, content);
        }
        WatcherEvent::WatcherError(e) => {
            log::error!("Workspace watcher error: {}", e);
        }
    }
}
