//! Playground Session
//!
//! The session owns the file store and is the single entry point for UI
//! events: typing, tab switches, resets, exports and shortcuts. It is
//! driven from one event loop, so it needs no locking; handlers get
//! `&mut Session`.

pub mod keymap;
pub mod surface;

pub use keymap::{KeyBinding, KeyOutcome, KeyPress, Modifier};
pub use surface::{
    EditingSurface, ExportSurface, MemoryDownloads, MemoryEditor, MemoryPreview, RenderSurface,
    Surfaces,
};

use anyhow::Result;

use crate::core::{FileName, FileStore};
use crate::export::{self, ExportOptions, Exporter, ExporterKind, PerFileExporter};
use crate::preview::{
    MetadataOptions, PreviewAssembler, PreviewUpdate, RefreshScheduler, RefreshTicket, Schedule,
};

/// Settings a session is built with
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub metadata: MetadataOptions,
    pub export: ExportOptions,
    pub save_binding: KeyBinding,
}

/// One live playground: files, preview pipeline and surfaces
pub struct Session<E, R, X> {
    store: FileStore,
    assembler: PreviewAssembler,
    scheduler: RefreshScheduler,
    exporter: Box<dyn Exporter>,
    save_binding: KeyBinding,
    surfaces: Surfaces<E, R, X>,
    last_update: Option<PreviewUpdate>,
    refresh_count: u64,
}

impl<E, R, X> Session<E, R, X>
where
    E: EditingSurface,
    R: RenderSurface,
    X: ExportSurface,
{
    /// Build a session around an already loaded store
    pub fn new(
        store: FileStore,
        options: SessionOptions,
        scheduler: RefreshScheduler,
        surfaces: Surfaces<E, R, X>,
    ) -> Self {
        let exporter = export::select_exporter(&options.export);
        Self {
            store,
            assembler: PreviewAssembler::new(options.metadata),
            scheduler,
            exporter,
            save_binding: options.save_binding,
            surfaces,
            last_update: None,
            refresh_count: 0,
        }
    }

    /// Replace the all-files exporter chosen from the options
    pub fn with_exporter(mut self, exporter: Box<dyn Exporter>) -> Self {
        self.exporter = exporter;
        self
    }

    /// Show the current file and render the first preview. Any refresh
    /// scheduled while loading is folded into this one.
    pub fn start(&mut self) {
        self.show_current();
        if self.scheduler.schedule_now() == Schedule::Now {
            self.refresh();
        }
    }

    /// Editor input: the current file now holds `text`
    pub fn input(&mut self, text: impl Into<String>) {
        self.edit(self.store.current(), text);
    }

    /// Replace the content of `name` and schedule a refresh
    pub fn edit(&mut self, name: FileName, text: impl Into<String>) {
        self.store.set(name, text);
        log::debug!("Edited {}", name);
        self.request_refresh();
    }

    /// Switch the editor to another file. Content is untouched.
    pub fn select(&mut self, name: FileName) {
        self.store.set_current(name);
        self.show_current();
    }

    /// Restore every file to its default. A declined confirmation is a
    /// no-op. Returns whether the reset happened.
    pub fn reset(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            log::debug!("Reset declined");
            return false;
        }

        self.store.reset_all();
        self.sync_hidden();
        self.show_current();
        if self.scheduler.schedule_now() == Schedule::Now {
            self.refresh();
        }
        log::info!("All files reset to defaults");
        true
    }

    /// Deliver the current file as a download
    pub fn export_current(&mut self) -> Result<()> {
        let artifact = export::export_current(&self.store);
        self.surfaces.downloads.deliver(&artifact)?;
        log::info!("Exported {}", artifact.file_name);
        Ok(())
    }

    /// Deliver every file, either as one archive or file by file.
    /// Returns the number of artifacts delivered.
    pub fn export_all(&mut self) -> Result<usize> {
        let artifacts = match self.exporter.export_all(&self.store) {
            Ok(artifacts) => artifacts,
            Err(e) => {
                log::warn!("Archive export failed ({:#}), exporting files individually", e);
                PerFileExporter.export_all(&self.store)?
            }
        };

        for artifact in &artifacts {
            self.surfaces.downloads.deliver(artifact)?;
        }
        log::info!("Exported {} artifact(s)", artifacts.len());
        Ok(artifacts.len())
    }

    /// Route a key press. The save binding exports the current file and
    /// asks the host to suppress its default action.
    pub fn handle_key(&mut self, press: &KeyPress) -> Result<KeyOutcome> {
        if !self.save_binding.matches(press) {
            return Ok(KeyOutcome::Ignored);
        }
        self.export_current()?;
        Ok(KeyOutcome::Handled {
            prevent_default: true,
        })
    }

    /// A debounce timer fired. Returns whether a refresh ran.
    pub fn on_refresh_due(&mut self, ticket: RefreshTicket) -> bool {
        if !self.scheduler.claim(ticket) {
            return false;
        }
        self.refresh();
        true
    }

    /// Recompute the preview now and publish it
    pub fn refresh(&mut self) {
        let update = self.assembler.render(&self.store);
        if let Err(e) = self.surfaces.preview.publish(&update) {
            log::warn!("Failed to publish preview: {:#}", e);
        }
        log::debug!("Preview refreshed: {}", update.metadata.title);
        self.last_update = Some(update);
        self.refresh_count += 1;
    }

    fn request_refresh(&mut self) {
        if self.scheduler.schedule() == Schedule::Now {
            self.refresh();
        }
    }

    fn sync_hidden(&mut self) {
        let current = self.store.current();
        for (name, content) in self.store.iter().filter(|(name, _)| *name != current) {
            if let Err(e) = self.surfaces.editor.sync(name, content) {
                log::warn!("Failed to reload {} into the editor: {:#}", name, e);
            }
        }
    }

    fn show_current(&mut self) {
        let current = self.store.current();
        if let Err(e) = self
            .surfaces
            .editor
            .show(current, self.store.get(current))
        {
            log::warn!("Failed to load {} into the editor: {:#}", current, e);
        }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn current(&self) -> FileName {
        self.store.current()
    }

    /// The most recently published preview
    pub fn last_update(&self) -> Option<&PreviewUpdate> {
        self.last_update.as_ref()
    }

    /// How many times the composite document has been recomputed
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn exporter_kind(&self) -> ExporterKind {
        self.exporter.kind()
    }

    pub fn save_binding(&self) -> KeyBinding {
        self.save_binding
    }

    pub fn editor(&self) -> &E {
        &self.surfaces.editor
    }

    pub fn preview(&self) -> &R {
        &self.surfaces.preview
    }

    pub fn downloads(&self) -> &X {
        &self.surfaces.downloads
    }
}

/// Session over the in-memory surfaces
pub type MemorySession = Session<MemoryEditor, MemoryPreview, MemoryDownloads>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Defaults;
    use crate::preview::RefreshPolicy;
    use std::sync::Arc;

    fn immediate_session() -> MemorySession {
        let (scheduler, _rx) = RefreshScheduler::new(RefreshPolicy::Immediate);
        let mut session = Session::new(
            FileStore::new(Arc::new(Defaults::builtin())),
            SessionOptions::default(),
            scheduler,
            Surfaces::default(),
        );
        session.start();
        session
    }

    #[test]
    fn test_start_shows_html_and_renders() {
        let session = immediate_session();
        assert_eq!(session.editor().visible().unwrap().0, FileName::Html);
        assert_eq!(session.refresh_count(), 1);
        assert_eq!(
            session.last_update().unwrap().metadata.title,
            "Hello Preview"
        );
    }

    #[test]
    fn test_input_writes_current_file_only() {
        let mut session = immediate_session();
        session.select(FileName::Script);
        session.input("console.log('typed');");

        assert_eq!(session.store().get(FileName::Script), "console.log('typed');");
        assert!(session.store().is_default(FileName::Stylesheet));
        assert_eq!(session.refresh_count(), 2);
        assert!(session
            .preview()
            .latest()
            .unwrap()
            .document
            .contains("<script>\nconsole.log('typed');\n</script>"));
    }

    #[test]
    fn test_declined_reset_is_noop() {
        let mut session = immediate_session();
        session.input("<p>changed</p>");
        let shown = session.editor().shown.len();

        assert!(!session.reset(false));
        assert_eq!(session.store().get(FileName::Html), "<p>changed</p>");
        assert_eq!(session.editor().shown.len(), shown);
    }

    #[test]
    fn test_reset_syncs_files_not_shown() {
        let mut session = immediate_session();
        session.edit(FileName::Html, "<p>changed</p>");
        session.edit(FileName::Script, "changed();");
        session.select(FileName::Stylesheet);

        assert!(session.reset(true));

        let synced: Vec<_> = session.editor().synced.iter().map(|(name, _)| *name).collect();
        assert_eq!(synced, [FileName::Html, FileName::Script]);
        assert!(session
            .editor()
            .synced
            .iter()
            .all(|(name, content)| session.store().defaults().get(*name) == content));
        assert_eq!(session.editor().visible().unwrap().0, FileName::Stylesheet);
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let mut session = immediate_session();
        let outcome = session.handle_key(&KeyPress::ctrl('p')).unwrap();
        assert_eq!(outcome, KeyOutcome::Ignored);
        assert!(session.downloads().artifacts.is_empty());
    }
}
