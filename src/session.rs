//! Editing session: the descriptor store plus the background collaborators
//! feeding it.
//!
//! Collaborators run as independent tokio tasks. Each task resolves to one
//! [`Patch`] sent back over a channel; the session applies patches in the
//! order they arrive, replacing the descriptor value each time. A superseded
//! result is simply overwritten by the next one.

use crate::descriptor::{Descriptor, DescriptorStore, Patch};
use crate::platform::{self, ExportReport, ProfileLookup, UploadSlot};
use crate::template::generate;
use crate::view::{View, ViewCoordinator};
use crate::PreviewConfig;
use crate::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

pub struct Session<P: ProfileLookup + 'static> {
    store: DescriptorStore,
    config: PreviewConfig,
    view: ViewCoordinator,
    lookup: Arc<P>,
    patch_tx: UnboundedSender<Patch>,
    patch_rx: UnboundedReceiver<Patch>,
    tasks: Vec<JoinHandle<()>>,
}

impl<P: ProfileLookup + 'static> Session<P> {
    pub fn new(descriptor: Descriptor, config: PreviewConfig, lookup: P) -> Self {
        let (patch_tx, patch_rx) = mpsc::unbounded_channel();
        Self {
            store: DescriptorStore::new(descriptor),
            config,
            view: ViewCoordinator::default(),
            lookup: Arc::new(lookup),
            patch_tx,
            patch_rx,
            tasks: Vec::new(),
        }
    }

    pub fn descriptor(&self) -> &Descriptor {
        self.store.get()
    }

    pub fn store(&self) -> &DescriptorStore {
        &self.store
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn view_mut(&mut self) -> &mut ViewCoordinator {
        &mut self.view
    }

    /// Apply an edit immediately
    pub fn apply(&mut self, patch: Patch) -> bool {
        self.store.apply(patch)
    }

    /// Start a profile lookup for the current author handle.
    ///
    /// Returns `false` without spawning anything when the handle is empty.
    /// Must be called from within a tokio runtime.
    pub fn spawn_profile_lookup(&mut self) -> bool {
        let handle = self.store.get().author_handle.trim().to_string();
        if handle.is_empty() {
            return false;
        }
        self.store.apply(Patch::SetLoading(true));

        let lookup = Arc::clone(&self.lookup);
        let tx = self.patch_tx.clone();
        self.tasks.push(tokio::spawn(async move {
            let patch = platform::resolve_profile(lookup.as_ref(), &handle).await;
            let _ = tx.send(patch);
        }));
        true
    }

    /// Start encoding an image file into the given slot.
    ///
    /// A file that cannot be read produces no patch. Must be called from
    /// within a tokio runtime.
    pub fn spawn_image_ingest(&mut self, path: impl Into<PathBuf>, slot: UploadSlot) {
        let path = path.into();
        let tx = self.patch_tx.clone();
        self.tasks.push(tokio::spawn(async move {
            match platform::ingest_image(&path, slot).await {
                Ok(patch) => {
                    let _ = tx.send(patch);
                }
                Err(e) => log::warn!("could not ingest {}: {}", path.display(), e),
            }
        }));
    }

    /// Apply every patch that has arrived so far; returns how many changed
    /// the descriptor
    pub fn drain(&mut self) -> usize {
        let mut changed = 0;
        while let Ok(patch) = self.patch_rx.try_recv() {
            if self.store.apply(patch) {
                changed += 1;
            }
        }
        changed
    }

    /// Wait for every spawned task, then apply their patches
    pub async fn settle(&mut self) -> usize {
        let tasks = std::mem::take(&mut self.tasks);
        for res in futures::future::join_all(tasks).await {
            if let Err(e) = res {
                log::warn!("collaborator task failed: {}", e);
            }
        }
        self.drain()
    }

    /// Number of spawned tasks not yet awaited by [`Session::settle`]
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Markup for the current descriptor, regenerated from scratch
    pub fn markup(&self) -> String {
        generate(&self.store.snapshot())
    }

    pub fn present(&self) -> View {
        self.view.present(&self.markup(), self.config.viewport)
    }

    pub fn export(&self, dir: &Path) -> Result<ExportReport> {
        platform::write_readme(dir, &self.config.export_file_name, &self.markup())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::NoopProfileLookup;
    use crate::view::ViewMode;

    fn session(d: Descriptor) -> Session<NoopProfileLookup> {
        Session::new(d, PreviewConfig::default(), NoopProfileLookup)
    }

    #[tokio::test]
    async fn empty_handle_spawns_nothing() {
        let mut s = session(Descriptor::default());
        assert!(!s.spawn_profile_lookup());
        assert!(!s.descriptor().loading);
        assert_eq!(s.settle().await, 0);
    }

    #[tokio::test]
    async fn lookup_sets_then_clears_loading() {
        let mut s = session(Descriptor::sample());
        let logo = s.descriptor().logo_ref.clone();
        assert!(s.spawn_profile_lookup());
        assert!(s.descriptor().loading);
        s.settle().await;
        assert!(!s.descriptor().loading);
        assert_eq!(s.descriptor().logo_ref, logo);
        assert_eq!(s.pending(), 0);
    }

    #[tokio::test]
    async fn markup_follows_applied_patches() {
        let mut s = session(Descriptor::default());
        s.apply(Patch::SetTitle("Renamed".into()));
        assert!(s.markup().contains("<h1 align=\"center\">Renamed</h1>"));
        s.view_mut().set_mode(ViewMode::Raw);
        assert_eq!(s.present().as_text(), s.markup());
    }
}
