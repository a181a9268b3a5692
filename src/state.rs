use notify::RecommendedWatcher;
use notify_debouncer_mini::Debouncer;
use parking_lot::{Mutex, RwLock};
use std::path::PathBuf;

/// The single active preview: the file shown in the preview window and the
/// watcher bound to it. Both live and die together — there is never a
/// watcher without a path or a path without a watcher.
pub(crate) struct ActivePreview {
    pub(crate) path: PathBuf,
    /// Dropping the Debouncer stops the watcher automatically
    pub(crate) _watcher: Debouncer<RecommendedWatcher>,
}

/// Global state for the preview lifecycle, managed once per app run.
pub struct AppState {
    /// `Some` exactly while the preview window exists
    pub(crate) preview: Mutex<Option<ActivePreview>>,
    /// Focused document as reported by the frontend
    pub(crate) active_document: RwLock<Option<PathBuf>>,
    /// Cached AppConfig to avoid re-reading from disk on every request
    pub(crate) config: RwLock<crate::config::AppConfig>,
}

impl AppState {
    pub(crate) fn new(config: crate::config::AppConfig) -> Self {
        Self {
            preview: Mutex::new(None),
            active_document: RwLock::new(None),
            config: RwLock::new(config),
        }
    }

    /// Bind the preview to a new path and watcher. The previous watcher is
    /// dropped before the new binding is stored, so at most one watcher
    /// exists at any point.
    pub(crate) fn set_preview(
        &self,
        path: PathBuf,
        watcher: Debouncer<RecommendedWatcher>,
    ) {
        let mut slot = self.preview.lock();
        if let Some(previous) = slot.take() {
            drop(previous);
        }
        *slot = Some(ActivePreview {
            path,
            _watcher: watcher,
        });
    }

    /// Tear down all preview state. Called when the preview window is
    /// destroyed and on app exit.
    pub(crate) fn clear_preview(&self) {
        *self.preview.lock() = None;
    }

    /// Path currently bound to the preview, if one is open.
    pub(crate) fn preview_path(&self) -> Option<PathBuf> {
        self.preview.lock().as_ref().map(|p| p.path.clone())
    }

    pub(crate) fn is_preview_open(&self) -> bool {
        self.preview.lock().is_some()
    }
}
