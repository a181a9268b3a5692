//! Preview window lifecycle: single window, single watcher, rebound on
//! every file switch, torn down when the window closes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tauri::{AppHandle, Manager, State, WebviewUrl, WebviewWindowBuilder, WindowEvent};
use tauri_plugin_opener::OpenerExt;
use url::Url;

use crate::watch::PreviewRefreshedPayload;
use crate::{resolver, AppState};

pub(crate) const PREVIEW_WINDOW_LABEL: &str = "preview";

/// URL the preview window navigates to. The document itself is produced by
/// the `preview` URI scheme handler, which serves the currently bound file.
/// Windows webviews expose custom schemes under `http://{scheme}.localhost`.
fn document_url() -> &'static str {
    #[cfg(windows)]
    {
        "http://preview.localhost/"
    }
    #[cfg(not(windows))]
    {
        "preview://localhost/"
    }
}

fn window_title(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("Preview: {name}")
}

/// Open the preview for `path`, reusing the existing window when one is
/// open. Rebinds the change watcher to `path` in both cases; the previous
/// watcher is dropped before the new one is created.
pub(crate) fn open_preview_window(app_handle: &AppHandle, path: PathBuf) -> Result<(), String> {
    let state = app_handle.state::<Arc<AppState>>();
    let debounce = Duration::from_millis(state.config.read().debounce_ms);

    // Dispose the previous watcher before creating the new one: at most one
    // watcher may exist at any instant, and a stale one must never fire for
    // a path about to be unbound. The new binding is stored before the
    // window (re)loads so the protocol handler serves the new document.
    state.clear_preview();
    let watcher = crate::watch::bind(app_handle, &path, debounce)?;
    state.set_preview(path.clone(), watcher);

    if let Some(window) = app_handle.get_webview_window(PREVIEW_WINDOW_LABEL) {
        // Reuse: bring to front and reload for the (possibly new) path
        window
            .set_title(&window_title(&path))
            .map_err(|e| format!("Failed to set preview title: {e}"))?;
        window
            .eval("window.location.reload()")
            .map_err(|e| format!("Failed to reload preview: {e}"))?;
        let _ = window.show();
        let _ = window.unminimize();
        let _ = window.set_focus();
        return Ok(());
    }

    let url = Url::parse(document_url()).map_err(|e| format!("Invalid preview URL: {e}"))?;
    let window = WebviewWindowBuilder::new(
        app_handle,
        PREVIEW_WINDOW_LABEL,
        WebviewUrl::CustomProtocol(url),
    )
    .title(window_title(&path))
    .inner_size(1000.0, 750.0)
    .build()
    .map_err(|e| {
        // No window means no bound state either
        state.clear_preview();
        format!("Failed to create preview window: {e}")
    })?;

    // Cleanup on window close: the watcher is dropped in the same event
    // turn, so it can never outlive the window it refreshes.
    let handle = app_handle.clone();
    window.on_window_event(move |event| {
        if matches!(event, WindowEvent::Destroyed) {
            handle.state::<Arc<AppState>>().clear_preview();
        }
    });

    Ok(())
}

/// Reload the current preview content. No-op when no preview is open.
fn reload_preview(app_handle: &AppHandle) -> Result<(), String> {
    let state = app_handle.state::<Arc<AppState>>();
    let Some(path) = state.preview_path() else {
        return Ok(());
    };
    let Some(window) = app_handle.get_webview_window(PREVIEW_WINDOW_LABEL) else {
        return Ok(());
    };

    window
        .eval("window.location.reload()")
        .map_err(|e| format!("Failed to reload preview: {e}"))?;

    use tauri::Emitter;
    let _ = app_handle.emit(
        "preview-refreshed",
        PreviewRefreshedPayload {
            path: path.to_string_lossy().into_owned(),
        },
    );
    Ok(())
}

// --- Tauri commands ---

/// Resolve an HTML file (active document, workspace candidates, file picker)
/// and open or reuse the preview. Silent no-op when nothing resolves.
/// Async so the blocking file picker never runs on the main thread.
#[tauri::command]
pub(crate) async fn open_preview(app_handle: AppHandle) -> Result<(), String> {
    match resolver::resolve_html_file(&app_handle) {
        Some(path) => open_preview_window(&app_handle, path),
        None => Ok(()),
    }
}

/// Open the preview for an exact path (also invoked programmatically by
/// other tools). Silently does nothing when the path is not a file on disk.
#[tauri::command]
pub(crate) fn open_file(app_handle: AppHandle, path: String) -> Result<(), String> {
    let path = PathBuf::from(path);
    if path.is_file() {
        open_preview_window(&app_handle, path)
    } else {
        Ok(())
    }
}

/// Reload the current preview content, if one is open.
#[tauri::command]
pub(crate) fn refresh_preview(app_handle: AppHandle) -> Result<(), String> {
    reload_preview(&app_handle)
}

/// Hand the previewed file to the system default handler (browser), if a
/// preview is open.
#[tauri::command]
pub(crate) fn open_in_browser(app_handle: AppHandle) -> Result<(), String> {
    let state = app_handle.state::<Arc<AppState>>();
    let Some(path) = state.preview_path() else {
        return Ok(());
    };

    app_handle
        .opener()
        .open_path(path.to_string_lossy(), None::<&str>)
        .map_err(|e| format!("Failed to open in browser: {e}"))
}

/// Snapshot of the preview lifecycle for the frontend.
#[tauri::command]
pub(crate) fn preview_status(state: State<'_, Arc<AppState>>) -> serde_json::Value {
    let path = state.preview_path();
    serde_json::json!({
        "open": path.is_some(),
        "path": path.map(|p| p.to_string_lossy().into_owned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_uses_file_name() {
        assert_eq!(
            window_title(Path::new("/work/docs/story.html")),
            "Preview: story.html"
        );
    }

    #[test]
    fn document_url_parses() {
        assert!(Url::parse(document_url()).is_ok());
    }
}
