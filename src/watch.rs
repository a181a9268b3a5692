use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind, Debouncer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tauri::{AppHandle, Emitter, Manager};

use crate::preview::PREVIEW_WINDOW_LABEL;

/// Payload emitted when the previewed file changes on disk and the panel
/// reloads. The frontend shows this as a transient status message.
#[derive(Clone, serde::Serialize)]
pub(crate) struct PreviewRefreshedPayload {
    pub path: String,
}

/// Watch a single file for change/create events.
///
/// The watch is placed on the parent directory (non-recursive) and filtered
/// by file name, so editors that replace the file on save keep triggering.
/// `on_change` runs on the notify thread after the debounce window closes.
/// Dropping the returned Debouncer stops the watcher.
pub(crate) fn watch_file<F>(
    path: &Path,
    debounce: Duration,
    on_change: F,
) -> Result<Debouncer<RecommendedWatcher>, String>
where
    F: Fn() + Send + 'static,
{
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| format!("Not a watchable file: {}", path.display()))?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut debouncer = new_debouncer(
        debounce,
        move |events: Result<Vec<DebouncedEvent>, notify::Error>| {
            let Ok(events) = events else { return };

            // Only data-change events for the watched file itself
            let hit = events.iter().any(|e| {
                matches!(e.kind, DebouncedEventKind::Any)
                    && e.path.file_name() == Some(file_name.as_os_str())
            });

            if hit {
                on_change();
            }
        },
    )
    .map_err(|e| format!("Failed to create watcher: {e}"))?;

    debouncer
        .watcher()
        .watch(&parent, RecursiveMode::NonRecursive)
        .map_err(|e| format!("Failed to watch {}: {e}", parent.display()))?;

    Ok(debouncer)
}

/// Bind a change watcher to the previewed file: on change the preview window
/// reloads the same path and a `preview-refreshed` event is emitted.
pub(crate) fn bind(
    app_handle: &AppHandle,
    path: &Path,
    debounce: Duration,
) -> Result<Debouncer<RecommendedWatcher>, String> {
    let handle = app_handle.clone();
    let watched = path.to_string_lossy().into_owned();

    watch_file(path, debounce, move || {
        if let Some(window) = handle.get_webview_window(PREVIEW_WINDOW_LABEL) {
            if let Err(e) = window.eval("window.location.reload()") {
                eprintln!("[Watcher] Failed to reload preview: {e}");
            }
        }
        let _ = handle.emit(
            "preview-refreshed",
            PreviewRefreshedPayload {
                path: watched.clone(),
            },
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn payload_serialization() {
        let payload = PreviewRefreshedPayload {
            path: "/home/user/demo.html".to_string(),
        };
        let json = serde_json::to_string(&payload).expect("should serialize");
        assert!(json.contains("path"));
        assert!(json.contains("/home/user/demo.html"));
    }

    #[test]
    fn watch_file_rejects_pathless_input() {
        assert!(watch_file(Path::new("/"), Duration::from_millis(50), || {}).is_err());
    }

    #[test]
    fn watch_file_fires_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.html");
        std::fs::write(&file, "<html></html>").unwrap();

        let (tx, rx) = mpsc::channel::<()>();
        let _watcher = watch_file(&file, Duration::from_millis(100), move || {
            let _ = tx.send(());
        })
        .expect("watcher should bind");

        // Give the watcher a moment to register, then touch the file
        std::thread::sleep(Duration::from_millis(200));
        std::fs::write(&file, "<html><body>changed</body></html>").unwrap();

        rx.recv_timeout(Duration::from_secs(5))
            .expect("change event should arrive");
    }

    #[test]
    fn watch_file_ignores_sibling_files() {
        let dir = tempfile::tempdir().unwrap();
        let watched = dir.path().join("page.html");
        let sibling = dir.path().join("other.html");
        std::fs::write(&watched, "<html></html>").unwrap();
        std::fs::write(&sibling, "<html></html>").unwrap();

        let (tx, rx) = mpsc::channel::<()>();
        let _watcher = watch_file(&watched, Duration::from_millis(100), move || {
            let _ = tx.send(());
        })
        .expect("watcher should bind");

        std::thread::sleep(Duration::from_millis(200));
        std::fs::write(&sibling, "changed").unwrap();

        // No event for a different file in the same directory
        assert!(rx.recv_timeout(Duration::from_millis(800)).is_err());
    }

    #[test]
    fn dropping_the_watcher_stops_events() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.html");
        std::fs::write(&file, "<html></html>").unwrap();

        let (tx, rx) = mpsc::channel::<()>();
        let watcher = watch_file(&file, Duration::from_millis(100), move || {
            let _ = tx.send(());
        })
        .expect("watcher should bind");

        drop(watcher);
        std::thread::sleep(Duration::from_millis(100));
        std::fs::write(&file, "changed").unwrap();

        assert!(rx.recv_timeout(Duration::from_millis(800)).is_err());
    }
}
