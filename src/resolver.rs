//! Decides which HTML file to preview.
//!
//! Resolution order: the frontend-reported active document (if it is an
//! `.html` file), then well-known filenames under the first workspace root,
//! then an interactive file picker. "Nothing found" and "picker cancelled"
//! are normal empty results, never errors.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tauri::{AppHandle, Manager, State};
use tauri_plugin_dialog::DialogExt;

use crate::AppState;

/// Well-known output filenames probed under the first workspace root,
/// in priority order.
const CANDIDATE_FILES: &[&str] = &["index.html", "demo.html", "walkthrough.html"];

/// Whether a path names an HTML document by extension.
fn is_html_document(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".html"))
}

/// First well-known candidate that exists directly under `root`.
fn find_candidate(root: &Path) -> Option<PathBuf> {
    CANDIDATE_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|candidate| candidate.is_file())
}

/// Blocking single-file picker restricted to HTML files. Returns `None` when
/// the user cancels. Must not be called on the main thread.
fn pick_html_file(app_handle: &AppHandle) -> Option<PathBuf> {
    app_handle
        .dialog()
        .file()
        .add_filter("HTML Files", &["html", "htm"])
        .set_title("Select an HTML file to preview")
        .blocking_pick_file()
        .and_then(|file| file.into_path().ok())
}

/// Resolve the HTML file to preview:
/// 1. the active document, if it is an HTML file
/// 2. well-known filenames under the first configured workspace root
/// 3. the file picker
pub(crate) fn resolve_html_file(app_handle: &AppHandle) -> Option<PathBuf> {
    let state = app_handle.state::<Arc<AppState>>();

    if let Some(doc) = state.active_document.read().clone() {
        if is_html_document(&doc) {
            return Some(doc);
        }
    }

    let roots = state.config.read().workspace_roots.clone();
    if let Some(root) = roots.first() {
        if let Some(candidate) = find_candidate(Path::new(root)) {
            return Some(candidate);
        }
    }

    pick_html_file(app_handle)
}

// --- Tauri commands ---

/// Frontend reports the currently focused document (or none).
#[tauri::command]
pub(crate) fn set_active_document(
    state: State<'_, Arc<AppState>>,
    path: Option<String>,
) {
    *state.active_document.write() = path.map(PathBuf::from);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn html_extension_is_recognized() {
        assert!(is_html_document(Path::new("/work/demo.html")));
        assert!(!is_html_document(Path::new("/work/demo.htm")));
        assert!(!is_html_document(Path::new("/work/notes.md")));
        assert!(!is_html_document(Path::new("/work/html")));
    }

    #[test]
    fn candidates_are_probed_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("walkthrough.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("demo.html"), "<html></html>").unwrap();

        // demo.html outranks walkthrough.html
        assert_eq!(
            find_candidate(dir.path()),
            Some(dir.path().join("demo.html"))
        );

        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        assert_eq!(
            find_candidate(dir.path()),
            Some(dir.path().join("index.html"))
        );
    }

    #[test]
    fn no_candidate_in_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_candidate(dir.path()), None);
    }

    #[test]
    fn candidate_must_be_a_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("index.html")).unwrap();
        assert_eq!(find_candidate(dir.path()), None);
    }
}
