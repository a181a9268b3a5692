//! Custom `preview://` URI scheme.
//!
//! The preview window always points at `preview://localhost/`; the handler
//! serves the currently bound document with its asset references rewritten.
//! Asset requests themselves go through Tauri's built-in asset protocol and
//! never reach this handler.

use std::sync::Arc;
use tauri::http::{Response, StatusCode};
use tauri::Manager;

use crate::{rewrite, AppState};

pub(crate) fn register_preview_protocol(
    builder: tauri::Builder<tauri::Wry>,
) -> tauri::Builder<tauri::Wry> {
    builder.register_uri_scheme_protocol("preview", |ctx, request| {
        let path = request.uri().path();

        if path != "/" && !path.is_empty() {
            return Response::builder()
                .status(StatusCode::NOT_FOUND)
                .header("Content-Type", "text/plain")
                .body(b"Not found".to_vec())
                .unwrap();
        }

        let state = ctx.app_handle().state::<Arc<AppState>>();
        let Some(file) = state.preview_path() else {
            return Response::builder()
                .status(StatusCode::NOT_FOUND)
                .header("Content-Type", "text/plain")
                .body(b"No active preview".to_vec())
                .unwrap();
        };

        // A read failure degrades to the in-panel error document, so the
        // response is always a page
        let html = rewrite::render_document(&file);

        Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(html.into_bytes())
            .unwrap()
    })
}
