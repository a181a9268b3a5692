pub(crate) mod config;
pub(crate) mod preview;
pub(crate) mod protocol;
pub(crate) mod resolver;
pub(crate) mod rewrite;
pub(crate) mod state;
pub(crate) mod watch;

use std::sync::Arc;
use tauri::Manager;

pub(crate) use state::AppState;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let config = config::load_app_config_from_disk();
    let state = Arc::new(AppState::new(config));

    let builder = tauri::Builder::default();
    let builder = protocol::register_preview_protocol(builder);
    builder
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_window_state::Builder::new().build())
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            // Focus the existing window when another instance is launched
            if let Some(window) = app.get_webview_window("main") {
                let _ = window.unminimize();
                let _ = window.set_focus();
            }
        }))
        .manage(state)
        .invoke_handler(tauri::generate_handler![
            preview::open_preview,
            preview::open_file,
            preview::refresh_preview,
            preview::open_in_browser,
            preview::preview_status,
            resolver::set_active_document,
            config::load_app_config,
            config::save_app_config,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| {
            // Teardown on deactivate: the watcher must not outlive the app
            if let tauri::RunEvent::Exit = event {
                app_handle.state::<Arc<AppState>>().clear_preview();
            }
        });
}
