use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tauri::State;

/// Get the config directory using platform-appropriate location.
///
/// - macOS: `~/Library/Application Support/htmlpeek/`
/// - Linux: `~/.config/htmlpeek/` (or `$XDG_CONFIG_HOME`)
/// - Windows: `%APPDATA%/htmlpeek/`
///
/// Falls back to `~/.htmlpeek/` if the platform dir is unavailable.
pub(crate) fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("htmlpeek"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".htmlpeek")
        })
}

/// Load a JSON config file, returning Default if missing or corrupt.
/// Logs warnings/errors when the file exists but cannot be read or parsed,
/// so corrupt files are visible in logs instead of silently resetting state.
pub(crate) fn load_json_config<T: DeserializeOwned + Default>(filename: &str) -> T {
    let path = config_dir().join(filename);
    if !path.exists() {
        return T::default();
    }
    let content = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Warning: Could not read config {}: {e}", path.display());
            return T::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: Corrupt config {}: {e}. Using defaults.", path.display());
            T::default()
        }
    }
}

/// Save a JSON config file atomically (temp file + rename).
pub(crate) fn save_json_config<T: Serialize>(filename: &str, config: &T) -> Result<(), String> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create config directory: {e}"))?;

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {e}"))?;

    let target = dir.join(filename);
    let temp = dir.join(format!("{}.tmp.{}", filename, std::process::id()));

    std::fs::write(&temp, &json)
        .map_err(|e| format!("Failed to write temp config: {e}"))?;

    // Atomic rename: either the old file or new file exists, never partial
    std::fs::rename(&temp, &target).map_err(|e| {
        let _ = std::fs::remove_file(&temp);
        format!("Failed to commit config: {e}")
    })?;

    Ok(())
}

const CONFIG_FILE: &str = "config.json";

/// Application configuration, cached in AppState and persisted as JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directories searched for candidate HTML files, in order.
    /// Only the first entry is consulted today.
    pub workspace_roots: Vec<String>,
    /// Quiet period before a file change triggers a preview reload.
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace_roots: Vec::new(),
            debounce_ms: 200,
        }
    }
}

/// Read the config file from disk (used once at startup to seed the cache).
pub(crate) fn load_app_config_from_disk() -> AppConfig {
    load_json_config(CONFIG_FILE)
}

// --- Tauri commands ---

/// Load configuration from the cached AppState.
#[tauri::command]
pub(crate) fn load_app_config(state: State<'_, Arc<crate::AppState>>) -> AppConfig {
    state.config.read().clone()
}

/// Save configuration to disk and update the AppState cache.
#[tauri::command]
pub(crate) fn save_app_config(
    state: State<'_, Arc<crate::AppState>>,
    config: AppConfig,
) -> Result<(), String> {
    save_json_config(CONFIG_FILE, &config)?;
    *state.config.write() = config;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = AppConfig::default();
        assert!(config.workspace_roots.is_empty());
        assert_eq!(config.debounce_ms, 200);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = AppConfig {
            workspace_roots: vec!["/home/user/project".to_string()],
            debounce_ms: 500,
        };
        let json = serde_json::to_string(&config).expect("should serialize");
        let back: AppConfig = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(back, config);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let back: AppConfig = serde_json::from_str("{}").expect("should deserialize");
        assert_eq!(back, AppConfig::default());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let back: AppConfig =
            serde_json::from_str(r#"{"debounce_ms": 50, "theme": "dark"}"#)
                .expect("should deserialize");
        assert_eq!(back.debounce_ms, 50);
    }
}
