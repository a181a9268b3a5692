//! Asset rewriting for previewed HTML documents.
//!
//! Relative `src`/`href` references inside a document would resolve against
//! the webview's own origin, not the file's directory, so they are rewritten
//! to asset-protocol URLs before the document is served. This is a textual
//! pattern substitution, not a DOM parse — it will also touch matches inside
//! comments or scripts. That is a deliberate scope decision: the input is a
//! trusted local file being previewed, not arbitrary web content.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::path::Path;
use url::Url;

lazy_static! {
    /// Matches src/href attributes with non-empty double-quoted values.
    /// Single-quoted and unquoted attribute values are intentionally not
    /// matched and stay unrewritten (known limitation).
    static ref ASSET_ATTR_RE: Regex =
        Regex::new(r#"(src|href)="([^"]+)""#).expect("asset attribute regex is valid");
}

/// References that must never be rewritten: remote URLs, inline data and
/// in-document fragments.
fn is_external_ref(value: &str) -> bool {
    value.starts_with("http://")
        || value.starts_with("https://")
        || value.starts_with("data:")
        || value.starts_with('#')
}

/// Translate an absolute filesystem path into a URL the preview webview is
/// permitted to load local resources from (the Tauri asset protocol).
///
/// `Url::from_file_path` percent-encodes each path segment; the encoded
/// path component is reused verbatim.
pub(crate) fn asset_uri(path: &Path) -> Option<String> {
    let url = Url::from_file_path(path).ok()?;
    #[cfg(windows)]
    {
        Some(format!("http://asset.localhost{}", url.path()))
    }
    #[cfg(not(windows))]
    {
        Some(format!("asset://localhost{}", url.path()))
    }
}

/// Rewrite every local relative `src="…"`/`href="…"` value in `html` to an
/// asset-protocol URL, resolving against `base_dir`.
///
/// Values starting with `http://`, `https://`, `data:` or `#` are left
/// byte-identical, as are references whose resolved target does not exist
/// on disk.
pub(crate) fn rewrite_asset_paths(html: &str, base_dir: &Path) -> String {
    ASSET_ATTR_RE
        .replace_all(html, |caps: &Captures| {
            let attr = &caps[1];
            let value = &caps[2];

            if is_external_ref(value) {
                return caps[0].to_string();
            }

            let resolved = base_dir.join(value);
            if resolved.exists() {
                if let Some(uri) = asset_uri(&resolved) {
                    return format!(r#"{attr}="{uri}""#);
                }
            }

            caps[0].to_string()
        })
        .into_owned()
}

/// Read the document at `path`, rewrite its asset references, and return the
/// HTML to serve. A read failure (missing file, permission denied) degrades
/// to a fixed error document — it never propagates to the caller.
pub(crate) fn render_document(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(html) => {
            let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
            rewrite_asset_paths(&html, base_dir)
        }
        Err(err) => error_document(&err.to_string()),
    }
}

/// Minimal in-panel error page shown in place of content when the document
/// cannot be read.
pub(crate) fn error_document(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><body>
<div style="padding:40px;font-family:system-ui;color:#e2e8f0;background:#0f0f23;min-height:100vh;">
  <h2 style="color:#ef4444;">Failed to load preview</h2>
  <p>{message}</p>
  <p style="color:#9ca3af;margin-top:16px;">
    Make sure the HTML file exists and is readable.
  </p>
</div>
</body></html>"#
    )
}
