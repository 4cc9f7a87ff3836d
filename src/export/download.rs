//! Saving downloaded exports: filename extraction and the local write.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::export::types::ExportDownload;

/// Extracts the filename from a Content-Disposition header value, e.g.
/// `attachment; filename="export.xlsx"`. Returns `None` when the header
/// names no file.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let (_, tail) = header.split_once("filename=")?;
    let name = tail
        .split(';')
        .next()
        .unwrap_or(tail)
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    if name.is_empty() { None } else { Some(name) }
}

/// Synthesized filename used when the server does not name the file.
pub fn default_filename(stem: &str) -> String {
    format!("{}_{}.xlsx", stem, Local::now().format("%Y%m%d_%H%M%S"))
}

/// Keeps the filename a plain basename; a server-supplied path component
/// must not escape the download directory.
fn sanitize(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Writes a downloaded export under `dir`, creating it if necessary.
/// Returns the path of the saved file.
pub fn save_export(
    dir: &Path,
    download: &ExportDownload,
    fallback_stem: &str,
) -> std::io::Result<PathBuf> {
    let name = download
        .filename
        .as_deref()
        .map(sanitize)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| default_filename(fallback_stem));

    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, &download.bytes)?;
    Ok(path)
}
