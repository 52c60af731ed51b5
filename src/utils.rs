//! Small helpers shared across the pipeline.
//!
//! - Whitespace normalisation for extracted text
//! - String truncation and capitalisation for log lines
//! - File system validation for output directories

use crate::error::PersistenceError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapse every whitespace run (spaces, tabs, newlines, NBSP) into a single
/// space and trim both ends.
///
/// The operation is idempotent.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_whitespace("  a \n\t b  "), "a b");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Truncate a string for logging purposes.
///
/// Keeps at most `max` characters and appends an ellipsis when anything was
/// cut. Counts characters rather than bytes so Turkish letters never split.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("kısa", 100), "kısa");
/// assert_eq!(truncate_for_log("çğıöşü", 3), "çğı…");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((byte_idx, _)) => format!("{}…", &s[..byte_idx]),
    }
}

/// Capitalize the first character of a string.
///
/// Used for category names in progress lines (e.g. "ekonomi" -> "Ekonomi").
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
///
/// # Errors
///
/// Returns [`PersistenceError::Io`] if the directory cannot be created or is
/// not writable.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), PersistenceError> {
    fs::create_dir_all(path)
        .await
        .map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    // Sync probe through std fs (simpler error surface)
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(source) => Err(PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
