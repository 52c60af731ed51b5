//! CSV dataset files.
//!
//! Every dataset is UTF-8 CSV with a header row and exactly the columns
//! `category, title, content, url, source, date`, one row per
//! [`ArticleRecord`], no index column.

use crate::error::PersistenceError;
use crate::models::ArticleRecord;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

/// Column order of every dataset file.
pub const COLUMNS: [&str; 6] = ["category", "title", "content", "url", "source", "date"];

/// Suffix shared by all per-source dataset files.
pub const DATASET_SUFFIX: &str = "_news_dataset.csv";

/// File name of the combined dataset.
pub const COMBINED_FILE: &str = "all_news_dataset.csv";

/// Serialise records to CSV bytes, header first.
pub fn to_csv(records: &[ArticleRecord], path: &Path) -> Result<Vec<u8>, PersistenceError> {
    let csv_err = |source| PersistenceError::Csv {
        path: path.to_path_buf(),
        source,
    };
    // Header written by hand so an empty dataset still has one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    writer.write_record(COLUMNS).map_err(csv_err)?;
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer.into_inner().map_err(|e| PersistenceError::Io {
        path: path.to_path_buf(),
        source: e.into_error(),
    })
}

/// Write `records` to `path`, replacing any existing file.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = records.len()))]
pub async fn write_dataset(records: &[ArticleRecord], path: &Path) -> Result<(), PersistenceError> {
    let bytes = to_csv(records, path)?;
    fs::write(path, bytes)
        .await
        .map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Wrote dataset");
    Ok(())
}

/// Read a dataset file. Rows missing a `source` value get `default_source`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_dataset(path: &Path, default_source: &str) -> Result<Vec<ArticleRecord>, PersistenceError> {
    let bytes = fs::read(path).await.map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let mut records = Vec::new();
    for row in reader.deserialize::<ArticleRecord>() {
        let mut record = row.map_err(|source| PersistenceError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if record.source.is_empty() {
            record.source = default_source.to_string();
        }
        records.push(record);
    }
    Ok(records)
}

/// Per-source dataset files in `dir`, sorted by file name, paired with the
/// source name taken from the file name.
///
/// The combined dataset is never included.
pub async fn discover_datasets(dir: &Path) -> Result<Vec<(String, PathBuf)>, PersistenceError> {
    let io_err = |source| PersistenceError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir).await.map_err(io_err)?;
    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            warn!(file = ?file_name, "Skipping non UTF-8 file name");
            continue;
        };
        if name == COMBINED_FILE {
            continue;
        }
        if let Some(source) = name.strip_suffix(DATASET_SUFFIX) {
            if !source.is_empty() {
                found.push((source.to_string(), entry.path()));
            }
        }
    }
    found.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(found)
}
