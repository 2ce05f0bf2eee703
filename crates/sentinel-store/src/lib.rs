//! Sentinel Storage Layer
//!
//! Implements the `RecordStore` trait over flat record files, one per job.
//!
//! # Architecture
//!
//! - A record file holds the complete record set for one job, either as a
//!   pretty-printed JSON array of objects or a YAML sequence of mappings
//! - Every save rewrites the whole set through a temporary file in the same
//!   directory, renamed over the target, so a crash mid-write leaves the
//!   previous copy intact
//! - A missing or corrupt file loads as an empty set; it is treated as "no
//!   prior data", never as a fatal error
//!
//! # Examples
//!
//! ```no_run
//! use sentinel_domain::traits::RecordStore;
//! use sentinel_domain::OutputFormat;
//! use sentinel_store::FileStore;
//! use std::path::Path;
//!
//! let store = FileStore::new();
//! let records = store.load(Path::new("content/news.json"), OutputFormat::Json);
//! store.save(Path::new("content/news.json"), OutputFormat::Json, &records).unwrap();
//! ```

#![warn(missing_docs)]

use sentinel_domain::traits::RecordStore;
use sentinel_domain::{OutputFormat, Record, RecordSet};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while writing a record file
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Renaming the temporary file over the target failed
    #[error("Failed to replace {path}: {source}")]
    Persist {
        /// Target file
        path: String,
        /// Underlying error
        source: std::io::Error,
    },
}

/// Flat-file implementation of `RecordStore`
///
/// The store is stateless; the format of each file is chosen per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl FileStore {
    /// Create a new FileStore
    pub fn new() -> Self {
        Self
    }

    /// Decode a record file's contents
    ///
    /// Returns `None` when the text is not an array of objects in `format`.
    pub fn decode(text: &str, format: OutputFormat) -> Option<RecordSet> {
        if text.trim().is_empty() {
            return Some(Vec::new());
        }

        match format {
            OutputFormat::Json => serde_json::from_str::<RecordSet>(text)
                .map_err(|e| debug!("JSON decode failed: {}", e))
                .ok(),
            OutputFormat::Yaml => serde_yaml::from_str::<Option<RecordSet>>(text)
                .map(Option::unwrap_or_default)
                .map_err(|e| debug!("YAML decode failed: {}", e))
                .ok(),
        }
    }

    /// Encode records in the given format
    ///
    /// JSON output is pretty-printed with a trailing newline.
    pub fn encode(records: &[Record], format: OutputFormat) -> Result<String, StoreError> {
        match format {
            OutputFormat::Json => {
                let mut text = serde_json::to_string_pretty(records)?;
                text.push('\n');
                Ok(text)
            }
            OutputFormat::Yaml => Ok(serde_yaml::to_string(records)?),
        }
    }
}

impl RecordStore for FileStore {
    type Error = StoreError;

    fn load(&self, path: &Path, format: OutputFormat) -> RecordSet {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No record file at {}, starting empty", path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Could not read {}: {}; treating as empty", path.display(), e);
                return Vec::new();
            }
        };

        match Self::decode(&text, format) {
            Some(records) => {
                debug!("Loaded {} records from {}", records.len(), path.display());
                records
            }
            None => {
                warn!(
                    "Record file {} is not a valid {} array of objects; treating as empty",
                    path.display(),
                    format.display_name()
                );
                Vec::new()
            }
        }
    }

    fn save(&self, path: &Path, format: OutputFormat, records: &[Record]) -> Result<(), StoreError> {
        let contents = Self::encode(records, format)?;

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        // The temp file is created owner-only; keep the mode of the file it replaces.
        if let Ok(meta) = fs::metadata(path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
        tmp.persist(path).map_err(|e| StoreError::Persist {
            path: path.display().to_string(),
            source: e.error,
        })?;

        debug!("Wrote {} records to {}", records.len(), path.display());
        Ok(())
    }
}
