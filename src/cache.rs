// src/cache.rs
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
    time::SystemTime,
};
use tracing::{debug, info};

use crate::normalize::normalize;
use crate::source::load_raw;
use crate::table::CanonicalTable;

/// What the source looked like when it was last loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceIdentity {
    Missing,
    File { modified: Option<SystemTime>, len: u64 },
}

impl SourceIdentity {
    pub fn of(path: &Path) -> Result<Self> {
        match fs::metadata(path) {
            Ok(meta) => Ok(SourceIdentity::File {
                modified: meta.modified().ok(),
                len: meta.len(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SourceIdentity::Missing),
            Err(e) => Err(e).with_context(|| format!("failed to stat {}", path.display())),
        }
    }
}

/// Load `path` and normalize it. A missing file is an empty table.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<CanonicalTable> {
    Ok(match load_raw(path, sheet)? {
        Some(raw) => normalize(&raw),
        None => CanonicalTable::empty(),
    })
}

/// Memoized load-and-normalize keyed by the source file's identity. The
/// cached table is only ever replaced whole.
pub struct TableCache {
    path: PathBuf,
    sheet: Option<String>,
    entry: RwLock<Option<(SourceIdentity, Arc<CanonicalTable>)>>,
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>, sheet: Option<String>) -> Self {
        Self {
            path: path.into(),
            sheet,
            entry: RwLock::new(None),
        }
    }

    /// Return the current table, reloading only when the source changed.
    pub fn get(&self) -> Result<Arc<CanonicalTable>> {
        let identity = SourceIdentity::of(&self.path)?;

        // 1) Fast-path: identity unchanged
        {
            let entry = self.entry.read().unwrap_or_else(|e| e.into_inner());
            if let Some((cached, table)) = entry.as_ref() {
                if *cached == identity {
                    debug!("table cache hit");
                    return Ok(Arc::clone(table));
                }
            }
        }

        // 2) Reload and swap in the new table
        let table = Arc::new(load_table(&self.path, self.sheet.as_deref())?);
        info!(
            path = %self.path.display(),
            records = table.len(),
            fund_dates = table.fund_dates.len(),
            skipped = table.skipped_columns.len(),
            "loaded source table"
        );
        let mut entry = self.entry.write().unwrap_or_else(|e| e.into_inner());
        *entry = Some((identity, Arc::clone(&table)));
        Ok(table)
    }
}
