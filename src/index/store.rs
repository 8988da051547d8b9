//! Persistence of the index artifact
//!
//! The artifact is written to a temporary file next to its destination and
//! renamed into place, so a reader sees either the previous index or the new
//! one, never a partial write.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use tempfile::NamedTempFile;

use super::{Index, LoadedIndex};
use crate::error::{Error, Result};

/// Atomically replace the artifact at `path` with `index`
pub fn save(index: &Index, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let content = serde_json::to_vec_pretty(index)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(&content)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;

    tracing::debug!("Wrote index to {:?}", path);
    Ok(())
}

/// Read the artifact at `path`. A missing, corrupt or incompatible artifact
/// is an error; no empty index is substituted.
pub fn load(path: &Path) -> Result<LoadedIndex> {
    let content = fs::read(path).map_err(|e| Error::IndexUnavailable {
        path: path.to_path_buf(),
        reason: match e.kind() {
            ErrorKind::NotFound => "not built yet".to_string(),
            _ => e.to_string(),
        },
    })?;

    let index = parse(path, &content)?;
    Ok(LoadedIndex::new(index))
}

fn parse(path: &Path, content: &[u8]) -> Result<Index> {
    let unavailable = |reason: String| Error::IndexUnavailable {
        path: path.to_path_buf(),
        reason,
    };

    // Check the version before the shape, so an old artifact reports as such
    let value: serde_json::Value =
        serde_json::from_slice(content).map_err(|e| unavailable(e.to_string()))?;
    let found = value
        .get("version")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| unavailable("missing version".to_string()))?;
    if found != u64::from(Index::VERSION) {
        return Err(Error::IndexVersion {
            path: path.to_path_buf(),
            found: u32::try_from(found).unwrap_or(u32::MAX),
            expected: Index::VERSION,
        });
    }

    serde_json::from_value(value).map_err(|e| unavailable(e.to_string()))
}

/// Artifact identity used to detect a rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    modified: SystemTime,
    len: u64,
}

impl Stamp {
    fn of(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        Some(Self {
            modified: metadata.modified().ok()?,
            len: metadata.len(),
        })
    }
}

/// In-process cache of the loaded index, refreshed whenever the artifact on
/// disk changes
#[derive(Debug)]
pub struct IndexCache {
    path: PathBuf,
    slot: RwLock<Option<(Stamp, Arc<LoadedIndex>)>>,
}

impl IndexCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            slot: RwLock::new(None),
        }
    }

    /// The latest successfully built index
    pub fn get(&self) -> Result<Arc<LoadedIndex>> {
        let stamp = Stamp::of(&self.path);

        if let Some(stamp) = stamp {
            if let Ok(guard) = self.slot.read() {
                if let Some((cached, index)) = guard.as_ref() {
                    if *cached == stamp {
                        return Ok(Arc::clone(index));
                    }
                }
            }
        }

        let loaded = Arc::new(load(&self.path)?);
        if let Some(stamp) = stamp {
            if let Ok(mut guard) = self.slot.write() {
                *guard = Some((stamp, Arc::clone(&loaded)));
            }
            tracing::debug!("Reloaded index from {:?}", self.path);
        }
        Ok(loaded)
    }

    /// Drop the cached copy; the next `get` reads the artifact again
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.slot.write() {
            *guard = None;
        }
    }
}
