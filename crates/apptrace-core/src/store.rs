use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use apptrace_types::{TraceEvent, TraceFile};
use once_cell::sync::Lazy;

use crate::error::Result;

/// One shared store per path, so every session resolved from the
/// environment funnels concurrent appends through the same lock.
static SHARED_STORES: Lazy<Mutex<HashMap<PathBuf, Arc<TraceStore>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// File-backed trace store. Owns the destination path and the mutex that
/// serializes every read-merge-write-rename cycle against it.
#[derive(Debug)]
pub struct TraceStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TraceStore {
    /// Build an isolated store. Callers that may race on the same path
    /// should use [`TraceStore::shared`] instead.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Hand out the process-wide store for `path`, creating it on first
    /// use. Two sessions resolving the same path get the same instance,
    /// hence the same lock.
    pub fn shared(path: impl Into<PathBuf>) -> Arc<TraceStore> {
        let path = path.into();
        let mut stores = acquire(&SHARED_STORES);
        stores
            .entry(path.clone())
            .or_insert_with(|| Arc::new(TraceStore::new(path)))
            .clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event to the on-disk document.
    ///
    /// The whole sequence runs under the store's lock: read the existing
    /// document (absent or blank file starts an empty one; malformed
    /// content is a hard error, never silently discarded), push the event,
    /// re-serialize, write to a `.tmp` sibling, and rename over the
    /// destination. A failure before the rename leaves the previous valid
    /// file untouched.
    pub fn append(&self, event: TraceEvent) -> Result<()> {
        let _guard = acquire(&self.lock);

        let mut trace = self.read_locked()?;
        trace.events.push(event);

        let encoded = serde_json::to_vec_pretty(&trace)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = tmp_sibling(&self.path);
        fs::write(&tmp_path, &encoded)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Read the current document, tolerating an absent or blank file.
    pub fn read(&self) -> Result<TraceFile> {
        let _guard = acquire(&self.lock);
        self.read_locked()
    }

    fn read_locked(&self) -> Result<TraceFile> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(TraceFile::default()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(TraceFile::default()),
            Err(err) => Err(err.into()),
        }
    }
}

/// A panic while holding one of these locks cannot leave the guarded state
/// inconsistent (the file is only replaced by a completed rename), so a
/// poisoned lock is safe to re-enter.
fn acquire<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
