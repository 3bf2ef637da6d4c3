/**
 * filesystem.rs
 * JSON file storage backend
 *
 * All keys live in one JSON object file:
 * ```json
 * {
 *   "currentRole": "admin",
 *   "pageOwnerCode": "445566",
 *   "pageCustomRoles": "{\"betaTester\":\"123456\"}"
 * }
 * ```
 *
 * Reads always go to disk so a write from another process is visible on the
 * next call. Writes are read-modify-write of the whole object, committed with
 * a rename so a reader never sees a half-written file. Every writer holds an
 * exclusive flock on `<file>.lock` for the whole cycle, so concurrent writers
 * to different keys never drop each other's values; for the same key the
 * last writer wins.
 */

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::debug;

use super::traits::KeyValueStore;
use crate::errors::{Result, RoleGuardError};

/// Default file name inside the store directory
pub const CREDENTIALS_FILE: &str = "credentials.json";

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// File-backed key-value store
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) a store at `path`
    ///
    /// The file and its parent directory are created on first write.
    ///
    /// # Example
    /// ```no_run
    /// # use roleguard_core::storage::FileStore;
    /// let store = FileStore::new(".roleguard/credentials.json");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileStore {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Open the default credentials file inside `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(CREDENTIALS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every entry from disk
    ///
    /// Returns an empty map if the file doesn't exist
    fn load_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            RoleGuardError::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            RoleGuardError::ParseError(format!(
                "Invalid credentials JSON in {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Write every entry to disk via a temp file and rename
    fn save_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries).map_err(|e| {
            RoleGuardError::SerializationError(format!("Failed to serialize credentials: {}", e))
        })?;

        let tmp_path = self.temp_path();
        fs::write(&tmp_path, json).map_err(|e| {
            RoleGuardError::Storage(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            RoleGuardError::Storage(format!(
                "Failed to commit {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    fn sibling_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| CREDENTIALS_FILE.to_string())
    }

    /// Unique per write, so concurrent writers never share a temp file
    fn temp_path(&self) -> PathBuf {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        self.path.with_file_name(format!(
            ".{}.{}.{}.tmp",
            self.sibling_name(),
            std::process::id(),
            seq
        ))
    }

    /// Sidecar file every writer locks before a read-modify-write
    pub fn lock_path(&self) -> PathBuf {
        self.path
            .with_file_name(format!("{}.lock", self.sibling_name()))
    }

    fn modify<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| RoleGuardError::Storage(format!("File store lock poisoned: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Held across load, mutate and rename; other handles and processes wait here
        let _file_lock = FileLock::acquire(&self.lock_path())?;

        let mut entries = self.load_entries()?;
        mutate(&mut entries);
        self.save_entries(&entries)
    }
}

/// Exclusive advisory lock on a sidecar file, released on drop
struct FileLock {
    #[cfg_attr(not(unix), allow(dead_code))]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                RoleGuardError::Storage(format!("Failed to open {}: {}", path.display(), e))
            })?;

        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;

            // Blocks until every other holder has released the lock
            unsafe {
                if libc::flock(file.as_raw_fd(), libc::LOCK_EX) != 0 {
                    return Err(RoleGuardError::Io(std::io::Error::last_os_error()));
                }
            }
        }

        Ok(FileLock { file })
    }
}

#[cfg(unix)]
impl Drop for FileLock {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;

        // close() releases it too
        unsafe {
            libc::flock(self.file.as_raw_fd(), libc::LOCK_UN);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        debug!(key, path = %self.path.display(), "writing credential key");
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.modify(|entries| {
            entries.remove(key);
        })
    }

    fn backend_name(&self) -> &str {
        "file"
    }
}
