// StoreWatcher - Announces credential file changes made by other processes
//
// Responsibilities:
// - Watch the directory holding the credentials file (notify crate)
// - Filter events down to the credentials file itself
// - Call CredentialStore::announce_external_change() so subscribers re-query
//
// The directory is watched rather than the file because FileStore commits by
// renaming a temp file over the old one. Writes made through this process
// are reported too; subscribers only ever re-read, so the echo is harmless.

use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::credential_store::CredentialStore;
use crate::errors::{Result, RoleGuardError};

pub struct StoreWatcher {
    path: PathBuf,
    // Dropping the watcher stops the OS subscription
    _watcher: RecommendedWatcher,
}

impl StoreWatcher {
    /// Start watching `path` and forward changes to `store`'s subscribers
    pub fn start<P: AsRef<Path>>(store: CredentialStore, path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| {
                RoleGuardError::Watch(format!("Not a file path: {}", path.display()))
            })?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if is_credentials_change(&event, &file_name) {
                        store.announce_external_change();
                    }
                }
                Err(e) => warn!("credential watcher error: {}", e),
            },
            NotifyConfig::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        debug!(path = %path.display(), "watching credentials file");

        Ok(StoreWatcher {
            path,
            _watcher: watcher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_credentials_change(event: &Event, file_name: &OsString) -> bool {
    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return false;
    }

    event
        .paths
        .iter()
        .any(|p| p.file_name() == Some(file_name.as_os_str()))
}
