//! Key-value port standing in for the browser's local storage area. Values
//! are JSON-encoded text; access is synchronous and atomic per key, with no
//! cross-key transaction.

use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::Mutex,
};

use tracing::warn;

use crate::error::{Error, Result};

pub const CURRENT_USER: &str = "currentUser";
pub const LOGIN_TIME: &str = "loginTime";
pub const REGISTERED_MEMBERS: &str = "registeredMembers";
pub const SERVER_MEMBERS: &str = "serverMembers";
pub const CURRENT_REGISTRATION: &str = "currentRegistration";

pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str);
}

/// Process-lifetime store, used by tests and anywhere persistence across
/// runs is not wanted.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

/// All keys kept in one JSON object persisted to a single file, rewritten on
/// every mutation.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(body) => serde_json::from_str(&body)?,
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<()> {
        let body = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, body).map_err(|e| Error::Storage(e.to_string()))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_owned(), value.to_owned());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(key).is_some() {
            if let Err(e) = self.flush(&entries) {
                warn!("removal of {key} not persisted: {e}");
            }
        }
    }
}
