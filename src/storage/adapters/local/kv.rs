//! Key-value stores holding serialized collections.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, RwLock};

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the value cannot be read.
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the value cannot be written.
    fn write(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Key-value store keeping one `<key>.json` file per key in a directory.
#[derive(Debug)]
pub struct FileKeyValueStore {
    dir: Dir,
}

impl FileKeyValueStore {
    /// Opens the store rooted at `path`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or opened.
    pub fn open(path: &Utf8Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir })
    }

    fn file_name(key: &str) -> String {
        format!("{key}.json")
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match self.dir.read_to_string(Self::file_name(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        let target = Self::file_name(key);
        let staging = format!("{target}.tmp");
        self.dir.write(&staging, value)?;
        self.dir.rename(&staging, &self.dir, &target)
    }
}

/// Key-value store held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|err| io::Error::other(err.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|err| io::Error::other(err.to_string()))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
