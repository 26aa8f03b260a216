use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::common::{Error, Result};

/// Single user record (JSON)
pub(crate) const USER_KEY: &str = "finsageUser";
/// Session flag, "true" or "false"
pub(crate) const LOGGED_IN_KEY: &str = "finsageLoggedIn";
/// Array of income transactions (JSON)
pub(crate) const INCOMES_KEY: &str = "finsageIncomes";
/// Array of expense transactions (JSON)
pub(crate) const EXPENSES_KEY: &str = "finsageExpenses";

/// A flat string key-value store, the local storage every other module reads and writes.
pub(crate) trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write a value. Implementations persist before returning.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Read a JSON value stored under `key`. A missing key reads as `None`.
pub(crate) fn get_json<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get_item(key) {
        Some(raw) => serde_json::from_str::<Option<T>>(&raw).map_err(|source| Error::Corrupt {
            key: key.to_string(),
            source,
        }),
        None => Ok(None),
    }
}

pub(crate) fn set_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| Error::Corrupt {
        key: key.to_string(),
        source,
    })?;
    store.set_item(key, &encoded)
}

/// Local storage kept in memory and, when opened from a file, written back whole on every change.
/// On disk it is a single JSON object mapping each key to its string value.
#[derive(Debug, Default)]
pub(crate) struct LocalStore {
    items: BTreeMap<String, String>,

    file_path: Option<PathBuf>,
}

impl LocalStore {
    /// A store that lives only as long as the process
    #[cfg(test)]
    pub(crate) fn in_memory() -> LocalStore {
        LocalStore::default()
    }

    /// Open a store file. A missing file is an empty store; it is created on the first write.
    pub(crate) fn open(path: &Path) -> Result<LocalStore> {
        let items = if path.exists() {
            let content = fs::read_to_string(path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|source| Error::CorruptStore {
                    path: path.display().to_string(),
                    source,
                })?
            }
        } else {
            info!("No store at {}, starting empty", path.display());
            BTreeMap::new()
        };

        debug!("Opened store {} with {} keys", path.display(), items.len());
        Ok(LocalStore { items, file_path: Some(path.to_path_buf()) })
    }

    /// Write `items` to the store file, if there is one
    fn save(&self, items: &BTreeMap<String, String>) -> Result<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let encoded = serde_json::to_string_pretty(items).map_err(|source| Error::CorruptStore {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(path, encoded)?;
        debug!("Wrote {} keys to {}", items.len(), path.display());
        Ok(())
    }
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    /// The in-memory value only changes once the file write has succeeded
    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.clone();
        items.insert(key.to_string(), value.to_string());
        self.save(&items)?;
        self.items = items;
        Ok(())
    }
}
