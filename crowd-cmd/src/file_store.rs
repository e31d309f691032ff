//! JSON-file persistence so CLI selections survive between runs.

use anyhow::Context;
use chrono::{Days, NaiveDate};
use crowd_selection::PersistentStore;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Entry {
    value: String,
    expires: NaiveDate,
}

/// Cookie-like store backed by a JSON file. Entries carry an expiry date
/// and expired ones read as missing.
pub struct FileStore {
    path: PathBuf,
    today: NaiveDate,
    entries: RefCell<BTreeMap<String, Entry>>,
}

impl FileStore {
    /// Load `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>, today: NaiveDate) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            today,
            entries: RefCell::new(entries),
        })
    }

    fn save(&self) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(&*self.entries.borrow())?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

impl PersistentStore for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries
            .borrow()
            .get(key)
            .filter(|e| e.expires >= self.today && !e.value.is_empty())
            .map(|e| e.value.clone())
    }

    fn write(&self, key: &str, value: &str, ttl_days: u32) {
        {
            let mut entries = self.entries.borrow_mut();
            let expires = self.today.checked_add_days(Days::new(u64::from(ttl_days)));
            match expires {
                Some(expires) if ttl_days > 0 && !value.is_empty() => {
                    entries.insert(
                        key.to_string(),
                        Entry {
                            value: value.to_string(),
                            expires,
                        },
                    );
                }
                _ => {
                    entries.remove(key);
                }
            }
        }
        debug!("{} <- {key}={value:?}", self.path.display());
        if let Err(err) = self.save() {
            warn!("could not persist {key}: {err:#}");
        }
    }
}
