//! Selection fields mirrored into the navigable URL query string.

use log::debug;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Query-string access for the current page.
///
/// Writes replace the current history entry instead of pushing a new one,
/// and writing the value a key already has must not navigate.
pub trait QueryParams {
    /// Current value of `key`; empty values read as `None`.
    fn read_param(&self, key: &str) -> Option<String>;

    /// Set `key` to `value`, removing the key when `value` is empty.
    fn write_param(&self, key: &str, value: &str);
}

/// In-memory query string that counts navigations.
#[derive(Default)]
pub struct MemoryQuery {
    params: RefCell<BTreeMap<String, String>>,
    navigations: Cell<usize>,
}

impl MemoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing query string such as `?location=station&year=2024`.
    pub fn from_query(query: &str) -> Self {
        let params = query
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| {
                let mut kv = pair.splitn(2, '=');
                let key = kv.next()?.to_string();
                let value = kv.next().unwrap_or("").to_string();
                Some((key, value))
            })
            .collect();
        Self {
            params: RefCell::new(params),
            navigations: Cell::new(0),
        }
    }

    /// Number of `replaceState`-equivalent navigations performed.
    pub fn navigation_count(&self) -> usize {
        self.navigations.get()
    }

    /// Render the current query string, keys sorted, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.params
            .borrow()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn is_empty(&self) -> bool {
        self.params.borrow().is_empty()
    }
}

impl QueryParams for MemoryQuery {
    fn read_param(&self, key: &str) -> Option<String> {
        self.params
            .borrow()
            .get(key)
            .filter(|value| !value.is_empty())
            .cloned()
    }

    fn write_param(&self, key: &str, value: &str) {
        let mut params = self.params.borrow_mut();
        let changed = if value.is_empty() {
            params.remove(key).is_some()
        } else if params.get(key).map(String::as_str) == Some(value) {
            false
        } else {
            params.insert(key.to_string(), value.to_string());
            true
        };
        if changed {
            debug!("url {key}={value:?}");
            self.navigations.set(self.navigations.get() + 1);
        }
    }
}
