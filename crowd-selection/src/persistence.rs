//! Durable per-browser key/value storage (cookies in the browser).
//!
//! The store is a dumb string map. It never validates values; the engine
//! keeps working from the URL alone when the store is unavailable.

use crate::context::PageContext;
use log::debug;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Cookie-like string store.
pub trait PersistentStore {
    /// Read a value. Missing and empty values both read as `None`.
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` for `ttl_days` days. A TTL of zero deletes the key.
    fn write(&self, key: &str, value: &str, ttl_days: u32);
}

/// View of a store that prefixes every key with the page context's namespace.
pub struct NamespacedStore<'a> {
    store: &'a dyn PersistentStore,
    context: PageContext,
}

impl<'a> NamespacedStore<'a> {
    pub fn new(store: &'a dyn PersistentStore, context: PageContext) -> Self {
        Self { store, context }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.context.prefix(), key)
    }

    pub fn read(&self, key: &str) -> Option<String> {
        self.store.read(&self.full_key(key))
    }

    pub fn write(&self, key: &str, value: &str, ttl_days: u32) {
        let full = self.full_key(key);
        debug!("persist {full}={value:?} ttl={ttl_days}d");
        self.store.write(&full, value, ttl_days);
    }
}

/// In-memory store used by tests and as a stand-in when nothing durable exists.
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<BTreeMap<String, (String, u32)>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `write` calls seen so far, deletes included.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// TTL the key was last written with, if it is present.
    pub fn ttl_of(&self, key: &str) -> Option<u32> {
        self.values.borrow().get(key).map(|(_, ttl)| *ttl)
    }

    pub fn keys(&self) -> Vec<String> {
        self.values.borrow().keys().cloned().collect()
    }
}

impl PersistentStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values
            .borrow()
            .get(key)
            .map(|(value, _)| value.clone())
            .filter(|value| !value.is_empty())
    }

    fn write(&self, key: &str, value: &str, ttl_days: u32) {
        self.writes.set(self.writes.get() + 1);
        let mut values = self.values.borrow_mut();
        if ttl_days == 0 || value.is_empty() {
            values.remove(key);
        } else {
            values.insert(key.to_string(), (value.to_string(), ttl_days));
        }
    }
}

/// Store used when persistence is switched off or unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStore;

impl PersistentStore for DisabledStore {
    fn read(&self, _key: &str) -> Option<String> {
        None
    }

    fn write(&self, _key: &str, _value: &str, _ttl_days: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_ttl_deletes() {
        let store = MemoryStore::new();
        store.write("year", "2024", 30);
        assert_eq!(store.read("year").as_deref(), Some("2024"));
        store.write("year", "2024", 0);
        assert_eq!(store.read("year"), None);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn namespaces_do_not_collide() {
        let store = MemoryStore::new();
        NamespacedStore::new(&store, PageContext::Purpose).write("action", "cal_holiday", 30);
        NamespacedStore::new(&store, PageContext::Function).write("action", "cal_cog", 30);

        assert_eq!(store.read("purpose_action").as_deref(), Some("cal_holiday"));
        assert_eq!(store.read("function_action").as_deref(), Some("cal_cog"));
        assert_eq!(NamespacedStore::new(&store, PageContext::Default).read("action"), None);
    }

    #[test]
    fn disabled_store_reads_nothing() {
        let store = DisabledStore;
        store.write("location", "station", 30);
        assert_eq!(store.read("location"), None);
    }
}
