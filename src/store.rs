//! Persisted filter selection.
//!
//! A narrow façade over local storage used only by the filter controller.
//! Reads fail closed: anything missing or unparseable is "no filters".

use crate::facets::FilterSelection;
use crate::host::KeyValueStore;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{error, warn};

pub const FILTERS_KEY: &str = "repository-filters";

/// Filter selection persisted under [`FILTERS_KEY`].
#[derive(Clone)]
pub struct FilterStore {
    storage: Rc<dyn KeyValueStore>,
}

impl FilterStore {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn save(&self, selection: &FilterSelection) {
        match serde_json::to_string(selection) {
            Ok(json) => self.storage.set_item(FILTERS_KEY, &json),
            Err(e) => error!("failed to serialize filters: {e}"),
        }
    }

    pub fn load(&self) -> Option<FilterSelection> {
        let raw = self.storage.get_item(FILTERS_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(selection) => Some(selection),
            Err(e) => {
                warn!("failed to load saved filters: {e}");
                None
            }
        }
    }

    pub fn clear(&self) {
        self.storage.remove_item(FILTERS_KEY);
    }
}

/// In-process [`KeyValueStore`], for hosts without web storage and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}
