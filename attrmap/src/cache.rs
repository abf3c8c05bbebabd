//! Per-mapper lookup caches.
//!
//! Entries live until [`StoreAttributeCache::clear`] / [`OptionTextCache::clear`];
//! a cached entry is treated as stable for the whole indexing run.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::{debug, trace};

use crate::errors::MapperResult;
use crate::source::{AttributeStore, LocalizedAttribute};
use crate::types::{AttributeId, OptionId, StoreId};

/// Localized attribute definitions keyed by store, then attribute.
#[derive(Debug, Default)]
pub struct StoreAttributeCache {
    entries: HashMap<StoreId, HashMap<AttributeId, LocalizedAttribute>>,
}

impl StoreAttributeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, store_id: StoreId, attribute_id: AttributeId) -> Option<&LocalizedAttribute> {
        self.entries.get(&store_id)?.get(&attribute_id)
    }

    /// Return the cached definition, loading it from `store` on the first request.
    pub fn get_or_load<S>(
        &mut self,
        store: &S,
        attribute_id: AttributeId,
        store_id: StoreId,
    ) -> MapperResult<&LocalizedAttribute>
    where
        S: AttributeStore + ?Sized,
    {
        match self.entries.entry(store_id).or_default().entry(attribute_id) {
            Entry::Occupied(entry) => {
                trace!("store attribute cache hit: store={store_id} attribute={attribute_id}");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                debug!("loading attribute {attribute_id} for store {store_id}");
                let loaded = store.load(attribute_id, store_id)?;
                Ok(entry.insert(loaded))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Resolved option texts keyed by store, attribute, then option id.
///
/// `None` values are cached too: a source that has no text for an option is
/// not asked again.
#[derive(Debug, Default)]
pub struct OptionTextCache {
    entries: HashMap<StoreId, HashMap<AttributeId, HashMap<OptionId, Option<String>>>>,
}

impl OptionTextCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, store_id: StoreId, attribute_id: AttributeId, option_id: &str) -> Option<&Option<String>> {
        self.entries.get(&store_id)?.get(&attribute_id)?.get(option_id)
    }

    /// Return the cached text, calling `resolve` only when the triple is not cached yet.
    pub fn get_or_resolve<F>(
        &mut self,
        store_id: StoreId,
        attribute_id: AttributeId,
        option_id: &str,
        resolve: F,
    ) -> MapperResult<Option<String>>
    where
        F: FnOnce() -> MapperResult<Option<String>>,
    {
        let options = self.entries.entry(store_id).or_default().entry(attribute_id).or_default();
        if let Some(text) = options.get(option_id) {
            trace!("option text cache hit: store={store_id} attribute={attribute_id} option={option_id}");
            return Ok(text.clone());
        }

        debug!("resolving option text: store={store_id} attribute={attribute_id} option={option_id}");
        let text = resolve()?;
        options.insert(option_id.to_string(), text.clone());
        Ok(text)
    }

    pub fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(HashMap::values)
            .map(HashMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
