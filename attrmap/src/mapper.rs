//! # Attribute mapper
//!
//! [`AttributeMapper`] turns catalog attribute definitions into search-index
//! field types and turns raw stored values into [`IndexValueBundle`]s.
//!
//! For option coded attributes the bundle carries two fields:
//!
//! | Field                 | Content                                  |
//! |-----------------------|------------------------------------------|
//! | `<code>`              | option id(s), coerced to the backend type |
//! | `option_text_<code>`  | store-localized display text(s)          |
//!
//! Every value is emitted as a list so multi-valued attributes of composite
//! products can be merged with [`IndexValueBundle::merge`].
//!
//! ## Caching
//!
//! Store-localized attribute definitions and option texts are cached for the
//! life of the mapper. The caches are not synchronized: a parallel indexer
//! builds one mapper per worker. Call [`AttributeMapper::reset_caches`] to
//! start over.

use std::path::Path;

use log::debug;

use crate::cache::{OptionTextCache, StoreAttributeCache};
use crate::config::MapperConfig;
use crate::errors::MapperResult;
use crate::normalize::prepare_simple_value;
use crate::source::{AttributeCollectionFactory, AttributeStore, LocalizedAttribute};
use crate::types::{
    AttributeDefinition, AttributeId, AttributeRef, BOOLEAN_SOURCE_MODEL, BackendType, FieldType, IndexValue,
    IndexValueBundle, MappingFieldOptions, RawValue, StoreId,
};

/// Number of entries currently held by each cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub store_attributes: usize,
    pub option_texts: usize,
}

pub struct AttributeMapper<S, C> {
    store: S,
    collections: C,
    config: MapperConfig,
    store_attributes: StoreAttributeCache,
    option_texts: OptionTextCache,
}

impl<S, C> AttributeMapper<S, C>
where
    S: AttributeStore,
    C: AttributeCollectionFactory,
{
    pub fn new(store: S, collections: C) -> Self {
        Self::with_config(store, collections, MapperConfig::default())
    }

    pub fn with_config(store: S, collections: C, config: MapperConfig) -> Self {
        Self {
            store,
            collections,
            config,
            store_attributes: StoreAttributeCache::new(),
            option_texts: OptionTextCache::new(),
        }
    }

    /// Build a mapper whose settings are read from a `mapper.toml` file.
    pub fn with_config_file(store: S, collections: C, path: impl AsRef<Path>) -> MapperResult<Self> {
        let config = MapperConfig::load(path)?;
        Ok(Self::with_config(store, collections, config))
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// A new product attribute collection, straight from the factory.
    pub fn attribute_collection(&self) -> MapperResult<Vec<AttributeDefinition>> {
        self.collections.create()
    }

    /// Field creation parameters for `attribute`.
    ///
    /// There is no dedicated "filterable in search" flag upstream, so it
    /// mirrors `is_filterable`.
    pub fn mapping_field_options(&self, attribute: &AttributeDefinition) -> MappingFieldOptions {
        MappingFieldOptions {
            is_searchable: attribute.search.is_searchable,
            is_filterable: attribute.search.is_filterable,
            is_filterable_in_search: attribute.search.is_filterable,
            search_weight: attribute.search.search_weight,
        }
    }

    /// Infer the index field type. Rules are checked in order, first match wins.
    pub fn field_type(&self, attribute: &AttributeDefinition) -> FieldType {
        let backend = &attribute.backend_type;

        if *backend == BackendType::Int || attribute.frontend_class_is("validate-digits") {
            FieldType::Integer
        } else if *backend == BackendType::Decimal || attribute.frontend_class_is("validate-number") {
            FieldType::Double
        } else if attribute.source_model.as_deref() == Some(BOOLEAN_SOURCE_MODEL) {
            FieldType::Boolean
        } else if *backend == BackendType::Datetime {
            FieldType::Date
        } else if attribute.uses_source && attribute.source_model.is_none() {
            // Generic option table: values are numeric option ids.
            FieldType::Integer
        } else {
            FieldType::String
        }
    }

    /// Name of the companion field holding option display texts.
    pub fn option_text_field_name(&self, code: &str) -> String {
        format!("{}{}", self.config.mapper.option_text_prefix, code)
    }

    /// Normalize one raw stored value into index fields.
    pub fn prepare_index_value(
        &mut self,
        attribute: &AttributeDefinition,
        store_id: StoreId,
        raw: impl Into<RawValue>,
    ) -> MapperResult<IndexValueBundle> {
        let settings = &self.config.mapper;
        let policy = settings.zero_values;

        let elements = match raw.into() {
            RawValue::Multiple(values) => values,
            RawValue::Single(value) if attribute.uses_source => value
                .split(settings.multi_value_separator)
                .map(str::to_string)
                .collect(),
            RawValue::Single(value) => vec![value],
        };

        let values: Vec<IndexValue> = elements
            .iter()
            .filter(|raw| policy.accepts_raw(raw))
            .map(|raw| prepare_simple_value(&attribute.backend_type, raw))
            .filter(|value| policy.is_indexable(value))
            .collect();

        let mut bundle = IndexValueBundle::new();

        if attribute.uses_source && !values.is_empty() {
            let option_ids: Vec<String> = values.iter().map(IndexValue::option_key).collect();
            let texts: Vec<IndexValue> = self
                .index_options_text(attribute.into(), store_id, &option_ids)?
                .into_iter()
                .filter(|text| policy.is_indexable_text(text.as_deref()))
                .flatten()
                .map(IndexValue::Text)
                .collect();
            bundle.insert(self.option_text_field_name(&attribute.code), texts);
        }

        bundle.insert(attribute.code.clone(), values);
        Ok(bundle)
    }

    /// Display texts for `option_ids`, in order, duplicates included.
    pub fn index_options_text(
        &mut self,
        attribute: AttributeRef<'_>,
        store_id: StoreId,
        option_ids: &[String],
    ) -> MapperResult<Vec<Option<String>>> {
        option_ids
            .iter()
            .map(|option_id| self.index_option_text(attribute, store_id, option_id))
            .collect()
    }

    /// Store-localized display text of one option, or `None` when the source has none.
    pub fn index_option_text(
        &mut self,
        attribute: AttributeRef<'_>,
        store_id: StoreId,
        option_id: &str,
    ) -> MapperResult<Option<String>> {
        let attribute_id = Self::attribute_id(attribute);
        let localized = self.store_attributes.get_or_load(&self.store, attribute_id, store_id)?;

        self.option_texts
            .get_or_resolve(store_id, localized.attribute_id(), option_id, || {
                localized.source()?.resolve_display_text(option_id)
            })
    }

    /// The attribute as loaded for `store_id`, loaded once and cached.
    pub fn attribute_by_store<'a>(
        &mut self,
        attribute: impl Into<AttributeRef<'a>>,
        store_id: StoreId,
    ) -> MapperResult<&LocalizedAttribute> {
        let attribute_id = Self::attribute_id(attribute.into());
        self.store_attributes.get_or_load(&self.store, attribute_id, store_id)
    }

    pub fn attribute_id(attribute: AttributeRef<'_>) -> AttributeId {
        match attribute {
            AttributeRef::Id(id) => id,
            AttributeRef::Definition(definition) => definition.attribute_id,
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            store_attributes: self.store_attributes.len(),
            option_texts: self.option_texts.len(),
        }
    }

    /// Drop every cached attribute and option text.
    pub fn reset_caches(&mut self) {
        debug!(
            "resetting mapper caches ({} attributes, {} option texts)",
            self.store_attributes.len(),
            self.option_texts.len()
        );
        self.store_attributes.clear();
        self.option_texts.clear();
    }
}
