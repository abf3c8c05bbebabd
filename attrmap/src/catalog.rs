//! In-memory catalog loaded from a TOML fixture.
//!
//! Implements every collaborator trait, so a mapper can run without the real
//! attribute storage:
//!
//! ```toml
//! [[attributes]]
//! attribute_id = 3
//! code = "color"
//! backend_type = "int"
//! uses_source = true
//!
//! [attributes.labels.0]
//! 3 = "Red"
//!
//! [attributes.labels.1]
//! 3 = "Rouge"
//!
//! [[values]]
//! attribute = "color"
//! value = "3,7"
//! ```
//!
//! Option labels missing for a store fall back to the admin store (`0`).

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{ConfigError, MapperError, MapperResult};
use crate::source::{AttributeCollectionFactory, AttributeStore, LocalizedAttribute, OptionSource};
use crate::types::{AttributeDefinition, AttributeId, RawValue, StoreId};

pub const ADMIN_STORE_ID: StoreId = 0;

#[derive(Debug, Clone, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    attributes: Vec<RawAttribute>,
    #[serde(default)]
    values: Vec<SampleValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawAttribute {
    #[serde(flatten)]
    definition: AttributeDefinition,
    #[serde(default)]
    labels: BTreeMap<String, BTreeMap<String, String>>,
}

/// A raw value recorded in the fixture for one attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleValue {
    pub attribute: String,
    pub value: RawValue,
    #[serde(default)]
    pub product: Option<String>,
}

#[derive(Debug, Clone)]
struct CatalogAttribute {
    definition: AttributeDefinition,
    labels: BTreeMap<StoreId, BTreeMap<String, String>>,
}

impl CatalogAttribute {
    /// Admin labels overlaid with the store's own labels.
    fn labels_for(&self, store_id: StoreId) -> BTreeMap<String, String> {
        let mut labels = self.labels.get(&ADMIN_STORE_ID).cloned().unwrap_or_default();
        if store_id != ADMIN_STORE_ID
            && let Some(store_labels) = self.labels.get(&store_id)
        {
            labels.extend(store_labels.iter().map(|(id, text)| (id.clone(), text.clone())));
        }
        labels
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogFixture {
    attributes: Vec<CatalogAttribute>,
    values: Vec<SampleValue>,
}

impl CatalogFixture {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let catalog: RawCatalog = toml::from_str(raw)?;
        let mut attributes = Vec::with_capacity(catalog.attributes.len());

        for attribute in catalog.attributes {
            let mut labels = BTreeMap::new();
            for (store, options) in attribute.labels {
                let store_id = store.parse::<StoreId>().map_err(|_| {
                    ConfigError::invalid(
                        format!("attributes.{}.labels", attribute.definition.code),
                        format!("store id '{store}' is not a number"),
                    )
                })?;
                labels.insert(store_id, options);
            }
            attributes.push(CatalogAttribute {
                definition: attribute.definition,
                labels,
            });
        }

        Ok(Self {
            attributes,
            values: catalog.values,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn attribute(&self, code: &str) -> Option<&AttributeDefinition> {
        self.attributes
            .iter()
            .map(|attribute| &attribute.definition)
            .find(|definition| definition.code == code)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.attributes.iter().map(|attribute| &attribute.definition)
    }

    pub fn sample_values(&self) -> &[SampleValue] {
        &self.values
    }

    fn find(&self, attribute_id: AttributeId) -> Option<&CatalogAttribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.definition.attribute_id == attribute_id)
    }
}

impl AttributeStore for CatalogFixture {
    fn load(&self, attribute_id: AttributeId, store_id: StoreId) -> MapperResult<LocalizedAttribute> {
        let attribute = self
            .find(attribute_id)
            .ok_or(MapperError::AttributeNotFound { attribute_id, store_id })?;

        let blank = self.create_blank(store_id);
        let definition = AttributeDefinition {
            store_id: blank.store_id,
            ..attribute.definition.clone()
        };

        if !definition.uses_source {
            return Ok(LocalizedAttribute::new(definition));
        }

        let source = LabelSource::new(attribute.labels_for(store_id));
        Ok(LocalizedAttribute::with_source(definition, Box::new(source)))
    }
}

impl AttributeCollectionFactory for CatalogFixture {
    fn create(&self) -> MapperResult<Vec<AttributeDefinition>> {
        Ok(self.attributes().cloned().collect())
    }
}

/// Option source backed by a fixed label table.
#[derive(Debug, Clone, Default)]
pub struct LabelSource {
    labels: BTreeMap<String, String>,
}

impl LabelSource {
    pub fn new<K, V>(labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl OptionSource for LabelSource {
    fn resolve_display_text(&self, option_id: &str) -> MapperResult<Option<String>> {
        Ok(self.labels.get(option_id).cloned())
    }
}
