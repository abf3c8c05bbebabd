use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Storefront / locale scope. Store `0` is the admin (default) scope.
pub type StoreId = u32;

/// Catalog-wide attribute identifier.
pub type AttributeId = u32;

/// Option key, compared in its string form so `int` backed selects and
/// `varchar` backed multiselects share one cache.
pub type OptionId = String;

/// Source model whose options are plain yes/no flags.
pub const BOOLEAN_SOURCE_MODEL: &str = "eav/entity_attribute_source_boolean";

/// Physical storage type of an EAV attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BackendType {
    #[default]
    Static,
    Int,
    Decimal,
    Datetime,
    Varchar,
    Text,
    Other(String),
}

impl BackendType {
    pub fn as_str(&self) -> &str {
        match self {
            BackendType::Static => "static",
            BackendType::Int => "int",
            BackendType::Decimal => "decimal",
            BackendType::Datetime => "datetime",
            BackendType::Varchar => "varchar",
            BackendType::Text => "text",
            BackendType::Other(other) => other.as_str(),
        }
    }
}

impl From<&str> for BackendType {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "static" => BackendType::Static,
            "int" => BackendType::Int,
            "decimal" => BackendType::Decimal,
            "datetime" => BackendType::Datetime,
            "varchar" => BackendType::Varchar,
            "text" => BackendType::Text,
            _ => BackendType::Other(value.to_string()),
        }
    }
}

impl From<String> for BackendType {
    fn from(value: String) -> Self {
        BackendType::from(value.as_str())
    }
}

impl From<BackendType> for String {
    fn from(value: BackendType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search behaviour flags configured on an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub is_searchable: bool,
    pub is_filterable: bool,
    pub search_weight: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            is_searchable: false,
            is_filterable: false,
            search_weight: 1.0,
        }
    }
}

/// Product attribute metadata as exposed by the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeDefinition {
    pub attribute_id: AttributeId,
    pub code: String,
    pub backend_type: BackendType,
    /// Frontend validation hint such as `validate-digits`.
    pub frontend_class: Option<String>,
    pub uses_source: bool,
    /// `None` means the attribute falls back to the generic option table.
    pub source_model: Option<String>,
    pub search: SearchConfig,
    /// Store scope this instance was loaded for.
    pub store_id: StoreId,
}

impl AttributeDefinition {
    pub fn new(attribute_id: AttributeId, code: impl Into<String>, backend_type: BackendType) -> Self {
        Self {
            attribute_id,
            code: code.into(),
            backend_type,
            ..Self::default()
        }
    }

    /// An empty definition scoped to `store_id`, ready to be filled by a loader.
    pub fn blank(store_id: StoreId) -> Self {
        Self {
            store_id,
            ..Self::default()
        }
    }

    pub fn with_frontend_class(mut self, class: impl Into<String>) -> Self {
        self.frontend_class = Some(class.into());
        self
    }

    /// Mark the attribute as option coded, optionally naming its source model.
    pub fn with_source(mut self, source_model: Option<&str>) -> Self {
        self.uses_source = true;
        self.source_model = source_model.map(str::to_string);
        self
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn frontend_class_is(&self, class: &str) -> bool {
        self.frontend_class.as_deref() == Some(class)
    }
}

/// Either a bare attribute id or a full definition.
#[derive(Debug, Clone, Copy)]
pub enum AttributeRef<'a> {
    Id(AttributeId),
    Definition(&'a AttributeDefinition),
}

impl From<AttributeId> for AttributeRef<'_> {
    fn from(value: AttributeId) -> Self {
        AttributeRef::Id(value)
    }
}

impl<'a> From<&'a AttributeDefinition> for AttributeRef<'a> {
    fn from(value: &'a AttributeDefinition) -> Self {
        AttributeRef::Definition(value)
    }
}

/// Search-index field type inferred for an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Integer,
    Double,
    Boolean,
    Date,
}

impl FieldType {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Double => "double",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field creation parameters derived from an attribute's search configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingFieldOptions {
    pub is_searchable: bool,
    pub is_filterable: bool,
    pub is_filterable_in_search: bool,
    pub search_weight: f32,
}

/// Attribute value as stored in the catalog tables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Single(String),
    Multiple(Vec<String>),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Single(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Single(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for RawValue {
    fn from(values: Vec<S>) -> Self {
        RawValue::Multiple(values.into_iter().map(Into::into).collect())
    }
}

/// A single normalized value ready to be written into an index document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndexValue {
    Integer(i64),
    Double(f64),
    Text(String),
}

impl IndexValue {
    /// String form used as the option key when resolving option texts.
    pub fn option_key(&self) -> OptionId {
        match self {
            IndexValue::Integer(value) => value.to_string(),
            IndexValue::Double(value) => value.to_string(),
            IndexValue::Text(value) => value.clone(),
        }
    }
}

impl From<i64> for IndexValue {
    fn from(value: i64) -> Self {
        IndexValue::Integer(value)
    }
}

impl From<f64> for IndexValue {
    fn from(value: f64) -> Self {
        IndexValue::Double(value)
    }
}

impl From<&str> for IndexValue {
    fn from(value: &str) -> Self {
        IndexValue::Text(value.to_string())
    }
}

impl From<String> for IndexValue {
    fn from(value: String) -> Self {
        IndexValue::Text(value)
    }
}

/// Field name to values map produced for one attribute value.
///
/// Empty value lists are never stored, so an attribute without a usable
/// value yields an empty bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IndexValueBundle {
    fields: BTreeMap<String, Vec<IndexValue>>,
}

impl IndexValueBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `values` under `field`, skipping empty lists.
    pub fn insert(&mut self, field: impl Into<String>, values: Vec<IndexValue>) {
        if values.is_empty() {
            return;
        }
        self.fields.insert(field.into(), values);
    }

    pub fn get(&self, field: &str) -> Option<&[IndexValue]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[IndexValue])> {
        self.fields.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Append every field of `other`, keeping existing values first.
    ///
    /// Composite products merge the bundles of their children this way.
    pub fn merge(&mut self, other: IndexValueBundle) {
        for (field, values) in other.fields {
            if values.is_empty() {
                continue;
            }
            self.fields.entry(field).or_default().extend(values);
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
