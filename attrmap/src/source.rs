//! Collaborator contracts consumed by the mapper.
//!
//! The attribute storage, option sources and attribute collections are owned
//! elsewhere; the mapper only reads through these traits and propagates their
//! failures unchanged.

use std::fmt;

use crate::errors::{MapperError, MapperResult};
use crate::types::{AttributeDefinition, AttributeId, StoreId};

/// Resolves coded option ids to display text for one store-scoped attribute.
pub trait OptionSource {
    /// Returns `Ok(None)` when the source has no text for `option_id`.
    fn resolve_display_text(&self, option_id: &str) -> MapperResult<Option<String>>;
}

/// Loads store-localized attribute definitions.
pub trait AttributeStore {
    /// A fresh definition scoped to `store_id`, before any data is loaded into it.
    fn create_blank(&self, store_id: StoreId) -> AttributeDefinition {
        AttributeDefinition::blank(store_id)
    }

    fn load(&self, attribute_id: AttributeId, store_id: StoreId) -> MapperResult<LocalizedAttribute>;
}

/// Produces the product attribute collection used to build a mapping.
pub trait AttributeCollectionFactory {
    fn create(&self) -> MapperResult<Vec<AttributeDefinition>>;
}

impl<T: AttributeStore + ?Sized> AttributeStore for &T {
    fn create_blank(&self, store_id: StoreId) -> AttributeDefinition {
        (**self).create_blank(store_id)
    }

    fn load(&self, attribute_id: AttributeId, store_id: StoreId) -> MapperResult<LocalizedAttribute> {
        (**self).load(attribute_id, store_id)
    }
}

impl<T: AttributeCollectionFactory + ?Sized> AttributeCollectionFactory for &T {
    fn create(&self) -> MapperResult<Vec<AttributeDefinition>> {
        (**self).create()
    }
}

/// Attribute definition loaded for a store, together with its option source.
pub struct LocalizedAttribute {
    pub definition: AttributeDefinition,
    source: Option<Box<dyn OptionSource>>,
}

impl LocalizedAttribute {
    pub fn new(definition: AttributeDefinition) -> Self {
        Self {
            definition,
            source: None,
        }
    }

    pub fn with_source(definition: AttributeDefinition, source: Box<dyn OptionSource>) -> Self {
        Self {
            definition,
            source: Some(source),
        }
    }

    pub fn attribute_id(&self) -> AttributeId {
        self.definition.attribute_id
    }

    pub fn store_id(&self) -> StoreId {
        self.definition.store_id
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> MapperResult<&dyn OptionSource> {
        self.source.as_deref().ok_or_else(|| MapperError::MissingOptionSource {
            attribute_code: self.definition.code.clone(),
        })
    }
}

impl fmt::Debug for LocalizedAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalizedAttribute")
            .field("definition", &self.definition)
            .field("has_source", &self.has_source())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BackendType;

    struct Fixed(&'static str);

    impl OptionSource for Fixed {
        fn resolve_display_text(&self, _option_id: &str) -> MapperResult<Option<String>> {
            Ok(Some(self.0.to_string()))
        }
    }

    #[test]
    fn source_is_reported_missing_with_attribute_code() {
        let localized = LocalizedAttribute::new(AttributeDefinition::new(3, "color", BackendType::Int));
        let err = localized.source().err().expect("source should be missing");
        assert!(matches!(err, MapperError::MissingOptionSource { ref attribute_code } if attribute_code == "color"));
    }

    #[test]
    fn source_resolves_when_present() {
        let localized = LocalizedAttribute::with_source(
            AttributeDefinition::new(3, "color", BackendType::Int),
            Box::new(Fixed("Red")),
        );
        let text = localized.source().unwrap().resolve_display_text("3").unwrap();
        assert_eq!(text.as_deref(), Some("Red"));
    }
}
