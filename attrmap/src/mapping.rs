use std::collections::HashSet;

use serde::Serialize;

use crate::errors::MapperResult;
use crate::mapper::AttributeMapper;
use crate::source::{AttributeCollectionFactory, AttributeStore};
use crate::types::{AttributeDefinition, FieldType, MappingFieldOptions};

/// One field of the search-index mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(flatten)]
    pub options: MappingFieldOptions,
}

/// Field list for a product index, in attribute collection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexMapping {
    pub fields: Vec<MappingField>,
}

impl IndexMapping {
    pub fn field(&self, name: &str) -> Option<&MappingField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S, C> AttributeMapper<S, C>
where
    S: AttributeStore,
    C: AttributeCollectionFactory,
{
    /// Fields contributed by one attribute.
    ///
    /// Option coded attributes also get a string field for their display texts,
    /// sharing the attribute's search options.
    pub fn mapping_fields(&self, attribute: &AttributeDefinition) -> Vec<MappingField> {
        let options = self.mapping_field_options(attribute);
        let mut fields = vec![MappingField {
            name: attribute.code.clone(),
            field_type: self.field_type(attribute),
            options: options.clone(),
        }];

        if attribute.uses_source {
            fields.push(MappingField {
                name: self.option_text_field_name(&attribute.code),
                field_type: FieldType::String,
                options,
            });
        }

        fields
    }

    /// Mapping for every attribute of the product attribute collection.
    ///
    /// A field name produced twice keeps its first definition.
    pub fn build_mapping(&self) -> MapperResult<IndexMapping> {
        let attributes = self.attribute_collection()?;
        let mut seen = HashSet::new();
        let mut mapping = IndexMapping::default();

        for attribute in &attributes {
            for field in self.mapping_fields(attribute) {
                if seen.insert(field.name.clone()) {
                    mapping.fields.push(field);
                } else {
                    log::warn!("duplicate mapping field '{}' ignored", field.name);
                }
            }
        }

        Ok(mapping)
    }
}
