//! attrmap core library.
//!
//! Maps EAV catalog product attributes to typed search-index fields and turns
//! raw stored attribute values into index-ready value bundles, resolving
//! option coded values to store-localized display text.
//!
//! ```
//! use attrmap::{AttributeMapper, CatalogFixture, FieldType};
//!
//! let catalog = CatalogFixture::from_toml_str(r#"
//!     [[attributes]]
//!     attribute_id = 3
//!     code = "color"
//!     backend_type = "int"
//!     uses_source = true
//!
//!     [attributes.labels.0]
//!     3 = "Red"
//!     7 = "Blue"
//! "#).unwrap();
//!
//! let mut mapper = AttributeMapper::new(&catalog, &catalog);
//! let color = catalog.attribute("color").unwrap();
//!
//! assert_eq!(mapper.field_type(color), FieldType::Integer);
//!
//! let bundle = mapper.prepare_index_value(color, 1, "3,7").unwrap();
//! assert_eq!(
//!     bundle.to_json(),
//!     serde_json::json!({ "color": [3, 7], "option_text_color": ["Red", "Blue"] })
//! );
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod mapper;
pub mod mapping;
pub mod normalize;
pub mod source;
pub mod types;

pub use catalog::{CatalogFixture, LabelSource, SampleValue};
pub use config::{MapperConfig, MapperSettings};
pub use errors::*;
pub use mapper::{AttributeMapper, CacheStats};
pub use mapping::{IndexMapping, MappingField};
pub use normalize::ZeroValuePolicy;
pub use source::{AttributeCollectionFactory, AttributeStore, LocalizedAttribute, OptionSource};
pub use types::{
    AttributeDefinition, AttributeId, AttributeRef, BackendType, FieldType, IndexValue, IndexValueBundle,
    MappingFieldOptions, OptionId, RawValue, SearchConfig, StoreId,
};
