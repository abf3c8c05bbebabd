use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use attrmap::{
    AttributeCollectionFactory, AttributeDefinition, AttributeId, AttributeMapper, AttributeRef, AttributeStore,
    BackendType, CacheStats, FieldType, IndexValue, LocalizedAttribute, MapperConfig, MapperError, MapperResult,
    OptionSource, StoreId, ZeroValuePolicy,
};

/// Option source that counts how often it is asked.
struct CountingSource {
    labels: HashMap<String, String>,
    calls: Rc<Cell<usize>>,
}

impl OptionSource for CountingSource {
    fn resolve_display_text(&self, option_id: &str) -> MapperResult<Option<String>> {
        self.calls.set(self.calls.get() + 1);
        if option_id == "boom" {
            return Err(MapperError::OptionSource {
                attribute_code: "color".to_string(),
                option_id: option_id.to_string(),
                message: "source unavailable".to_string(),
            });
        }
        Ok(self.labels.get(option_id).cloned())
    }
}

/// Attribute store that counts loads and localizes labels per store.
#[derive(Default)]
struct CountingStore {
    attributes: Vec<AttributeDefinition>,
    labels: HashMap<(StoreId, String), String>,
    loads: Rc<Cell<usize>>,
    source_calls: Rc<Cell<usize>>,
}

impl CountingStore {
    fn with_attribute(mut self, definition: AttributeDefinition) -> Self {
        self.attributes.push(definition);
        self
    }

    fn with_label(mut self, store_id: StoreId, option_id: &str, text: &str) -> Self {
        self.labels.insert((store_id, option_id.to_string()), text.to_string());
        self
    }
}

impl AttributeStore for CountingStore {
    fn load(&self, attribute_id: AttributeId, store_id: StoreId) -> MapperResult<LocalizedAttribute> {
        self.loads.set(self.loads.get() + 1);
        let found = self
            .attributes
            .iter()
            .find(|definition| definition.attribute_id == attribute_id)
            .ok_or(MapperError::AttributeNotFound { attribute_id, store_id })?;

        let mut definition = found.clone();
        definition.store_id = store_id;

        let labels = self
            .labels
            .iter()
            .filter(|((store, _), _)| *store == store_id)
            .map(|((_, option), text)| (option.clone(), text.clone()))
            .collect();
        let source = CountingSource {
            labels,
            calls: Rc::clone(&self.source_calls),
        };
        Ok(LocalizedAttribute::with_source(definition, Box::new(source)))
    }
}

struct EmptyCollection;

impl AttributeCollectionFactory for EmptyCollection {
    fn create(&self) -> MapperResult<Vec<AttributeDefinition>> {
        Ok(Vec::new())
    }
}

fn color() -> AttributeDefinition {
    AttributeDefinition::new(3, "color", BackendType::Int).with_source(None)
}

fn color_store() -> CountingStore {
    CountingStore::default()
        .with_attribute(color())
        .with_label(1, "3", "Red")
        .with_label(1, "7", "Blue")
        .with_label(2, "3", "Rouge")
        .with_label(2, "7", "Bleu")
}

fn mapper(store: CountingStore) -> AttributeMapper<CountingStore, EmptyCollection> {
    AttributeMapper::new(store, EmptyCollection)
}

#[test]
fn int_backend_is_always_integer() {
    let mapper = mapper(CountingStore::default());
    let variants = [
        AttributeDefinition::new(1, "a", BackendType::Int),
        AttributeDefinition::new(1, "a", BackendType::Int).with_frontend_class("validate-number"),
        AttributeDefinition::new(1, "a", BackendType::Int).with_source(Some("eav/entity_attribute_source_boolean")),
        AttributeDefinition::new(1, "a", BackendType::Int).with_source(Some("custom/source")),
        AttributeDefinition::new(1, "a", BackendType::Int).with_source(None),
    ];
    for attribute in &variants {
        assert_eq!(mapper.field_type(attribute), FieldType::Integer, "{attribute:?}");
    }
}

#[test]
fn generic_source_is_integer_unless_decimal() {
    let mapper = mapper(CountingStore::default());
    for backend in [BackendType::Varchar, BackendType::Text, BackendType::Static, BackendType::Datetime] {
        let attribute = AttributeDefinition::new(1, "a", backend.clone()).with_source(None);
        let expected = if backend == BackendType::Datetime {
            FieldType::Date
        } else {
            FieldType::Integer
        };
        assert_eq!(mapper.field_type(&attribute), expected, "{backend}");
    }

    let decimal = AttributeDefinition::new(1, "a", BackendType::Decimal).with_source(None);
    assert_eq!(mapper.field_type(&decimal), FieldType::Double);
}

#[test]
fn plain_int_value_is_coerced() {
    let mut mapper = mapper(CountingStore::default());
    let qty = AttributeDefinition::new(5, "qty", BackendType::Int);

    let bundle = mapper.prepare_index_value(&qty, 1, "5").unwrap();
    assert_eq!(bundle.to_json(), serde_json::json!({ "qty": [5] }));
    assert_eq!(bundle.len(), 1);
}

#[test]
fn source_value_is_split_and_resolved() {
    let store = color_store();
    let source_calls = Rc::clone(&store.source_calls);
    let mut mapper = mapper(store);

    let bundle = mapper.prepare_index_value(&color(), 1, "3,7").unwrap();
    assert_eq!(bundle.get("color"), Some(&[IndexValue::Integer(3), IndexValue::Integer(7)][..]));
    assert_eq!(
        bundle.get("option_text_color"),
        Some(&[IndexValue::from("Red"), IndexValue::from("Blue")][..])
    );
    assert_eq!(source_calls.get(), 2);
}

#[test]
fn option_texts_are_localized_per_store() {
    let mut mapper = mapper(color_store());

    let french = mapper.prepare_index_value(&color(), 2, "3,7").unwrap();
    assert_eq!(
        french.to_json(),
        serde_json::json!({ "color": [3, 7], "option_text_color": ["Rouge", "Bleu"] })
    );
}

#[test]
fn empty_decimal_value_yields_nothing() {
    let mut mapper = mapper(CountingStore::default());
    let price = AttributeDefinition::new(6, "price", BackendType::Decimal);

    let bundle = mapper.prepare_index_value(&price, 1, "").unwrap();
    assert!(bundle.is_empty());
    assert_eq!(bundle.to_json(), serde_json::json!({}));
}

#[test]
fn zero_is_dropped_by_default_and_kept_on_request() {
    let qty = AttributeDefinition::new(5, "qty", BackendType::Int);
    let price = AttributeDefinition::new(6, "price", BackendType::Decimal);

    let mut dropping = mapper(CountingStore::default());
    assert!(dropping.prepare_index_value(&qty, 1, "0").unwrap().is_empty());

    let config = MapperConfig::default().with_zero_values(ZeroValuePolicy::Keep);
    let mut keeping = AttributeMapper::with_config(CountingStore::default(), EmptyCollection, config);
    assert_eq!(
        keeping.prepare_index_value(&qty, 1, "0").unwrap().to_json(),
        serde_json::json!({ "qty": [0] })
    );
    assert!(keeping.prepare_index_value(&price, 1, "").unwrap().is_empty());
}

#[test]
fn unknown_options_are_filtered_from_texts() {
    let mut mapper = mapper(color_store());

    let bundle = mapper.prepare_index_value(&color(), 1, "3,9").unwrap();
    assert_eq!(bundle.get("color"), Some(&[IndexValue::Integer(3), IndexValue::Integer(9)][..]));
    assert_eq!(bundle.get("option_text_color"), Some(&[IndexValue::from("Red")][..]));
}

#[test]
fn empty_options_are_dropped_before_lookup() {
    let store = color_store();
    let loads = Rc::clone(&store.loads);
    let mut mapper = mapper(store);

    let bundle = mapper.prepare_index_value(&color(), 1, "").unwrap();
    assert!(bundle.is_empty());
    assert_eq!(loads.get(), 0);
}

#[test]
fn pre_split_values_are_not_split_again() {
    let tags = AttributeDefinition::new(8, "tags", BackendType::Varchar).with_source(Some("custom/tags"));
    let store = CountingStore::default()
        .with_attribute(tags.clone())
        .with_label(1, "a,b", "Combined");
    let mut mapper = mapper(store);

    let bundle = mapper.prepare_index_value(&tags, 1, vec!["a,b"]).unwrap();
    assert_eq!(bundle.get("tags"), Some(&[IndexValue::from("a,b")][..]));
    assert_eq!(bundle.get("option_text_tags"), Some(&[IndexValue::from("Combined")][..]));
}

#[test]
fn options_text_keeps_order_and_duplicates() {
    let mut mapper = mapper(color_store());
    let ids: Vec<String> = ["7", "3", "7", "9"].iter().map(|id| id.to_string()).collect();

    let texts = mapper.index_options_text(AttributeRef::Id(3), 1, &ids).unwrap();
    assert_eq!(
        texts,
        vec![
            Some("Blue".to_string()),
            Some("Red".to_string()),
            Some("Blue".to_string()),
            None
        ]
    );
}

#[test]
fn option_text_is_resolved_once() {
    let store = color_store();
    let source_calls = Rc::clone(&store.source_calls);
    let mut mapper = mapper(store);
    let color = color();

    let first = mapper.index_option_text((&color).into(), 1, "3").unwrap();
    let second = mapper.index_option_text((&color).into(), 1, "3").unwrap();

    assert_eq!(first.as_deref(), Some("Red"));
    assert_eq!(first, second);
    assert_eq!(source_calls.get(), 1);
}

#[test]
fn missing_option_text_is_cached_too() {
    let store = color_store();
    let source_calls = Rc::clone(&store.source_calls);
    let mut mapper = mapper(store);

    assert_eq!(mapper.index_option_text(AttributeRef::Id(3), 1, "42").unwrap(), None);
    assert_eq!(mapper.index_option_text(AttributeRef::Id(3), 1, "42").unwrap(), None);
    assert_eq!(source_calls.get(), 1);
}

#[test]
fn attribute_is_loaded_once_per_store() {
    let store = color_store();
    let loads = Rc::clone(&store.loads);
    let mut mapper = mapper(store);

    mapper.attribute_by_store(3u32, 1).unwrap();
    mapper.attribute_by_store(&color(), 1).unwrap();
    assert_eq!(loads.get(), 1);

    mapper.attribute_by_store(3u32, 2).unwrap();
    assert_eq!(loads.get(), 2);

    mapper.prepare_index_value(&color(), 1, "3,7").unwrap();
    mapper.prepare_index_value(&color(), 2, "3,7").unwrap();
    assert_eq!(loads.get(), 2);
}

#[test]
fn attribute_id_passthrough_and_extraction() {
    let definition = AttributeDefinition::new(42, "size", BackendType::Int);
    assert_eq!(AttributeMapper::<CountingStore, EmptyCollection>::attribute_id(AttributeRef::Id(17)), 17);
    assert_eq!(
        AttributeMapper::<CountingStore, EmptyCollection>::attribute_id(AttributeRef::Definition(&definition)),
        42
    );
}

#[test]
fn reset_caches_forces_reload() {
    let store = color_store();
    let loads = Rc::clone(&store.loads);
    let source_calls = Rc::clone(&store.source_calls);
    let mut mapper = mapper(store);

    mapper.prepare_index_value(&color(), 1, "3,7").unwrap();
    assert_eq!(
        mapper.cache_stats(),
        CacheStats {
            store_attributes: 1,
            option_texts: 2
        }
    );

    mapper.reset_caches();
    assert_eq!(mapper.cache_stats(), CacheStats::default());

    mapper.prepare_index_value(&color(), 1, "3").unwrap();
    assert_eq!(loads.get(), 2);
    assert_eq!(source_calls.get(), 3);
}

#[test]
fn non_numeric_option_ids_coerce_to_zero_and_drop() {
    let store = color_store();
    let source_calls = Rc::clone(&store.source_calls);
    let mut mapper = mapper(store);

    let bundle = mapper.prepare_index_value(&color(), 1, "3,boom").unwrap();
    assert_eq!(bundle.get("color"), Some(&[IndexValue::Integer(3)][..]));
    assert_eq!(source_calls.get(), 1);
}

#[test]
fn collaborator_failures_propagate() {
    let tags = AttributeDefinition::new(8, "tags", BackendType::Varchar).with_source(Some("custom/tags"));
    let store = CountingStore::default().with_attribute(tags.clone());
    let mut mapper = mapper(store);

    let err = mapper.prepare_index_value(&tags, 1, "boom").unwrap_err();
    assert!(matches!(err, MapperError::OptionSource { ref option_id, .. } if option_id == "boom"));

    let missing = AttributeDefinition::new(99, "ghost", BackendType::Int).with_source(None);
    let err = mapper.prepare_index_value(&missing, 1, "1").unwrap_err();
    assert!(matches!(err, MapperError::AttributeNotFound { attribute_id: 99, store_id: 1 }));
}

#[test]
fn custom_option_text_prefix() {
    let config = MapperConfig::default().with_option_text_prefix("label_");
    let mut mapper = AttributeMapper::with_config(color_store(), EmptyCollection, config);

    let bundle = mapper.prepare_index_value(&color(), 1, "3").unwrap();
    assert!(bundle.contains_field("label_color"));
    assert!(!bundle.contains_field("option_text_color"));
}

#[test]
fn composite_products_merge_child_bundles() {
    let mut mapper = mapper(color_store());

    let mut parent = mapper.prepare_index_value(&color(), 1, "3").unwrap();
    let child = mapper.prepare_index_value(&color(), 1, "7").unwrap();
    parent.merge(child);

    assert_eq!(
        parent.to_json(),
        serde_json::json!({ "color": [3, 7], "option_text_color": ["Red", "Blue"] })
    );
}
