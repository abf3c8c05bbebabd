use std::path::PathBuf;

use anyhow::{Context, Result};
use attrmap::{AttributeMapper, CatalogFixture, IndexValue, IndexValueBundle, MapperConfig, StoreId};
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, create_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Index Values",
    commands: &[
        "attrmap values catalog.toml                  # Normalize sample values for the admin store",
        "attrmap values catalog.toml --store 2        # Resolve option texts for store 2",
        "attrmap --config mapper.toml values catalog.toml",
    ],
}];

#[derive(Args)]
pub struct ValuesArgs {
    /// Catalog fixture (TOML) with attributes and sample values
    pub catalog: PathBuf,

    /// Store the values are prepared for
    #[arg(long, short = 's', default_value_t = 0)]
    pub store: StoreId,
}

#[derive(Serialize)]
struct PreparedValue {
    product: Option<String>,
    attribute: String,
    fields: IndexValueBundle,
}

#[derive(Serialize)]
#[serde(transparent)]
struct ValuesReport(Vec<PreparedValue>);

impl TableDisplay for ValuesReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(&mut table, options, &["Product", "Attribute", "Field", "Values"]);
        for prepared in &self.0 {
            let product = prepared.product.as_deref().unwrap_or("-");
            if prepared.fields.is_empty() {
                table.add_row(vec![
                    Cell::new(product),
                    Cell::new(&prepared.attribute),
                    Cell::new("-"),
                    Cell::new("(no value)"),
                ]);
            }
            for (field, values) in prepared.fields.iter() {
                table.add_row(vec![
                    Cell::new(product),
                    Cell::new(&prepared.attribute),
                    Cell::new(field),
                    Cell::new(render_values(values)),
                ]);
            }
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0
            .iter()
            .map(|prepared| format!("{}={}", prepared.attribute, prepared.fields.to_json()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn render_values(values: &[IndexValue]) -> String {
    values
        .iter()
        .map(|value| match value {
            IndexValue::Integer(number) => number.to_string(),
            IndexValue::Double(number) => number.to_string(),
            IndexValue::Text(text) => format!("\"{text}\""),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

type CatalogMapper<'a> = AttributeMapper<&'a CatalogFixture, &'a CatalogFixture>;

/// Prepare every sample value of the catalog, skipping unknown attributes.
fn prepare_samples(
    catalog: &CatalogFixture,
    mapper: &mut CatalogMapper<'_>,
    store_id: StoreId,
    output: &OutputManager,
) -> Result<ValuesReport> {
    let mut prepared = Vec::with_capacity(catalog.sample_values().len());
    for sample in catalog.sample_values() {
        let Some(attribute) = catalog.attribute(&sample.attribute) else {
            output.warning(&format!("Skipping value for unknown attribute '{}'", sample.attribute));
            continue;
        };

        let fields = mapper
            .prepare_index_value(attribute, store_id, sample.value.clone())
            .with_context(|| format!("Failed to prepare value for '{}'", sample.attribute))?;

        prepared.push(PreparedValue {
            product: sample.product.clone(),
            attribute: sample.attribute.clone(),
            fields,
        });
    }
    Ok(ValuesReport(prepared))
}

pub fn handle_values(args: ValuesArgs, config: MapperConfig, output: &OutputManager) -> Result<()> {
    let catalog = super::load_catalog(&args.catalog)?;
    let mut mapper = AttributeMapper::with_config(&catalog, &catalog, config);

    output.heading(&format!("Index Values (store {})", args.store));

    let report = prepare_samples(&catalog, &mut mapper, args.store, output)?;
    if report.0.is_empty() {
        if output.is_json() {
            output.display(&report)?;
        }
        output.info("The catalog has no sample values.");
        return Ok(());
    }

    let count = report.0.len();
    output.display(&report)?;

    let stats = mapper.cache_stats();
    output.key_value("Attributes loaded", &stats.store_attributes.to_string());
    output.key_value("Option texts resolved", &stats.option_texts.to_string());
    output.success(&format!("Prepared {count} values"));
    Ok(())
}
