use std::path::PathBuf;

use anyhow::{Context, Result};
use attrmap::{AttributeMapper, CatalogFixture, IndexMapping, MapperConfig};
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, create_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Field Mapping",
    commands: &[
        "attrmap fields catalog.toml                  # Field types of every attribute",
        "attrmap --output json fields catalog.toml    # Mapping as JSON",
    ],
}];

#[derive(Args)]
pub struct FieldsArgs {
    /// Catalog fixture (TOML) describing the attributes
    pub catalog: PathBuf,
}

#[derive(Serialize)]
#[serde(transparent)]
struct MappingReport(IndexMapping);

impl TableDisplay for MappingReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(&mut table, options, &["Field", "Type", "Searchable", "Filterable", "Weight"]);
        for field in &self.0.fields {
            table.add_row(vec![
                Cell::new(&field.name),
                Cell::new(field.field_type),
                Cell::new(yes_no(field.options.is_searchable)),
                Cell::new(yes_no(field.options.is_filterable)),
                Cell::new(field.options.search_weight),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0
            .fields
            .iter()
            .map(|field| format!("{}:{}", field.name, field.field_type))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn mapping_report(catalog: &CatalogFixture, config: MapperConfig) -> Result<MappingReport> {
    let mapper = AttributeMapper::with_config(catalog, catalog, config);
    let mapping = mapper.build_mapping().context("Failed to build mapping")?;
    Ok(MappingReport(mapping))
}

pub fn handle_fields(args: FieldsArgs, config: MapperConfig, output: &OutputManager) -> Result<()> {
    let catalog = super::load_catalog(&args.catalog)?;
    let report = mapping_report(&catalog, config)?;

    output.heading("Index Mapping");
    if report.0.is_empty() {
        // Scripts still get a document to parse.
        if output.is_json() {
            output.display(&report)?;
        }
        output.info("The catalog has no attributes.");
        return Ok(());
    }

    let field_count = report.0.len();
    output.display(&report)?;
    output.key_value("Fields", &field_count.to_string());
    Ok(())
}
