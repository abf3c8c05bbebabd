pub mod fields;
pub mod values;

use std::path::Path;

use anyhow::{Context, Result};
use attrmap::{CatalogFixture, MapperConfig};

/// Load the catalog fixture the commands run against.
pub fn load_catalog(path: &Path) -> Result<CatalogFixture> {
    CatalogFixture::load(path).with_context(|| format!("Failed to load catalog fixture {}", path.display()))
}

/// Load mapper settings, falling back to defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<MapperConfig> {
    match path {
        Some(path) => {
            MapperConfig::load(path).with_context(|| format!("Failed to load mapper config {}", path.display()))
        }
        None => Ok(MapperConfig::default()),
    }
}
