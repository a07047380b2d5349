use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::Catalog;

/// Reads a `{ "questions": [...], "categories": [...] }` JSON document.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read question catalog {:?}", path))?;
    let catalog: Catalog = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse question catalog {:?}", path))?;
    tracing::debug!(
        questions = catalog.questions.len(),
        categories = catalog.categories.len(),
        "loaded question catalog"
    );
    Ok(catalog)
}
