//! Embedded seed content.
//!
//! The JSON files under `data/` are compiled into the binary. Catalog files use
//! the same `{"<export key>": [...]}` shape as admin exports.

use rust_embed::RustEmbed;
use serde_json::Value;

use crate::course::CourseContent;
use crate::errors::{KopiError, Result};
use crate::storage::CatalogItem;

#[derive(RustEmbed)]
#[folder = "data/"]
struct SeedAssets;

pub const COURSE_FILE: &str = "course-structure.json";

fn read_asset(name: &str) -> Result<String> {
    let file = SeedAssets::get(name)
        .ok_or_else(|| KopiError::file_operation(format!("seed file '{}' is missing", name)))?;
    String::from_utf8(file.data.into_owned())
        .map_err(|e| KopiError::file_operation(format!("seed file '{}': {}", name, e)))
}

/// Extracts the array stored under `key`. Returns `None` when the document
/// is not an object holding an array under that key.
pub fn extract_array(doc: &Value, key: &str) -> Option<Vec<Value>> {
    doc.as_object()?.get(key)?.as_array().cloned()
}

/// Seed records for one catalog collection.
pub fn catalog_seed<T: CatalogItem>() -> Result<Vec<T>> {
    let raw = read_asset(T::KIND.seed_file())?;
    let doc: Value = serde_json::from_str(&raw)?;
    let entries = extract_array(&doc, T::KIND.export_key()).ok_or_else(|| {
        KopiError::invalid_content(format!(
            "seed file '{}' has no \"{}\" array",
            T::KIND.seed_file(),
            T::KIND.export_key()
        ))
    })?;

    entries
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(KopiError::from))
        .collect()
}

/// Built-in course structure.
pub fn course_content() -> Result<CourseContent> {
    CourseContent::from_json(&read_asset(COURSE_FILE)?)
}

/// Course structure from `path`, or the built-in one when `path` is `None`.
pub fn load_course(path: Option<&str>) -> Result<CourseContent> {
    match path {
        Some(p) => {
            let raw = std::fs::read_to_string(p)
                .map_err(|e| KopiError::file_operation(format!("{}: {}", p, e)))?;
            CourseContent::from_json(&raw)
        }
        None => course_content(),
    }
}
