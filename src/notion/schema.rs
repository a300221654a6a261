// animelistsync/src/notion/schema.rs
use serde_json::{Map, Value, json};

use super::properties::{MAL_ID, MAPPED_PROPERTIES};
use crate::errors::{AppError, Result};

/// Property schema used when the config does not provide one.
pub fn default_database_schema() -> Value {
    let schema: Map<String, Value> = MAPPED_PROPERTIES
        .iter()
        .map(|(name, kind)| {
            let config = match *kind {
                "number" => json!({ "format": "number" }),
                "select" | "multi_select" => json!({ "options": [] }),
                _ => json!({}),
            };
            (name.to_string(), json!({ *kind: config }))
        })
        .collect();
    Value::Object(schema)
}

/// Reads a property's type from either the retrieved form
/// (`{"id": .., "type": "number", ..}`) or the request form (`{"number": {}}`).
fn property_type(property: &Value) -> Option<&str> {
    let object = property.as_object()?;
    match object.get("type").and_then(Value::as_str) {
        Some(kind) => Some(kind),
        None => object
            .keys()
            .find(|key| !matches!(key.as_str(), "id" | "name" | "description"))
            .map(String::as_str),
    }
}

/// Checks a database schema against the mapped set.
///
/// Every page write carries all mapped properties and Notion rejects the
/// whole write when one of them is missing or has another type, so any gap
/// is a setup error. Extra properties are left alone.
pub fn verify_schema(database_properties: &Map<String, Value>) -> Result<()> {
    let mut problems = Vec::new();
    for (name, kind) in MAPPED_PROPERTIES {
        match database_properties.get(*name).and_then(property_type) {
            Some(actual) if actual == *kind => {}
            Some(actual) => problems.push(format!(
                "property '{}' is a {} but should be a {}",
                name, actual, kind
            )),
            None => problems.push(format!("property '{}' ({}) is missing", name, kind)),
        }
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::Setup(format!(
            "Database cannot be synced: {}",
            problems.join("; ")
        )))
    }
}
