//! JSON and CSV exporters for fetched unit data.
//!
//! Both exporters go through `serde_json::Value`, which keeps them
//! independent of the concrete record type and gives the JSON writer sorted
//! keys for free.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

/// Fixed CSV column order. Explicit instead of derived from the first
/// record, so the CSV shape is stable across differently-shaped inputs.
pub const CSV_HEADERS: [&str; 26] = [
    "name",
    "supply",
    "type",
    "position",
    "unit_spell",
    "gold",
    "blue",
    "red",
    "green",
    "energy",
    "attack",
    "health",
    "blocker",
    "fragile",
    "frontline",
    "prompt",
    "lifespan",
    "stamina",
    "build_time",
    "exhaust_ability",
    "exhaust_turn",
    "abilities",
    "path",
    "image",
    "panel",
    "change_history",
];

/// Sub-records hoisted to the top level during CSV flattening.
const NESTED_KEYS: [&str; 4] = ["attributes", "costs", "links", "stats"];

/// Export failures, shape and I/O alike.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A unit entry or one of its sub-records is not a mapping.
    #[error("Invalid format (nested data).")]
    NestedData,

    /// A unit entry is missing a required sub-record.
    #[error("Invalid format (missing key).")]
    MissingKey,

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Renders `data` as the exported JSON document: sorted keys, 4-space
/// indentation.
pub fn to_json_string(data: &impl Serialize) -> Result<String, ExportError> {
    // Round-tripping through Value sorts object keys
    let value = serde_json::to_value(data)?;
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Writes `data` as JSON to `path`, overwriting any existing file in place.
pub fn write_json(data: &impl Serialize, path: &Path) -> Result<(), ExportError> {
    fs::write(path, to_json_string(data)?)?;
    info!("Data exported to (JSON): {}", path.display());
    Ok(())
}

/// Writes `data` as CSV to `path` in the fixed [`CSV_HEADERS`] column order.
///
/// Each unit's `attributes`, `costs`, `links` and `stats` sub-records are
/// hoisted to the top level; `change_history` is rendered as one string with
/// entries joined by `|`, each formatted `"{date}, {changes}"`. Every record
/// is flattened before the file is opened, so shape errors leave no file
/// behind.
pub fn write_csv(data: &impl Serialize, path: &Path) -> Result<(), ExportError> {
    let value = serde_json::to_value(data)?;
    let rows = match flatten_all(&value) {
        Ok(rows) => rows,
        Err(e) => {
            error!("Error exporting CSV: {}", e);
            return Err(e);
        }
    };

    let mut out = String::new();
    out.push_str(&CSV_HEADERS.join(","));
    out.push('\n');
    for row in &rows {
        let fields: Vec<String> = CSV_HEADERS
            .iter()
            .map(|header| csv_escape(row.get(*header).map(String::as_str).unwrap_or_default()))
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    fs::write(path, out)?;
    info!("Data exported to (CSV): {}", path.display());
    Ok(())
}

fn flatten_all(value: &Value) -> Result<Vec<BTreeMap<String, String>>, ExportError> {
    let units = value.as_object().ok_or(ExportError::NestedData)?;
    units.values().map(flatten_unit).collect()
}

/// Hoists one unit's sub-records to a flat column -> text mapping.
fn flatten_unit(value: &Value) -> Result<BTreeMap<String, String>, ExportError> {
    let unit = value.as_object().ok_or(ExportError::NestedData)?;
    let mut flat = BTreeMap::new();

    for key in NESTED_KEYS {
        let sub = unit.get(key).ok_or(ExportError::MissingKey)?;
        let sub = sub.as_object().ok_or(ExportError::NestedData)?;
        for (name, val) in sub {
            flat.insert(name.clone(), scalar_text(val));
        }
    }

    let history = unit.get("change_history").ok_or(ExportError::MissingKey)?;
    let history = history.as_object().ok_or(ExportError::NestedData)?;
    let joined = history
        .iter()
        .map(|(day, changes)| {
            let texts: Vec<String> = changes
                .as_array()
                .map(|entries| entries.iter().map(scalar_text).collect())
                .unwrap_or_default();
            format!("{}, {}", day, texts.join(" "))
        })
        .collect::<Vec<_>>()
        .join("|");
    flat.insert("change_history".to_string(), joined);

    // Remaining scalar keys (name, type, unit_spell, abilities, position)
    for (name, val) in unit {
        if name == "change_history" || NESTED_KEYS.contains(&name.as_str()) {
            continue;
        }
        flat.insert(name.clone(), scalar_text(val));
    }

    Ok(flat)
}

/// Renders a scalar JSON value for a CSV cell. Booleans keep the wiki's
/// `True`/`False` casing.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
