//! Derivations the records viewer draws from: columns, labels, display
//! values, search and CSV export.

use super::Record;
use crate::errors::RegistroError;
use crate::schema::{FieldType, FormConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const EXPORT_FILE_NAME: &str = "empleados.csv";

/// Union of the field ids present across records, in first-seen order
pub fn derive_fields(records: &[Record]) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for record in records {
        for (id, _) in &record.values {
            if !fields.contains(id) {
                fields.push(id.clone());
            }
        }
    }
    fields
}

/// `fechaNacimiento` -> `Fecha Nacimiento`
pub fn humanize(field_id: &str) -> String {
    let mut chars = field_id.chars();
    let mut out = String::with_capacity(field_id.len() + 4);
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
    }
    for c in chars {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Schema label for the id, or a humanized fallback for fields that no
/// longer exist
pub fn field_label(config: &FormConfig, field_id: &str) -> String {
    match config.field(field_id) {
        Some(field) if !field.label.is_empty() => field.label.clone(),
        _ => humanize(field_id),
    }
}

/// Resolve select values to option labels; everything else passes through
pub fn display_value<'a>(config: &'a FormConfig, field_id: &str, raw: &'a str) -> &'a str {
    match config.field(field_id) {
        Some(field) if field.field_type == FieldType::Select => {
            field.option_label(raw).unwrap_or(raw)
        }
        _ => raw,
    }
}

/// Display value for a table cell or card entry; empty shows as `-`
pub fn cell_text(config: &FormConfig, record: &Record, field_id: &str) -> String {
    let raw = record.get(field_id).unwrap_or("");
    let shown = display_value(config, field_id, raw);
    if shown.is_empty() {
        "-".to_string()
    } else {
        shown.to_string()
    }
}

/// Records whose timestamp or any raw value contains `term`, ignoring case
pub fn search<'a>(records: &'a [Record], term: &str) -> Vec<&'a Record> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| {
            needle.is_empty()
                || record.timestamp.to_lowercase().contains(&needle)
                || record
                    .values
                    .iter()
                    .any(|(_, value)| value.to_lowercase().contains(&needle))
        })
        .collect()
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Serialize records as CSV with a header row of field labels.
///
/// Every cell is double-quoted. Returns `None` when there is nothing to
/// export.
pub fn export_csv(config: &FormConfig, records: &[Record]) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let fields = derive_fields(records);
    let header = fields
        .iter()
        .map(|id| quote(&field_label(config, id)))
        .collect::<Vec<_>>()
        .join(",");

    let rows = records.iter().map(|record| {
        fields
            .iter()
            .map(|id| quote(display_value(config, id, record.get(id).unwrap_or(""))))
            .collect::<Vec<_>>()
            .join(",")
    });

    let mut lines = vec![header];
    lines.extend(rows);
    Some(lines.join("\n"))
}

/// Write an export into `dir` as [`EXPORT_FILE_NAME`]
pub fn write_export(dir: &Path, csv: &str) -> Result<PathBuf, RegistroError> {
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, csv).map_err(|source| RegistroError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), bytes = csv.len(), "exported records");
    Ok(path)
}
