//! Export file encodings.
//!
//! Encoding is pure (records ⇄ bytes); the exporter and importer do the
//! file I/O. JSON is a pretty-printed array. CSV uses the union of top-level
//! keys as the header (first-seen order), RFC 4180 quoting, and JSON text for
//! nested values. Parquet has no writer in this build and is rejected.

use std::path::Path;

use arize_domain::{ArizeError, ExportFormat, Result};
use serde_json::{Map, Value};

/// Pick the format from a file's extension.
pub fn format_for_path(path: &Path) -> Result<ExportFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    extension.parse::<ExportFormat>().map_err(|_| {
        ArizeError::Validation(format!("unsupported export file extension: {}", path.display()))
    })
}

pub fn encode(format: ExportFormat, records: &[Value]) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(records)?),
        ExportFormat::Csv => Ok(to_csv(records).into_bytes()),
        ExportFormat::Parquet => Err(parquet_unsupported()),
    }
}

/// Decode a file body. A single JSON object is a one-record list.
pub fn decode(format: ExportFormat, bytes: &[u8]) -> Result<Vec<Value>> {
    match format {
        ExportFormat::Json => match serde_json::from_slice::<Value>(bytes)? {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            single => Ok(vec![single]),
        },
        ExportFormat::Csv => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| ArizeError::Serialization(format!("CSV is not valid UTF-8: {e}")))?;
            from_csv(text)
        }
        ExportFormat::Parquet => Err(parquet_unsupported()),
    }
}

fn parquet_unsupported() -> ArizeError {
    ArizeError::Unsupported("parquet export is not available; use json or csv".into())
}

fn as_object(record: &Value) -> Map<String, Value> {
    match record {
        Value::Object(map) => map.clone(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other.clone());
            map
        }
    }
}

fn to_csv(records: &[Value]) -> String {
    let rows: Vec<Map<String, Value>> = records.iter().map(as_object).collect();

    let mut header: Vec<&str> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            if !header.contains(&key.as_str()) {
                header.push(key.as_str());
            }
        }
    }

    let mut out = String::new();
    write_row(&mut out, header.iter().map(|h| h.to_string()));
    for row in &rows {
        write_row(&mut out, header.iter().map(|key| cell_text(row.get(*key))));
    }
    out
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn write_row(out: &mut String, cells: impl Iterator<Item = String>) {
    let mut first = true;
    for cell in cells {
        if !first {
            out.push(',');
        }
        first = false;
        if cell.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(&cell);
        }
    }
    out.push_str("\r\n");
}

/// Split CSV text into rows of raw cells.
fn parse_rows(text: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                other => cell.push(other),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut cell)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            other => cell.push(other),
        }
    }

    if in_quotes {
        return Err(ArizeError::Serialization("CSV ends inside a quoted field".into()));
    }
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }
    Ok(rows)
}

fn from_csv(text: &str) -> Result<Vec<Value>> {
    let mut rows = parse_rows(text)?.into_iter();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for (line, cells) in rows.enumerate() {
        if cells.len() != header.len() {
            return Err(ArizeError::Serialization(format!(
                "CSV row {} has {} cells, header has {}",
                line + 2,
                cells.len(),
                header.len()
            )));
        }
        let record: Map<String, Value> =
            header.iter().cloned().zip(cells.into_iter().map(cell_value)).collect();
        records.push(Value::Object(record));
    }
    Ok(records)
}

/// Empty ⇒ null; JSON objects/arrays are parsed back; anything else stays a string.
fn cell_value(cell: String) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if cell.starts_with('{') || cell.starts_with('[') {
        if let Ok(parsed) = serde_json::from_str(&cell) {
            return parsed;
        }
    }
    Value::String(cell)
}
