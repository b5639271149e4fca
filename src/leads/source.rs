use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::types::LeadRecord;
use crate::qualify::fold;

/// Header aliases for each canonical field, already folded.
/// Spreadsheets exported by different scripts disagree on column names.
const NAME_ALIASES: &[&str] = &[
    "business name",
    "businessname",
    "name",
    "nombre",
    "nombre del negocio",
    "negocio",
    "company",
    "empresa",
];
const TYPE_ALIASES: &[&str] = &[
    "business type",
    "businesstype",
    "industry",
    "category",
    "categoria",
    "tipo",
    "giro",
    "type",
];
const LOCATION_ALIASES: &[&str] = &[
    "location",
    "address",
    "city",
    "ubicacion",
    "direccion",
    "ciudad",
];
const WEBSITE_ALIASES: &[&str] = &["website", "web", "url", "sitio web", "pagina web", "site"];
const PHONE_ALIASES: &[&str] = &[
    "phone",
    "phone number",
    "phonenumber",
    "telefono",
    "tel",
    "whatsapp",
    "celular",
    "mobile",
];
const EMAIL_ALIASES: &[&str] = &["email", "e mail", "mail", "correo", "correo electronico"];

/// Fold a column header: accents and case stripped, `_`/`-` as spaces,
/// whitespace collapsed.
fn fold_header(header: &str) -> String {
    fold(header)
        .replace(|c: char| c == '_' || c == '-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl LeadRecord {
    /// Build a record from a field map, normalizing column-name variants.
    /// The first non-empty matching column wins; missing fields become "".
    /// Headers that fold to the same alias are tried in byte order.
    pub fn from_row(row: &HashMap<String, String>) -> Self {
        let mut columns: Vec<(&String, &String)> = row.iter().collect();
        columns.sort_by(|a, b| a.0.cmp(b.0));
        let folded: Vec<(String, &str)> = columns
            .into_iter()
            .map(|(k, v)| (fold_header(k), v.trim()))
            .collect();

        let pick = |aliases: &[&str]| -> String {
            // Alias order decides precedence, not map iteration order
            aliases
                .iter()
                .find_map(|alias| {
                    folded
                        .iter()
                        .find(|(k, v)| k == alias && !v.is_empty())
                        .map(|(_, v)| v.to_string())
                })
                .unwrap_or_default()
        };

        LeadRecord {
            business_name: pick(NAME_ALIASES),
            business_type: pick(TYPE_ALIASES),
            location: pick(LOCATION_ALIASES),
            website: pick(WEBSITE_ALIASES),
            phone: pick(PHONE_ALIASES),
            email: pick(EMAIL_ALIASES),
        }
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Parse a JSON array of objects into field maps
pub fn parse_json_rows(content: &str) -> Result<Vec<HashMap<String, String>>> {
    let rows: Vec<serde_json::Map<String, Value>> =
        serde_json::from_str(content).context("Expected a JSON array of objects")?;

    Ok(rows
        .into_iter()
        .map(|row| {
            row.iter()
                .map(|(k, v)| (k.clone(), value_to_cell(v)))
                .collect()
        })
        .collect())
}

/// Parse tab-separated text with a header row into field maps.
/// Short rows are padded with empty cells; blank lines are skipped.
pub fn parse_tsv_rows(content: &str) -> Result<Vec<HashMap<String, String>>> {
    let content = strip_bom(content);
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let header: Vec<&str> = match lines.next() {
        Some(line) => line.split('\t').map(str::trim).collect(),
        None => return Ok(Vec::new()),
    };

    Ok(lines
        .map(|line| {
            let cells: Vec<&str> = line.split('\t').collect();
            header
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let cell = cells.get(i).copied().unwrap_or("");
                    (column.to_string(), cell.to_string())
                })
                .collect()
        })
        .collect())
}

// Spreadsheet exports often start with a byte-order mark
fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Read raw rows from a `.json` or `.tsv`/`.txt` file
pub fn read_rows(path: &Path) -> Result<Vec<HashMap<String, String>>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read leads file at {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => parse_json_rows(strip_bom(&content))
            .with_context(|| format!("Failed to parse leads in {}", path.display())),
        Some("tsv") | Some("txt") => parse_tsv_rows(&content),
        _ => bail!(
            "Unsupported leads file {}: expected .json or .tsv",
            path.display()
        ),
    }
}

/// Read a leads file and normalize every row into a `LeadRecord`
pub fn load_leads(path: &Path) -> Result<Vec<LeadRecord>> {
    let rows = read_rows(path)?;
    let records: Vec<LeadRecord> = rows.iter().map(LeadRecord::from_row).collect();

    let blank = records.iter().filter(|r| r.is_blank()).count();
    if blank > 0 {
        tracing::warn!(blank, path = %path.display(), "rows with no recognized columns");
    }
    tracing::debug!(rows = records.len(), path = %path.display(), "loaded leads");

    Ok(records)
}
