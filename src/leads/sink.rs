use anyhow::{bail, Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use super::types::QualifiedLead;

/// Column headers of the ranked sheet, in order
pub const COLUMNS: [&str; 10] = [
    "Rank",
    "Business Name",
    "Industry",
    "Location",
    "Website",
    "Phone",
    "Email",
    "Lead Score",
    "Qualification Reasons",
    "Priority Level",
];

/// One flat row of the ranked sheet
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedRow {
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Business Name")]
    pub business_name: String,
    #[serde(rename = "Industry")]
    pub industry: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Lead Score")]
    pub lead_score: u32,
    #[serde(rename = "Qualification Reasons")]
    pub qualification_reasons: String,
    #[serde(rename = "Priority Level")]
    pub priority_level: String,
}

impl RankedRow {
    fn cells(&self) -> [String; 10] {
        [
            self.rank.to_string(),
            self.business_name.clone(),
            self.industry.clone(),
            self.location.clone(),
            self.website.clone(),
            self.phone.clone(),
            self.email.clone(),
            self.lead_score.to_string(),
            self.qualification_reasons.clone(),
            self.priority_level.clone(),
        ]
    }
}

/// Flatten ranked leads into sheet rows (rank is 1-based)
pub fn to_rows(leads: &[QualifiedLead]) -> Vec<RankedRow> {
    leads
        .iter()
        .enumerate()
        .map(|(idx, lead)| {
            let record = lead.record();
            RankedRow {
                rank: idx + 1,
                business_name: record.business_name.clone(),
                industry: record.business_type.clone(),
                location: record.location.clone(),
                website: record.website.clone(),
                phone: record.phone.clone(),
                email: record.email.clone(),
                lead_score: lead.score(),
                qualification_reasons: lead.joined_reasons(),
                priority_level: lead.tier().to_string(),
            }
        })
        .collect()
}

// Tabs and newlines inside a cell would break the row layout
fn clean_cell(cell: &str) -> String {
    cell.replace(&['\t', '\r', '\n'][..], " ")
}

/// Render the ranked sheet as TSV with a header row
pub fn render_tsv(rows: &[RankedRow]) -> String {
    let mut out = COLUMNS.join("\t");
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = row.cells().iter().map(|c| clean_cell(c)).collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
    out
}

/// Write the ranked sheet to `.json` or `.tsv`, atomically.
pub fn write_ranked(path: &Path, leads: &[QualifiedLead]) -> Result<()> {
    let rows = to_rows(leads);

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let content = match extension.as_deref() {
        Some("json") => {
            serde_json::to_vec_pretty(&rows).context("Failed to serialize ranked leads")?
        }
        Some("tsv") | Some("txt") => render_tsv(&rows).into_bytes(),
        _ => bail!(
            "Unsupported output file {}: expected .json or .tsv",
            path.display()
        ),
    };

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(&content)
        .context("Failed to write ranked leads")?;
    file.commit()
        .with_context(|| format!("Failed to save ranked leads to {}", path.display()))?;

    tracing::info!(rows = rows.len(), path = %path.display(), "wrote ranked leads");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::types::LeadRecord;
    use crate::qualify::LeadQualifier;
    use std::env;
    use std::fs;

    fn ranked() -> Vec<QualifiedLead> {
        let records = vec![
            LeadRecord {
                business_name: "Tienda XYZ".to_string(),
                business_type: "Retail".to_string(),
                location: "Unknown".to_string(),
                website: "https://tiendaxyz.com".to_string(),
                ..Default::default()
            },
            LeadRecord {
                business_name: "Hotel Caribe".to_string(),
                location: "Cancún".to_string(),
                phone: "9981234567".to_string(),
                email: "info@hotelcaribe.com".to_string(),
                ..Default::default()
            },
        ];
        LeadQualifier::default().rank(&records)
    }

    #[test]
    fn test_to_rows_layout() {
        let rows = to_rows(&ranked());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].business_name, "Hotel Caribe");
        assert_eq!(rows[0].lead_score, 135);
        assert_eq!(rows[0].priority_level, "HIGH");
        assert_eq!(
            rows[0].qualification_reasons,
            "High priority business type; Preferred location; No website - high need; \
             Has phone number; Has email"
        );
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].industry, "Retail");
        assert_eq!(rows[1].priority_level, "LOW");
    }

    #[test]
    fn test_render_tsv_header_and_rows() {
        let tsv = render_tsv(&to_rows(&ranked()));
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split('\t').count(), 10);
        assert!(lines[0].starts_with("Rank\tBusiness Name\tIndustry"));
        assert!(lines[1].starts_with("1\tHotel Caribe\t"));
        assert!(lines[1].ends_with(
            "\t135\tHigh priority business type; Preferred location; \
             No website - high need; Has phone number; Has email\tHIGH"
        ));
    }

    #[test]
    fn test_render_tsv_cleans_cells() {
        let records = vec![LeadRecord {
            business_name: "Bar\tLa\nPlaya".to_string(),
            ..Default::default()
        }];
        let tsv = render_tsv(&to_rows(&LeadQualifier::default().rank(&records)));
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("Bar La Playa"));
    }

    #[test]
    fn test_render_tsv_empty() {
        let tsv = render_tsv(&[]);
        assert_eq!(tsv.lines().count(), 1);
    }

    #[test]
    fn test_write_ranked_json() {
        let path = env::temp_dir().join("leadrank_test_sink.json");
        let _ = fs::remove_file(&path);

        write_ranked(&path, &ranked()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["Rank"], 1);
        assert_eq!(parsed[0]["Business Name"], "Hotel Caribe");
        assert_eq!(parsed[0]["Lead Score"], 135);
        assert_eq!(parsed[0]["Priority Level"], "HIGH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_write_ranked_tsv() {
        let path = env::temp_dir().join("leadrank_test_sink.tsv");
        let _ = fs::remove_file(&path);

        write_ranked(&path, &ranked()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Rank\t"));
        assert_eq!(content.lines().count(), 3);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_write_ranked_unsupported_extension() {
        let path = env::temp_dir().join("leadrank_test_sink.xlsx");
        assert!(write_ranked(&path, &ranked()).is_err());
        let _ = fs::remove_file(&path);
    }
}
