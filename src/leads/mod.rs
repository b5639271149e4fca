pub mod sink;
pub mod source;
pub mod types;

pub use sink::{render_tsv, to_rows, write_ranked, RankedRow, COLUMNS};
pub use source::{load_leads, parse_json_rows, parse_tsv_rows, read_rows};
pub use types::{LeadRecord, PriorityTier, QualifiedLead};
