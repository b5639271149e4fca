pub mod formatter;

pub use formatter::{
    format_lead_detail, format_ranked_table, format_tier, format_tsv, should_use_colors,
};
