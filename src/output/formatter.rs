use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::leads::{PriorityTier, QualifiedLead};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Tier label padded to 6 chars, colored by urgency
pub fn format_tier(tier: PriorityTier, use_colors: bool) -> String {
    let label = format!("{:<6}", tier.as_str());
    if !use_colors {
        return label;
    }
    match tier {
        PriorityTier::High => label.red().bold().to_string(),
        PriorityTier::Medium => label.yellow().to_string(),
        PriorityTier::Low => label.dimmed().to_string(),
    }
}

/// Format ranked leads as a table with columns: Index, Score, Tier, Name, Location
/// No headers. Index column: 3 chars (fits "99."), score column: 3 chars right-aligned
pub fn format_ranked_table(leads: &[QualifiedLead], use_colors: bool) -> String {
    if leads.is_empty() {
        return "No leads found.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 4;
    let score_width = 3;
    let tier_width = 6;
    let separator = "  ";

    leads
        .iter()
        .enumerate()
        .map(|(idx, lead)| {
            let record = lead.record();
            let index_str = format!("{:>3}.", idx + 1);
            let score_str = format!("{:>width$}", lead.score(), width = score_width);
            let tier_str = format_tier(lead.tier(), use_colors);
            let location = record.location.trim();

            let fixed_width = index_width
                + 1
                + score_width
                + tier_width
                + separator.len() * 3
                + location.chars().count();

            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_text(record.display_name(), width - fixed_width)
                } else {
                    // Very narrow terminal
                    truncate_text(record.display_name(), 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                record.display_name().to_string()
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    tier_str,
                    separator,
                    name,
                    separator,
                    location.cyan()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, score_str, separator, tier_str, separator, name, separator, location
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single lead with detailed multi-line output, reasons included
pub fn format_lead_detail(rank: usize, lead: &QualifiedLead, use_colors: bool) -> String {
    let record = lead.record();
    let or_dash = |s: &str| -> String {
        if s.trim().is_empty() {
            "-".to_string()
        } else {
            s.trim().to_string()
        }
    };

    let title = format!("{}. {}", rank, record.display_name());
    let mut lines = vec![if use_colors {
        title.bold().to_string()
    } else {
        title
    }];
    lines.push(format!(
        "  Score: {} ({})",
        lead.score(),
        format_tier(lead.tier(), use_colors).trim_end()
    ));
    lines.push(format!("  Industry: {}", or_dash(&record.business_type)));
    lines.push(format!("  Location: {}", or_dash(&record.location)));
    lines.push(format!("  Website: {}", or_dash(&record.website)));
    lines.push(format!("  Phone: {}", or_dash(&record.phone)));
    lines.push(format!("  Email: {}", or_dash(&record.email)));
    lines.push("  Reasons:".to_string());
    for reason in lead.reasons() {
        lines.push(format!("    - {}", reason));
    }
    lines.join("\n")
}

/// Format ranked leads as tab-separated values for scripting
/// Columns: score, tier, name, phone, email (no headers, no colors)
pub fn format_tsv(leads: &[QualifiedLead]) -> String {
    if leads.is_empty() {
        return String::new();
    }

    leads
        .iter()
        .map(|lead| {
            let record = lead.record();
            format!(
                "{}\t{}\t{}\t{}\t{}",
                lead.score(),
                lead.tier(),
                record.business_name,
                record.phone,
                record.email
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
