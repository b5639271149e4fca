use crate::leads::QualifiedLead;

/// Render an outreach message for a lead.
///
/// Placeholders: `{name}`, `{business_type}`, `{location}`, `{score}`,
/// `{tier}`. Unknown placeholders and unmatched braces are left as written.
/// Blank values fall back to neutral wording so the sentence still reads.
pub fn render(template: &str, lead: &QualifiedLead, fallback_business_type: &str) -> String {
    let record = lead.record();
    let or = |value: &str, fallback: &str| -> String {
        let value = value.trim();
        if value.is_empty() {
            fallback.to_string()
        } else {
            value.to_string()
        }
    };

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let placeholder = &rest[start..start + end + 2];
        let key = &after[..end];
        let value = match key {
            "name" => Some(or(&record.business_name, "")),
            "business_type" => Some(or(&record.business_type, fallback_business_type)),
            "location" => Some(or(&record.location, "su zona")),
            "score" => Some(lead.score().to_string()),
            "tier" => Some(lead.tier().to_string()),
            _ => None,
        };
        rest = &after[end + 1..];
        match value {
            // "Hola {name}, ..." with a blank name reads "Hola, ..."
            Some(v) if v.is_empty() && rest.starts_with(',') => {
                let kept = out.trim_end_matches(' ').len();
                out.truncate(kept);
            }
            Some(v) => out.push_str(&v),
            None => out.push_str(placeholder),
        }
    }
    out.push_str(rest);
    out
}
