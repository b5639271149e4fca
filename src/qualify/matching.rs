use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold text for keyword matching: NFKD decomposition, combining marks
/// stripped, lowercased. "Cancún", "CANCUN" and "cancun" all fold to "cancun".
pub fn fold(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A set of keywords folded once up front.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    folded: Vec<String>,
}

impl KeywordSet {
    /// Build from raw keywords. Entries that fold to nothing are dropped.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let folded = keywords
            .iter()
            .map(|k| fold(k.as_ref().trim()))
            .filter(|k| !k.is_empty())
            .collect();
        Self { folded }
    }

    /// True when any keyword is a substring of any of the already-folded haystacks
    pub fn matches_any(&self, haystacks: &[&str]) -> bool {
        self.folded
            .iter()
            .any(|k| haystacks.iter().any(|h| h.contains(k.as_str())))
    }
}
