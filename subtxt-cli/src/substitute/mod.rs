mod engine;

pub use engine::{Substituter, Substitution};

use serde::Serialize;

/// Match accounting for one rule against one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// Position of the rule in the pattern set (0-indexed)
    pub rule_index: usize,

    /// Find pattern that produced the matches
    pub find: String,

    /// Raw replacement of the rule
    pub replace: String,

    /// Matches in the text as it stood before this rule ran
    pub match_count: usize,

    /// Pre-replacement text with every match wrapped in hyphens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotated_text: Option<String>,
}

impl MatchRecord {
    pub fn matched(&self) -> bool {
        self.match_count > 0
    }
}
