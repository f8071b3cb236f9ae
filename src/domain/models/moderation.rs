use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One moderation verdict. Category names are the provider's own
/// (`hate`, `self-harm/intent`, ...), so they are kept as map keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModerationResult {
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub categories: BTreeMap<String, bool>,
    #[serde(default)]
    pub category_scores: BTreeMap<String, f64>,
}

impl ModerationResult {
    pub fn flagged_categories(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .filter(|(_, flagged)| **flagged)
            .map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModerationReport {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub results: Vec<ModerationResult>,
}

impl ModerationReport {
    /// True when any result is flagged.
    pub fn flagged(&self) -> bool {
        self.results.iter().any(|result| result.flagged)
    }
}
