//! Query analysis: detected category and intent flags

use serde::Serialize;
use tracing::debug;

use crate::lexicon::{
    PROCESS_KEYWORDS, PROOF_KEYWORDS, QUANTITY_KEYWORDS, UI_HELP_KEYWORDS, contains_any,
    find_known_category,
};
use crate::synonyms::SynonymExpander;

/// Kinds of information a query is after
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntentFlags {
    pub needs_proof: bool,
    pub asks_quantity: bool,
    pub asks_process: bool,
    /// Navigation intent ("can't find the option"), not a policy question
    pub asks_ui_help: bool,
}

impl IntentFlags {
    /// Flags raised by keywords in the raw query text
    pub fn from_text(raw: &str) -> Self {
        Self {
            needs_proof: contains_any(raw, PROOF_KEYWORDS),
            asks_quantity: contains_any(raw, QUANTITY_KEYWORDS),
            asks_process: contains_any(raw, PROCESS_KEYWORDS),
            asks_ui_help: contains_any(raw, UI_HELP_KEYWORDS),
        }
    }
}

/// A query after expansion and analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzedQuery {
    pub raw_text: String,
    pub expanded_text: String,
    pub detected_category: Option<&'static str>,
    pub intents: IntentFlags,
}

impl AnalyzedQuery {
    /// Whether the category-scoped fast path may run for this query
    pub fn wants_category_scope(&self, caller_filter: Option<&str>) -> bool {
        self.detected_category.is_some() && caller_filter.is_none() && !self.intents.asks_ui_help
    }
}

/// Query analyzer: expansion followed by keyword analysis
pub struct QueryAnalyzer {
    expander: SynonymExpander,
}

impl QueryAnalyzer {
    pub fn new() -> Self {
        Self {
            expander: SynonymExpander::new(),
        }
    }

    pub fn with_expander(expander: SynonymExpander) -> Self {
        Self { expander }
    }

    /// Expand `raw` and extract its category and intents.
    ///
    /// Intent flags look at the raw text; category detection looks at the
    /// expanded text so colloquial phrasing still resolves to a category.
    pub fn analyze(&self, raw: &str) -> AnalyzedQuery {
        let expansion = self.expander.expand(raw);
        let detected_category = find_known_category(&expansion.text);
        let intents = IntentFlags::from_text(raw);

        debug!(
            expanded = %expansion.text,
            category = ?detected_category,
            ?intents,
            "Analyzed query"
        );

        AnalyzedQuery {
            raw_text: raw.to_string(),
            expanded_text: expansion.text,
            detected_category,
            intents,
        }
    }
}

impl Default for QueryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
