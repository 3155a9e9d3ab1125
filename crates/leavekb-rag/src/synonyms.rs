//! Synonym expansion: pushes colloquial queries toward the vocabulary the
//! index was built with.

use tracing::debug;

use crate::lexicon::SYNONYMS;

/// Result of expanding a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    /// The (colloquial, canonical) pair applied, if any
    pub applied: Option<(&'static str, &'static str)>,
}

/// Synonym expander over an ordered table
pub struct SynonymExpander {
    table: &'static [(&'static str, &'static str)],
}

impl SynonymExpander {
    /// Create an expander over the built-in table
    pub fn new() -> Self {
        Self { table: SYNONYMS }
    }

    /// Create an expander over a custom ordered table
    pub fn with_table(table: &'static [(&'static str, &'static str)]) -> Self {
        Self { table }
    }

    /// Expand `query` with at most one table entry.
    ///
    /// The first colloquial term found (in table order) has the canonical term
    /// appended after each of its occurrences; scanning stops there.
    pub fn expand(&self, query: &str) -> Expansion {
        for &(term, canonical) in self.table {
            if query.contains(term) {
                let text = query.replace(term, &format!("{} {}", term, canonical));
                debug!(term, canonical, "Expanded query with synonym");
                return Expansion {
                    text,
                    applied: Some((term, canonical)),
                };
            }
        }

        Expansion {
            text: query.to_string(),
            applied: None,
        }
    }
}

impl Default for SynonymExpander {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sickness_phrasing_gains_sick_leave_literal() {
        let expander = SynonymExpander::new();

        let expansion = expander.expand("生病要附診斷書嗎");
        assert_eq!(expansion.text, "生病 病假要附診斷書嗎");
        assert_eq!(expansion.applied, Some(("生病", "病假")));

        let expansion = expander.expand("感冒請假要證明嗎");
        assert!(expansion.text.contains("病假"));
    }

    #[test]
    fn test_first_match_wins_and_only_one_entry_applies() {
        let expander = SynonymExpander::new();

        // "心理" precedes "壓力" in the table, so only it is expanded
        let expansion = expander.expand("心理壓力可以請假嗎");
        assert_eq!(expansion.text, "心理 心理調適假壓力可以請假嗎");
        assert_eq!(expansion.applied, Some(("心理", "心理調適假")));
    }

    #[test]
    fn test_table_order_not_term_length_decides() {
        let expander = SynonymExpander::new();

        // "有事" is listed before "家裡有事"
        let expansion = expander.expand("家裡有事怎麼請假");
        assert_eq!(expansion.text, "家裡有事 事假怎麼請假");
        assert_eq!(expansion.applied, Some(("有事", "事假")));
    }

    #[test]
    fn test_every_occurrence_of_the_matched_term_is_expanded() {
        let expander = SynonymExpander::new();
        let expansion = expander.expand("比賽前一天也有比賽");
        assert_eq!(expansion.text, "比賽 公假前一天也有比賽 公假");
    }

    #[test]
    fn test_no_match_leaves_query_untouched() {
        let expander = SynonymExpander::new();
        let expansion = expander.expand("請假超過時限怎麼辦");
        assert_eq!(expansion.text, "請假超過時限怎麼辦");
        assert_eq!(expansion.applied, None);
    }

    #[test]
    fn test_custom_table() {
        static TABLE: &[(&str, &str)] = &[("flu", "sick leave")];
        let expander = SynonymExpander::with_table(TABLE);
        assert_eq!(expander.expand("I have the flu").text, "I have the flu sick leave");
    }
}
