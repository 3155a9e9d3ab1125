//! Candidate scoring for the general ranked search, and the content checks
//! shared with the category-scoped path.

use leavekb_core::{IndexHit, Snippet};

use crate::analyzer::{AnalyzedQuery, IntentFlags};
use crate::lexicon::{
    KNOWN_CATEGORIES, PROCESS_LITERALS, PROOF_LITERALS, QUANTITY_LITERALS, contains_any,
};

const SAME_CATEGORY_BOOST: f64 = 100.0;
const MENTIONS_CATEGORY_BOOST: f64 = 10.0;
const OTHER_CATEGORY_PENALTY: f64 = 0.1;
const PROOF_BOOST: f64 = 2.0;
const QUANTITY_BOOST: f64 = 2.0;
const PROCESS_BOOST: f64 = 1.5;

/// A retrieved hit with its query-scoped score
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub hit: IndexHit,
    pub score: f64,
}

impl Candidate {
    pub fn into_snippet(self) -> Snippet {
        hit_to_snippet(self.hit)
    }
}

pub fn hit_to_snippet(hit: IndexHit) -> Snippet {
    Snippet {
        content: hit.document,
        category: hit.metadata.category,
        distance: hit.distance,
    }
}

/// Content filter for the category-scoped path: a hit survives only if it
/// carries the information the query asks for.
pub fn satisfies_intents(content: &str, intents: &IntentFlags) -> bool {
    if intents.needs_proof && !contains_any(content, PROOF_LITERALS) {
        return false;
    }
    if intents.asks_quantity && !contains_any(content, QUANTITY_LITERALS) {
        return false;
    }
    true
}

/// Similarity score of `hit` for `query`. Boosts compound.
pub fn score(hit: &IndexHit, query: &AnalyzedQuery) -> f64 {
    let content = hit.document.as_str();
    let category = hit.metadata.category.as_str();
    let mut score = 1.0 / (1.0 + hit.distance.max(0.0) as f64);

    if let Some(wanted) = query.detected_category {
        if category == wanted {
            score *= SAME_CATEGORY_BOOST;
        } else if content.contains(wanted) {
            score *= MENTIONS_CATEGORY_BOOST;
        } else if KNOWN_CATEGORIES
            .iter()
            .filter(|known| **known != wanted)
            .any(|known| category.contains(known) || content.contains(known))
        {
            score *= OTHER_CATEGORY_PENALTY;
        }
    }

    let intents = &query.intents;
    if intents.needs_proof && contains_any(content, PROOF_LITERALS) {
        score *= PROOF_BOOST;
    }
    if intents.asks_quantity && contains_any(content, QUANTITY_LITERALS) {
        score *= QUANTITY_BOOST;
    }
    if intents.asks_process && contains_any(content, PROCESS_LITERALS) {
        score *= PROCESS_BOOST;
    }

    score
}

/// Score every hit, order by descending score and keep `top_k`.
///
/// The sort is stable, so equal scores keep the index's order.
pub fn rank(hits: Vec<IndexHit>, query: &AnalyzedQuery, top_k: usize) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = hits
        .into_iter()
        .map(|hit| {
            let score = score(&hit, query);
            Candidate { hit, score }
        })
        .collect();

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(top_k);
    candidates
}
