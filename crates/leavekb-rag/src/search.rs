//! The two retrieval paths: category-scoped fast path and general ranked search

use tracing::debug;

use leavekb_core::{MetadataFilter, Result, Snippet, VectorIndex};

use crate::analyzer::AnalyzedQuery;
use crate::ranking::{hit_to_snippet, rank, satisfies_intents};

/// Neighbors fetched by the ranked path never exceed this
pub const MAX_RANKED_FETCH: usize = 12;

/// Over-fetch factor for the category-scoped path
const SCOPED_FETCH_FACTOR: usize = 2;

/// Over-fetch factor for the ranked path
const RANKED_FETCH_FACTOR: usize = 4;

/// Search only within `category`, walking hits in index order.
///
/// Hits that lack the literal a proof or quantity question asks for are
/// skipped. Returns an empty Vec when nothing survives, in which case the
/// caller falls through to [`ranked_search`].
pub async fn category_scoped_search<V: VectorIndex + ?Sized>(
    index: &V,
    vector: &[f32],
    query: &AnalyzedQuery,
    category: &str,
    top_k: usize,
) -> Result<Vec<Snippet>> {
    let filter = MetadataFilter::category(category);
    let hits = index
        .query(vector, top_k.saturating_mul(SCOPED_FETCH_FACTOR), Some(&filter))
        .await?;
    let fetched = hits.len();

    let snippets: Vec<Snippet> = hits
        .into_iter()
        .filter(|hit| satisfies_intents(&hit.document, &query.intents))
        .take(top_k)
        .map(hit_to_snippet)
        .collect();

    debug!(category, fetched, kept = snippets.len(), "Category-scoped search");
    Ok(snippets)
}

/// Over-fetch neighbors (optionally under the caller's category filter) and
/// rerank them by boosted score.
pub async fn ranked_search<V: VectorIndex + ?Sized>(
    index: &V,
    vector: &[f32],
    query: &AnalyzedQuery,
    caller_category: Option<&str>,
    top_k: usize,
) -> Result<Vec<Snippet>> {
    let filter = caller_category.map(MetadataFilter::category);
    let fetch = top_k
        .saturating_mul(RANKED_FETCH_FACTOR)
        .min(MAX_RANKED_FETCH);
    let hits = index.query(vector, fetch, filter.as_ref()).await?;
    let fetched = hits.len();

    let ranked = rank(hits, query, top_k);
    if let Some(best) = ranked.first() {
        debug!(fetched, best_score = best.score, "Ranked search");
    }

    Ok(ranked.into_iter().map(|c| c.into_snippet()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::QueryAnalyzer;
    use crate::local_index::LocalVectorIndex;
    use leavekb_core::{DocumentMetadata, IndexEntry};

    /// Entries whose vectors put doc_0 nearest to the query vector [1, 0]
    async fn index_with(docs: &[(&str, &str)]) -> LocalVectorIndex {
        let index = LocalVectorIndex::in_memory("test");
        let entries = docs
            .iter()
            .enumerate()
            .map(|(i, (content, category))| IndexEntry {
                id: format!("doc_{}", i),
                vector: vec![1.0, i as f32 * 0.1],
                metadata: DocumentMetadata {
                    category: category.to_string(),
                    doc_id: i,
                },
                document: content.to_string(),
            })
            .collect();
        index.upsert(entries).await.unwrap();
        index
    }

    const QUERY_VECTOR: [f32; 2] = [1.0, 0.0];

    #[tokio::test]
    async fn test_scoped_search_skips_hits_without_proof() {
        let index = index_with(&[
            ("病假最多14天", "病假"),
            ("病假需檢附診斷證明書", "病假"),
            ("事假需附證明", "事假"),
        ])
        .await;
        let query = QueryAnalyzer::new().analyze("病假需要證明嗎");

        let results = category_scoped_search(&index, &QUERY_VECTOR, &query, "病假", 2)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "病假需檢附診斷證明書");
    }

    #[tokio::test]
    async fn test_scoped_search_keeps_index_order() {
        let index = index_with(&[
            ("生理假每月一日", "生理假"),
            ("生理假全學期上限三日", "生理假"),
            ("生理假免附證明", "生理假"),
        ])
        .await;
        let query = QueryAnalyzer::new().analyze("生理假可以請嗎");

        let results = category_scoped_search(&index, &QUERY_VECTOR, &query, "生理假", 2)
            .await
            .unwrap();

        let contents: Vec<_> = results.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["生理假每月一日", "生理假全學期上限三日"]);
    }

    #[tokio::test]
    async fn test_scoped_search_with_no_survivors_is_empty() {
        let index = index_with(&[("喪假依親屬關係而定", "喪假")]).await;
        let query = QueryAnalyzer::new().analyze("喪假最多幾天");
        assert!(query.intents.asks_quantity);

        let results = category_scoped_search(&index, &QUERY_VECTOR, &query, "喪假", 3)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_ranked_search_fetch_is_capped() {
        let docs: Vec<(String, String)> = (0..20)
            .map(|i| (format!("規定第{}條", i), "通則".to_string()))
            .collect();
        let refs: Vec<(&str, &str)> = docs.iter().map(|(c, k)| (c.as_str(), k.as_str())).collect();
        let index = index_with(&refs).await;
        let query = QueryAnalyzer::new().analyze("規定");

        let results = ranked_search(&index, &QUERY_VECTOR, &query, None, 20).await.unwrap();
        assert_eq!(results.len(), MAX_RANKED_FETCH);

        let results = ranked_search(&index, &QUERY_VECTOR, &query, None, 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_ranked_search_respects_caller_filter() {
        let index = index_with(&[
            ("病假最多14天", "病假"),
            ("事假全年最多7天", "事假"),
            ("事假需事先申請", "事假"),
        ])
        .await;
        let query = QueryAnalyzer::new().analyze("病假可以請幾天");

        let results = ranked_search(&index, &QUERY_VECTOR, &query, Some("事假"), 3)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|s| s.category == "事假"));
    }

    #[tokio::test]
    async fn test_ranked_search_promotes_detected_category() {
        let index = index_with(&[
            ("事假全年最多7天", "事假"),
            ("請假規定總覽", "通則"),
            ("公假需附公文", "公假"),
        ])
        .await;
        let query = QueryAnalyzer::new().analyze("找不到公假選項");

        let results = ranked_search(&index, &QUERY_VECTOR, &query, None, 3).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].category, "公假");
    }

    #[tokio::test]
    async fn test_huge_top_k_saturates_fetch_size() {
        let index = index_with(&[
            ("病假需檢附診斷證明書", "病假"),
            ("事假全年最多7天", "事假"),
        ])
        .await;

        let query = QueryAnalyzer::new().analyze("病假需要證明嗎");
        let scoped = category_scoped_search(&index, &QUERY_VECTOR, &query, "病假", usize::MAX)
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);

        let query = QueryAnalyzer::new().analyze("hello");
        let ranked = ranked_search(&index, &QUERY_VECTOR, &query, None, usize::MAX / 2)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 2);
    }
}
