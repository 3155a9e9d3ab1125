//! End-to-end retrieval scenarios

#[cfg(test)]
mod scenario_tests {
    use crate::{
        HashEmbedder, KnowledgeBase, KnowledgeBaseConfig, KnowledgeRecord, KnowledgeRetriever,
        LocalVectorIndex, QueryAnalyzer, initialize_knowledge_base,
    };
    use insta::assert_yaml_snapshot;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn sample_records() -> Vec<KnowledgeRecord> {
        vec![
            KnowledgeRecord::new("病假最多14天，需檢附診斷證明書", "病假"),
            KnowledgeRecord::new("事假全年最多7天", "事假"),
            KnowledgeRecord::new("喪假依親屬關係天數不同", "喪假"),
        ]
    }

    fn extended_records() -> Vec<KnowledgeRecord> {
        let mut records = sample_records();
        records.extend([
            KnowledgeRecord::new("公假需由系所開立公文並於系統上傳", "公假"),
            KnowledgeRecord::new("生理假每月得請一日，免附證明", "生理假"),
            KnowledgeRecord::new("請假應於事後三日內完成線上申請並經導師核准", "請假通則"),
            KnowledgeRecord::new("若系統選單沒有出現該假別，請聯絡生輔組", "系統操作"),
        ]);
        records
    }

    fn in_memory() -> KnowledgeBase<HashEmbedder, LocalVectorIndex> {
        KnowledgeBase::new(
            Arc::new(HashEmbedder::default()),
            Arc::new(LocalVectorIndex::in_memory("leave_system_knowledge")),
        )
    }

    #[tokio::test]
    async fn test_proof_question_takes_category_scoped_path() {
        let kb = in_memory();
        kb.load(sample_records()).await.unwrap();

        let results = kb.search("病假需要證明嗎", 2, None).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].category, "病假");
        assert_eq!(results[0].content, "病假最多14天，需檢附診斷證明書");
    }

    #[tokio::test]
    async fn test_ui_help_query_uses_ranked_path() {
        let kb = in_memory();
        kb.load(extended_records()).await.unwrap();

        let results = kb.search("找不到公假選項", 3, None).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].category, "公假");
        assert!(results.iter().any(|s| s.category != "公假"));
    }

    #[tokio::test]
    async fn test_empty_index_returns_empty_results() {
        let kb = in_memory();

        for query in ["病假需要證明嗎", "找不到公假選項", "hello"] {
            assert!(kb.search(query, 3, None).await.unwrap().is_empty());
        }
        assert!(kb.search("病假", 3, Some("病假")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_results_never_exceed_top_k() {
        let kb = in_memory();
        kb.load(extended_records()).await.unwrap();

        let queries = [
            "病假需要證明嗎",
            "生理假每月可以請幾天",
            "請假超過時限怎麼辦",
            "生病要附診斷書嗎",
            "家裡有事怎麼請假",
            "找不到公假選項",
            "completely unrelated",
        ];
        for query in queries {
            for top_k in 1..=8 {
                let results = kb.search(query, top_k, None).await.unwrap();
                assert!(results.len() <= top_k, "{} with top_k {}", query, top_k);
            }
        }
    }

    #[tokio::test]
    async fn test_category_filter_is_never_violated() {
        let kb = in_memory();
        kb.load(extended_records()).await.unwrap();

        for category in ["病假", "事假", "公假", "系統操作", "不存在"] {
            for query in ["病假需要證明嗎", "找不到公假選項", "事假幾天"] {
                let results = kb.search(query, 5, Some(category)).await.unwrap();
                assert!(results.iter().all(|s| s.category == category));
            }
        }
    }

    #[tokio::test]
    async fn test_colloquial_query_resolves_to_category() {
        let kb = in_memory();
        kb.load(extended_records()).await.unwrap();

        let results = kb.search("感冒請假要證明嗎", 2, None).await.unwrap();
        assert_eq!(results[0].category, "病假");

        let results = kb.search("生理期可以請假嗎", 2, None).await.unwrap();
        assert_eq!(results[0].category, "生理假");
    }

    #[tokio::test]
    async fn test_persisted_load_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let config = KnowledgeBaseConfig::default().with_storage_path(dir.path());
        let embedder = Arc::new(HashEmbedder::default());

        let kb = KnowledgeBase::open(&config, embedder.clone()).unwrap();
        kb.load(sample_records()).await.unwrap();
        let report = kb.load(sample_records()).await.unwrap();
        assert!(report.replaced_previous);
        assert_eq!(kb.stats().await.unwrap().document_count, 3);
        kb.shutdown().await.unwrap();

        let reopened = KnowledgeBase::open(&config, embedder).unwrap();
        assert_eq!(reopened.stats().await.unwrap().document_count, 3);
        let generations = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(generations, 1);
    }

    #[tokio::test]
    async fn test_initialize_from_knowledge_file() {
        let dir = TempDir::new().unwrap();
        let knowledge = dir.path().join("qa_knowledge.json");
        std::fs::write(&knowledge, serde_json::to_string(&sample_records()).unwrap()).unwrap();

        let config = KnowledgeBaseConfig::default()
            .with_storage_path(dir.path().join("vectordb"))
            .with_knowledge_path(&knowledge);

        let kb = initialize_knowledge_base(&config, Arc::new(HashEmbedder::default()))
            .await
            .unwrap();
        assert_eq!(kb.stats().await.unwrap().document_count, 3);
    }

    #[tokio::test]
    async fn test_missing_knowledge_file_leaves_index_untouched() {
        let dir = TempDir::new().unwrap();
        let config = KnowledgeBaseConfig::default()
            .with_storage_path(dir.path().join("vectordb"))
            .with_knowledge_path(dir.path().join("missing.json"));
        let embedder = Arc::new(HashEmbedder::default());

        let kb = KnowledgeBase::open(&config, embedder.clone()).unwrap();
        kb.load(sample_records()).await.unwrap();
        kb.shutdown().await.unwrap();

        let err = initialize_knowledge_base(&config, embedder.clone())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, crate::Error::Configuration(_)));

        let kb = KnowledgeBase::open(&config, embedder).unwrap();
        assert_eq!(kb.stats().await.unwrap().document_count, 3);
    }

    #[test]
    fn test_analysis_snapshot() {
        let analyzer = QueryAnalyzer::new();
        let flags: Vec<_> = [
            "病假需要證明嗎",
            "生理假每月可以請幾天",
            "請假超過時限怎麼辦",
            "找不到公假選項",
        ]
        .iter()
        .map(|q| analyzer.analyze(q).intents)
        .collect();

        assert_yaml_snapshot!(flags, @r###"
        - needs_proof: true
          asks_quantity: false
          asks_process: false
          asks_ui_help: false
        - needs_proof: false
          asks_quantity: true
          asks_process: false
          asks_ui_help: false
        - needs_proof: false
          asks_quantity: false
          asks_process: true
          asks_ui_help: false
        - needs_proof: false
          asks_quantity: false
          asks_process: false
          asks_ui_help: true
        "###);
    }
}
