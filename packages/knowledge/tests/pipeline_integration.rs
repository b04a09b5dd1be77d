//! Integration tests for the full extraction -> merge -> store -> search flow.

use std::collections::HashMap;

use knowledge::testing::{MockChatModel, MockEmbedder};
use knowledge::{
    build_mindmap, extract_knowledge, knowledge_map_from_items, merge_knowledge, Embedder,
    KnowledgeStore, MemoryStore, NewPage, NodeKind,
};

#[tokio::test]
async fn test_extract_merge_flow() {
    let model = MockChatModel::new()
        .with_response(r#"{"school": ["PKU"], "founded": ["1898"]}"#)
        .with_response(r#"{"school": ["PKU"], "motto": ["seek truth"]}"#)
        .with_response(
            r#"{"school": ["PKU"], "founded": ["1898"], "motto": ["seek truth"]}"#,
        );

    let first = extract_knowledge(&model, "PKU was founded in 1898.")
        .await
        .unwrap();
    let second = extract_knowledge(&model, "PKU's motto is seek truth.")
        .await
        .unwrap();
    let merged = merge_knowledge(&model, &[first, second]).await.unwrap();

    assert_eq!(model.call_count(), 3);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged.get("school"), Some(&["PKU".to_string()][..]));
    assert_eq!(merged.get("motto"), Some(&["seek truth".to_string()][..]));
}

#[tokio::test]
async fn test_extraction_survives_messy_model_output() {
    // fenced, bare value, missing closing brace
    let model = MockChatModel::new()
        .with_response("```json\n{\"学校\": 北大, \"年份\": [\"1898\"]\n```");

    let knowledge = extract_knowledge(&model, "text").await.unwrap();
    assert_eq!(knowledge.get("学校"), Some(&["北大".to_string()][..]));
    assert_eq!(knowledge.get("年份"), Some(&["1898".to_string()][..]));
}

#[tokio::test]
async fn test_store_search_and_mindmap_flow() {
    let model = MockChatModel::new()
        .with_response(r#"{"school": ["PKU"], "campus": ["Yanyuan", "Weiming Lake"]}"#);
    let embedder = MockEmbedder::new().with_dim(16);
    let store = MemoryStore::new();

    let page_id = store
        .store_page(&NewPage {
            url: "https://example.edu".into(),
            title: "About PKU".into(),
            content: "PKU campus is Yanyuan, around Weiming Lake.".into(),
        })
        .await
        .unwrap();

    let knowledge = extract_knowledge(&model, "PKU campus text").await.unwrap();

    // embed each value, category by category
    let mut vectors = HashMap::new();
    for (category, values) in knowledge.iter() {
        let mut category_vectors = Vec::with_capacity(values.len());
        for value in values {
            category_vectors.push(embedder.embed(value).await.unwrap());
        }
        vectors.insert(category.to_string(), category_vectors);
    }
    store
        .store_knowledge(page_id, &knowledge, &vectors)
        .await
        .unwrap();

    // the query embedding for a stored value matches that value first
    let query = embedder.embed("Yanyuan").await.unwrap();
    let results = store.search_similar(&query, 2).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].content, "Yanyuan");
    assert!((results[0].similarity - 1.0).abs() < 1e-5);

    // mindmap over everything stored so far
    let items = store.all_items().await.unwrap();
    let graph = build_mindmap("Knowledge Base", &knowledge_map_from_items(&items));
    let roots: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Root)
        .collect();
    assert_eq!(roots.len(), 1);
    // 2 categories, 3 values
    assert_eq!(graph.nodes.len(), 6);
}
