//! Mind-map projection of accumulated knowledge.
//!
//! Turns a knowledge map into a node/edge graph (root -> category -> value)
//! for the front-end renderer. Data only; layout is the renderer's problem.

use serde::{Deserialize, Serialize};

use crate::canonical::KnowledgeMap;

/// A renderable mind-map graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindMap {
    pub nodes: Vec<MindMapNode>,
    pub edges: Vec<MindMapEdge>,
}

/// One node in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
}

/// Node role, used by the renderer for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Category,
    Value,
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapEdge {
    pub from: String,
    pub to: String,
}

/// Build a mind-map graph from a knowledge map.
///
/// Node ids are stable for a given input: the root is `root`, categories are
/// `c{n}` in map order, values are `c{n}-v{m}`. Duplicate values within a
/// category collapse into one node.
pub fn build_mindmap(root_label: &str, knowledge: &KnowledgeMap) -> MindMap {
    let mut graph = MindMap::default();
    graph.nodes.push(MindMapNode {
        id: "root".to_string(),
        label: root_label.to_string(),
        kind: NodeKind::Root,
    });

    for (category_index, (category, values)) in knowledge.iter().enumerate() {
        let category_id = format!("c{category_index}");
        graph.nodes.push(MindMapNode {
            id: category_id.clone(),
            label: category.to_string(),
            kind: NodeKind::Category,
        });
        graph.edges.push(MindMapEdge {
            from: "root".to_string(),
            to: category_id.clone(),
        });

        let mut seen: Vec<&str> = Vec::new();
        for value in values {
            if seen.contains(&value.as_str()) {
                continue;
            }
            seen.push(value);

            let value_id = format!("{category_id}-v{}", seen.len() - 1);
            graph.nodes.push(MindMapNode {
                id: value_id.clone(),
                label: value.clone(),
                kind: NodeKind::Value,
            });
            graph.edges.push(MindMapEdge {
                from: category_id.clone(),
                to: value_id,
            });
        }
    }

    graph
}
