//! Bounded memory store.
//!
//! Embeddings are keyed by their source text. Insertion order is tracked in
//! a context window; when the window grows past its capacity the oldest
//! entries are dropped from both the window and the embedding map in one
//! step. A semantic graph links generated node ids to related labels and is
//! only ever extended, so it may name keys that have since been evicted.

use std::collections::{BTreeSet, HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{WINDOW_CAPACITY, WINDOW_RETAIN};
use crate::embedding::cosine_similarity;

/// A retrieval hit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetrievedMemory {
    pub key: String,
    pub similarity: f32,
}

/// Counts reported after an insert.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    pub evicted: usize,
}

pub struct MemoryStore {
    embeddings: HashMap<String, Vec<f32>>,
    window: VecDeque<String>,
    graph: HashMap<String, BTreeSet<String>>,
    capacity: usize,
    retain: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(WINDOW_CAPACITY, WINDOW_RETAIN)
    }
}

impl MemoryStore {
    /// `retain` is clamped to `capacity`.
    pub fn new(capacity: usize, retain: usize) -> Self {
        Self {
            embeddings: HashMap::new(),
            window: VecDeque::new(),
            graph: HashMap::new(),
            capacity,
            retain: retain.min(capacity),
        }
    }

    /// Store `embedding` under `key` and append the key to the window.
    /// Re-inserting a key replaces its embedding and moves it to the
    /// newest position. Returns the graph node id created for the entry.
    pub fn insert(&mut self, key: &str, embedding: Vec<f32>) -> (String, InsertOutcome) {
        if self.embeddings.insert(key.to_string(), embedding).is_some() {
            self.window.retain(|k| k != key);
        }
        self.window.push_back(key.to_string());

        let node = format!("mem-{}", Uuid::new_v4().simple());
        self.link(&node, [key]);

        let outcome = self.evict();
        (node, outcome)
    }

    fn evict(&mut self) -> InsertOutcome {
        if self.window.len() <= self.capacity {
            return InsertOutcome::default();
        }
        let excess = self.window.len() - self.retain;
        for key in self.window.drain(..excess) {
            self.embeddings.remove(&key);
        }
        tracing::debug!(evicted = excess, remaining = self.window.len(), "memory eviction");
        InsertOutcome { evicted: excess }
    }

    /// Similarity-ranked lookup. Keeps entries strictly above `threshold`,
    /// best first, at most `max_results`.
    pub fn retrieve(
        &self,
        query: &[f32],
        max_results: usize,
        threshold: f32,
    ) -> Vec<RetrievedMemory> {
        let mut hits: Vec<RetrievedMemory> = self
            .embeddings
            .iter()
            .map(|(key, emb)| RetrievedMemory {
                key: key.clone(),
                similarity: cosine_similarity(query, emb),
            })
            .filter(|hit| hit.similarity > threshold)
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.key.cmp(&b.key))
        });
        hits.truncate(max_results);
        hits
    }

    /// Add `labels` to the adjacency set of `node`, creating it if needed.
    pub fn link<I, S>(&mut self, node: &str, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.graph
            .entry(node.to_string())
            .or_default()
            .extend(labels.into_iter().map(Into::into));
    }

    pub fn graph_related(&self, node: &str) -> Option<&BTreeSet<String>> {
        self.graph.get(node)
    }

    /// Graph nodes whose adjacency set contains `label`, sorted.
    pub fn graph_nodes_for(&self, label: &str) -> Vec<String> {
        let mut nodes: Vec<String> = self
            .graph
            .iter()
            .filter(|(_, labels)| labels.contains(label))
            .map(|(node, _)| node.clone())
            .collect();
        nodes.sort();
        nodes
    }

    pub fn graph_len(&self) -> usize {
        self.graph.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.embeddings.contains_key(key)
    }

    pub fn embedding(&self, key: &str) -> Option<&[f32]> {
        self.embeddings.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Window keys, oldest first.
    pub fn window(&self) -> impl Iterator<Item = &str> {
        self.window.iter().map(String::as_str)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{Embedder, SyntheticEmbedder};

    fn embedder() -> SyntheticEmbedder {
        SyntheticEmbedder::seeded(32, 42)
    }

    fn fill(store: &mut MemoryStore, n: usize) -> Vec<String> {
        let e = embedder();
        (0..n)
            .map(|i| {
                let key = format!("context {i}");
                store.insert(&key, e.embed(&key));
                key
            })
            .collect()
    }

    #[test]
    fn test_window_stays_under_capacity() {
        let mut store = MemoryStore::default();
        let keys = fill(&mut store, 120);
        assert!(store.window_len() <= 100);
        assert_eq!(store.len(), store.window_len());

        let window: BTreeSet<&str> = store.window().collect();
        for key in &keys {
            if !window.contains(key.as_str()) {
                assert!(!store.contains(key), "dangling embedding for {key}");
            }
        }
    }

    #[test]
    fn test_eviction_drops_oldest_down_to_retain() {
        let mut store = MemoryStore::default();
        fill(&mut store, 100);
        assert_eq!(store.window_len(), 100);

        let (_, outcome) = store.insert("overflow", embedder().embed("overflow"));
        assert_eq!(outcome.evicted, 51);
        assert_eq!(store.window_len(), 50);
        assert!(!store.contains("context 0"));
        assert!(!store.contains("context 50"));
        assert!(store.contains("context 51"));
        assert!(store.contains("overflow"));
        assert_eq!(store.window().last(), Some("overflow"));
    }

    #[test]
    fn test_reinsert_moves_to_newest() {
        let mut store = MemoryStore::new(3, 1);
        let e = embedder();
        store.insert("a", e.embed("a"));
        store.insert("b", e.embed("b"));
        store.insert("a", e.embed("a"));
        assert_eq!(store.window().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_retrieve_ranks_and_limits() {
        let mut store = MemoryStore::default();
        store.insert("exact", vec![1.0, 0.0, 0.0]);
        store.insert("close", vec![0.9, 0.1, 0.0]);
        store.insert("far", vec![0.0, 1.0, 0.0]);
        store.insert("zero", vec![0.0, 0.0, 0.0]);

        let hits = store.retrieve(&[1.0, 0.0, 0.0], 5, 0.7);
        let keys: Vec<&str> = hits.iter().map(|h| h.key.as_str()).collect();
        assert_eq!(keys, vec!["exact", "close"]);
        assert!(hits.iter().all(|h| h.similarity > 0.7));

        let limited = store.retrieve(&[1.0, 0.0, 0.0], 1, 0.7);
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].key, "exact");
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut store = MemoryStore::default();
        store.insert("same", vec![1.0, 0.0]);
        assert!(store.retrieve(&[1.0, 0.0], 5, 1.0).is_empty());
    }

    #[test]
    fn test_graph_survives_eviction() {
        let mut store = MemoryStore::new(4, 2);
        let e = embedder();
        let (node, _) = store.insert("first", e.embed("first"));
        for i in 0..10 {
            let key = format!("k{i}");
            store.insert(&key, e.embed(&key));
        }
        assert!(!store.contains("first"));
        assert!(store.graph_related(&node).unwrap().contains("first"));
        assert_eq!(store.graph_nodes_for("first"), vec![node]);
    }

    #[test]
    fn test_link_is_additive() {
        let mut store = MemoryStore::default();
        store.link("repo-1", ["react"]);
        store.link("repo-1", ["vite", "react"]);
        let related = store.graph_related("repo-1").unwrap();
        assert_eq!(related.len(), 2);
    }
}
