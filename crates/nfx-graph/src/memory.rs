//! In-process graph store.
//!
//! Records every write so tests can assert on what a load did without a
//! running Neo4j. Clones share the same graph.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use nfx_core::fixture::{Properties, Statement};
use nfx_core::ConnectionConfig;

use crate::store::{Connector, GraphStore, NodeId};

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryNode {
    pub id: NodeId,
    pub labels: Vec<String>,
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRelationship {
    pub from: NodeId,
    pub to: NodeId,
    pub rel_type: String,
    pub properties: Properties,
}

#[derive(Debug, Default)]
struct MemoryGraph {
    next_id: u64,
    nodes: Vec<MemoryNode>,
    relationships: Vec<MemoryRelationship>,
    statements: Vec<String>,
    writes: usize,
    delete_calls: usize,
    connections: Vec<String>,
    fail_on: Option<String>,
}

/// Graph store kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    graph: Arc<Mutex<MemoryGraph>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `run` fails for statements containing `pattern`.
    pub fn failing_on(pattern: &str) -> Self {
        let store = Self::new();
        if let Ok(mut graph) = store.graph.lock() {
            graph.fail_on = Some(pattern.to_string());
        }
        store
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryGraph>> {
        self.graph.lock().map_err(|_| anyhow!("memory graph lock poisoned"))
    }

    pub fn nodes(&self) -> Vec<MemoryNode> {
        self.lock().map(|g| g.nodes.clone()).unwrap_or_default()
    }

    pub fn relationships(&self) -> Vec<MemoryRelationship> {
        self.lock().map(|g| g.relationships.clone()).unwrap_or_default()
    }

    /// Raw statements run so far, in order.
    pub fn statements(&self) -> Vec<String> {
        self.lock().map(|g| g.statements.clone()).unwrap_or_default()
    }

    /// How many times `delete_batch` was called.
    pub fn delete_calls(&self) -> usize {
        self.lock().map(|g| g.delete_calls).unwrap_or_default()
    }

    /// URIs this store was handed out for through [`Connector`].
    pub fn connections(&self) -> Vec<String> {
        self.lock().map(|g| g.connections.clone()).unwrap_or_default()
    }

    /// Add a node directly, bypassing fixtures.
    pub fn seed_node(&self, label: &str) -> Result<NodeId> {
        let mut graph = self.lock()?;
        Ok(graph.insert_node(vec![label.to_string()], Properties::new()))
    }

    /// Whether any write or purge has happened.
    pub fn is_untouched(&self) -> bool {
        self.lock()
            .map(|g| g.writes == 0 && g.delete_calls == 0)
            .unwrap_or(false)
    }
}

impl MemoryGraph {
    fn insert_node(&mut self, labels: Vec<String>, properties: Properties) -> NodeId {
        self.next_id += 1;
        let id = format!("mem:{}", self.next_id);
        self.nodes.push(MemoryNode {
            id: id.clone(),
            labels,
            properties,
        });
        id
    }

    fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn run(&self, statement: &Statement) -> Result<()> {
        let mut graph = self.lock()?;
        if let Some(pattern) = &graph.fail_on {
            if statement.cypher.contains(pattern.as_str()) {
                bail!("statement rejected: {}", statement.cypher);
            }
        }
        graph.writes += 1;
        graph.statements.push(statement.cypher.clone());
        Ok(())
    }

    async fn create_node(&self, labels: &[String], properties: &Properties) -> Result<NodeId> {
        let mut graph = self.lock()?;
        graph.writes += 1;
        Ok(graph.insert_node(labels.to_vec(), properties.clone()))
    }

    async fn create_relationship(
        &self,
        from: &NodeId,
        to: &NodeId,
        rel_type: &str,
        properties: &Properties,
    ) -> Result<()> {
        let mut graph = self.lock()?;
        if !graph.has_node(from) || !graph.has_node(to) {
            bail!("Could not create [:{}] relationship: node {} or {} is gone", rel_type, from, to);
        }
        graph.writes += 1;
        graph.relationships.push(MemoryRelationship {
            from: from.clone(),
            to: to.clone(),
            rel_type: rel_type.to_string(),
            properties: properties.clone(),
        });
        Ok(())
    }

    async fn delete_batch(&self, limit: usize) -> Result<usize> {
        let mut graph = self.lock()?;
        graph.delete_calls += 1;

        let count = limit.min(graph.nodes.len());
        let removed: Vec<NodeId> = graph.nodes.drain(..count).map(|n| n.id).collect();
        graph
            .relationships
            .retain(|r| !removed.contains(&r.from) && !removed.contains(&r.to));
        Ok(count)
    }
}

#[async_trait]
impl Connector for MemoryStore {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn GraphStore>> {
        self.lock()?.connections.push(config.uri.clone());
        Ok(Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_batch_removes_relationships() {
        let store = MemoryStore::new();
        let a = store.seed_node("A").unwrap();
        let b = store.seed_node("B").unwrap();
        store.create_relationship(&a, &b, "LINKS", &Properties::new()).await.unwrap();

        assert_eq!(store.delete_batch(1).await.unwrap(), 1);
        assert!(store.relationships().is_empty());
        assert_eq!(store.nodes().len(), 1);
        assert_eq!(store.delete_batch(10).await.unwrap(), 1);
        assert_eq!(store.delete_batch(10).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_relationship_to_unknown_node_fails() {
        let store = MemoryStore::new();
        let a = store.seed_node("A").unwrap();
        let result = store
            .create_relationship(&a, &"mem:404".to_string(), "LINKS", &Properties::new())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_connector_shares_graph() {
        let store = MemoryStore::new();
        let handle = store.connect(&ConnectionConfig::default()).await.unwrap();
        handle.create_node(&["X".to_string()], &Properties::new()).await.unwrap();
        assert_eq!(store.nodes().len(), 1);
        assert_eq!(store.connections(), vec!["bolt://localhost:7687"]);
    }
}
