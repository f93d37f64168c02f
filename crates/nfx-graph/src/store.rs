//! Storage seam between the fixture pipeline and the database.

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use nfx_core::fixture::{Properties, Statement};
use nfx_core::ConnectionConfig;
use tracing::info;

use crate::client::GraphClient;

/// Identifier of a node created during a load (Neo4j element id).
pub type NodeId = String;

/// Write operations needed to purge a graph and apply fixtures.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run a raw statement, discarding its results.
    async fn run(&self, statement: &Statement) -> Result<()>;

    /// Create a node and return its id.
    async fn create_node(&self, labels: &[String], properties: &Properties) -> Result<NodeId>;

    /// Create a relationship between two existing nodes.
    async fn create_relationship(
        &self,
        from: &NodeId,
        to: &NodeId,
        rel_type: &str,
        properties: &Properties,
    ) -> Result<()>;

    /// Delete up to `limit` nodes along with their relationships.
    ///
    /// Returns how many nodes were deleted; zero means the graph is empty.
    async fn delete_batch(&self, limit: usize) -> Result<usize>;
}

/// Opens a store for a configured connection.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn GraphStore>>;
}

/// Connects to a real Neo4j server over bolt.
#[derive(Debug, Clone)]
pub struct Neo4jConnector {
    timeout: Duration,
}

impl Neo4jConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for Neo4jConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl Connector for Neo4jConnector {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn GraphStore>> {
        info!(uri = %config.uri, "Connecting to Neo4j");

        let client = tokio::time::timeout(self.timeout, GraphClient::connect(config))
            .await
            .map_err(|_| {
                anyhow!(
                    "Timed out after {}s connecting to Neo4j at {}",
                    self.timeout.as_secs(),
                    config.uri
                )
            })??;

        Ok(Box::new(client))
    }
}
