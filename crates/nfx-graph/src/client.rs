//! Neo4j connection client.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};
use nfx_core::fixture::{Properties, Statement};
use nfx_core::ConnectionConfig;
use tracing::debug;

use crate::bolt::{properties_to_bolt, to_bolt};
use crate::cypher;
use crate::store::{GraphStore, NodeId};

/// Client for Neo4j fixture operations.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// `Graph::connect` only builds a lazy pool, so a `RETURN 1` ping forces a
    /// real bolt handshake. Callers wrap this in a timeout.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(2)
            .fetch_size(50)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")?;

        debug!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Execute a Cypher query that returns no results.
    pub async fn execute(&self, query: Query) -> Result<()> {
        self.graph.run(query).await.context("Neo4j query execution failed")?;
        Ok(())
    }

    /// Execute a Cypher query and return results as rows.
    pub async fn query(&self, query: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(query).await.context("Neo4j query failed")?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await.context("Failed to read Neo4j result")? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a Cypher query and read one field of the first row.
    async fn query_single<T>(&self, query: Query, field: &str) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let rows = self.query(query).await?;
        match rows.into_iter().next() {
            Some(row) => {
                let val: T = row
                    .get(field)
                    .map_err(|e| anyhow!("Failed to get field '{}': {:?}", field, e))?;
                Ok(Some(val))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn run(&self, statement: &Statement) -> Result<()> {
        let mut query = Query::new(statement.cypher.clone());
        for (key, value) in &statement.params {
            query = query.param(key, to_bolt(value));
        }
        self.execute(query).await
    }

    async fn create_node(&self, labels: &[String], properties: &Properties) -> Result<NodeId> {
        let query = Query::new(cypher::create_node(labels)).param("props", properties_to_bolt(properties));

        self.query_single::<String>(query, "id")
            .await?
            .ok_or_else(|| anyhow!("CREATE returned no node id"))
    }

    async fn create_relationship(
        &self,
        from: &NodeId,
        to: &NodeId,
        rel_type: &str,
        properties: &Properties,
    ) -> Result<()> {
        let query = Query::new(cypher::create_relationship(rel_type))
            .param("from", from.as_str())
            .param("to", to.as_str())
            .param("props", properties_to_bolt(properties));

        let created: i64 = self.query_single(query, "created").await?.unwrap_or(0);
        if created == 0 {
            return Err(anyhow!(
                "Could not create [:{}] relationship: node {} or {} is gone",
                rel_type,
                from,
                to
            ));
        }
        Ok(())
    }

    async fn delete_batch(&self, limit: usize) -> Result<usize> {
        let query = Query::new(cypher::DELETE_BATCH.to_string()).param("limit", limit as i64);
        let deleted: i64 = self.query_single(query, "deleted").await?.unwrap_or(0);
        Ok(deleted as usize)
    }
}
