//! Fixture execution: optional purge, then every fixture in order.
//!
//! Nodes can carry a `ref`; relationships in the same or any later fixture
//! point at nodes through those references.

use std::collections::HashMap;

use anyhow::{Context, Result};
use nfx_core::fixture::Fixture;
use nfx_core::{FixtureError, ProgressReporter};
use tracing::{debug, info};

use crate::purger::Purger;
use crate::store::{GraphStore, NodeId};

/// What one execution did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// Nodes removed by the purge; `None` in append mode.
    pub purged: Option<usize>,
    pub fixtures: usize,
    pub nodes: usize,
    pub relationships: usize,
    pub statements: usize,
}

/// Node references shared by all fixtures of one run.
#[derive(Debug, Default)]
struct ReferenceRepository {
    nodes: HashMap<String, NodeId>,
}

impl ReferenceRepository {
    fn add(&mut self, name: &str, id: NodeId) -> Result<(), FixtureError> {
        if self.nodes.contains_key(name) {
            return Err(FixtureError::DuplicateReference(name.to_string()));
        }
        self.nodes.insert(name.to_string(), id);
        Ok(())
    }

    fn get(&self, name: &str) -> Result<&NodeId, FixtureError> {
        self.nodes
            .get(name)
            .ok_or_else(|| FixtureError::UnknownReference(name.to_string()))
    }
}

/// Applies fixtures to a store.
pub struct Executor<'a> {
    store: &'a dyn GraphStore,
    purger: Purger<'a>,
    logger: Option<&'a dyn ProgressReporter>,
}

impl<'a> Executor<'a> {
    pub fn new(store: &'a dyn GraphStore, purger: Purger<'a>) -> Self {
        Self {
            store,
            purger,
            logger: None,
        }
    }

    /// Receive a progress line for every step.
    pub fn set_logger(&mut self, logger: &'a dyn ProgressReporter) {
        self.logger = Some(logger);
    }

    fn log(&self, message: &str) {
        if let Some(logger) = self.logger {
            logger.report(message);
        }
    }

    /// Purge unless `append`, then load `fixtures` in the given order.
    pub async fn execute(&self, fixtures: &[Fixture], append: bool) -> Result<ExecutionSummary> {
        let mut summary = ExecutionSummary::default();

        if !append {
            self.log("purging database");
            summary.purged = Some(self.purger.purge().await?);
        }

        let mut references = ReferenceRepository::default();
        for fixture in fixtures {
            self.log(&format!("loading {}", fixture.display_name()));
            self.load(fixture, &mut references, &mut summary)
                .await
                .with_context(|| format!("Failed to load fixture '{}' ({})", fixture.name, fixture.source.display()))?;
            summary.fixtures += 1;
        }

        info!(
            fixtures = summary.fixtures,
            nodes = summary.nodes,
            relationships = summary.relationships,
            statements = summary.statements,
            append,
            "Fixtures loaded"
        );
        Ok(summary)
    }

    async fn load(
        &self,
        fixture: &Fixture,
        references: &mut ReferenceRepository,
        summary: &mut ExecutionSummary,
    ) -> Result<()> {
        for node in &fixture.nodes {
            let id = self.store.create_node(&node.labels, &node.properties).await?;
            if let Some(reference) = &node.reference {
                references.add(reference, id)?;
            }
            summary.nodes += 1;
        }

        for rel in &fixture.relationships {
            let from = references.get(&rel.from)?;
            let to = references.get(&rel.to)?;
            self.store
                .create_relationship(from, to, &rel.rel_type, &rel.properties)
                .await?;
            summary.relationships += 1;
        }

        for statement in &fixture.statements {
            self.store.run(statement).await?;
            summary.statements += 1;
        }

        debug!(fixture = %fixture.name, "Fixture applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use nfx_core::fixture::parser::{parse_str, FixtureFormat};
    use nfx_core::report::MemoryReporter;
    use std::path::Path;

    fn json_fixture(name: &str, body: &str) -> Fixture {
        parse_str(body, FixtureFormat::Json, Path::new(&format!("{}.json", name))).unwrap()
    }

    fn users_and_roles() -> Vec<Fixture> {
        vec![
            json_fixture(
                "roles",
                r#"{"order": 1, "nodes": [{"ref": "admin", "labels": ["Role"], "properties": {"name": "admin"}}]}"#,
            ),
            json_fixture(
                "users",
                r#"{
                    "nodes": [{"ref": "alice", "labels": ["User"], "properties": {"name": "Alice"}}],
                    "relationships": [{"from": "alice", "to": "admin", "type": "HAS_ROLE"}],
                    "statements": [{"cypher": "MATCH (u:User) SET u.seeded = true"}]
                }"#,
            ),
        ]
    }

    #[tokio::test]
    async fn test_purge_then_load() {
        let store = MemoryStore::new();
        store.seed_node("Stale").unwrap();
        let reporter = MemoryReporter::new();

        let mut executor = Executor::new(&store, Purger::new(&store));
        executor.set_logger(&reporter);
        let summary = executor.execute(&users_and_roles(), false).await.unwrap();

        assert_eq!(
            summary,
            ExecutionSummary {
                purged: Some(1),
                fixtures: 2,
                nodes: 2,
                relationships: 1,
                statements: 1,
            }
        );
        assert_eq!(
            reporter.messages(),
            vec!["purging database", "loading [1] roles", "loading users"]
        );
        assert!(store.nodes().iter().all(|n| n.labels != vec!["Stale".to_string()]));
        assert_eq!(store.relationships()[0].rel_type, "HAS_ROLE");
    }

    #[tokio::test]
    async fn test_append_never_purges() {
        let store = MemoryStore::new();
        let executor = Executor::new(&store, Purger::new(&store));

        executor.execute(&users_and_roles(), true).await.unwrap();
        executor.execute(&users_and_roles(), true).await.unwrap();

        assert_eq!(store.delete_calls(), 0);
        assert_eq!(store.nodes().len(), 4);
        assert_eq!(store.relationships().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_reference() {
        let store = MemoryStore::new();
        let fixture = json_fixture(
            "broken",
            r#"{"nodes": [{"ref": "a", "labels": ["A"]}], "relationships": [{"from": "a", "to": "ghost", "type": "X"}]}"#,
        );

        let err = Executor::new(&store, Purger::new(&store))
            .execute(&[fixture], true)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FixtureError>(),
            Some(FixtureError::UnknownReference(name)) if name == "ghost"
        ));
    }

    #[tokio::test]
    async fn test_duplicate_reference_across_fixtures() {
        let store = MemoryStore::new();
        let fixtures = vec![
            json_fixture("one", r#"{"nodes": [{"ref": "dup", "labels": ["A"]}]}"#),
            json_fixture("two", r#"{"nodes": [{"ref": "dup", "labels": ["B"]}]}"#),
        ];

        let err = Executor::new(&store, Purger::new(&store))
            .execute(&fixtures, true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'two'"));
        assert!(matches!(
            err.downcast_ref::<FixtureError>(),
            Some(FixtureError::DuplicateReference(_))
        ));
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let store = MemoryStore::failing_on("SET u.seeded");
        let err = Executor::new(&store, Purger::new(&store))
            .execute(&users_and_roles(), true)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("statement rejected"));
    }
}
