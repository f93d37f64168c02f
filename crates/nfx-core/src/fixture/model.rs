//! Fixture data structures.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{FixtureError, FixtureResult};

/// Property map attached to nodes, relationships and statement parameters.
pub type Properties = Map<String, Value>;

/// On-disk shape of a structured (`.json` / `.toml`) fixture file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureDocument {
    pub name: Option<String>,
    pub order: Option<i64>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub relationships: Vec<RelationshipSpec>,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

/// A node to create.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    /// Reference other fixtures can use to point at this node.
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: Properties,
}

/// A relationship between two referenced nodes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipSpec {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default)]
    pub properties: Properties,
}

/// A raw Cypher statement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Statement {
    pub cypher: String,
    #[serde(default)]
    pub params: Properties,
}

impl Statement {
    pub fn new(cypher: impl Into<String>) -> Self {
        Self {
            cypher: cypher.into(),
            params: Properties::new(),
        }
    }
}

/// A validated unit of seed data.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub name: String,
    pub order: Option<i64>,
    pub depends_on: Vec<String>,
    pub source: PathBuf,
    pub nodes: Vec<NodeSpec>,
    pub relationships: Vec<RelationshipSpec>,
    pub statements: Vec<Statement>,
}

impl Fixture {
    /// Build a fixture from a parsed document, validating it.
    pub fn from_document(doc: FixtureDocument, source: &Path) -> FixtureResult<Self> {
        let name = match doc.name {
            Some(name) => name,
            None => default_name(source)?,
        };
        if name.trim().is_empty() {
            return Err(FixtureError::parse(source, "fixture name is empty"));
        }

        let fixture = Self {
            name,
            order: doc.order,
            depends_on: doc.depends_on,
            source: source.to_path_buf(),
            nodes: doc.nodes,
            relationships: doc.relationships,
            statements: doc.statements,
        };
        fixture.validate()?;
        Ok(fixture)
    }

    /// Build a fixture made only of raw statements.
    pub fn from_statements(statements: Vec<Statement>, source: &Path) -> FixtureResult<Self> {
        Self::from_document(
            FixtureDocument {
                statements,
                ..Default::default()
            },
            source,
        )
    }

    /// Name as shown in progress output: `[order] name` for ordered fixtures.
    pub fn display_name(&self) -> String {
        match self.order {
            Some(order) => format!("[{}] {}", order, self.name),
            None => self.name.clone(),
        }
    }

    fn validate(&self) -> FixtureResult<()> {
        let invalid = |msg: String| FixtureError::parse(&self.source, msg);

        for node in &self.nodes {
            if node.labels.iter().any(|l| l.trim().is_empty()) {
                return Err(invalid("node label must not be empty".into()));
            }
            if matches!(&node.reference, Some(r) if r.trim().is_empty()) {
                return Err(invalid("node ref must not be empty".into()));
            }
        }
        for rel in &self.relationships {
            if rel.rel_type.trim().is_empty() {
                return Err(invalid(format!(
                    "relationship {} -> {} has no type",
                    rel.from, rel.to
                )));
            }
        }
        for stmt in &self.statements {
            if stmt.cypher.trim().is_empty() {
                return Err(invalid("statement is empty".into()));
            }
        }
        if self.depends_on.contains(&self.name) {
            return Err(invalid(format!("fixture '{}' depends on itself", self.name)));
        }
        Ok(())
    }
}

fn default_name(source: &Path) -> FixtureResult<String> {
    source
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| FixtureError::parse(source, "cannot derive fixture name from file name"))
}
