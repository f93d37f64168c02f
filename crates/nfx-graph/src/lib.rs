//! # NFX Graph
//!
//! Neo4j side of the fixture loader.
//!
//! Provides the bolt client, the [`GraphStore`] seam used by the purger and
//! the executor, and an in-memory store for tests.

pub mod bolt;
pub mod client;
pub mod cypher;
pub mod executor;
pub mod memory;
pub mod purger;
pub mod store;

pub use client::GraphClient;
pub use executor::{ExecutionSummary, Executor};
pub use memory::MemoryStore;
pub use purger::Purger;
pub use store::{Connector, GraphStore, Neo4jConnector, NodeId};
