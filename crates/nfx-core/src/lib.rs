//! NFX Core Library
//!
//! Configuration, fixture model and fixture discovery for the Neo4j
//! fixture loader. Nothing in this crate talks to the database.

pub mod config;
pub mod error;
pub mod fixture;
pub mod report;

pub use config::{AppConfig, ConnectionConfig, Module};
pub use error::{FixtureError, FixtureResult};
pub use fixture::{DataFixturesLoader, Fixture};
pub use report::ProgressReporter;
