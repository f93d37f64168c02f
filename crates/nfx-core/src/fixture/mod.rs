//! Fixtures: model, file formats, loading and discovery.

pub mod discovery;
pub mod loader;
pub mod model;
pub mod parser;

pub use discovery::{discover, search_paths, Discovery, PathOrigin, SearchPath};
pub use loader::DataFixturesLoader;
pub use model::{Fixture, NodeSpec, Properties, RelationshipSpec, Statement};
