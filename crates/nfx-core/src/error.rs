//! Centralized error types for NFX.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for configuration and fixture operations.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse fixture {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported fixture format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Fixture '{name}' is defined twice: {} and {}", .first.display(), .second.display())]
    DuplicateFixture {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Fixture '{fixture}' depends on unknown fixture '{dependency}'")]
    MissingDependency { fixture: String, dependency: String },

    #[error("Circular dependency between fixtures: {}", .0.join(", "))]
    CircularDependency(Vec<String>),

    #[error("Could not find any fixtures to load in: {}", bullet_list(.0))]
    NoFixtures(Vec<PathBuf>),

    #[error("Reference '{0}' is not defined by any loaded fixture")]
    UnknownReference(String),

    #[error("Reference '{0}' is already defined")]
    DuplicateReference(String),
}

/// Result type for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;

impl FixtureError {
    /// Create a parse error for the given file.
    pub fn parse(path: impl Into<PathBuf>, msg: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: msg.to_string(),
        }
    }
}

fn bullet_list(paths: &[PathBuf]) -> String {
    let items: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    format!("\n\n- {}", items.join("\n- "))
}
