//! Application configuration: named Neo4j connections and installed modules.
//!
//! Read from `<project>/config/neo4j.toml` unless another file is given:
//!
//! ```toml
//! master = "default"
//! fixtures_dir = "DataFixtures/Neo4j"
//!
//! [connections.default]
//! uri = "bolt://localhost:7687"
//! user = "neo4j"
//! password = "secret"
//!
//! [[modules]]
//! name = "blog"
//! path = "src/blog"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{FixtureError, FixtureResult};

/// Config file looked up under the project directory when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/neo4j.toml";

/// Conventional fixture subdirectory inside every module.
pub const DEFAULT_FIXTURES_DIR: &str = "DataFixtures/Neo4j";

/// Alias used for the master connection when `master` is not set.
pub const DEFAULT_CONNECTION: &str = "default";

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            database: "neo4j".to_string(),
        }
    }
}

/// An installed application module contributing fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Module {
    pub name: String,
    pub path: PathBuf,
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Alias of the master connection.
    pub master: Option<String>,
    pub connections: BTreeMap<String, ConnectionConfig>,
    /// Modules in enumeration order.
    pub modules: Vec<Module>,
    pub fixtures_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            master: None,
            connections: BTreeMap::new(),
            modules: Vec::new(),
            fixtures_dir: PathBuf::from(DEFAULT_FIXTURES_DIR),
        }
    }
}

impl AppConfig {
    /// Load the configuration for a project.
    ///
    /// An explicit path must exist. The default path is optional; when it is
    /// missing an empty configuration is used. Environment overrides are
    /// applied last.
    pub fn load(project_dir: &Path, explicit: Option<&Path>) -> FixtureResult<Self> {
        let path = match explicit {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => project_dir.join(p),
            None => project_dir.join(DEFAULT_CONFIG_PATH),
        };

        let mut config = if path.is_file() {
            debug!(path = %path.display(), "Reading configuration");
            let content = std::fs::read_to_string(&path).map_err(|source| FixtureError::Read {
                path: path.clone(),
                source,
            })?;
            Self::from_toml(&content)?
        } else if explicit.is_some() {
            return Err(FixtureError::Config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults");
            Self::default()
        };

        config.resolve_module_paths(project_dir);
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a configuration document.
    pub fn from_toml(content: &str) -> FixtureResult<Self> {
        toml::from_str(content).map_err(|e| FixtureError::Config(e.to_string()))
    }

    /// Make relative module paths relative to the project directory.
    pub fn resolve_module_paths(&mut self, project_dir: &Path) {
        for module in &mut self.modules {
            if module.path.is_relative() {
                module.path = project_dir.join(&module.path);
            }
        }
    }

    /// Apply `NEO4J_*` overrides to the master connection.
    ///
    /// The target is the alias named by `master`, or `default` when unset.
    /// `NEO4J_URI` creates that connection when it does not exist yet; the
    /// other variables only patch an existing one.
    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        let alias = self
            .master
            .clone()
            .unwrap_or_else(|| DEFAULT_CONNECTION.to_string());

        if let Some(uri) = get("NEO4J_URI") {
            self.connections.entry(alias.clone()).or_default().uri = uri;
        }

        let Some(conn) = self.connections.get_mut(&alias) else {
            return;
        };
        if let Some(user) = get("NEO4J_USER") {
            conn.user = user;
        }
        if let Some(password) = get("NEO4J_PASSWORD") {
            conn.password = password;
        }
        if let Some(database) = get("NEO4J_DATABASE") {
            conn.database = database;
        }
    }

    /// Look up a connection by alias.
    pub fn connection(&self, alias: &str) -> FixtureResult<&ConnectionConfig> {
        self.connections
            .get(alias)
            .ok_or_else(|| FixtureError::ConnectionNotFound(alias.to_string()))
    }

    /// The master connection, if one is configured.
    ///
    /// Without an explicit `master`, a connection named `default` is the
    /// master. A `master` naming an unknown alias is an error.
    pub fn master_connection(&self) -> FixtureResult<Option<&ConnectionConfig>> {
        match &self.master {
            Some(alias) => self.connection(alias).map(Some),
            None => Ok(self.connections.get(DEFAULT_CONNECTION)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
master = "main"

[connections.main]
uri = "bolt://db:7687"
password = "secret"

[connections.reporting]
uri = "bolt://reporting:7687"
database = "reports"

[[modules]]
name = "users"
path = "src/users"

[[modules]]
name = "blog"
path = "/opt/app/blog"
"#;

    #[test]
    fn test_parse_connections() {
        let config = AppConfig::from_toml(SAMPLE).unwrap();
        let main = config.connection("main").unwrap();
        assert_eq!(main.uri, "bolt://db:7687");
        assert_eq!(main.user, "neo4j");
        assert_eq!(main.database, "neo4j");
        assert_eq!(config.connection("reporting").unwrap().database, "reports");
    }

    #[test]
    fn test_unknown_alias() {
        let config = AppConfig::from_toml(SAMPLE).unwrap();
        assert!(matches!(
            config.connection("nope"),
            Err(FixtureError::ConnectionNotFound(alias)) if alias == "nope"
        ));
    }

    #[test]
    fn test_master_resolution() {
        let config = AppConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.master_connection().unwrap().unwrap().uri, "bolt://db:7687");

        let empty = AppConfig::default();
        assert!(empty.master_connection().unwrap().is_none());

        let implicit = AppConfig::from_toml("[connections.default]\nuri = \"bolt://x:7687\"").unwrap();
        assert_eq!(implicit.master_connection().unwrap().unwrap().uri, "bolt://x:7687");

        let dangling = AppConfig::from_toml("master = \"gone\"").unwrap();
        assert!(dangling.master_connection().is_err());
    }

    #[test]
    fn test_relative_module_paths_resolved() {
        let mut config = AppConfig::from_toml(SAMPLE).unwrap();
        config.resolve_module_paths(Path::new("/srv/project"));
        let paths: Vec<&Path> = config.modules.iter().map(|m| m.path.as_path()).collect();
        assert_eq!(paths, vec![Path::new("/srv/project/src/users"), Path::new("/opt/app/blog")]);
    }

    #[test]
    fn test_env_overrides_create_default_connection() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            "NEO4J_URI" => Some("bolt://env:7687".to_string()),
            "NEO4J_PASSWORD" => Some("pw".to_string()),
            _ => None,
        });
        let master = config.master_connection().unwrap().unwrap();
        assert_eq!(master.uri, "bolt://env:7687");
        assert_eq!(master.password, "pw");
        assert_eq!(master.user, "neo4j");
    }

    #[test]
    fn test_env_overrides_target_named_master() {
        let mut config = AppConfig::from_toml(SAMPLE).unwrap();
        config.apply_overrides(|key| match key {
            "NEO4J_URI" => Some("bolt://env:7687".to_string()),
            "NEO4J_DATABASE" => Some("staging".to_string()),
            _ => None,
        });

        let master = config.master_connection().unwrap().unwrap();
        assert_eq!(master.uri, "bolt://env:7687");
        assert_eq!(master.database, "staging");
        assert_eq!(master.password, "secret");
        assert!(!config.connections.contains_key(DEFAULT_CONNECTION));
        assert_eq!(config.connection("reporting").unwrap().uri, "bolt://reporting:7687");
    }

    #[test]
    fn test_env_overrides_without_uri_do_nothing() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| (key == "NEO4J_USER").then(|| "admin".to_string()));
        assert!(config.connections.is_empty());
    }

    #[test]
    fn test_load_missing_default_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path(), None).unwrap();
        assert!(config.modules.is_empty());
        assert_eq!(config.fixtures_dir, PathBuf::from(DEFAULT_FIXTURES_DIR));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(dir.path(), Some(Path::new("other.toml")));
        assert!(matches!(result, Err(FixtureError::Config(_))));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(AppConfig::from_toml("mastr = \"x\"").is_err());
    }
}
