//! Resolves the set of fixture paths and loads what they contain.

use std::path::PathBuf;

use tracing::debug;

use super::loader::DataFixturesLoader;
use super::model::Fixture;
use crate::config::AppConfig;
use crate::error::{FixtureError, FixtureResult};

/// Where a search path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOrigin {
    /// Given on the command line.
    Explicit,
    /// Conventional fixture directory of the named module.
    Module(String),
}

/// A location to search for fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    pub path: PathBuf,
    pub origin: PathOrigin,
}

/// Result of a successful discovery.
#[derive(Debug)]
pub struct Discovery {
    /// Fixtures in execution order.
    pub fixtures: Vec<Fixture>,
    /// Explicit paths that were neither a file nor a directory.
    pub missing: Vec<PathBuf>,
}

/// Build the search path set.
///
/// Explicit paths win; otherwise every module's fixture directory is used, in
/// module order.
pub fn search_paths(explicit: &[PathBuf], config: &AppConfig) -> Vec<SearchPath> {
    if !explicit.is_empty() {
        return explicit
            .iter()
            .map(|p| SearchPath {
                path: p.clone(),
                origin: PathOrigin::Explicit,
            })
            .collect();
    }

    config
        .modules
        .iter()
        .map(|m| SearchPath {
            path: m.path.join(&config.fixtures_dir),
            origin: PathOrigin::Module(m.name.clone()),
        })
        .collect()
}

/// Load every fixture reachable from `paths`.
///
/// Directories are walked recursively and files are loaded directly. Other
/// paths are skipped; explicit ones are returned in [`Discovery::missing`] so
/// the caller can flag them. Finding nothing at all is an error naming every
/// searched path.
pub fn discover(paths: &[SearchPath]) -> FixtureResult<Discovery> {
    let mut loader = DataFixturesLoader::new();
    let mut missing = Vec::new();

    for search in paths {
        let path = &search.path;
        if path.is_dir() {
            loader.load_from_directory(path)?;
        } else if path.is_file() {
            loader.load_from_file(path)?;
        } else {
            match &search.origin {
                PathOrigin::Explicit => {
                    debug!(path = %path.display(), "Fixture path is neither a file nor a directory");
                    missing.push(path.clone());
                }
                PathOrigin::Module(module) => {
                    debug!(module = %module, path = %path.display(), "Module has no fixtures");
                }
            }
        }
    }

    if loader.is_empty() {
        return Err(FixtureError::NoFixtures(
            paths.iter().map(|s| s.path.clone()).collect(),
        ));
    }

    Ok(Discovery {
        fixtures: loader.into_fixtures()?,
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Module;
    use std::fs;

    fn explicit(paths: &[&str]) -> Vec<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_explicit_paths_take_precedence() {
        let mut config = AppConfig::default();
        config.modules.push(Module {
            name: "app".into(),
            path: PathBuf::from("/srv/app"),
        });
        let paths = search_paths(&explicit(&["/x"]), &config);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].origin, PathOrigin::Explicit);
    }

    #[test]
    fn test_module_paths_in_enumeration_order() {
        let mut config = AppConfig::default();
        for (name, path) in [("zeta", "/m/zeta"), ("alpha", "/m/alpha")] {
            config.modules.push(Module {
                name: name.into(),
                path: PathBuf::from(path),
            });
        }
        let paths: Vec<PathBuf> = search_paths(&[], &config).into_iter().map(|s| s.path).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/m/zeta/DataFixtures/Neo4j"),
                PathBuf::from("/m/alpha/DataFixtures/Neo4j"),
            ]
        );
    }

    #[test]
    fn test_nothing_found_lists_searched_paths() {
        let config = AppConfig::default();
        let paths = search_paths(&explicit(&["/a", "/b"]), &config);
        let err = discover(&paths).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not find any fixtures to load in: \n\n- /a\n- /b"
        );
    }

    #[test]
    fn test_mixed_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let fixtures_dir = dir.path().join("fixtures");
        fs::create_dir_all(&fixtures_dir).unwrap();
        fs::write(fixtures_dir.join("users.json"), r#"{"nodes": [{"labels": ["User"]}]}"#).unwrap();
        let single = dir.path().join("extra.cypher");
        fs::write(&single, "CREATE (:Extra)").unwrap();
        let typo = dir.path().join("fixturs");

        let paths = search_paths(&[fixtures_dir, single, typo.clone()], &AppConfig::default());
        let discovery = discover(&paths).unwrap();

        let names: Vec<&str> = discovery.fixtures.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["users", "extra"]);
        assert_eq!(discovery.missing, vec![typo]);
    }

    #[test]
    fn test_missing_module_dirs_are_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        let with = dir.path().join("with");
        fs::create_dir_all(with.join("DataFixtures/Neo4j")).unwrap();
        fs::write(with.join("DataFixtures/Neo4j/a.cypher"), "CREATE (:A)").unwrap();

        let mut config = AppConfig::default();
        config.modules.push(Module { name: "without".into(), path: dir.path().join("without") });
        config.modules.push(Module { name: "with".into(), path: with });

        let discovery = discover(&search_paths(&[], &config)).unwrap();
        assert_eq!(discovery.fixtures.len(), 1);
        assert!(discovery.missing.is_empty());
    }
}
