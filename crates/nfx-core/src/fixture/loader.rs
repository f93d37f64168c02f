//! Collects fixtures from files and directories and orders them for execution.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::model::Fixture;
use super::parser::{self, FixtureFormat};
use crate::error::{FixtureError, FixtureResult};

/// Accumulates fixtures discovered on disk.
#[derive(Debug, Default)]
pub struct DataFixturesLoader {
    fixtures: Vec<Fixture>,
    by_name: HashMap<String, usize>,
    seen_files: HashSet<PathBuf>,
}

impl DataFixturesLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every supported fixture file below `dir`, recursively.
    ///
    /// Files are visited in path order. Symlinked directories are not
    /// descended into. Returns the number of fixtures added.
    pub fn load_from_directory(&mut self, dir: &Path) -> FixtureResult<usize> {
        let files = collect_files(dir)?;

        let mut added = 0;
        for file in files {
            if FixtureFormat::from_path(&file).is_some() && self.load_from_file(&file)? {
                added += 1;
            }
        }

        debug!(dir = %dir.display(), added, "Loaded fixtures from directory");
        Ok(added)
    }

    /// Load a single fixture file.
    ///
    /// Returns `false` when the file had already been loaded.
    pub fn load_from_file(&mut self, path: &Path) -> FixtureResult<bool> {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if self.seen_files.contains(&key) {
            return Ok(false);
        }

        let fixture = parser::parse_file(path)?;
        self.add_fixture(fixture)?;
        self.seen_files.insert(key);
        Ok(true)
    }

    /// Register an already built fixture.
    pub fn add_fixture(&mut self, fixture: Fixture) -> FixtureResult<()> {
        if let Some(&idx) = self.by_name.get(&fixture.name) {
            return Err(FixtureError::DuplicateFixture {
                name: fixture.name,
                first: self.fixtures[idx].source.clone(),
                second: fixture.source,
            });
        }

        debug!(name = %fixture.name, source = %fixture.source.display(), "Added fixture");
        self.by_name.insert(fixture.name.clone(), self.fixtures.len());
        self.fixtures.push(fixture);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Fixtures in execution order.
    ///
    /// Dependencies always come first; otherwise lower `order` first, then
    /// discovery order.
    pub fn ordered(&self) -> FixtureResult<Vec<&Fixture>> {
        Ok(self.execution_order()?.into_iter().map(|i| &self.fixtures[i]).collect())
    }

    /// Consume the loader, returning fixtures in execution order.
    pub fn into_fixtures(self) -> FixtureResult<Vec<Fixture>> {
        let order = self.execution_order()?;
        let mut slots: Vec<Option<Fixture>> = self.fixtures.into_iter().map(Some).collect();
        Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
    }

    fn execution_order(&self) -> FixtureResult<Vec<usize>> {
        let n = self.fixtures.len();
        let mut pending = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (idx, fixture) in self.fixtures.iter().enumerate() {
            for dep in &fixture.depends_on {
                let &dep_idx = self.by_name.get(dep).ok_or_else(|| FixtureError::MissingDependency {
                    fixture: fixture.name.clone(),
                    dependency: dep.clone(),
                })?;
                pending[idx] += 1;
                dependents[dep_idx].push(idx);
            }
        }

        let key = |i: usize| Reverse((self.fixtures[i].order.unwrap_or(0), i));
        let mut ready: BinaryHeap<_> = (0..n).filter(|&i| pending[i] == 0).map(key).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(Reverse((_, idx))) = ready.pop() {
            order.push(idx);
            for &next in &dependents[idx] {
                pending[next] -= 1;
                if pending[next] == 0 {
                    ready.push(key(next));
                }
            }
        }

        if order.len() < n {
            let stuck = (0..n)
                .filter(|&i| pending[i] > 0)
                .map(|i| self.fixtures[i].name.clone())
                .collect();
            return Err(FixtureError::CircularDependency(stuck));
        }

        Ok(order)
    }
}

fn collect_files(dir: &Path) -> FixtureResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| FixtureError::Read {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_dir() && entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
