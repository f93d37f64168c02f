//! Fixture file parsing.
//!
//! Supported formats:
//! - `.json` and `.toml`: a structured document (name, order, depends_on,
//!   nodes, relationships, statements)
//! - `.cypher`: plain Cypher, one statement per `;`

use std::path::Path;

use super::model::{Fixture, FixtureDocument, Statement};
use crate::error::{FixtureError, FixtureResult};

/// Fixture file formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFormat {
    Json,
    Toml,
    Cypher,
}

impl FixtureFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "cypher" | "cql" => Some(Self::Cypher),
            _ => None,
        }
    }
}

/// Read and parse a single fixture file.
pub fn parse_file(path: &Path) -> FixtureResult<Fixture> {
    let format =
        FixtureFormat::from_path(path).ok_or_else(|| FixtureError::UnsupportedFormat(path.to_path_buf()))?;

    let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_str(&content, format, path)
}

/// Parse fixture content already read from `source`.
pub fn parse_str(content: &str, format: FixtureFormat, source: &Path) -> FixtureResult<Fixture> {
    match format {
        FixtureFormat::Json => {
            let doc: FixtureDocument =
                serde_json::from_str(content).map_err(|e| FixtureError::parse(source, e))?;
            Fixture::from_document(doc, source)
        }
        FixtureFormat::Toml => {
            let doc: FixtureDocument =
                toml::from_str(content).map_err(|e| FixtureError::parse(source, e))?;
            Fixture::from_document(doc, source)
        }
        FixtureFormat::Cypher => {
            let statements = split_statements(content)
                .into_iter()
                .map(Statement::new)
                .collect();
            Fixture::from_statements(statements, source)
        }
    }
}

/// Split a Cypher script on `;`, ignoring separators inside quotes and comments.
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = script.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == '\\' && q != '`' {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                current.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                // Line comment
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                // Block comment
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
                current.push(' ');
            }
            ';' => push_statement(&mut statements, &mut current),
            _ => current.push(c),
        }
    }
    push_statement(&mut statements, &mut current);

    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
    current.clear();
}
