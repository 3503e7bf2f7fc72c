//! Named SQL template loading.
//!
//! Templates live in `.sql` files under one directory. A file holds one or
//! more named blocks introduced by a `-- name: <block>` marker line; every
//! line until the next marker belongs to that block. The content is opaque
//! text here, parsed by nobody until the builder substitutes into it.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{AcctError, Result};

const NAME_MARKER: &str = "-- name:";

/// A named SQL text block loaded from a template file.
#[derive(Debug, Clone)]
pub struct QueryTemplate {
    file: String,
    name: String,
    sql: String,
}

impl QueryTemplate {
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// In-memory store of all templates found in a directory.
#[derive(Debug, Default)]
pub struct TemplateStore {
    templates: HashMap<(String, String), QueryTemplate>,
}

impl TemplateStore {
    /// Load every `*.sql` file directly under `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut store = TemplateStore::default();
        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|e| e.path())
            .filter(|p| p.extension().map_or(false, |ext| ext == "sql"))
            .collect();
        entries.sort();
        for path in entries {
            let file = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let content = std::fs::read_to_string(&path)?;
            store.load_content(&file, &content);
            debug!(file = %file, "loaded template file");
        }
        Ok(store)
    }

    /// Parse one file's blocks into the store. A block name repeated within
    /// or across loads keeps the later definition.
    pub fn load_content(&mut self, file: &str, content: &str) {
        let mut current: Option<(String, Vec<String>)> = None;
        for line in content.lines() {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix(NAME_MARKER) {
                if let Some((name, lines)) = current.take() {
                    self.insert(file, name, lines);
                }
                current = Some((rest.trim().to_string(), Vec::new()));
            } else if trimmed.starts_with("--") || trimmed.is_empty() {
                continue;
            } else if let Some((_, lines)) = current.as_mut() {
                lines.push(trimmed.to_string());
            }
        }
        if let Some((name, lines)) = current.take() {
            self.insert(file, name, lines);
        }
    }

    fn insert(&mut self, file: &str, name: String, lines: Vec<String>) {
        let sql = lines.join(" ");
        let key = (file.to_string(), name.clone());
        if self.templates.contains_key(&key) {
            warn!(file = %file, name = %name, "duplicate template block, replacing earlier definition");
        }
        self.templates.insert(
            key,
            QueryTemplate {
                file: file.to_string(),
                name,
                sql,
            },
        );
    }

    /// Look up a template by (file, block name).
    pub fn get(&self, file: &str, name: &str) -> Result<&QueryTemplate> {
        self.templates
            .get(&(file.to_string(), name.to_string()))
            .ok_or_else(|| AcctError::TemplateNotFound {
                file: file.to_string(),
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    const CURRENCY_SQL: &str = "\
-- queries for the currency table

-- name: find_all
select code, name, symbol, decimal_precision
from {schema}.currency
order by code;

-- name: find_by_codes
select code, name from {schema}.currency
where code in {codes};
";

    #[test]
    fn test_blocks_parsed_and_joined() {
        let mut store = TemplateStore::default();
        store.load_content("currency.sql", CURRENCY_SQL);
        assert_eq!(store.len(), 2);

        let tpl = store.get("currency.sql", "find_all").unwrap();
        assert_eq!(
            tpl.sql(),
            "select code, name, symbol, decimal_precision from {schema}.currency order by code;"
        );
    }

    #[test]
    fn test_missing_template() {
        let mut store = TemplateStore::default();
        store.load_content("currency.sql", CURRENCY_SQL);
        let err = store.get("currency.sql", "find_one").unwrap_err();
        assert!(
            matches!(err, AcctError::TemplateNotFound { ref file, ref name }
                if file == "currency.sql" && name == "find_one")
        );
    }

    #[test]
    fn test_duplicate_block_last_wins() {
        let mut store = TemplateStore::default();
        store.load_content(
            "a.sql",
            "-- name: q\nselect 1;\n-- name: q\nselect 2;\n",
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a.sql", "q").unwrap().sql(), "select 2;");
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("currency.sql");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(CURRENCY_SQL.as_bytes()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = TemplateStore::load_dir(dir.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get("currency.sql", "find_by_codes").is_ok());
    }
}
