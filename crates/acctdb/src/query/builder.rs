//! Query construction from templates.
//!
//! A builder is an immutable working copy of a template's text. Each
//! substitution consumes the builder and returns a new one, so a finalized
//! query cannot be mutated behind a caller's back and substituting the same
//! placeholder twice fails instead of silently rewriting.

use crate::core::identifier::{escape_literal, validate_identifier};
use crate::core::value::SqlValue;
use crate::error::{AcctError, Result};
use crate::query::store::QueryTemplate;

/// Marker resolved to the concrete schema name at construction time.
pub const SCHEMA_MARKER: &str = "{schema}";

/// A value substituted for a named placeholder.
#[derive(Debug, Clone)]
pub enum Substitution {
    /// Raw SQL text spliced in as-is.
    Fragment(String),
    /// Membership predicate `<column> in (v1, v2, ...)`.
    ///
    /// An empty value list renders `1=0` so the surrounding query selects
    /// nothing instead of producing invalid SQL.
    InList {
        column: String,
        values: Vec<SqlValue>,
    },
    /// Case-insensitive partial match of one term across several columns.
    ///
    /// A missing or blank term renders `1=1` so the query behaves as if no
    /// search filter were applied.
    Search {
        term: Option<String>,
        columns: Vec<String>,
    },
}

impl Substitution {
    pub fn fragment(sql: impl Into<String>) -> Self {
        Substitution::Fragment(sql.into())
    }

    pub fn in_list(column: impl Into<String>, values: Vec<SqlValue>) -> Self {
        Substitution::InList {
            column: column.into(),
            values,
        }
    }

    pub fn search(term: Option<&str>, columns: &[&str]) -> Self {
        Substitution::Search {
            term: term.map(str::to_string),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    /// Column names render into query text unquoted, so they pass the same
    /// identifier validation as descriptor and schema names. Fragments are
    /// the caller's own SQL and are spliced as-is.
    fn validate(&self) -> Result<()> {
        match self {
            Substitution::Fragment(_) => Ok(()),
            Substitution::InList { column, .. } => validate_identifier(column),
            Substitution::Search { columns, .. } => {
                columns.iter().try_for_each(|col| validate_identifier(col))
            }
        }
    }

    fn render(&self) -> String {
        match self {
            Substitution::Fragment(sql) => sql.clone(),
            Substitution::InList { column, values } => {
                if values.is_empty() {
                    return "1=0".to_string();
                }
                let rendered: Vec<String> =
                    values.iter().map(SqlValue::to_sql_literal).collect();
                format!("{} in ({})", column, rendered.join(", "))
            }
            Substitution::Search { term, columns } => {
                let term = term.as_deref().map(str::trim).unwrap_or("");
                if term.is_empty() || columns.is_empty() {
                    return "1=1".to_string();
                }
                let pattern = escape_literal(&escape_like_pattern(&term.to_lowercase()));
                let predicates: Vec<String> = columns
                    .iter()
                    .map(|col| format!("lower({}) like '%{}%'", col, pattern))
                    .collect();
                format!("({})", predicates.join(" or "))
            }
        }
    }
}

/// Escape `like` wildcards so a search term matches literally. Backslash is
/// the default `like` escape character, so it is doubled first.
fn escape_like_pattern(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Query text under construction. See the module docs for the substitution
/// discipline.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    sql: String,
}

impl QueryBuilder {
    /// Seed a builder from a template, resolving every schema marker to the
    /// concrete schema name. Fails fast on an empty or invalid schema.
    pub fn from_template(template: &QueryTemplate, schema: &str) -> Result<Self> {
        validate_identifier(schema)?;
        Ok(Self {
            sql: template.sql().replace(SCHEMA_MARKER, schema),
        })
    }

    /// Seed a builder from literal SQL text. Escape hatch for statements
    /// that never pass through the template store, DDL mostly.
    pub fn from_sql(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }

    /// Replace the named placeholder. Every occurrence of `{placeholder}`
    /// is resolved, so substituting the same name twice fails with a
    /// placeholder error. Column names carried by the substitution are
    /// validated before they touch the query text.
    pub fn substitute(self, placeholder: &str, value: &Substitution) -> Result<Self> {
        value.validate()?;
        let marker = format!("{{{}}}", placeholder);
        if !self.sql.contains(&marker) {
            return Err(AcctError::Placeholder(placeholder.to_string()));
        }
        Ok(Self {
            sql: self.sql.replace(&marker, &value.render()),
        })
    }

    /// Current query text. Completeness is the caller's responsibility; an
    /// unresolved placeholder left in here is a caller defect.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn into_sql(self) -> String {
        self.sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::store::TemplateStore;

    fn template(sql: &str) -> QueryTemplate {
        let mut store = TemplateStore::default();
        store.load_content("t.sql", &format!("-- name: q\n{}\n", sql));
        store.get("t.sql", "q").unwrap().clone()
    }

    #[test]
    fn test_schema_resolved_at_construction() {
        let tpl = template("select code from {schema}.currency;");
        let builder = QueryBuilder::from_template(&tpl, "accounting").unwrap();
        assert_eq!(builder.sql(), "select code from accounting.currency;");
    }

    #[test]
    fn test_empty_schema_rejected() {
        let tpl = template("select 1;");
        assert!(QueryBuilder::from_template(&tpl, "").is_err());
    }

    #[test]
    fn test_in_list_substitution() {
        let tpl = template("select name from {schema}.currency where {codes};");
        let query = QueryBuilder::from_template(&tpl, "accounting")
            .unwrap()
            .substitute(
                "codes",
                &Substitution::in_list("code", vec!["usd".into(), "inr".into()]),
            )
            .unwrap();
        assert_eq!(
            query.sql(),
            "select name from accounting.currency where code in ('usd', 'inr');"
        );
    }

    #[test]
    fn test_empty_in_list_selects_nothing() {
        let tpl = template("select name from {schema}.currency where {codes};");
        let query = QueryBuilder::from_template(&tpl, "accounting")
            .unwrap()
            .substitute("codes", &Substitution::in_list("code", vec![]))
            .unwrap();
        assert_eq!(query.sql(), "select name from accounting.currency where 1=0;");
    }

    #[test]
    fn test_search_substitution() {
        let tpl = template("select code from {schema}.account where {search};");
        let query = QueryBuilder::from_template(&tpl, "accounting")
            .unwrap()
            .substitute(
                "search",
                &Substitution::search(Some("Cash"), &["code", "name"]),
            )
            .unwrap();
        assert_eq!(
            query.sql(),
            "select code from accounting.account where \
             (lower(code) like '%cash%' or lower(name) like '%cash%');"
        );
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let tpl = template("select code from {schema}.account where {search};");
        let query = QueryBuilder::from_template(&tpl, "accounting")
            .unwrap()
            .substitute("search", &Substitution::search(Some("  "), &["code"]))
            .unwrap();
        assert_eq!(query.sql(), "select code from accounting.account where 1=1;");
    }

    #[test]
    fn test_search_term_escaped() {
        let sub = Substitution::search(Some("O'Brien"), &["name"]);
        let query = QueryBuilder::from_sql("select 1 where {s}")
            .substitute("s", &sub)
            .unwrap();
        assert_eq!(query.sql(), "select 1 where (lower(name) like '%o''brien%')");
    }

    #[test]
    fn test_hostile_in_list_column_rejected() {
        let builder = QueryBuilder::from_sql("select name from accounting.currency where {codes};");
        let err = builder
            .substitute(
                "codes",
                &Substitution::in_list(
                    "code in ('x'); drop table accounting.currency; --",
                    vec!["usd".into()],
                ),
            )
            .unwrap_err();
        assert!(matches!(err, AcctError::Schema(_)));
    }

    #[test]
    fn test_hostile_search_column_rejected() {
        let builder = QueryBuilder::from_sql("select code from accounting.account where {search};");
        let err = builder
            .substitute(
                "search",
                &Substitution::search(Some("cash"), &["name) or 1=1 --", "code"]),
            )
            .unwrap_err();
        assert!(matches!(err, AcctError::Schema(_)));
    }

    #[test]
    fn test_search_like_wildcards_escaped() {
        let query = QueryBuilder::from_sql("select 1 where {s}")
            .substitute("s", &Substitution::search(Some("100%"), &["name"]))
            .unwrap();
        assert_eq!(query.sql(), "select 1 where (lower(name) like '%100\\%%')");

        let query = QueryBuilder::from_sql("select 1 where {s}")
            .substitute("s", &Substitution::search(Some("a_b"), &["name"]))
            .unwrap();
        assert_eq!(query.sql(), "select 1 where (lower(name) like '%a\\_b%')");
    }

    #[test]
    fn test_absent_placeholder_fails() {
        let builder = QueryBuilder::from_sql("select 1;");
        let err = builder
            .substitute("codes", &Substitution::fragment("x"))
            .unwrap_err();
        assert!(matches!(err, AcctError::Placeholder(_)));
    }

    #[test]
    fn test_double_substitution_fails() {
        let builder = QueryBuilder::from_sql("select {limit};")
            .substitute("limit", &Substitution::fragment("10"))
            .unwrap();
        assert!(builder
            .substitute("limit", &Substitution::fragment("20"))
            .is_err());
    }
}
