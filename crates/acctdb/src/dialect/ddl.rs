//! DDL statement generation for registered tables.

use crate::core::identifier::{qualify, validate_identifier};
use crate::dialect::typemap::map_type;
use crate::error::{AcctError, Result};
use crate::registry::TableRegistry;

/// Renders bootstrap DDL for every table in a registry.
///
/// Statement ordering matters to the consumer: the schema statement runs
/// first, then every `create table`, then every `alter table`, so foreign
/// keys always reference tables that already exist.
pub struct SchemaGenerator<'a> {
    registry: &'a TableRegistry,
    schema: String,
}

impl<'a> SchemaGenerator<'a> {
    pub fn new(registry: &'a TableRegistry, schema: impl Into<String>) -> Result<Self> {
        let schema = schema.into();
        validate_identifier(&schema)?;
        Ok(Self { registry, schema })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn create_schema_statement(&self) -> String {
        format!("create schema if not exists {};", self.schema)
    }

    /// One `create table if not exists` statement per registered table, in
    /// registration order.
    pub fn create_table_statements(&self) -> Vec<String> {
        self.registry
            .iter()
            .map(|table| {
                let mut sql = format!(
                    "create table if not exists {}(",
                    qualify(&self.schema, table.name())
                );
                for column in table.columns() {
                    sql.push_str(column.name());
                    sql.push(' ');
                    sql.push_str(&map_type(column));
                    sql.push_str(", ");
                }
                // Swap the trailing comma for a space so the primary-key
                // clause supplies its own separator.
                sql.truncate(sql.len() - 2);
                sql.push(' ');
                if let Some(primary) = table.primary_column() {
                    sql.push_str(&format!(", primary key({})", primary.name()));
                }
                sql.push_str(");");
                sql
            })
            .collect()
    }

    /// One `alter table ... add foreign key` statement per column that
    /// references another table. Run these only after every create.
    pub fn alter_table_statements(&self) -> Result<Vec<String>> {
        let mut statements = Vec::new();
        for table in self.registry.iter() {
            for column in table.columns() {
                let Some(target) = column.join_table() else {
                    continue;
                };
                let target_pk = target.primary_column().ok_or_else(|| {
                    AcctError::Schema(format!(
                        "Table {} references {} which has no primary key",
                        table.name(),
                        target.name()
                    ))
                })?;
                statements.push(format!(
                    "alter table {} add foreign key ({}) references {}({});",
                    qualify(&self.schema, table.name()),
                    column.name(),
                    qualify(&self.schema, target.name()),
                    target_pk.name()
                ));
            }
        }
        Ok(statements)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::schema::{ColumnDef, TableDef};
    use crate::registry::{Entity, TableRegistry};

    struct Currency;

    impl Entity for Currency {
        const ENTITY: &'static str = "currency";

        fn descriptor() -> Result<TableDef> {
            TableDef::builder("currency", Self::ENTITY)
                .column(ColumnDef::text("code", 10).not_null().primary_key())
                .column(ColumnDef::text("name", 50))
                .build()
        }
    }

    fn registry() -> TableRegistry {
        let mut builder = TableRegistry::builder();
        builder.register::<Currency>().unwrap();
        builder.build()
    }

    #[test]
    fn test_create_schema_statement() {
        let registry = registry();
        let gen = SchemaGenerator::new(&registry, "accounting").unwrap();
        assert_eq!(
            gen.create_schema_statement(),
            "create schema if not exists accounting;"
        );
    }

    #[test]
    fn test_create_table_exact_format() {
        let registry = registry();
        let gen = SchemaGenerator::new(&registry, "accounting").unwrap();
        let statements = gen.create_table_statements();
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0],
            "create table if not exists accounting.currency(\
             code varchar(10) not null, name varchar(50) , primary key(code));"
        );
    }

    #[test]
    fn test_create_table_without_primary() {
        struct AuditLog;

        impl Entity for AuditLog {
            const ENTITY: &'static str = "audit_log";

            fn descriptor() -> Result<TableDef> {
                TableDef::builder("audit_log", Self::ENTITY)
                    .column(ColumnDef::text("message", 600))
                    .build()
            }
        }

        let mut builder = TableRegistry::builder();
        builder.register::<AuditLog>().unwrap();
        let registry = builder.build();
        let gen = SchemaGenerator::new(&registry, "accounting").unwrap();
        assert_eq!(
            gen.create_table_statements()[0],
            "create table if not exists accounting.audit_log(message text );"
        );
    }

    #[test]
    fn test_alter_table_foreign_keys() {
        struct Account;

        impl Entity for Account {
            const ENTITY: &'static str = "account";

            fn descriptor() -> Result<TableDef> {
                let currency = Arc::new(Currency::descriptor()?);
                TableDef::builder("account", Self::ENTITY)
                    .column(ColumnDef::text("code", 10).not_null().primary_key())
                    .column(ColumnDef::text("currency", 10).references(currency))
                    .build()
            }
        }

        let mut builder = TableRegistry::builder();
        builder.register::<Currency>().unwrap();
        builder.register::<Account>().unwrap();
        let registry = builder.build();

        let gen = SchemaGenerator::new(&registry, "accounting").unwrap();
        let alters = gen.alter_table_statements().unwrap();
        assert_eq!(alters.len(), 1);
        assert_eq!(
            alters[0],
            "alter table accounting.account add foreign key (currency) \
             references accounting.currency(code);"
        );
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let registry = registry();
        assert!(SchemaGenerator::new(&registry, "bad schema").is_err());
    }
}
