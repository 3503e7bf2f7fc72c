//! One-time database bootstrap.

use deadpool_postgres::Pool;
use tracing::{debug, info};

use crate::dialect::ddl::SchemaGenerator;
use crate::error::{AcctError, Result};

/// Bring the database up to the registered schema.
///
/// Runs the schema statement, then every `create table`, then every
/// `alter table` so foreign keys only ever reference existing tables.
/// Every statement is idempotent, so re-running against an already
/// initialized database is safe.
pub async fn initialize(pool: &Pool, generator: &SchemaGenerator<'_>) -> Result<()> {
    let client = pool
        .get()
        .await
        .map_err(|e| AcctError::pool(e, "acquiring bootstrap connection"))?;

    let mut statements = vec![generator.create_schema_statement()];
    statements.extend(generator.create_table_statements());
    statements.extend(generator.alter_table_statements()?);

    for statement in &statements {
        debug!(sql = statement.as_str(), "executing bootstrap statement");
        client.simple_query(statement).await?;
    }

    info!(
        schema = generator.schema(),
        statements = statements.len(),
        "database bootstrap complete"
    );
    Ok(())
}
