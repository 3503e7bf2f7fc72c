//! Read-path execution.
//!
//! Execution failures propagate as errors rather than degrading to empty
//! results; a caller that wants availability over signaling can make that
//! trade-off itself.

use deadpool_postgres::Pool;
use tokio_postgres::Row;
use tracing::debug;

use crate::core::value::{decode_column, decode_row, SqlValue};
use crate::error::{AcctError, Result};
use crate::query::builder::QueryBuilder;

/// Converts one decoded result tuple into a typed entity.
///
/// Returning `None` drops the row from the result without error. The
/// originating builder is passed along so a converter can branch on the
/// query it is decoding for.
pub trait RowConverter<T> {
    fn convert(&self, query: &QueryBuilder, row: &[SqlValue]) -> Option<T>;
}

impl<T, F> RowConverter<T> for F
where
    F: Fn(&QueryBuilder, &[SqlValue]) -> Option<T>,
{
    fn convert(&self, query: &QueryBuilder, row: &[SqlValue]) -> Option<T> {
        self(query, row)
    }
}

/// Executes finalized queries against a shared pool.
#[derive(Clone)]
pub struct RowReader {
    pool: Pool,
}

impl RowReader {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn execute(&self, query: &QueryBuilder) -> Result<Vec<Row>> {
        debug!(sql = query.sql(), "executing query");
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| AcctError::pool(e, "acquiring read connection"))?;
        Ok(client.query(query.sql(), &[]).await?)
    }

    /// First column of the first row, or `None` for an empty result.
    pub async fn find_single(&self, query: &QueryBuilder) -> Result<Option<SqlValue>> {
        let rows = self.execute(query).await?;
        match rows.first() {
            Some(row) => Ok(Some(decode_column(row, 0)?)),
            None => Ok(None),
        }
    }

    /// First column of every row, in result order.
    pub async fn find_scalars(&self, query: &QueryBuilder) -> Result<Vec<SqlValue>> {
        let rows = self.execute(query).await?;
        rows.iter().map(|row| decode_column(row, 0)).collect()
    }

    /// Every column of every row, in result and column order.
    pub async fn find_tuples(&self, query: &QueryBuilder) -> Result<Vec<Vec<SqlValue>>> {
        let rows = self.execute(query).await?;
        rows.iter().map(decode_row).collect()
    }

    /// Convert each tuple through `converter`. Tuples the converter maps to
    /// `None` are skipped; the relative order of the rest is preserved.
    pub async fn find_entities<T>(
        &self,
        query: &QueryBuilder,
        converter: &impl RowConverter<T>,
    ) -> Result<Vec<T>> {
        let tuples = self.find_tuples(query).await?;
        let total = tuples.len();
        let entities: Vec<T> = tuples
            .into_iter()
            .filter_map(|row| converter.convert(query, &row))
            .collect();
        if entities.len() < total {
            debug!(
                skipped = total - entities.len(),
                "converter dropped rows from result"
            );
        }
        Ok(entities)
    }
}
