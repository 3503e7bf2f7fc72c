//! Write-path execution.
//!
//! A batch is one template executed once per row binding inside a single
//! transaction. Any driver-level rejection rolls the whole batch back;
//! partial persistence is never an outcome.

use std::collections::BTreeMap;

use deadpool_postgres::Pool;
use tokio_postgres::types::ToSql;
use tracing::debug;

use crate::core::value::SqlValue;
use crate::error::{AcctError, Result};
use crate::query::builder::QueryBuilder;

/// One row's parameter values, keyed by 1-based positional index.
///
/// Values bind in ascending index order, matching `$1..$n` in the template.
/// Supplying inconsistent index sets across the bindings of one batch is a
/// caller error and is not validated here.
#[derive(Debug, Clone, Default)]
pub struct RowBinding {
    values: BTreeMap<u16, SqlValue>,
}

impl RowBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value at a 1-based positional index. Rebinding an index
    /// replaces the earlier value.
    pub fn set(mut self, index: u16, value: impl Into<SqlValue>) -> Self {
        self.values.insert(index, value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in ascending index order, ready for statement binding.
    pub fn ordered_values(&self) -> Vec<&SqlValue> {
        self.values.values().collect()
    }
}

/// Outcome of a committed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub rows_submitted: usize,
    pub rows_affected: u64,
}

/// Executes transactional batches against a shared pool.
#[derive(Clone)]
pub struct BatchWriter {
    pool: Pool,
}

impl BatchWriter {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Run every binding through one prepared statement in one transaction.
    ///
    /// On any failure the transaction rolls back when it drops and the
    /// error propagates; zero rows from the batch persist. An empty binding
    /// list commits nothing and reports zero rows.
    pub async fn run(&self, query: &QueryBuilder, bindings: &[RowBinding]) -> Result<BatchReport> {
        if bindings.is_empty() {
            return Ok(BatchReport::default());
        }

        debug!(
            sql = query.sql(),
            rows = bindings.len(),
            "executing batch"
        );
        let mut client = self
            .pool
            .get()
            .await
            .map_err(|e| AcctError::pool(e, "acquiring write connection"))?;
        let tx = client.transaction().await?;
        let stmt = tx.prepare(query.sql()).await?;

        let mut rows_affected = 0u64;
        for binding in bindings {
            let params: Vec<&(dyn ToSql + Sync)> = binding
                .ordered_values()
                .into_iter()
                .map(|v| v as &(dyn ToSql + Sync))
                .collect();
            rows_affected += tx.execute(&stmt, &params).await?;
        }
        tx.commit().await?;

        Ok(BatchReport {
            rows_submitted: bindings.len(),
            rows_affected,
        })
    }
}
