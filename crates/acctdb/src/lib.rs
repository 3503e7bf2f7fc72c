//! # acctdb
//!
//! Schema-mapping and query-construction engine for a PostgreSQL-backed
//! accounting application.
//!
//! The library covers the path from entity metadata to executed SQL:
//!
//! - **Table registry** mapping entity types to immutable table descriptors
//! - **Type mapping and DDL generation** for bootstrap schema creation
//! - **Named SQL templates** loaded from line-oriented `.sql` files
//! - **Query builder** with IN-clause and search-text substitution
//! - **Row reader** decoding result tuples into typed entities
//! - **Batch writer** running many bindings in one transaction
//!
//! ## Example
//!
//! ```rust,no_run
//! use acctdb::{Config, QueryBuilder, RowReader, TableRegistry, TemplateStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.yaml".as_ref())?;
//!     let pool = acctdb::executor::connect(&config.database).await?;
//!     let store = TemplateStore::load_dir(&config.templates.dir)?;
//!
//!     let template = store.get("currency.sql", "find_all")?;
//!     let query = QueryBuilder::from_template(template, &config.database.schema)?;
//!     let reader = RowReader::new(pool);
//!     let codes = reader.find_scalars(&query).await?;
//!     println!("{} currencies", codes.len());
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
pub mod config;
pub mod core;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod query;
pub mod registry;

// Re-exports for convenient access
pub use config::{Config, DatabaseConfig, TemplateConfig};
pub use crate::core::schema::{ColumnDef, SemanticType, TableDef};
pub use crate::core::value::SqlValue;
pub use dialect::SchemaGenerator;
pub use error::{AcctError, Result};
pub use executor::{BatchReport, BatchWriter, RowBinding, RowConverter, RowReader};
pub use query::{QueryBuilder, QueryTemplate, Substitution, TemplateStore};
pub use registry::{Entity, EntityMetadata, TableRegistry, TableRegistryBuilder};
