//! Template loading and query construction.

pub mod builder;
pub mod store;

pub use builder::{QueryBuilder, Substitution, SCHEMA_MARKER};
pub use store::{QueryTemplate, TemplateStore};
