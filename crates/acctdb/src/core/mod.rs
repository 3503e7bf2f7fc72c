//! Core domain types: identifiers, table metadata, and dynamic SQL values.

pub mod identifier;
pub mod schema;
pub mod value;

pub use identifier::{escape_literal, qualify, validate_identifier};
pub use schema::{ColumnDef, SemanticType, TableDef, TableDefBuilder, DEFAULT_TEXT_LENGTH};
pub use value::{decode_column, decode_row, SqlValue};
