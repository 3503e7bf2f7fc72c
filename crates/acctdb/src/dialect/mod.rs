//! SQL dialect concerns: type mapping and DDL generation.

pub mod ddl;
pub mod typemap;

pub use ddl::SchemaGenerator;
pub use typemap::{map_type, ENUM_TEXT_LEN, MAX_INLINE_TEXT_LEN};
