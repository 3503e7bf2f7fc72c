//! Semantic type to column type mapping.

use crate::core::schema::{ColumnDef, SemanticType};

/// Text columns at or above this length are stored out of line as `text`.
pub const MAX_INLINE_TEXT_LEN: i32 = 516;

/// Fixed storage length for enumeration columns.
pub const ENUM_TEXT_LEN: i32 = 16;

/// Render the column type clause for a column declaration.
///
/// The `not null` suffix applies to text storage only; other types carry
/// nullability through the application layer.
pub fn map_type(column: &ColumnDef) -> String {
    let base = match column.semantic() {
        SemanticType::Text => {
            if column.length() >= MAX_INLINE_TEXT_LEN {
                "text".to_string()
            } else {
                format!("varchar({})", column.length())
            }
        }
        SemanticType::Enumeration => format!("varchar({})", ENUM_TEXT_LEN),
        SemanticType::Date => "date".to_string(),
        SemanticType::Timestamp => "timestamp".to_string(),
        SemanticType::Decimal => "decimal".to_string(),
        SemanticType::Integer => "integer".to_string(),
        SemanticType::Boolean => "boolean".to_string(),
        SemanticType::Double => "double".to_string(),
        SemanticType::Long => "bigint".to_string(),
        SemanticType::Short => "smallint".to_string(),
        SemanticType::Byte => "binary".to_string(),
    };

    if column.semantic() == SemanticType::Text && !column.is_nullable() {
        format!("{} not null", base)
    } else {
        base
    }
}
