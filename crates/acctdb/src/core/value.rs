//! SQL value types for parameter binding and result decoding.
//!
//! [`SqlValue`] is the dynamic value the engine moves across the driver
//! boundary in both directions: batch-write bindings implement `ToSql` by
//! delegating per variant, and result rows decode into `Vec<SqlValue>`
//! tuples before entity conversion.

use bytes::BytesMut;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tokio_postgres::types::{to_sql_checked, IsNull, ToSql, Type};
use tokio_postgres::Row;

use crate::core::identifier::escape_literal;
use crate::error::{AcctError, Result};

/// Dynamic SQL value covering the semantic column types.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL; the prepared statement supplies the expected wire type.
    Null,
    Bool(bool),
    /// 16-bit signed integer (smallint).
    I16(i16),
    /// 32-bit signed integer (integer).
    I32(i32),
    /// 64-bit signed integer (bigint).
    I64(i64),
    /// 64-bit floating point (double).
    F64(f64),
    /// Text data (varchar/text/enumeration columns).
    Text(String),
    /// Binary data.
    Bytes(Vec<u8>),
    /// Arbitrary-precision decimal.
    Decimal(Decimal),
    /// Date without time component.
    Date(NaiveDate),
    /// Timestamp without timezone.
    DateTime(NaiveDateTime),
}

impl SqlValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            SqlValue::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::I64(v) => Some(*v),
            SqlValue::I32(v) => Some(i64::from(*v)),
            SqlValue::I16(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            SqlValue::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            SqlValue::Date(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            SqlValue::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    /// Render as a SQL literal for direct splicing into query text.
    ///
    /// Text-like values are single-quoted with quotes doubled; this is
    /// sufficient for the short identifiers and codes IN-lists carry. Data
    /// values bound through prepared statements never pass through here.
    pub fn to_sql_literal(&self) -> String {
        match self {
            SqlValue::Null => "null".to_string(),
            SqlValue::Bool(v) => v.to_string(),
            SqlValue::I16(v) => v.to_string(),
            SqlValue::I32(v) => v.to_string(),
            SqlValue::I64(v) => v.to_string(),
            SqlValue::F64(v) => v.to_string(),
            SqlValue::Text(v) => format!("'{}'", escape_literal(v)),
            SqlValue::Bytes(v) => {
                let mut hex = String::with_capacity(v.len() * 2);
                for b in v {
                    hex.push_str(&format!("{:02x}", b));
                }
                format!("'\\x{}'", hex)
            }
            SqlValue::Decimal(v) => v.to_string(),
            SqlValue::Date(v) => format!("'{}'", v.format("%Y-%m-%d")),
            SqlValue::DateTime(v) => format!("'{}'", v.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::I16(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::I32(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::F64(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::DateTime(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

// Binding delegates to the inner type's encoding. Callers are responsible
// for matching binding types to the template's parameter types; a mismatch
// surfaces as a driver error on execute.
impl ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Bool(v) => v.to_sql(ty, out),
            SqlValue::I16(v) => v.to_sql(ty, out),
            SqlValue::I32(v) => v.to_sql(ty, out),
            SqlValue::I64(v) => v.to_sql(ty, out),
            SqlValue::F64(v) => v.to_sql(ty, out),
            SqlValue::Text(v) => v.to_sql(ty, out),
            SqlValue::Bytes(v) => v.to_sql(ty, out),
            SqlValue::Decimal(v) => v.to_sql(ty, out),
            SqlValue::Date(v) => v.to_sql(ty, out),
            SqlValue::DateTime(v) => v.to_sql(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

/// Decode every column of a result row into the dynamic value set.
pub fn decode_row(row: &Row) -> Result<Vec<SqlValue>> {
    (0..row.columns().len())
        .map(|idx| decode_column(row, idx))
        .collect()
}

/// Decode a single result column by its reported wire type.
pub fn decode_column(row: &Row, idx: usize) -> Result<SqlValue> {
    let col = &row.columns()[idx];
    let ty = col.type_();

    let value = if *ty == Type::BOOL {
        row.try_get::<_, Option<bool>>(idx)?.map(SqlValue::Bool)
    } else if *ty == Type::INT2 {
        row.try_get::<_, Option<i16>>(idx)?.map(SqlValue::I16)
    } else if *ty == Type::INT4 {
        row.try_get::<_, Option<i32>>(idx)?.map(SqlValue::I32)
    } else if *ty == Type::INT8 {
        row.try_get::<_, Option<i64>>(idx)?.map(SqlValue::I64)
    } else if *ty == Type::FLOAT4 {
        row.try_get::<_, Option<f32>>(idx)?
            .map(|v| SqlValue::F64(f64::from(v)))
    } else if *ty == Type::FLOAT8 {
        row.try_get::<_, Option<f64>>(idx)?.map(SqlValue::F64)
    } else if *ty == Type::NUMERIC {
        row.try_get::<_, Option<Decimal>>(idx)?.map(SqlValue::Decimal)
    } else if *ty == Type::VARCHAR || *ty == Type::TEXT || *ty == Type::BPCHAR || *ty == Type::NAME
    {
        row.try_get::<_, Option<String>>(idx)?.map(SqlValue::Text)
    } else if *ty == Type::DATE {
        row.try_get::<_, Option<NaiveDate>>(idx)?.map(SqlValue::Date)
    } else if *ty == Type::TIMESTAMP {
        row.try_get::<_, Option<NaiveDateTime>>(idx)?
            .map(SqlValue::DateTime)
    } else if *ty == Type::BYTEA {
        row.try_get::<_, Option<Vec<u8>>>(idx)?.map(SqlValue::Bytes)
    } else {
        return Err(AcctError::Decode {
            column: col.name().to_string(),
            message: format!("unsupported result type {}", ty),
        });
    };

    Ok(value.unwrap_or(SqlValue::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_literal_escapes_quotes() {
        let v = SqlValue::Text("O'Brien".to_string());
        assert_eq!(v.to_sql_literal(), "'O''Brien'");
    }

    #[test]
    fn test_numeric_literals_unquoted() {
        assert_eq!(SqlValue::I32(42).to_sql_literal(), "42");
        assert_eq!(SqlValue::Bool(true).to_sql_literal(), "true");
        assert_eq!(
            SqlValue::Decimal("12.50".parse().unwrap()).to_sql_literal(),
            "12.50"
        );
    }

    #[test]
    fn test_date_literal_quoted() {
        let d = NaiveDate::from_ymd_opt(2016, 10, 3).unwrap();
        assert_eq!(SqlValue::Date(d).to_sql_literal(), "'2016-10-03'");
    }

    #[test]
    fn test_null_literal() {
        assert_eq!(SqlValue::Null.to_sql_literal(), "null");
        assert!(SqlValue::Null.is_null());
    }

    #[test]
    fn test_from_option() {
        let v: SqlValue = Option::<i32>::None.into();
        assert!(v.is_null());
        let v: SqlValue = Some("usd").into();
        assert_eq!(v.as_text(), Some("usd"));
    }

    #[test]
    fn test_as_i64_widens() {
        assert_eq!(SqlValue::I16(7).as_i64(), Some(7));
        assert_eq!(SqlValue::I32(7).as_i64(), Some(7));
        assert_eq!(SqlValue::Text("7".into()).as_i64(), None);
    }
}
