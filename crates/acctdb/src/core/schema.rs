//! Table and column descriptors.
//!
//! These types are the single source of truth for how an entity maps onto a
//! relational table: the DDL generator, the tuple decoder, and the registry
//! all work from the same `TableDef`/`ColumnDef` pair. Descriptors are built
//! once through [`TableDefBuilder`] and immutable afterwards; the lazy
//! primary-column and name-index caches are the only post-construction
//! writes, and both are idempotent.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::core::identifier::validate_identifier;
use crate::error::{AcctError, Result};

/// Semantic column type, independent of any SQL dialect.
///
/// The set is closed; the type mapper is total over it. Unknown tokens from
/// a declarative metadata source are rejected at [`SemanticType::parse`]
/// time, naming the field that declared them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// Variable-length text; `length` selects varchar vs text storage.
    Text,
    /// Calendar date without time component.
    Date,
    /// Date and time of day.
    Timestamp,
    /// Arbitrary-precision decimal (amounts, rates).
    Decimal,
    /// 32-bit signed integer.
    Integer,
    Boolean,
    /// 64-bit floating point.
    Double,
    /// 64-bit signed integer.
    Long,
    /// 16-bit signed integer.
    Short,
    /// Single byte.
    Byte,
    /// Enumeration persisted as short text.
    Enumeration,
}

impl SemanticType {
    /// Parse a metadata-source token. `field` is the declaring field name,
    /// carried into the error so a misconfigured mapping is traceable.
    pub fn parse(field: &str, token: &str) -> Result<Self> {
        match token.trim().to_lowercase().as_str() {
            "text" | "string" => Ok(SemanticType::Text),
            "date" => Ok(SemanticType::Date),
            "timestamp" => Ok(SemanticType::Timestamp),
            "decimal" => Ok(SemanticType::Decimal),
            "integer" | "int" => Ok(SemanticType::Integer),
            "boolean" | "bool" => Ok(SemanticType::Boolean),
            "double" => Ok(SemanticType::Double),
            "long" | "bigint" => Ok(SemanticType::Long),
            "short" => Ok(SemanticType::Short),
            "byte" => Ok(SemanticType::Byte),
            "enum" | "enumeration" => Ok(SemanticType::Enumeration),
            other => Err(AcctError::unsupported_type(field, other)),
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            SemanticType::Text => "text",
            SemanticType::Date => "date",
            SemanticType::Timestamp => "timestamp",
            SemanticType::Decimal => "decimal",
            SemanticType::Integer => "integer",
            SemanticType::Boolean => "boolean",
            SemanticType::Double => "double",
            SemanticType::Long => "long",
            SemanticType::Short => "short",
            SemanticType::Byte => "byte",
            SemanticType::Enumeration => "enumeration",
        };
        f.write_str(token)
    }
}

/// Default text length when a declaration omits one.
pub const DEFAULT_TEXT_LENGTH: i32 = 255;

/// Describes one mapped column.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    name: String,
    field_name: String,
    semantic: SemanticType,
    length: i32,
    nullable: bool,
    primary_key: bool,
    auto_increment: bool,
    column_index: usize,
    join_table: Option<Arc<TableDef>>,
}

impl ColumnDef {
    /// Start a column declaration. The field name defaults to the column
    /// name; override with [`ColumnDef::from_field`] when they differ.
    pub fn new(name: impl Into<String>, semantic: SemanticType) -> Self {
        let name = name.into();
        Self {
            field_name: name.clone(),
            name,
            semantic,
            length: DEFAULT_TEXT_LENGTH,
            nullable: true,
            primary_key: false,
            auto_increment: false,
            column_index: 0,
            join_table: None,
        }
    }

    /// Shorthand for a text column with an explicit length.
    pub fn text(name: impl Into<String>, length: i32) -> Self {
        Self::new(name, SemanticType::Text).with_length(length)
    }

    /// Source attribute name on the entity, when it differs from the
    /// column name.
    pub fn from_field(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    pub fn with_length(mut self, length: i32) -> Self {
        self.length = length;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Auto-increment implies primary key.
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self.primary_key = true;
        self
    }

    /// Declare a foreign key to another table. The referenced descriptor is
    /// shared, not owned; the referenced table's primary column becomes the
    /// FK target.
    pub fn references(mut self, join_table: Arc<TableDef>) -> Self {
        self.join_table = Some(join_table);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn semantic(&self) -> SemanticType {
        self.semantic
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    /// Position in result tuples, 0-based, assigned in declaration order.
    pub fn column_index(&self) -> usize {
        self.column_index
    }

    pub fn join_table(&self) -> Option<&Arc<TableDef>> {
        self.join_table.as_ref()
    }
}

/// Describes one mapped table: name, owning entity type, and ordered columns.
///
/// Column order is physical order - it drives both DDL emission and tuple
/// decoding, so it must match the metadata declaration order exactly.
pub struct TableDef {
    name: String,
    entity: String,
    columns: Vec<ColumnDef>,
    primary: OnceLock<Option<usize>>,
    by_name: OnceLock<HashMap<String, usize>>,
}

impl TableDef {
    /// Start building a descriptor for `entity` mapped to table `name`.
    pub fn builder(name: impl Into<String>, entity: impl Into<String>) -> TableDefBuilder {
        TableDefBuilder {
            name: name.into(),
            entity: entity.into(),
            columns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logical entity type this table maps.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// The primary column: first one marked primary in descriptor order.
    /// Computed lazily and cached; the builder guarantees at most one
    /// candidate exists, so "first" is not ambiguous in practice.
    pub fn primary_column(&self) -> Option<&ColumnDef> {
        let idx = self
            .primary
            .get_or_init(|| self.columns.iter().position(ColumnDef::is_primary_key));
        idx.map(|i| &self.columns[i])
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// 0-based tuple position of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let map = self.by_name.get_or_init(|| {
            self.columns
                .iter()
                .enumerate()
                .map(|(i, c)| (c.name.clone(), i))
                .collect()
        });
        map.get(name).copied()
    }
}

impl fmt::Debug for TableDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableDef")
            .field("name", &self.name)
            .field("entity", &self.entity)
            .field("columns", &self.columns)
            .finish()
    }
}

/// Builder for [`TableDef`]; enforces descriptor invariants at `build`.
pub struct TableDefBuilder {
    name: String,
    entity: String,
    columns: Vec<ColumnDef>,
}

impl TableDefBuilder {
    /// Append a column; declaration order becomes physical column order.
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Finalize the descriptor.
    ///
    /// # Errors
    ///
    /// - invalid table or column identifiers
    /// - duplicate column names
    /// - more than one column marked primary (a second primary column is a
    ///   misconfigured mapping, rejected here rather than silently resolved
    ///   to first-wins)
    pub fn build(mut self) -> Result<TableDef> {
        validate_identifier(&self.name)?;

        if self.columns.is_empty() {
            return Err(AcctError::Schema(format!(
                "Table {} declares no columns",
                self.name
            )));
        }

        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut primary: Option<usize> = None;
        for index in 0..self.columns.len() {
            validate_identifier(&self.columns[index].name)?;
            if let Some(_first) = seen.insert(self.columns[index].name.clone(), index) {
                return Err(AcctError::Schema(format!(
                    "Table {} declares column {} twice",
                    self.name, self.columns[index].name
                )));
            }
            if self.columns[index].primary_key {
                if let Some(first) = primary {
                    return Err(AcctError::Schema(format!(
                        "Table {} marks both {} and {} as primary key",
                        self.name, self.columns[first].name, self.columns[index].name
                    )));
                }
                primary = Some(index);
            }
            self.columns[index].column_index = index;
        }

        Ok(TableDef {
            name: self.name,
            entity: self.entity,
            columns: self.columns,
            primary: OnceLock::new(),
            by_name: OnceLock::new(),
        })
    }
}
