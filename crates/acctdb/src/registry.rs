//! Entity registration and metadata lookup.
//!
//! The registry is the single source of truth for table metadata. Entities
//! register once at startup, either through the typed [`Entity`] trait or
//! through declarative [`EntityMetadata`] loaded from YAML, and every later
//! lookup hands out the same shared [`TableDef`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::core::schema::{ColumnDef, SemanticType, TableDef};
use crate::error::{AcctError, Result};

/// A persistent entity type with table metadata.
///
/// `ENTITY` is the registry key and must be unique across the application.
pub trait Entity: 'static {
    /// Logical entity name used for registry lookups.
    const ENTITY: &'static str;

    /// Build the table descriptor for this entity.
    fn descriptor() -> Result<TableDef>;
}

/// Declarative column description loaded from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    /// Struct field backing this column; defaults to the column name.
    #[serde(default)]
    pub field: Option<String>,
    /// Semantic type token (text, date, decimal, enum, ...).
    #[serde(rename = "type")]
    pub semantic: String,
    #[serde(default)]
    pub length: Option<i32>,
    /// Columns are nullable unless declared otherwise.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub auto_increment: bool,
    /// Entity name of a referenced table; must be registered first.
    #[serde(default)]
    pub references: Option<String>,
}

fn default_nullable() -> bool {
    true
}

/// Declarative entity description loaded from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityMetadata {
    pub entity: String,
    pub table: String,
    pub columns: Vec<ColumnMetadata>,
}

impl EntityMetadata {
    /// Load a list of entity descriptions from a YAML file.
    pub fn load_all(path: &Path) -> Result<Vec<EntityMetadata>> {
        let content = std::fs::read_to_string(path)?;
        let entities: Vec<EntityMetadata> = serde_yaml::from_str(&content)?;
        Ok(entities)
    }
}

/// Builder collecting entity registrations before the registry is frozen.
#[derive(Debug, Default)]
pub struct TableRegistryBuilder {
    tables: HashMap<String, Arc<TableDef>>,
    order: Vec<String>,
}

impl TableRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed entity. Re-registering the same entity name keeps
    /// the first descriptor and logs a warning.
    pub fn register<T: Entity>(&mut self) -> Result<&mut Self> {
        if self.tables.contains_key(T::ENTITY) {
            warn!(entity = T::ENTITY, "entity registered more than once, keeping first");
            return Ok(self);
        }
        let def = Arc::new(T::descriptor()?);
        self.insert(T::ENTITY.to_string(), def);
        Ok(self)
    }

    /// Register an entity from declarative metadata.
    ///
    /// References resolve against previously registered entities, so callers
    /// must register tables in dependency order.
    pub fn register_metadata(&mut self, meta: &EntityMetadata) -> Result<&mut Self> {
        if self.tables.contains_key(&meta.entity) {
            warn!(entity = %meta.entity, "entity registered more than once, keeping first");
            return Ok(self);
        }
        let mut builder = TableDef::builder(&meta.table, &meta.entity);
        for col in &meta.columns {
            let semantic = SemanticType::parse(&col.name, &col.semantic)?;
            let mut def = ColumnDef::new(&col.name, semantic);
            if let Some(field) = &col.field {
                def = def.from_field(field);
            }
            if let Some(length) = col.length {
                def = def.with_length(length);
            }
            if !col.nullable {
                def = def.not_null();
            }
            if col.auto_increment {
                def = def.auto_increment();
            } else if col.primary {
                def = def.primary_key();
            }
            if let Some(target) = &col.references {
                let join = self
                    .tables
                    .get(target)
                    .cloned()
                    .ok_or_else(|| AcctError::UnknownEntity(target.clone()))?;
                def = def.references(join);
            }
            builder = builder.column(def);
        }
        let def = Arc::new(builder.build()?);
        self.insert(meta.entity.clone(), def);
        Ok(self)
    }

    fn insert(&mut self, entity: String, def: Arc<TableDef>) {
        self.order.push(entity.clone());
        self.tables.insert(entity, def);
    }

    /// Freeze the registrations into an immutable registry.
    pub fn build(self) -> TableRegistry {
        TableRegistry {
            tables: self.tables,
            order: self.order,
        }
    }
}

/// Immutable lookup table from entity name to shared table metadata.
#[derive(Debug)]
pub struct TableRegistry {
    tables: HashMap<String, Arc<TableDef>>,
    order: Vec<String>,
}

impl TableRegistry {
    pub fn builder() -> TableRegistryBuilder {
        TableRegistryBuilder::new()
    }

    /// Look up the metadata for a typed entity.
    pub fn get<T: Entity>(&self) -> Result<Arc<TableDef>> {
        self.get_named(T::ENTITY)
    }

    /// Look up metadata by entity name.
    pub fn get_named(&self, entity: &str) -> Result<Arc<TableDef>> {
        self.tables
            .get(entity)
            .cloned()
            .ok_or_else(|| AcctError::UnknownEntity(entity.to_string()))
    }

    /// Iterate table definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TableDef>> {
        self.order.iter().map(|name| &self.tables[name])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
