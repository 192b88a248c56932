use super::{FieldMap, RecordDescriptor};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// Field maps for every registered record type, keyed by table name.
///
/// Relation-scoped sub-filters resolve the related type's field map through
/// this registry; compiling a filter against an unregistered table is a
/// schema error. The registry is built eagerly at startup and never mutated
/// afterwards.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    tables: IndexMap<String, Arc<FieldMap>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives and stores the field map for a record type. Registering two
    /// types with the same table name is a schema error.
    pub fn register(&mut self, descriptor: &RecordDescriptor) -> Result<Arc<FieldMap>> {
        let map = Arc::new(FieldMap::from_descriptor(descriptor)?);

        if self.tables.contains_key(map.table()) {
            return Err(Error::schema(format!(
                "table `{}` is registered more than once",
                map.table()
            )));
        }

        self.tables.insert(map.table().to_string(), map.clone());
        Ok(map)
    }

    /// Looks up the field map for a table, failing with a schema error when
    /// the table was never registered.
    pub fn field_map(&self, table: &str) -> Result<&Arc<FieldMap>> {
        self.tables
            .get(table)
            .ok_or_else(|| Error::schema(format!("no record type registered for table `{table}`")))
    }

    pub fn get(&self, table: &str) -> Option<&Arc<FieldMap>> {
        self.tables.get(table)
    }
}
