use super::{CustomOp, RecordDescriptor};
use crate::{stmt::ColumnType, Error, Result};

use indexmap::IndexMap;

/// Derived physical metadata for a record type: table name, ordered columns,
/// primary key, relations, custom operators.
///
/// Built once per record type from its [`RecordDescriptor`], immutable
/// thereafter, and safe to share across threads.
#[derive(Debug)]
pub struct FieldMap {
    record: &'static str,
    table: String,
    columns: Vec<Column>,
    primary_key: usize,
    relations: IndexMap<String, Relation>,
    custom_ops: Vec<CustomOp>,
}

/// A physical column. The ordinal is the column's position in every compiled
/// statement and every scanned row.
#[derive(Debug)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub ordinal: usize,
}

#[derive(Debug)]
pub struct Relation {
    pub to_one: bool,
    pub local_column: String,
    pub foreign_column: String,
    pub foreign_table: String,
}

impl FieldMap {
    /// Derives the field map from a descriptor.
    ///
    /// Fails when the descriptor has no fields (no extractable primary key),
    /// when column names collide, or when a relation references a local
    /// column the record does not have.
    pub fn from_descriptor(descriptor: &RecordDescriptor) -> Result<FieldMap> {
        if descriptor.fields.is_empty() {
            return Err(Error::schema(format!(
                "record type `{}` has no fields; cannot derive a primary key",
                descriptor.name
            )));
        }

        let mut columns = Vec::with_capacity(descriptor.fields.len());
        for (ordinal, field) in descriptor.fields.iter().enumerate() {
            if columns.iter().any(|c: &Column| c.name == field.column) {
                return Err(Error::schema(format!(
                    "record type `{}` declares column `{}` more than once",
                    descriptor.name, field.column
                )));
            }
            columns.push(Column {
                name: field.column.to_string(),
                ty: field.ty,
                ordinal,
            });
        }

        // Explicitly marked identifier wins; otherwise the first field is it.
        let primary_key = descriptor
            .fields
            .iter()
            .position(|field| field.primary_key)
            .unwrap_or(0);

        let mut relations = IndexMap::new();
        for relation in &descriptor.relations {
            if !columns.iter().any(|c| c.name == relation.local_column) {
                return Err(Error::schema(format!(
                    "relation `{}` on record type `{}` references unknown local column `{}`",
                    relation.name, descriptor.name, relation.local_column
                )));
            }
            relations.insert(
                relation.name.to_string(),
                Relation {
                    to_one: relation.to_one,
                    local_column: relation.local_column.to_string(),
                    foreign_column: relation.foreign_column.to_string(),
                    foreign_table: relation.foreign_table.to_string(),
                },
            );
        }

        Ok(FieldMap {
            record: descriptor.name,
            table: descriptor.table.to_string(),
            columns,
            primary_key,
            relations,
            custom_ops: descriptor.custom_ops.clone(),
        })
    }

    pub fn record(&self) -> &'static str {
        self.record
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key(&self) -> &Column {
        &self.columns[self.primary_key]
    }

    pub fn primary_key_ordinal(&self) -> usize {
        self.primary_key
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    pub fn relations(&self) -> impl Iterator<Item = (&str, &Relation)> {
        self.relations.iter().map(|(name, rel)| (name.as_str(), rel))
    }

    pub fn custom_op(&self, name: &str) -> Option<&CustomOp> {
        self.custom_ops.iter().find(|op| op.name == name)
    }

    /// Column decoding hints in ordinal order, handed to drivers when a
    /// statement returns full rows.
    pub fn column_types(&self) -> Vec<ColumnType> {
        self.columns.iter().map(|column| column.ty).collect()
    }
}
