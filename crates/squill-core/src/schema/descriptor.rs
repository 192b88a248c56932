use crate::stmt::ColumnType;

/// A declarative description of a record type, supplied once at registration
/// time. The engine derives an immutable [`FieldMap`] from it and never
/// introspects record values afterwards.
///
/// [`FieldMap`]: super::FieldMap
#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    /// Logical record name, used in error messages.
    pub name: &'static str,

    /// Physical table name.
    pub table: &'static str,

    /// Fields in declaration order. Order is significant: it is the column
    /// order of every compiled statement and of every row handed to the
    /// record for scanning.
    pub fields: Vec<FieldDescriptor>,

    /// Relations available for relation-scoped sub-filters.
    pub relations: Vec<RelationDescriptor>,

    /// Extra filter operators this record type knows how to render.
    pub custom_ops: Vec<CustomOp>,
}

impl RecordDescriptor {
    pub fn new(name: &'static str, table: &'static str) -> Self {
        Self {
            name,
            table,
            fields: Vec::new(),
            relations: Vec::new(),
            custom_ops: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn relation(mut self, relation: RelationDescriptor) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn custom_op(mut self, op: CustomOp) -> Self {
        self.custom_ops.push(op);
        self
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Physical column name.
    pub column: &'static str,

    pub ty: ColumnType,

    /// Marks this field as the identifier. When no field carries the mark,
    /// the first field is the identifier.
    pub primary_key: bool,
}

impl FieldDescriptor {
    pub fn new(column: &'static str, ty: ColumnType) -> Self {
        Self {
            column,
            ty,
            primary_key: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// Links a local column to a foreign table/column so filters can scope
/// conditions to related rows. Only used to build correlated subqueries,
/// never for eager loading.
#[derive(Debug, Clone)]
pub struct RelationDescriptor {
    /// The filter key naming this relation.
    pub name: &'static str,

    /// True for to-one relations, false for to-many.
    pub to_one: bool,

    pub local_column: &'static str,
    pub foreign_column: &'static str,
    pub foreign_table: &'static str,
}

impl RelationDescriptor {
    pub fn to_one(
        name: &'static str,
        local_column: &'static str,
        foreign_column: &'static str,
        foreign_table: &'static str,
    ) -> Self {
        Self {
            name,
            to_one: true,
            local_column,
            foreign_column,
            foreign_table,
        }
    }

    pub fn to_many(
        name: &'static str,
        local_column: &'static str,
        foreign_column: &'static str,
        foreign_table: &'static str,
    ) -> Self {
        Self {
            name,
            to_one: false,
            local_column,
            foreign_column,
            foreign_table,
        }
    }
}

/// A record-type-declared filter operator.
///
/// `render` receives the quoted column identifier and the rendered
/// placeholders for the operand values (one placeholder per value, already
/// appended to the argument list) and returns the SQL fragment.
#[derive(Clone, Copy)]
pub struct CustomOp {
    pub name: &'static str,

    /// Required operand count; `None` accepts any arity.
    pub arity: Option<usize>,

    pub render: fn(ident: &str, placeholders: &[String]) -> String,
}

impl std::fmt::Debug for CustomOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomOp").field("name", &self.name).finish()
    }
}
