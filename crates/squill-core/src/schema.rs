mod descriptor;
pub use descriptor::{CustomOp, FieldDescriptor, RecordDescriptor, RelationDescriptor};

mod field_map;
pub use field_map::{Column, FieldMap, Relation};

mod registry;
pub use registry::SchemaRegistry;
