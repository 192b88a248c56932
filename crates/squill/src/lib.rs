mod executor;
pub use executor::Executor;

mod mapper;

mod record;
pub use record::Record;

pub mod wire;

pub use squill_core::{
    async_trait, driver, schema, stmt, Connection, DialectKind, Error, FieldMap,
    RecordDescriptor, Result, SchemaRegistry,
};
pub use squill_sql::{Dialect, ReturningMode};
