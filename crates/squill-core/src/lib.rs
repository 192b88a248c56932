mod error;
pub use error::Error;

pub mod driver;
pub use driver::{Connection, DialectKind};

pub mod schema;
pub use schema::{FieldMap, RecordDescriptor, SchemaRegistry};

pub mod stmt;

/// A Result type alias that uses squill's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
