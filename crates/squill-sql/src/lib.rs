mod dialect;
pub use dialect::{Dialect, ReturningMode};

pub mod stmt;
pub use stmt::Statement;

mod serializer;
pub use serializer::{Params, Placeholder, Serializer};
