mod dialect_kind;
pub use dialect_kind::DialectKind;

pub mod operation;
pub use operation::{Operation, SqlQuery, Transaction};

mod response;
pub use response::{ExecCount, Response, Rows};

use crate::{async_trait, Result};

use std::fmt::Debug;

/// A single database connection capable of executing compiled statements and
/// transaction lifecycle operations.
///
/// Implementations live in the per-backend driver crates. A connection is
/// used by one executor at a time; cross-record consistency comes entirely
/// from the backing engine's transaction isolation.
#[async_trait]
pub trait Connection: Debug + Send {
    /// The SQL dialect this connection speaks. Statements executed through
    /// this connection are compiled for this dialect.
    fn dialect(&self) -> DialectKind;

    /// Execute a single driver operation.
    async fn exec(&mut self, op: Operation) -> Result<Response>;
}
