use super::{ExprContext, Formatter, ToSql};

use squill_core::{stmt::Value, Result};

/// Sink for statement arguments.
///
/// `push` appends the value and returns its 1-based placeholder ordinal;
/// arguments are pushed in placeholder-encounter order, keeping the argument
/// list and placeholder list index-aligned.
pub trait Params {
    fn push(&mut self, param: &Value) -> Placeholder;
}

pub struct Placeholder(pub usize);

impl Params for Vec<Value> {
    fn push(&mut self, value: &Value) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, _cx: &ExprContext<'_>, f: &mut Formatter<'_, P>) -> Result<()> {
        f.serializer.dialect.write_placeholder(f.dst, self.0);
        Ok(())
    }
}
