use super::{ExprContext, Formatter, Params, ToSql};

use squill_core::Result;

/// A quoted identifier.
pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql<T: Params>(self, _cx: &ExprContext<'_>, f: &mut Formatter<'_, T>) -> Result<()> {
        f.serializer.dialect.write_ident(f.dst, self.0.as_ref());
        Ok(())
    }
}
