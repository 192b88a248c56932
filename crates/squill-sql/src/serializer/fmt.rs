use super::{ExprContext, Formatter, Params};

use squill_core::Result;

use std::fmt::Write;

macro_rules! fmt {
    ($cx:expr, $f:expr, $( $fragment:expr ),* $(,)?) => {{
        $(
            $fragment.to_sql($cx, $f)?;
        )*
    }};
}

pub(super) trait ToSql {
    fn to_sql<T: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, T>) -> Result<()>;
}

impl ToSql for &str {
    fn to_sql<T: Params>(self, _cx: &ExprContext<'_>, f: &mut Formatter<'_, T>) -> Result<()> {
        f.dst.push_str(self);
        Ok(())
    }
}

impl ToSql for u64 {
    fn to_sql<T: Params>(self, _cx: &ExprContext<'_>, f: &mut Formatter<'_, T>) -> Result<()> {
        write!(f.dst, "{self}").unwrap();
        Ok(())
    }
}

impl<A, B> ToSql for (A, B)
where
    A: ToSql,
    B: ToSql,
{
    fn to_sql<T: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, T>) -> Result<()> {
        fmt!(cx, f, self.0, self.1);
        Ok(())
    }
}

impl<A, B, C> ToSql for (A, B, C)
where
    A: ToSql,
    B: ToSql,
    C: ToSql,
{
    fn to_sql<T: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, T>) -> Result<()> {
        fmt!(cx, f, self.0, self.1, self.2);
        Ok(())
    }
}

impl<S> ToSql for Option<S>
where
    S: ToSql,
{
    fn to_sql<T: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, T>) -> Result<()> {
        if let Some(inner) = self {
            inner.to_sql(cx, f)?;
        }
        Ok(())
    }
}
