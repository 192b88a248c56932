use super::{Comma, ExprContext, Formatter, Ident, Params, ToSql};

use crate::{
    dialect::ReturningMode,
    stmt::{Cell, Delete, Insert, Select, Statement, Update},
};
use squill_core::{err, Error, Result};

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, P>) -> Result<()> {
        match self {
            Statement::Select(stmt) => stmt.to_sql(cx, f),
            Statement::Insert(stmt) => stmt.to_sql(cx, f),
            Statement::Update(stmt) => stmt.to_sql(cx, f),
            Statement::Delete(stmt) => stmt.to_sql(cx, f),
        }
    }
}

/// The table's full column list, quoted, in field-map order.
struct AllColumns;

impl ToSql for AllColumns {
    fn to_sql<P: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, P>) -> Result<()> {
        let columns = Comma(cx.map.columns().iter().map(|column| Ident(&column.name)));
        fmt!(cx, f, columns);
        Ok(())
    }
}

/// `OUTPUT <source>.<columns>` over the table's full column list.
struct OutputClause {
    source: &'static str,
}

impl ToSql for OutputClause {
    fn to_sql<P: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, P>) -> Result<()> {
        let columns = Comma(
            cx.map
                .columns()
                .iter()
                .map(|column| (self.source, ".", Ident(&column.name))),
        );
        fmt!(cx, f, " OUTPUT ", columns);
        Ok(())
    }
}

impl ToSql for &Select {
    fn to_sql<P: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, P>) -> Result<()> {
        let filter = self.filter.as_ref().map(|filter| (" WHERE ", filter));

        fmt!(cx, f, "SELECT ", AllColumns, " FROM ", Ident(cx.map.table()), filter);

        if !self.order.is_empty() {
            fmt!(cx, f, " ORDER BY ");
            let mut s = "";
            for (column, direction) in self.order.iter() {
                let column = cx.map.column(column).ok_or_else(|| {
                    Error::validation(format!(
                        "unknown column `{}` on record type `{}`",
                        column,
                        cx.map.record()
                    ))
                })?;
                fmt!(cx, f, s, Ident(&column.name), " ", direction.as_str());
                s = ", ";
            }
        }

        let limit = self.page.limit.map(|limit| (" LIMIT ", limit));
        let offset = self.page.offset.map(|offset| (" OFFSET ", offset));
        fmt!(cx, f, limit, offset);

        Ok(())
    }
}

impl ToSql for &Insert {
    fn to_sql<P: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, P>) -> Result<()> {
        let mode = f.serializer.dialect.returning_mode();

        if self.returning && mode == ReturningMode::SelectAround {
            return Err(err!(
                "INSERT cannot return rows on this backend; the executor selects them back instead"
            ));
        }

        let columns = Comma(self.columns.iter().map(Ident));
        let output = (self.returning && mode == ReturningMode::OutputClause)
            .then_some(OutputClause { source: "INSERTED" });

        fmt!(
            cx,
            f,
            "INSERT INTO ",
            Ident(cx.map.table()),
            " (",
            columns,
            ")",
            output,
            " VALUES ",
        );

        let mut s = "";
        for row in &self.rows {
            fmt!(cx, f, s, "(");
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    f.dst.push_str(", ");
                }
                match cell {
                    Cell::Bind(value) => {
                        let placeholder = f.params.push(value);
                        placeholder.to_sql(cx, f)?;
                    }
                    Cell::Generated => {
                        let sentinel = f.serializer.dialect.key_sentinel().ok_or_else(|| {
                            err!("this backend omits generated key columns from INSERT")
                        })?;
                        fmt!(cx, f, sentinel);
                    }
                }
            }
            fmt!(cx, f, ")");
            s = ", ";
        }

        let returning = (self.returning && mode == ReturningMode::NativeReturning)
            .then_some((" RETURNING ", AllColumns));
        fmt!(cx, f, returning);

        Ok(())
    }
}

impl ToSql for &Update {
    fn to_sql<P: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, P>) -> Result<()> {
        let mode = f.serializer.dialect.returning_mode();

        if self.returning && mode == ReturningMode::SelectAround {
            return Err(err!(
                "UPDATE cannot return rows on this backend; the executor selects them back instead"
            ));
        }

        fmt!(cx, f, "UPDATE ", Ident(cx.map.table()), " SET ");

        let mut s = "";
        for (column, value) in &self.assignments {
            let column = cx.map.column(column).ok_or_else(|| {
                Error::validation(format!(
                    "unknown column `{}` on record type `{}`",
                    column,
                    cx.map.record()
                ))
            })?;

            fmt!(cx, f, s, Ident(&column.name), " = ");
            let placeholder = f.params.push(value);
            placeholder.to_sql(cx, f)?;
            s = ", ";
        }

        let output = (self.returning && mode == ReturningMode::OutputClause)
            .then_some(OutputClause { source: "INSERTED" });
        let returning = (self.returning && mode == ReturningMode::NativeReturning)
            .then_some((" RETURNING ", AllColumns));

        fmt!(cx, f, output, " WHERE ", &self.filter, returning);

        Ok(())
    }
}

impl ToSql for &Delete {
    fn to_sql<P: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, P>) -> Result<()> {
        let mode = f.serializer.dialect.returning_mode();

        if self.returning && mode == ReturningMode::SelectAround {
            return Err(err!(
                "DELETE cannot return rows on this backend; the executor selects them first instead"
            ));
        }

        let output = (self.returning && mode == ReturningMode::OutputClause)
            .then_some(OutputClause { source: "DELETED" });
        let filter = self.filter.as_ref().map(|filter| (" WHERE ", filter));
        let returning = (self.returning && mode == ReturningMode::NativeReturning)
            .then_some((" RETURNING ", AllColumns));

        fmt!(cx, f, "DELETE FROM ", Ident(cx.map.table()), output, filter, returning);

        Ok(())
    }
}
