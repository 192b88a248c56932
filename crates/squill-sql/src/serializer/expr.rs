use super::{Delimited, ExprContext, Formatter, Ident, Params, ToSql};

use squill_core::{
    stmt::{FilterLeaf, FilterNode, FilterRelation, Op, Operand},
    Error, Result,
};

impl ToSql for &FilterNode {
    fn to_sql<P: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, P>) -> Result<()> {
        match self {
            FilterNode::Not(inner) => {
                fmt!(cx, f, "NOT (", &**inner, ")");
            }
            FilterNode::And(children) => combinator(children, " AND ", cx, f)?,
            FilterNode::Or(children) => combinator(children, " OR ", cx, f)?,
            FilterNode::Leaf(leaf) => leaf.to_sql(cx, f)?,
            FilterNode::Relation(relation) => relation.to_sql(cx, f)?,
        }

        Ok(())
    }
}

/// Each child compiles to a parenthesized fragment. An empty child list
/// compiles to an always-true fragment; `1 = 1` because not every backend
/// has a boolean literal.
fn combinator<P: Params>(
    children: &[FilterNode],
    sep: &'static str,
    cx: &ExprContext<'_>,
    f: &mut Formatter<'_, P>,
) -> Result<()> {
    if children.is_empty() {
        fmt!(cx, f, "1 = 1");
        return Ok(());
    }

    let parts = Delimited(children.iter().map(Paren), sep);
    fmt!(cx, f, "(", parts, ")");
    Ok(())
}

struct Paren<'a>(&'a FilterNode);

impl ToSql for Paren<'_> {
    fn to_sql<P: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, P>) -> Result<()> {
        fmt!(cx, f, "(", self.0, ")");
        Ok(())
    }
}

impl ToSql for &FilterLeaf {
    fn to_sql<P: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, P>) -> Result<()> {
        let column = cx.map.column(&self.column).ok_or_else(|| {
            Error::validation(format!(
                "unknown column `{}` on record type `{}`",
                self.column,
                cx.map.record()
            ))
        })?;

        match self.op {
            Op::In | Op::NotIn => {
                let Operand::Many(values) = &self.operand else {
                    return Err(Error::validation(format!(
                        "operator `{}` takes a sequence operand",
                        self.op.wire_key()
                    )));
                };

                // An empty IN list can never match; an empty NOT IN excludes
                // nothing.
                if values.is_empty() {
                    let fragment = if self.op == Op::NotIn { "1 = 1" } else { "1 = 0" };
                    fmt!(cx, f, fragment);
                    return Ok(());
                }

                let kw = if self.op == Op::NotIn {
                    " NOT IN ("
                } else {
                    " IN ("
                };
                fmt!(cx, f, Ident(&column.name), kw);

                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.dst.push_str(", ");
                    }
                    let placeholder = f.params.push(value);
                    placeholder.to_sql(cx, f)?;
                }

                fmt!(cx, f, ")");
            }
            Op::Custom(name) => {
                let custom = cx.map.custom_op(name).ok_or_else(|| {
                    Error::validation(format!(
                        "unknown operator `{}` on record type `{}`",
                        name,
                        cx.map.record()
                    ))
                })?;

                if let Some(arity) = custom.arity {
                    if self.operand.as_slice().len() != arity {
                        return Err(Error::validation(format!(
                            "operator `{}` takes {} operand values, got {}",
                            name,
                            arity,
                            self.operand.as_slice().len()
                        )));
                    }
                }

                let ident = f.serializer.dialect.quote_ident(&column.name);
                let placeholders: Vec<String> = self
                    .operand
                    .as_slice()
                    .iter()
                    .map(|value| {
                        let placeholder = f.params.push(value);
                        f.serializer.dialect.placeholder(placeholder.0)
                    })
                    .collect();

                let fragment = (custom.render)(&ident, &placeholders);
                f.dst.push_str(&fragment);
            }
            op => {
                let Operand::One(value) = &self.operand else {
                    return Err(Error::validation(format!(
                        "operator `{}` takes a single operand",
                        op.wire_key()
                    )));
                };

                fmt!(cx, f, Ident(&column.name), scalar_op_sql(op));

                let placeholder = f.params.push(value);
                placeholder.to_sql(cx, f)?;
            }
        }

        Ok(())
    }
}

fn scalar_op_sql(op: Op) -> &'static str {
    match op {
        Op::Eq => " = ",
        Op::Ne => " <> ",
        Op::Gt => " > ",
        Op::Ge => " >= ",
        Op::Lt => " < ",
        Op::Le => " <= ",
        Op::Like => " LIKE ",
        Op::NotLike => " NOT LIKE ",
        Op::ILike => " ILIKE ",
        Op::NotILike => " NOT ILIKE ",
        Op::In | Op::NotIn | Op::Custom(_) => unreachable!("op={op:?}"),
    }
}

impl ToSql for &FilterRelation {
    fn to_sql<P: Params>(self, cx: &ExprContext<'_>, f: &mut Formatter<'_, P>) -> Result<()> {
        let relation = cx.map.relation(&self.relation).ok_or_else(|| {
            Error::validation(format!(
                "unknown relation `{}` on record type `{}`",
                self.relation,
                cx.map.record()
            ))
        })?;

        // The related type must be registered; compiling against an unknown
        // table is a schema error, not a silent no-op.
        let foreign = f.serializer.registry.field_map(&relation.foreign_table)?;

        if foreign.column(&relation.foreign_column).is_none() {
            return Err(Error::schema(format!(
                "relation `{}` references unknown column `{}` on table `{}`",
                self.relation,
                relation.foreign_column,
                relation.foreign_table
            )));
        }

        fmt!(
            cx,
            f,
            Ident(&relation.local_column),
            " IN (SELECT ",
            Ident(&relation.foreign_column),
            " FROM ",
            Ident(foreign.table()),
            " WHERE ",
        );

        // The nested filter compiles in the related table's scope.
        let cx = ExprContext {
            map: foreign.as_ref(),
        };
        (&*self.nested).to_sql(&cx, f)?;

        fmt!(&cx, f, ")");
        Ok(())
    }
}
