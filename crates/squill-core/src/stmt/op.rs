/// A filter operator.
///
/// The standard set maps one-to-one onto the wire operator keys
/// (`_eq`, `_neq`, ...). `Custom` operators are declared per record type and
/// resolved through its [`FieldMap`].
///
/// [`FieldMap`]: crate::schema::FieldMap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    NotLike,
    ILike,
    NotILike,
    In,
    NotIn,

    /// A record-type-declared operator, identified by its wire key.
    Custom(&'static str),
}

impl Op {
    /// True for operators that take a sequence operand.
    pub fn is_membership(self) -> bool {
        matches!(self, Op::In | Op::NotIn)
    }

    /// The wire key naming this operator, used in diagnostics.
    pub fn wire_key(self) -> &'static str {
        match self {
            Op::Eq => "_eq",
            Op::Ne => "_neq",
            Op::Gt => "_gt",
            Op::Ge => "_gte",
            Op::Lt => "_lt",
            Op::Le => "_lte",
            Op::Like => "_like",
            Op::NotLike => "_nlike",
            Op::ILike => "_ilike",
            Op::NotILike => "_nilike",
            Op::In => "_in",
            Op::NotIn => "_nin",
            Op::Custom(name) => name,
        }
    }

    /// Resolves a wire operator key from the standard set.
    pub fn from_wire(key: &str) -> Option<Op> {
        Some(match key {
            "_eq" => Op::Eq,
            "_neq" => Op::Ne,
            "_gt" => Op::Gt,
            "_gte" => Op::Ge,
            "_lt" => Op::Lt,
            "_lte" => Op::Le,
            "_like" => Op::Like,
            "_nlike" => Op::NotLike,
            "_ilike" => Op::ILike,
            "_nilike" => Op::NotILike,
            "_in" => Op::In,
            "_nin" => Op::NotIn,
            _ => return None,
        })
    }
}
