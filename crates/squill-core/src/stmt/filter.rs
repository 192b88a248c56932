use super::{Op, Value};

/// A boolean filter expression tree, compiled into a `WHERE` clause.
///
/// Built either programmatically through the constructors below or from a
/// wire filter value validated at the request boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// Negates the inner filter.
    Not(Box<FilterNode>),

    /// All children must match. An empty child list matches everything.
    And(Vec<FilterNode>),

    /// Any child must match. An empty child list matches everything.
    Or(Vec<FilterNode>),

    /// A single column condition.
    Leaf(FilterLeaf),

    /// A condition on a related table, compiled to a correlated subquery.
    Relation(FilterRelation),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterLeaf {
    pub column: String,
    pub op: Op,
    pub operand: Operand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterRelation {
    pub relation: String,
    pub nested: Box<FilterNode>,
}

/// A leaf operand: one value for comparison operators, a sequence for
/// membership operators.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    One(Value),
    Many(Vec<Value>),
}

impl FilterNode {
    pub fn not(inner: FilterNode) -> FilterNode {
        FilterNode::Not(Box::new(inner))
    }

    pub fn and(children: impl IntoIterator<Item = FilterNode>) -> FilterNode {
        FilterNode::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = FilterNode>) -> FilterNode {
        FilterNode::Or(children.into_iter().collect())
    }

    pub fn leaf(column: impl Into<String>, op: Op, operand: Operand) -> FilterNode {
        FilterNode::Leaf(FilterLeaf {
            column: column.into(),
            op,
            operand,
        })
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> FilterNode {
        Self::leaf(column, Op::Eq, Operand::One(value.into()))
    }

    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> FilterNode {
        Self::leaf(column, Op::Ne, Operand::One(value.into()))
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> FilterNode {
        Self::leaf(column, Op::Gt, Operand::One(value.into()))
    }

    pub fn ge(column: impl Into<String>, value: impl Into<Value>) -> FilterNode {
        Self::leaf(column, Op::Ge, Operand::One(value.into()))
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> FilterNode {
        Self::leaf(column, Op::Lt, Operand::One(value.into()))
    }

    pub fn le(column: impl Into<String>, value: impl Into<Value>) -> FilterNode {
        Self::leaf(column, Op::Le, Operand::One(value.into()))
    }

    pub fn like(column: impl Into<String>, pattern: impl Into<Value>) -> FilterNode {
        Self::leaf(column, Op::Like, Operand::One(pattern.into()))
    }

    pub fn is_in(
        column: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> FilterNode {
        Self::leaf(
            column,
            Op::In,
            Operand::Many(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn not_in(
        column: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> FilterNode {
        Self::leaf(
            column,
            Op::NotIn,
            Operand::Many(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn relation(name: impl Into<String>, nested: FilterNode) -> FilterNode {
        FilterNode::Relation(FilterRelation {
            relation: name.into(),
            nested: Box::new(nested),
        })
    }
}

impl Operand {
    pub fn as_slice(&self) -> &[Value] {
        match self {
            Operand::One(value) => std::slice::from_ref(value),
            Operand::Many(values) => values,
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Operand::Many(_))
    }
}
