//! Validation of wire filter and order values.
//!
//! Filters arrive as nested JSON mappings with the reserved keys `_not`,
//! `_and`, and `_or`, and `{column: {operator: operand}}` conditions
//! otherwise. Everything is validated here, at the request boundary: unknown
//! columns, unknown operators, and wrong operand arities are rejected as
//! validation errors before anything reaches the compiler.

use squill_core::{
    schema::{FieldMap, SchemaRegistry},
    stmt::{Direction, FilterNode, Op, Operand, OrderSpec, Value},
    Error, Result,
};

use serde_json::{Map, Value as Json};

/// Parses a wire filter against a record type's field map.
///
/// `null` and `{}` both mean "match all" and parse to `None`.
pub fn parse_filter(
    raw: &Json,
    map: &FieldMap,
    registry: &SchemaRegistry,
) -> Result<Option<FilterNode>> {
    if raw.is_null() {
        return Ok(None);
    }

    let object = as_object(raw, "filter")?;
    if object.is_empty() {
        return Ok(None);
    }

    parse_node(object, map, registry).map(Some)
}

/// Parses a wire order value: a mapping from column name to `"ASC"` or
/// `"DESC"` (case-insensitive), in significant order.
pub fn parse_order(raw: &Json, map: &FieldMap) -> Result<OrderSpec> {
    if raw.is_null() {
        return Ok(OrderSpec::new());
    }

    let object = as_object(raw, "order")?;

    let mut order = OrderSpec::new();
    for (column, direction) in object {
        if map.column(column).is_none() {
            return Err(Error::validation(format!(
                "unknown column `{}` on record type `{}`",
                column,
                map.record()
            )));
        }

        let direction = direction
            .as_str()
            .and_then(Direction::from_wire)
            .ok_or_else(|| {
                Error::validation(format!(
                    "direction for `{column}` must be \"ASC\" or \"DESC\""
                ))
            })?;

        order.insert(column.clone(), direction);
    }

    Ok(order)
}

fn parse_node(
    object: &Map<String, Json>,
    map: &FieldMap,
    registry: &SchemaRegistry,
) -> Result<FilterNode> {
    // The combinator keys are exclusive: a filter object is either one
    // combinator or a set of column conditions.
    for reserved in ["_not", "_and", "_or"] {
        if object.contains_key(reserved) && object.len() > 1 {
            return Err(Error::validation(format!(
                "`{reserved}` cannot be combined with other filter keys"
            )));
        }
    }

    if let Some(inner) = object.get("_not") {
        let inner = as_object(inner, "_not")?;
        // An empty nested filter matches everything, so its negation
        // matches nothing.
        let node = if inner.is_empty() {
            FilterNode::And(Vec::new())
        } else {
            parse_node(inner, map, registry)?
        };
        return Ok(FilterNode::not(node));
    }

    if let Some(children) = object.get("_and") {
        return parse_children(children, "_and", map, registry).map(FilterNode::And);
    }

    if let Some(children) = object.get("_or") {
        return parse_children(children, "_or", map, registry).map(FilterNode::Or);
    }

    // {column: {operator: operand}} conditions, implicitly AND-joined.
    let mut conditions = Vec::new();
    for (key, item) in object {
        if map.column(key).is_some() {
            let ops = as_object(item, key)?;
            if ops.is_empty() {
                return Err(Error::validation(format!(
                    "column `{key}` has no operator"
                )));
            }
            for (op_key, operand) in ops {
                conditions.push(parse_leaf(key, op_key, operand, map)?);
            }
        } else if let Some(relation) = map.relation(key) {
            let foreign = registry.field_map(&relation.foreign_table)?;
            let nested_object = as_object(item, key)?;
            let nested = if nested_object.is_empty() {
                FilterNode::And(Vec::new())
            } else {
                parse_node(nested_object, foreign, registry)?
            };
            conditions.push(FilterNode::relation(key.clone(), nested));
        } else {
            return Err(Error::validation(format!(
                "unknown column or relation `{}` on record type `{}`",
                key,
                map.record()
            )));
        }
    }

    if conditions.len() == 1 {
        Ok(conditions.remove(0))
    } else {
        Ok(FilterNode::And(conditions))
    }
}

fn parse_children(
    raw: &Json,
    key: &str,
    map: &FieldMap,
    registry: &SchemaRegistry,
) -> Result<Vec<FilterNode>> {
    let items = raw.as_array().ok_or_else(|| {
        Error::validation(format!("`{key}` takes an array of filters"))
    })?;

    let mut children = Vec::with_capacity(items.len());
    for item in items {
        let object = as_object(item, key)?;
        if object.is_empty() {
            // An empty entry matches everything; it still participates in
            // the combinator.
            children.push(FilterNode::And(Vec::new()));
        } else {
            children.push(parse_node(object, map, registry)?);
        }
    }

    Ok(children)
}

fn parse_leaf(column: &str, op_key: &str, operand: &Json, map: &FieldMap) -> Result<FilterNode> {
    let op = match Op::from_wire(op_key) {
        Some(op) => op,
        None => match map.custom_op(op_key) {
            Some(custom) => Op::Custom(custom.name),
            None => {
                return Err(Error::validation(format!(
                    "unknown operator `{op_key}` on column `{column}`"
                )))
            }
        },
    };

    let operand = if op.is_membership() {
        let items = operand.as_array().ok_or_else(|| {
            Error::validation(format!("operator `{op_key}` takes an array operand"))
        })?;
        Operand::Many(items.iter().map(scalar).collect::<Result<_>>()?)
    } else if matches!(op, Op::Custom(_)) {
        match operand {
            Json::Array(items) => Operand::Many(items.iter().map(scalar).collect::<Result<_>>()?),
            other => Operand::One(scalar(other)?),
        }
    } else {
        Operand::One(scalar(operand)?)
    };

    Ok(FilterNode::leaf(column, op, operand))
}

fn scalar(raw: &Json) -> Result<Value> {
    match raw {
        Json::Null => Ok(Value::Null),
        Json::Bool(v) => Ok(Value::Bool(*v)),
        Json::Number(n) => {
            if let Some(v) = n.as_i64() {
                Ok(Value::I64(v))
            } else if let Some(v) = n.as_f64() {
                Ok(Value::F64(v))
            } else {
                Err(Error::validation(format!("unrepresentable number `{n}`")))
            }
        }
        Json::String(v) => Ok(Value::String(v.clone())),
        Json::Array(_) | Json::Object(_) => Err(Error::validation(
            "operand must be a scalar value".to_string(),
        )),
    }
}

fn as_object<'a>(raw: &'a Json, what: &str) -> Result<&'a Map<String, Json>> {
    raw.as_object()
        .ok_or_else(|| Error::validation(format!("`{what}` must be an object")))
}
