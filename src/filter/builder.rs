//! Pure constructors for filter trees.
//!
//! None of these touch façade state. Combinator arity is checked later by
//! [`FilterNode::validate`], not here.

use serde_json::Value;

use super::ast::{
    Combinator, CombinatorKind, Condition, FilterNode, FunctionCall, Operand, Operator, ValueType,
};
use crate::error::{FesError, Result};

pub fn condition(operand1: Operand, operator: Operator, operand2: Operand) -> FilterNode {
    FilterNode::Condition(Condition {
        operator,
        operands: [operand1, operand2],
    })
}

/// Build an operand from a raw JSON value.
///
/// A `Function` operand needs `raw` in the `{"function": {...}}` shape that
/// [`function`] produces.
pub fn value(value_type: ValueType, raw: impl Into<Value>) -> Result<Operand> {
    let raw = raw.into();
    match value_type {
        ValueType::Literal => Ok(Operand::Literal(raw)),
        ValueType::PropertyName => Ok(Operand::PropertyName(raw)),
        ValueType::Function => match serde_json::from_value::<FilterNode>(raw) {
            Ok(FilterNode::Function { function }) => Ok(Operand::Function { function }),
            _ => Err(FesError::InvalidOperand(
                "Function operand requires a function value".into(),
            )),
        },
    }
}

pub fn literal(raw: impl Into<Value>) -> Operand {
    Operand::Literal(raw.into())
}

pub fn property(name: impl Into<Value>) -> Operand {
    Operand::PropertyName(name.into())
}

/// Wrap a function call so it can sit in operand position.
pub fn function_operand(name: impl Into<String>, parameters: Vec<Operand>) -> Operand {
    Operand::Function {
        function: FunctionCall {
            name: name.into(),
            parameters,
        },
    }
}

/// GeoJSON geometry as a literal, for `Intersects` conditions.
pub fn geometry(geometry: &geojson::Geometry) -> Operand {
    Operand::Literal(Value::Object(geojson::JsonObject::from(geometry)))
}

pub fn and(nodes: Vec<FilterNode>) -> FilterNode {
    FilterNode::Combinator(Combinator {
        kind: CombinatorKind::And,
        children: nodes,
    })
}

pub fn or(nodes: Vec<FilterNode>) -> FilterNode {
    FilterNode::Combinator(Combinator {
        kind: CombinatorKind::Or,
        children: nodes,
    })
}

pub fn function(name: impl Into<String>, parameters: Vec<Operand>) -> FilterNode {
    FilterNode::Function {
        function: FunctionCall {
            name: name.into(),
            parameters,
        },
    }
}
