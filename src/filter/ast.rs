//! Filter tree types.
//!
//! The serde attributes here define the public JSON shape:
//!
//!   {"And": [...]}, {"Or": [...]}
//!   {"operator": "PropertyIsEqualTo", "operands": [{"type", "value"}, {"type", "value"}]}
//!   {"function": {"name": "...", "parameters": [...]}}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{FesError, Result};

/// Any position in the tree that is not an operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    Combinator(Combinator),
    Condition(Condition),
    Function { function: FunctionCall },
}

/// Boolean grouping of sub-filters. Child order is preserved everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CombinatorRepr", into = "CombinatorRepr")]
pub struct Combinator {
    pub kind: CombinatorKind,
    pub children: Vec<FilterNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinatorKind {
    And,
    Or,
}

#[derive(Serialize, Deserialize)]
enum CombinatorRepr {
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
}

impl From<CombinatorRepr> for Combinator {
    fn from(repr: CombinatorRepr) -> Self {
        match repr {
            CombinatorRepr::And(children) => Combinator {
                kind: CombinatorKind::And,
                children,
            },
            CombinatorRepr::Or(children) => Combinator {
                kind: CombinatorKind::Or,
                children,
            },
        }
    }
}

impl From<Combinator> for CombinatorRepr {
    fn from(combinator: Combinator) -> Self {
        match combinator.kind {
            CombinatorKind::And => CombinatorRepr::And(combinator.children),
            CombinatorKind::Or => CombinatorRepr::Or(combinator.children),
        }
    }
}

/// Binary comparison or spatial predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub operator: Operator,
    pub operands: [Operand; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub parameters: Vec<Operand>,
}

/// Typed value attached to a condition or function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Operand {
    Literal(Value),
    PropertyName(Value),
    Function { function: FunctionCall },
}

/// Comparison operator. The names double as FES element names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "PropertyIsLessThan")]
    LessThan,
    #[serde(rename = "PropertyIsLessThanOrEqualTo")]
    LessThanOrEqual,
    #[serde(rename = "PropertyIsGreaterThan")]
    GreaterThan,
    #[serde(rename = "PropertyIsGreaterThanOrEqualTo")]
    GreaterThanOrEqual,
    #[serde(rename = "PropertyIsEqualTo")]
    Equal,
    #[serde(rename = "PropertyIsNotEqualTo")]
    NotEqual,
    Intersects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    Literal,
    Function,
    PropertyName,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::Equal,
        Operator::NotEqual,
        Operator::Intersects,
    ];

    /// Element name on the wire.
    pub fn tag(self) -> &'static str {
        match self {
            Operator::LessThan => "PropertyIsLessThan",
            Operator::LessThanOrEqual => "PropertyIsLessThanOrEqualTo",
            Operator::GreaterThan => "PropertyIsGreaterThan",
            Operator::GreaterThanOrEqual => "PropertyIsGreaterThanOrEqualTo",
            Operator::Equal => "PropertyIsEqualTo",
            Operator::NotEqual => "PropertyIsNotEqualTo",
            Operator::Intersects => "Intersects",
        }
    }

    pub fn is_spatial(self) -> bool {
        matches!(self, Operator::Intersects)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Operator {
    type Err = FesError;

    fn from_str(value: &str) -> Result<Self> {
        Operator::ALL
            .into_iter()
            .find(|op| op.tag() == value)
            .ok_or_else(|| FesError::UnknownOperator(value.to_string()))
    }
}

impl ValueType {
    pub fn tag(self) -> &'static str {
        match self {
            ValueType::Literal => "Literal",
            ValueType::Function => "Function",
            ValueType::PropertyName => "PropertyName",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ValueType {
    type Err = FesError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "Literal" => Ok(ValueType::Literal),
            "Function" => Ok(ValueType::Function),
            "PropertyName" => Ok(ValueType::PropertyName),
            other => Err(FesError::UnknownValueType(other.to_string())),
        }
    }
}

impl fmt::Display for CombinatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombinatorKind::And => write!(f, "And"),
            CombinatorKind::Or => write!(f, "Or"),
        }
    }
}

impl Operand {
    pub fn value_type(&self) -> ValueType {
        match self {
            Operand::Literal(_) => ValueType::Literal,
            Operand::PropertyName(_) => ValueType::PropertyName,
            Operand::Function { .. } => ValueType::Function,
        }
    }

    fn depth(&self) -> usize {
        match self {
            Operand::Function { function } => function.depth(),
            _ => 1,
        }
    }
}

impl FunctionCall {
    fn depth(&self) -> usize {
        1 + self.parameters.iter().map(Operand::depth).max().unwrap_or(0)
    }
}

impl FilterNode {
    /// Nesting depth, counting every element the node serializes to below `Filter`.
    pub fn depth(&self) -> usize {
        match self {
            FilterNode::Combinator(c) => {
                1 + c.children.iter().map(FilterNode::depth).max().unwrap_or(0)
            }
            FilterNode::Condition(c) => {
                1 + c.operands.iter().map(Operand::depth).max().unwrap_or(0)
            }
            FilterNode::Function { function } => function.depth(),
        }
    }

    /// Check the invariants the types cannot express on their own.
    pub fn validate(&self, max_depth: usize) -> Result<()> {
        if self.depth() > max_depth {
            return Err(FesError::DepthExceeded(max_depth));
        }
        self.check_combinators()
    }

    fn check_combinators(&self) -> Result<()> {
        if let FilterNode::Combinator(c) = self {
            if c.children.is_empty() {
                return Err(FesError::EmptyCombinator(c.kind.to_string()));
            }
            for child in &c.children {
                child.check_combinators()?;
            }
        }
        Ok(())
    }
}
