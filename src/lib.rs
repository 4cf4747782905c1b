//! Build, serialize and parse OGC Filter Encoding (FES) expressions.
//!
//! A filter is a [`FilterNode`] tree: `And`/`Or` combinators, binary
//! conditions and function calls over typed operands. Trees are written to
//! and read from the OGC XML dialect ([`xml`]) and a JSON form that mirrors
//! the tree ([`json`]). [`Fes`] wraps both around a single current filter.
//!
//! ```
//! use fes::filter::builder::{and, condition, literal};
//! use fes::{Fes, Operator};
//!
//! let mut fes = Fes::new();
//! fes.set_filter(and(vec![condition(literal("field"), Operator::Equal, literal(5))]));
//! assert!(fes.to_xml().contains("<ogc:PropertyIsEqualTo>"));
//! ```

pub mod config;
pub mod error;
pub mod facade;
pub mod filter;
pub mod geometry;
pub mod json;
pub mod xml;

pub use config::{FesOptions, ParseMode};
pub use error::{FesError, Result};
pub use facade::Fes;
pub use filter::{
    Combinator, CombinatorKind, Condition, FilterNode, FunctionCall, Operand, Operator, ValueType,
};
