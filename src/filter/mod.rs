//! Filter tree model and builder.
//!
//! Trees are plain values: build them with the functions in [`builder`] or
//! import them from XML/JSON, then hand them to the serializers.

mod ast;
pub mod builder;

pub use ast::*;
