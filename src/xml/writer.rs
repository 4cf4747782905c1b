//! Filter tree to OGC XML.

use quick_xml::escape::escape;
use serde_json::Value;
use std::borrow::Cow;

use super::OGC_NAMESPACE;
use super::reader::parse_literal;
use crate::config::FesOptions;
use crate::filter::{Combinator, Condition, FilterNode, FunctionCall, Operand};
use crate::geometry;

/// Serialize a filter, wrapped in `<ogc:Filter>`. `None` gives an empty filter.
pub fn write_filter(node: Option<&FilterNode>, options: &FesOptions) -> String {
    let mut writer = XmlWriter {
        out: String::new(),
        escape_text: options.escape_text,
    };
    writer.open("Filter", Some(("xmlns:ogc", OGC_NAMESPACE)));
    if let Some(node) = node {
        writer.node(node);
    }
    writer.close("Filter");
    writer.out
}

pub fn to_xml(node: &FilterNode, options: &FesOptions) -> String {
    write_filter(Some(node), options)
}

struct XmlWriter {
    out: String,
    escape_text: bool,
}

impl XmlWriter {
    fn open(&mut self, tag: &str, attribute: Option<(&str, &str)>) {
        self.out.push_str("<ogc:");
        self.out.push_str(tag);
        if let Some((key, value)) = attribute {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            let value = self.escaped(value);
            self.out.push_str(&value);
            self.out.push('"');
        }
        self.out.push('>');
    }

    fn close(&mut self, tag: &str) {
        self.out.push_str("</ogc:");
        self.out.push_str(tag);
        self.out.push('>');
    }

    fn escaped<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.escape_text {
            escape(text)
        } else {
            Cow::Borrowed(text)
        }
    }

    fn node(&mut self, node: &FilterNode) {
        match node {
            FilterNode::Combinator(combinator) => self.combinator(combinator),
            FilterNode::Condition(condition) => self.condition(condition),
            FilterNode::Function { function } => self.function(function),
        }
    }

    fn combinator(&mut self, combinator: &Combinator) {
        let tag = combinator.kind.to_string();
        self.open(&tag, None);
        for child in &combinator.children {
            self.node(child);
        }
        self.close(&tag);
    }

    fn condition(&mut self, condition: &Condition) {
        let tag = condition.operator.tag();
        self.open(tag, None);
        for operand in &condition.operands {
            if condition.operator.is_spatial() {
                let gml = match operand {
                    Operand::Literal(v) | Operand::PropertyName(v) => geometry::to_gml(v),
                    Operand::Function { .. } => geometry::GML_PLACEHOLDER,
                };
                self.out.push_str(gml);
            } else {
                self.operand(operand);
            }
        }
        self.close(tag);
    }

    fn function(&mut self, function: &FunctionCall) {
        self.open("Function", Some(("name", &function.name)));
        for parameter in &function.parameters {
            self.operand(parameter);
        }
        self.close("Function");
    }

    fn operand(&mut self, operand: &Operand) {
        match operand {
            Operand::Function { function } => self.function(function),
            Operand::Literal(value) | Operand::PropertyName(value) => {
                let tag = operand.value_type().tag();
                self.open(tag, None);
                let text = value_text(value);
                let text = self.escaped(&text);
                self.out.push_str(&text);
                self.close(tag);
            }
        }
    }
}

/// Strings go out raw unless the reader would take them for another value,
/// in which case they are JSON-quoted. Everything else is its JSON text.
fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) if matches!(parse_literal(s), Value::String(ref read) if read == s) => {
            Cow::Borrowed(s)
        }
        other => Cow::Owned(other.to_string()),
    }
}
