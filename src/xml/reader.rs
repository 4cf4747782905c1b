//! OGC XML to filter tree.
//!
//! Two passes: quick-xml events are collected into a small element tree
//! (iteratively, so deep documents cannot blow the stack), then the single
//! child of `Filter` is interpreted by recursive descent on local names.

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use serde_json::Value;
use std::collections::HashMap;

use super::{FES_NAMESPACE, OGC_NAMESPACE};
use crate::config::FesOptions;
use crate::error::{FesError, Result};
use crate::filter::{
    Combinator, CombinatorKind, Condition, FilterNode, FunctionCall, Operand, Operator, ValueType,
};
use crate::geometry::GML_NAMESPACE;

/// Elements allowed above `Filter`, e.g. a WFS `GetFeature/Query` wrapper.
const DOCUMENT_SLACK: usize = 16;

#[derive(Debug, Default)]
struct XmlElement {
    namespace: Option<String>,
    name: String,
    attributes: HashMap<String, String>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    fn from_start(namespace: Option<String>, start: &BytesStart) -> Result<Self> {
        let mut attributes = HashMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
            attributes.insert(key, value.into_owned());
        }
        Ok(XmlElement {
            namespace,
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            ..XmlElement::default()
        })
    }

    fn find_all<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlElement>) {
        if self.name == name {
            found.push(self);
        }
        for child in &self.children {
            child.find_all(name, found);
        }
    }
}

fn resolve_namespace(resolved: ResolveResult) -> Option<String> {
    match resolved {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    }
}

/// Read the whole document into an element tree and return its root.
fn read_document(xml: &str, max_depth: usize) -> Result<XmlElement> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        let namespace = resolve_namespace(resolved);
        match event {
            Event::Start(start) => {
                if stack.len() >= max_depth.saturating_add(DOCUMENT_SLACK) {
                    return Err(FesError::DepthExceeded(max_depth));
                }
                stack.push(XmlElement::from_start(namespace, &start)?);
            }
            Event::Empty(start) => {
                let element = XmlElement::from_start(namespace, &start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| FesError::Malformed("unexpected closing tag".into()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&text.unescape().map_err(quick_xml::Error::from)?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(FesError::Malformed(format!("unclosed element {}", open.name)));
    }
    root.ok_or_else(|| FesError::Malformed("document has no root element".into()))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(FesError::Malformed("multiple root elements".into())),
    }
    Ok(())
}

/// Parse an OGC filter document.
pub fn parse(xml: &str, options: &FesOptions) -> Result<FilterNode> {
    let document = read_document(xml, options.max_depth)?;

    let mut filters = Vec::new();
    document.find_all("Filter", &mut filters);
    let [filter] = filters.as_slice() else {
        return Err(FesError::MissingFilter(filters.len()));
    };
    let [child] = filter.children.as_slice() else {
        return Err(FesError::FilterChildCount(filter.children.len()));
    };

    let interpreter = Interpreter {
        max_depth: options.max_depth,
    };
    interpreter.node(child, 1)
}

struct Interpreter {
    max_depth: usize,
}

impl Interpreter {
    fn enter(&self, element: &XmlElement, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(FesError::DepthExceeded(self.max_depth));
        }
        match element.namespace.as_deref() {
            None | Some(OGC_NAMESPACE) | Some(FES_NAMESPACE) => Ok(()),
            Some(other) => Err(FesError::Namespace {
                element: element.name.clone(),
                namespace: other.to_string(),
            }),
        }
    }

    fn node(&self, element: &XmlElement, depth: usize) -> Result<FilterNode> {
        self.enter(element, depth)?;
        let kind = match element.name.as_str() {
            "And" => CombinatorKind::And,
            "Or" => CombinatorKind::Or,
            "Function" => {
                return Ok(FilterNode::Function {
                    function: self.function(element, depth)?,
                });
            }
            _ => return self.condition(element, depth).map(FilterNode::Condition),
        };

        if element.children.is_empty() {
            return Err(FesError::EmptyCombinator(kind.to_string()));
        }
        let children = element
            .children
            .iter()
            .map(|child| self.node(child, depth + 1))
            .collect::<Result<Vec<_>>>()?;
        Ok(FilterNode::Combinator(Combinator { kind, children }))
    }

    fn condition(&self, element: &XmlElement, depth: usize) -> Result<Condition> {
        let operator: Operator = element.name.parse()?;
        let [first, second] = element.children.as_slice() else {
            return Err(FesError::OperandCount {
                operator: element.name.clone(),
                found: element.children.len(),
            });
        };

        let operands = if operator.is_spatial() {
            [
                self.spatial_operand(first, depth + 1)?,
                self.spatial_operand(second, depth + 1)?,
            ]
        } else {
            [
                self.operand(first, depth + 1)?,
                self.operand(second, depth + 1)?,
            ]
        };
        Ok(Condition { operator, operands })
    }

    /// GML geometry carries no recoverable payload and reads back as null.
    fn spatial_operand(&self, element: &XmlElement, depth: usize) -> Result<Operand> {
        if element.namespace.as_deref() == Some(GML_NAMESPACE) {
            tracing::debug!("Geometry: {} element read back as null", element.name);
            return Ok(Operand::Literal(Value::Null));
        }
        self.operand(element, depth)
    }

    fn operand(&self, element: &XmlElement, depth: usize) -> Result<Operand> {
        self.enter(element, depth)?;
        match element.name.parse::<ValueType>()? {
            ValueType::Function => Ok(Operand::Function {
                function: self.function(element, depth)?,
            }),
            ValueType::Literal => Ok(Operand::Literal(parse_literal(&element.text))),
            ValueType::PropertyName => Ok(Operand::PropertyName(parse_literal(&element.text))),
        }
    }

    fn function(&self, element: &XmlElement, depth: usize) -> Result<FunctionCall> {
        let name = element
            .attributes
            .get("name")
            .ok_or(FesError::MissingFunctionName)?
            .clone();
        let parameters = element
            .children
            .iter()
            .map(|child| self.operand(child, depth + 1))
            .collect::<Result<Vec<_>>>()?;
        Ok(FunctionCall { name, parameters })
    }
}

/// Interpret element text as a value.
///
/// `true`/`false` become booleans, anything JSON can read (numbers, quoted
/// strings, arrays, objects, null) is used as parsed, the rest stays a
/// trimmed string.
pub fn parse_literal(raw: &str) -> Value {
    let trimmed = raw.trim();
    match trimmed {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "" => Value::String(String::new()),
        _ => serde_json::from_str(trimmed)
            .unwrap_or_else(|_| Value::String(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const OGC_OPEN: &str = r#"<ogc:Filter xmlns:ogc="http://www.opengis.net/ogc">"#;

    fn parse_default(xml: &str) -> Result<FilterNode> {
        parse(xml, &FesOptions::default())
    }

    #[test]
    fn literal_parsing() {
        assert_eq!(parse_literal("42"), json!(42));
        assert_eq!(parse_literal(" true "), json!(true));
        assert_eq!(parse_literal("false"), json!(false));
        assert_eq!(parse_literal("\"foo\""), json!("foo"));
        assert_eq!(parse_literal("abc"), json!("abc"));
        assert_eq!(parse_literal("  main st "), json!("main st"));
        assert_eq!(parse_literal("[1,2]"), json!([1, 2]));
        assert_eq!(parse_literal(""), json!(""));
    }

    #[test]
    fn parses_condition_inside_combinator() {
        let xml = format!(
            "{OGC_OPEN}<ogc:Or><ogc:PropertyIsGreaterThan>\
             <ogc:PropertyName>lanes</ogc:PropertyName><ogc:Literal>2</ogc:Literal>\
             </ogc:PropertyIsGreaterThan></ogc:Or></ogc:Filter>"
        );
        let node = parse_default(&xml).unwrap();
        assert_eq!(
            node,
            FilterNode::Combinator(Combinator {
                kind: CombinatorKind::Or,
                children: vec![FilterNode::Condition(Condition {
                    operator: Operator::GreaterThan,
                    operands: [
                        Operand::PropertyName(json!("lanes")),
                        Operand::Literal(json!(2)),
                    ],
                })],
            })
        );
    }

    #[test]
    fn whitespace_between_elements_is_ignored() {
        let xml = format!(
            "{OGC_OPEN}\n  <ogc:PropertyIsEqualTo>\n    \
             <ogc:PropertyName>name</ogc:PropertyName>\n    \
             <ogc:Literal>Main</ogc:Literal>\n  </ogc:PropertyIsEqualTo>\n</ogc:Filter>"
        );
        assert!(matches!(
            parse_default(&xml).unwrap(),
            FilterNode::Condition(Condition {
                operator: Operator::Equal,
                ..
            })
        ));
    }

    #[test]
    fn filter_nested_in_wrapper_is_found() {
        let xml = format!(
            r#"<wfs:Query xmlns:wfs="http://www.opengis.net/wfs">{OGC_OPEN}<ogc:PropertyIsLessThan><ogc:PropertyName>a</ogc:PropertyName><ogc:Literal>1</ogc:Literal></ogc:PropertyIsLessThan></ogc:Filter></wfs:Query>"#
        );
        assert!(parse_default(&xml).is_ok());
    }

    #[test]
    fn function_parameters_keep_order_and_nesting() {
        let xml = format!(
            r#"{OGC_OPEN}<ogc:Function name="distance"><ogc:PropertyName>geom</ogc:PropertyName><ogc:Function name="abs"><ogc:Literal>-10</ogc:Literal></ogc:Function></ogc:Function></ogc:Filter>"#
        );
        let FilterNode::Function { function } = parse_default(&xml).unwrap() else {
            panic!("expected function");
        };
        assert_eq!(function.name, "distance");
        assert_eq!(function.parameters[0], Operand::PropertyName(json!("geom")));
        assert_eq!(
            function.parameters[1],
            Operand::Function {
                function: FunctionCall {
                    name: "abs".into(),
                    parameters: vec![Operand::Literal(json!(-10))],
                }
            }
        );
    }

    #[test]
    fn filter_child_count_must_be_one() {
        let empty = format!("{OGC_OPEN}</ogc:Filter>");
        assert!(matches!(
            parse_default(&empty),
            Err(FesError::FilterChildCount(0))
        ));

        let cond = "<ogc:PropertyIsEqualTo><ogc:Literal>a</ogc:Literal>\
                    <ogc:Literal>b</ogc:Literal></ogc:PropertyIsEqualTo>";
        let two = format!("{OGC_OPEN}{cond}{cond}</ogc:Filter>");
        assert!(matches!(
            parse_default(&two),
            Err(FesError::FilterChildCount(2))
        ));
    }

    #[test]
    fn missing_filter_is_reported() {
        assert!(matches!(
            parse_default("<Query/>"),
            Err(FesError::MissingFilter(0))
        ));
    }

    #[test]
    fn condition_with_one_operand_is_rejected() {
        let xml = format!(
            "{OGC_OPEN}<ogc:PropertyIsEqualTo><ogc:Literal>a</ogc:Literal>\
             </ogc:PropertyIsEqualTo></ogc:Filter>"
        );
        assert!(matches!(
            parse_default(&xml),
            Err(FesError::OperandCount { found: 1, .. })
        ));
    }

    #[test]
    fn unknown_tags_are_rejected() {
        let op = format!(
            "{OGC_OPEN}<ogc:PropertyIsLike><ogc:Literal>a</ogc:Literal>\
             <ogc:Literal>b</ogc:Literal></ogc:PropertyIsLike></ogc:Filter>"
        );
        assert!(matches!(
            parse_default(&op),
            Err(FesError::UnknownOperator(name)) if name == "PropertyIsLike"
        ));

        let ty = format!(
            "{OGC_OPEN}<ogc:PropertyIsEqualTo><ogc:Value>a</ogc:Value>\
             <ogc:Literal>b</ogc:Literal></ogc:PropertyIsEqualTo></ogc:Filter>"
        );
        assert!(matches!(
            parse_default(&ty),
            Err(FesError::UnknownValueType(name)) if name == "Value"
        ));
    }

    #[test]
    fn foreign_namespace_is_rejected() {
        let xml = r#"<ogc:Filter xmlns:ogc="http://www.opengis.net/ogc" xmlns:x="urn:x"><x:PropertyIsEqualTo><ogc:Literal>a</ogc:Literal><ogc:Literal>b</ogc:Literal></x:PropertyIsEqualTo></ogc:Filter>"#;
        assert!(matches!(
            parse_default(xml),
            Err(FesError::Namespace { .. })
        ));
    }

    #[test]
    fn function_without_name_is_rejected() {
        let xml = format!(
            "{OGC_OPEN}<ogc:Function><ogc:Literal>1</ogc:Literal></ogc:Function></ogc:Filter>"
        );
        assert!(matches!(
            parse_default(&xml),
            Err(FesError::MissingFunctionName)
        ));
    }

    #[test]
    fn gml_operands_read_back_as_null() {
        let xml = format!(
            r#"{OGC_OPEN}<ogc:Intersects><ogc:PropertyName>geom</ogc:PropertyName><gml:Polygon xmlns:gml="http://www.opengis.net/gml"></gml:Polygon></ogc:Intersects></ogc:Filter>"#
        );
        let FilterNode::Condition(condition) = parse_default(&xml).unwrap() else {
            panic!("expected condition");
        };
        assert_eq!(condition.operator, Operator::Intersects);
        assert_eq!(condition.operands[0], Operand::PropertyName(json!("geom")));
        assert_eq!(condition.operands[1], Operand::Literal(Value::Null));
    }

    #[test]
    fn depth_cap_applies() {
        let mut xml = OGC_OPEN.to_string();
        for _ in 0..10 {
            xml.push_str("<ogc:And>");
        }
        xml.push_str(
            "<ogc:PropertyIsEqualTo><ogc:Literal>a</ogc:Literal>\
             <ogc:Literal>b</ogc:Literal></ogc:PropertyIsEqualTo>",
        );
        for _ in 0..10 {
            xml.push_str("</ogc:And>");
        }
        xml.push_str("</ogc:Filter>");

        let options = FesOptions {
            max_depth: 5,
            ..FesOptions::default()
        };
        assert!(matches!(
            parse(&xml, &options),
            Err(FesError::DepthExceeded(5))
        ));
        assert!(parse_default(&xml).is_ok());
    }

    #[test]
    fn unbounded_depth_setting_parses() {
        let xml = format!(
            "{OGC_OPEN}<ogc:PropertyIsEqualTo><ogc:Literal>a</ogc:Literal>\
             <ogc:Literal>b</ogc:Literal></ogc:PropertyIsEqualTo></ogc:Filter>"
        );
        let options = FesOptions {
            max_depth: usize::MAX,
            ..FesOptions::default()
        };
        assert!(parse(&xml, &options).is_ok());
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let xml = format!("{OGC_OPEN}<ogc:And></ogc:Or></ogc:Filter>");
        assert!(parse_default(&xml).is_err());
    }
}
