use thiserror::Error;

pub type Result<T> = std::result::Result<T, FesError>;

#[derive(Error, Debug)]
pub enum FesError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML: {0}")]
    Malformed(String),

    #[error("Element {element} is in unsupported namespace {namespace}")]
    Namespace { element: String, namespace: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected exactly one Filter element, found {0}")]
    MissingFilter(usize),

    #[error("Filter element must have exactly one child element, found {0}")]
    FilterChildCount(usize),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Unknown value type: {0}")]
    UnknownValueType(String),

    #[error("{operator} expects 2 operands, found {found}")]
    OperandCount { operator: String, found: usize },

    #[error("Function element has no name attribute")]
    MissingFunctionName,

    #[error("{0} combinator has no children")]
    EmptyCombinator(String),

    #[error("Filter nesting exceeds maximum depth of {0}")]
    DepthExceeded(usize),

    #[error("Invalid operand: {0}")]
    InvalidOperand(String),

    #[error("Config error: {0}")]
    Config(#[from] ::config::ConfigError),
}
