use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::Result;

/// Default cap on filter nesting depth for imports.
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FesOptions {
    pub parse_mode: ParseMode,
    /// Escape `<`, `&` and friends in serialized text and attribute values.
    pub escape_text: bool,
    pub max_depth: usize,
}

impl FesOptions {
    pub fn load(path: &Path) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn lenient() -> Self {
        Self {
            parse_mode: ParseMode::Lenient,
            ..Self::default()
        }
    }
}

impl Default for FesOptions {
    fn default() -> Self {
        Self {
            parse_mode: ParseMode::Strict,
            escape_text: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// How imports react to malformed input.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Return an error and leave the current filter untouched.
    #[default]
    Strict,
    /// Log the failure and leave the current filter untouched.
    Lenient,
}

impl FromStr for ParseMode {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "strict" => Ok(ParseMode::Strict),
            "lenient" => Ok(ParseMode::Lenient),
            _ => Err(format!("invalid parse_mode: {value}")),
        }
    }
}
