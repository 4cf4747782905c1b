//! Stateful façade holding one "current filter".
//!
//! Imports replace the filter wholesale; exports only read it. In lenient mode
//! a failed import is logged and leaves the current filter as it was.

use crate::config::{FesOptions, ParseMode};
use crate::error::Result;
use crate::filter::FilterNode;
use crate::{json, xml};

#[derive(Debug, Clone, Default)]
pub struct Fes {
    filter: Option<FilterNode>,
    options: FesOptions,
}

impl Fes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FesOptions) -> Self {
        Self {
            filter: None,
            options,
        }
    }

    pub fn options(&self) -> &FesOptions {
        &self.options
    }

    pub fn filter(&self) -> Option<&FilterNode> {
        self.filter.as_ref()
    }

    /// Replace the current filter, returning the previous one.
    pub fn set_filter(&mut self, filter: FilterNode) -> Option<FilterNode> {
        self.filter.replace(filter)
    }

    pub fn clear(&mut self) -> Option<FilterNode> {
        self.filter.take()
    }

    pub fn to_xml(&self) -> String {
        xml::write_filter(self.filter.as_ref(), &self.options)
    }

    pub fn to_json(&self) -> Result<String> {
        json::to_json(self.filter.as_ref())
    }

    pub fn from_xml(&mut self, text: &str) -> Result<()> {
        let parsed = xml::parse(text, &self.options).map(Some);
        self.import("XML", parsed)
    }

    pub fn from_json(&mut self, text: &str) -> Result<()> {
        let parsed = json::from_json(text, &self.options);
        self.import("JSON", parsed)
    }

    fn import(&mut self, format: &str, parsed: Result<Option<FilterNode>>) -> Result<()> {
        match parsed {
            Ok(filter) => {
                tracing::debug!(
                    "Import: {} filter replaced (depth {})",
                    format,
                    filter.as_ref().map_or(0, FilterNode::depth)
                );
                self.filter = filter;
                Ok(())
            }
            Err(e) if self.options.parse_mode == ParseMode::Lenient => {
                tracing::warn!("Import: ignoring invalid {} filter: {}", format, e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
