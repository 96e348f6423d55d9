//! Class usage collected from a document's block tree.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ParseError;

/// One block of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Block {
    #[serde(rename = "blockName", default)]
    pub block_name: Option<String>,
    #[serde(default)]
    pub attrs: Map<String, Value>,
    #[serde(rename = "innerBlocks", default)]
    pub inner_blocks: Vec<Block>,
}

impl Block {
    /// Decodes a list of blocks from JSON.
    pub fn list_from_value(value: Value) -> Result<Vec<Block>, ParseError> {
        serde_json::from_value(value).map_err(|e| ParseError::new("blocks", e))
    }
}

/// Collects the classes a document's blocks reference through one attribute.
#[derive(Debug, Clone)]
pub struct UsageTracker {
    attribute: String,
}

impl UsageTracker {
    /// `attribute` names the block attribute that holds class lists.
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }

    /// Walks the whole tree depth-first and returns each class once, in
    /// first-seen order.
    ///
    /// The attribute may be an array of names or a space-separated string.
    pub fn collect(&self, blocks: &[Block]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut used = Vec::new();
        self.visit(blocks, &mut seen, &mut used);
        used
    }

    fn visit(&self, blocks: &[Block], seen: &mut HashSet<String>, used: &mut Vec<String>) {
        for block in blocks {
            if let Some(value) = block.attrs.get(&self.attribute) {
                for class in class_list(value) {
                    if seen.insert(class.clone()) {
                        used.push(class);
                    }
                }
            }
            self.visit(&block.inner_blocks, seen, used);
        }
    }
}

fn class_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(str::split_whitespace)
            .map(str::to_string)
            .collect(),
        Value::String(names) => names.split_whitespace().map(str::to_string).collect(),
        _ => Vec::new(),
    }
}
