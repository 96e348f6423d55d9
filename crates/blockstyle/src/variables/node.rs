//! The nested variable catalog and its flattening.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;

/// A catalog leaf: one variable and its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VariableLeaf {
    pub css: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A node of the catalog tree.
///
/// Any object with a string `css` key is a leaf, whatever else it holds.
/// Other objects are groups. Scalars and arrays carry no variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum VariableNode {
    Leaf(VariableLeaf),
    Group(BTreeMap<String, VariableNode>),
    Other(Value),
}

impl TryFrom<Value> for VariableNode {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) if map.get("css").is_some_and(Value::is_string) => {
                serde_json::from_value(Value::Object(map)).map(VariableNode::Leaf)
            }
            Value::Object(map) => map
                .into_iter()
                .map(|(key, child)| VariableNode::try_from(child).map(|node| (key, node)))
                .collect::<Result<_, Self::Error>>()
                .map(VariableNode::Group),
            other => Ok(VariableNode::Other(other)),
        }
    }
}

/// A flattened variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDefinition {
    pub name: String,
    pub css_value: String,
    pub category: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl VariableDefinition {
    /// A definition with no metadata beyond its category.
    pub fn new(
        name: impl Into<String>,
        css_value: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            css_value: css_value.into(),
            category: category.into(),
            title: None,
            description: None,
            tags: Vec::new(),
        }
    }
}

/// The base catalog, flattened to `name -> definition`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableCatalog {
    definitions: BTreeMap<String, VariableDefinition>,
}

impl VariableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and flattens a catalog document.
    pub fn from_json_str(source_name: &str, json: &str) -> Result<Self, ParseError> {
        let root: VariableNode =
            serde_json::from_str(json).map_err(|e| ParseError::new(source_name, e))?;
        Ok(Self::from_node(&root))
    }

    /// Reads, parses and flattens a catalog file.
    pub fn from_file(path: &Path) -> Result<Self, ParseError> {
        let source_name = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|e| ParseError::new(&source_name, e))?;
        Self::from_json_str(&source_name, &json)
    }

    /// Flattens an already parsed tree.
    pub fn from_node(root: &VariableNode) -> Self {
        let mut catalog = Self::new();
        let mut path = Vec::new();
        catalog.visit("", root, &mut path);
        catalog
    }

    fn visit<'a>(&mut self, key: &'a str, node: &'a VariableNode, path: &mut Vec<&'a str>) {
        match node {
            VariableNode::Leaf(leaf) => {
                // Top-level group is the taxonomy category
                let category = leaf
                    .category
                    .clone()
                    .or_else(|| path.first().map(|s| s.to_string()))
                    .unwrap_or_default();
                self.definitions.insert(
                    key.to_string(),
                    VariableDefinition {
                        name: key.to_string(),
                        css_value: leaf.css.clone(),
                        category,
                        title: leaf.title.clone(),
                        description: leaf.description.clone(),
                        tags: leaf.tags.clone(),
                    },
                );
            }
            VariableNode::Group(children) => {
                if !key.is_empty() {
                    path.push(key);
                }
                for (child_key, child) in children {
                    self.visit(child_key, child, path);
                }
                if !key.is_empty() {
                    path.pop();
                }
            }
            VariableNode::Other(_) => {}
        }
    }

    pub fn get(&self, name: &str) -> Option<&VariableDefinition> {
        self.definitions.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableDefinition> {
        self.definitions.values()
    }

    /// Definitions whose category matches.
    pub fn in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a VariableDefinition> {
        self.iter().filter(move |def| def.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r##"{
        "colors": {
            "brand": {
                "color--ink": { "css": "#111111", "title": "Ink" },
                "color--paper": { "css": "#fafafa", "tags": ["neutral"] }
            }
        },
        "spacing": {
            "space--gutter": { "css": "clamp(1rem, 2vw, 2rem)", "unit": "ignored" }
        },
        "variables": {
            "radius--pill": { "css": "999px", "category": "variables" }
        },
        "version": 3,
        "notes": ["not", "variables"]
    }"##;

    #[test]
    fn test_flatten_nested_leaves() {
        let catalog = VariableCatalog::from_json_str("vars.json", CATALOG).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get("color--ink").unwrap().css_value, "#111111");
        assert_eq!(catalog.get("color--ink").unwrap().title.as_deref(), Some("Ink"));
        assert_eq!(catalog.get("color--paper").unwrap().tags, vec!["neutral"]);
    }

    #[test]
    fn test_leaf_with_sibling_keys_is_still_leaf() {
        let catalog = VariableCatalog::from_json_str("vars.json", CATALOG).unwrap();
        let gutter = catalog.get("space--gutter").unwrap();
        assert_eq!(gutter.css_value, "clamp(1rem, 2vw, 2rem)");
    }

    #[test]
    fn test_category_defaults_to_top_level_group() {
        let catalog = VariableCatalog::from_json_str("vars.json", CATALOG).unwrap();
        assert_eq!(catalog.get("color--ink").unwrap().category, "colors");
        assert_eq!(catalog.get("space--gutter").unwrap().category, "spacing");

        let listed: Vec<_> = catalog.in_category("variables").map(|d| d.name.as_str()).collect();
        assert_eq!(listed, vec!["radius--pill"]);
    }

    #[test]
    fn test_arrays_and_scalars_carry_no_variables() {
        let catalog = VariableCatalog::from_json_str(
            "vars.json",
            r#"{ "misc": { "list": ["a", "b"], "count": 3, "empty": {} }, "flag": true }"#,
        )
        .unwrap();
        assert!(catalog.is_empty());

        let node: VariableNode = serde_json::from_str(r#"["x", "y"]"#).unwrap();
        assert!(matches!(node, VariableNode::Other(Value::Array(_))));
    }

    #[test]
    fn test_non_string_css_is_a_group() {
        let catalog = VariableCatalog::from_json_str(
            "vars.json",
            r##"{ "css": { "color--ink": { "css": "#000" } }, "odd": { "css": 4 } }"##,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("color--ink").unwrap().category, "css");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = VariableCatalog::from_json_str("broken.json", "{ nope").unwrap_err();
        assert_eq!(err.source_name, "broken.json");
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let err = VariableCatalog::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.source_name.contains("here.json"));
    }
}
