//! Per-block "default class" assignments.
//!
//! The canonical form is always `block -> pseudo-selector -> [class]`. Older
//! documents stored a bare class list per block; those are normalized to a
//! `"default"` entry once, while decoding, so nothing downstream ever sees
//! the legacy shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The pseudo-selector key used for the block's un-prefixed state.
pub const DEFAULT_SELECTOR: &str = "default";

/// `pseudo-selector -> classes` for one block.
pub type SelectorClasses = BTreeMap<String, Vec<String>>;

/// `block name -> pseudo-selector -> classes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BlockDefaults(BTreeMap<String, SelectorClasses>);

/// An incoming update for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockDefaultsUpdate {
    /// A bare list: replaces the whole block entry with a `default` list.
    Legacy(Vec<String>),
    /// Pseudo-keyed lists merged into the existing entry.
    Selectors(SelectorClasses),
}

impl BlockDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, block: &str) -> Option<&SelectorClasses> {
        self.0.get(block)
    }

    /// Sets the classes for one block and pseudo-selector.
    pub fn set(
        &mut self,
        block: impl Into<String>,
        selector: impl Into<String>,
        classes: Vec<String>,
    ) -> &mut Self {
        self.0
            .entry(block.into())
            .or_default()
            .insert(selector.into(), classes);
        self
    }

    /// Iterates `(block, selector, classes)` triples in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.0.iter().flat_map(|(block, selectors)| {
            selectors.iter().map(move |(selector, classes)| {
                (block.as_str(), selector.as_str(), classes.as_slice())
            })
        })
    }

    /// Every class referenced by any block and selector.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .flat_map(|(_, _, classes)| classes.iter().map(String::as_str))
    }

    /// Merges updates at the pseudo-selector level.
    ///
    /// Selectors and blocks the update does not mention are left alone. An
    /// empty class list removes its selector, and a block left without
    /// selectors is removed. A legacy list replaces its block wholesale.
    pub fn merge(&mut self, updates: BTreeMap<String, BlockDefaultsUpdate>) {
        for (block, update) in updates {
            match update {
                BlockDefaultsUpdate::Legacy(classes) => {
                    if classes.is_empty() {
                        self.0.remove(&block);
                    } else {
                        let mut selectors = SelectorClasses::new();
                        selectors.insert(DEFAULT_SELECTOR.to_string(), classes);
                        self.0.insert(block, selectors);
                    }
                }
                BlockDefaultsUpdate::Selectors(incoming) => {
                    let entry = self.0.entry(block.clone()).or_default();
                    for (selector, classes) in incoming {
                        if classes.is_empty() {
                            entry.remove(&selector);
                        } else {
                            entry.insert(selector, classes);
                        }
                    }
                    if entry.is_empty() {
                        self.0.remove(&block);
                    }
                }
            }
        }
    }

    /// Decodes an update document, accepting both the legacy and the
    /// pseudo-keyed shape per block. Entries of any other shape are dropped.
    pub fn parse_updates(value: &Value) -> BTreeMap<String, BlockDefaultsUpdate> {
        let Value::Object(blocks) = value else {
            return BTreeMap::new();
        };

        blocks
            .iter()
            .filter_map(|(block, entry)| {
                let update = match entry {
                    Value::Array(items) => BlockDefaultsUpdate::Legacy(string_list(items)),
                    Value::Object(selectors) => BlockDefaultsUpdate::Selectors(
                        selectors
                            .iter()
                            .filter_map(|(selector, classes)| match classes {
                                Value::Array(items) => Some((selector.clone(), string_list(items))),
                                _ => None,
                            })
                            .collect(),
                    ),
                    _ => return None,
                };
                Some((block.clone(), update))
            })
            .collect()
    }
}

fn string_list(items: &[Value]) -> Vec<String> {
    let mut seen = Vec::with_capacity(items.len());
    for item in items {
        if let Some(name) = item.as_str().map(str::trim).filter(|s| !s.is_empty()) {
            if !seen.iter().any(|existing| existing == name) {
                seen.push(name.to_string());
            }
        }
    }
    seen
}

impl<'de> Deserialize<'de> for BlockDefaults {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let mut defaults = BlockDefaults::new();
        defaults.merge(BlockDefaults::parse_updates(&value));
        Ok(defaults)
    }
}
