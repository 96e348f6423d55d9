//! Persisted structures: system variables and user CSS.
//!
//! These are the documents the host stores for the engine (see
//! [`crate::store`]). Every field is defaulted so partially written or older
//! documents still decode.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::color::{hex_string, hex_to_rgb};
use crate::variables::color_variable_with_fallback;

/// CSS property name to value, in authored order.
pub type PropertyMap = IndexMap<String, String>;

/// `class -> pseudo-selector (or "default") -> properties`.
pub type UserClassMap = BTreeMap<String, BTreeMap<String, PropertyMap>>;

/// A brand color such as "primary", optionally tied to a theme palette slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorToken {
    #[serde(rename = "type")]
    pub kind: String,
    pub hexcode: String,
    /// CSS custom property exposed by the theme, e.g. `--wp--preset--color--accent`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_variable: Option<String>,
    /// Label of the theme palette entry the token follows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_label: Option<String>,
}

impl ColorToken {
    pub fn new(kind: impl Into<String>, hexcode: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            hexcode: hexcode.into(),
            theme_variable: None,
            theme_label: None,
        }
    }

    pub fn with_theme(mut self, variable: impl Into<String>, label: impl Into<String>) -> Self {
        self.theme_variable = Some(variable.into());
        self.theme_label = Some(label.into());
        self
    }

    /// The token's hex as lower-case `#rrggbb`, if it parses.
    pub fn normalized_hex(&self) -> Option<String> {
        hex_to_rgb(&self.hexcode).map(hex_string)
    }

    /// The value the main color variable is set to: the raw hex, or a
    /// reference to the theme's custom property falling back to the hex.
    pub fn effective_color(&self) -> String {
        let hex = self
            .normalized_hex()
            .unwrap_or_else(|| self.hexcode.clone());
        match &self.theme_variable {
            Some(variable) => color_variable_with_fallback(variable, &hex),
            None => hex,
        }
    }
}

/// One step of a spacing or font-size scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleEntry {
    pub size: String,
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
    #[serde(default)]
    pub unit: String,
}

impl ScaleEntry {
    pub fn new(size: impl Into<String>, value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            value: value.into(),
            unit: unit.into(),
        }
    }

    pub fn css_value(&self) -> String {
        format!("{}{}", self.value, self.unit)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// The `system_variables` document: brand colors and the two size scales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemVariables {
    #[serde(default)]
    pub colors: Vec<ColorToken>,
    #[serde(default = "default_spacing")]
    pub spacing: Vec<ScaleEntry>,
    #[serde(default = "default_font_sizes")]
    pub fontsize: Vec<ScaleEntry>,
}

impl Default for SystemVariables {
    fn default() -> Self {
        Self {
            colors: Vec::new(),
            spacing: default_spacing(),
            fontsize: default_font_sizes(),
        }
    }
}

impl SystemVariables {
    pub fn color(&self, kind: &str) -> Option<&ColorToken> {
        self.colors.iter().find(|token| token.kind == kind)
    }
}

fn default_spacing() -> Vec<ScaleEntry> {
    [
        ("xs", "0.5"),
        ("s", "1"),
        ("m", "1.5"),
        ("l", "2"),
        ("xl", "3"),
        ("xxl", "4"),
    ]
    .into_iter()
    .map(|(size, value)| ScaleEntry::new(size, value, "rem"))
    .collect()
}

fn default_font_sizes() -> Vec<ScaleEntry> {
    [
        ("h1", "3"),
        ("h2", "2.5"),
        ("h3", "2"),
        ("h4", "1.5"),
        ("h5", "1.25"),
        ("h6", "1"),
        ("s", "0.875"),
        ("m", "1"),
        ("l", "1.125"),
    ]
    .into_iter()
    .map(|(size, value)| ScaleEntry::new(size, value, "rem"))
    .collect()
}

/// The `user_css` document: user variables and custom classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCss {
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub classes: UserClassMap,
}
