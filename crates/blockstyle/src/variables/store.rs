//! The merged variable view and its cache.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::node::{VariableCatalog, VariableDefinition};
use super::palette::PaletteEntry;
use crate::color::{generate_shades, sanitize_hex_alpha, translucent_colors, ShadeLabel};
use crate::settings::{ColorToken, SystemVariables};

/// Every variable known to the engine, after all layers are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMap {
    definitions: BTreeMap<String, VariableDefinition>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a definition.
    pub fn insert(&mut self, definition: VariableDefinition) {
        self.definitions.insert(definition.name.clone(), definition);
    }

    /// Sets a name to a value, keeping metadata of an existing definition.
    pub fn set(&mut self, name: &str, value: impl Into<String>, category: &str) {
        match self.definitions.get_mut(name) {
            Some(existing) => existing.css_value = value.into(),
            None => self.insert(VariableDefinition::new(name, value, category)),
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.definitions.get(name).map(|def| def.css_value.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&VariableDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
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
}

impl From<&VariableCatalog> for VariableMap {
    fn from(catalog: &VariableCatalog) -> Self {
        let mut map = VariableMap::new();
        for definition in catalog.iter() {
            map.insert(definition.clone());
        }
        map
    }
}

/// Holds the last merged [`VariableMap`] under a fixed key until invalidated.
///
/// The cache is an ordinary value owned by whoever drives compilation, so
/// tests and hosts can inject, inspect or share it explicitly.
#[derive(Debug, Clone, Default)]
pub struct VariableCache {
    key: String,
    slot: Option<Arc<VariableMap>>,
    builds: usize,
}

impl VariableCache {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            slot: None,
            builds: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> Option<Arc<VariableMap>> {
        self.slot.clone()
    }

    /// Returns the cached map, building it first if the cache is cold.
    pub fn get_or_build(&mut self, build: impl FnOnce() -> VariableMap) -> Arc<VariableMap> {
        if let Some(map) = &self.slot {
            return Arc::clone(map);
        }
        let map = Arc::new(build());
        self.builds += 1;
        tracing::debug!(key = %self.key, variables = map.len(), "variable cache rebuilt");
        self.slot = Some(Arc::clone(&map));
        map
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    pub fn is_warm(&self) -> bool {
        self.slot.is_some()
    }

    /// Number of times the map has been built.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

/// The layers merged over the base catalog, lowest precedence first.
#[derive(Debug, Clone, Copy)]
pub struct Overrides<'a> {
    pub system: &'a SystemVariables,
    pub palette: &'a [PaletteEntry],
    pub user_variables: &'a BTreeMap<String, String>,
}

/// Loads the base catalog and merges the override layers over it.
#[derive(Debug, Clone)]
pub struct VariableStore {
    catalog_path: Option<PathBuf>,
    catalog: Option<VariableCatalog>,
    cache: VariableCache,
}

impl VariableStore {
    /// A store that reads its base catalog from a file on every rebuild.
    pub fn new(catalog_path: Option<PathBuf>, cache: VariableCache) -> Self {
        Self {
            catalog_path,
            catalog: None,
            cache,
        }
    }

    /// A store over an in-memory base catalog.
    pub fn from_catalog(catalog: VariableCatalog, cache: VariableCache) -> Self {
        Self {
            catalog_path: None,
            catalog: Some(catalog),
            cache,
        }
    }

    pub fn cache(&self) -> &VariableCache {
        &self.cache
    }

    /// Returns the merged map, rebuilding it when the cache is cold.
    pub fn load(&mut self, overrides: &Overrides<'_>) -> Arc<VariableMap> {
        let Self {
            catalog_path,
            catalog,
            cache,
        } = self;
        cache.get_or_build(|| {
            let mut map = match (catalog.as_ref(), catalog_path.as_ref()) {
                (Some(catalog), _) => VariableMap::from(catalog),
                (None, Some(path)) => match VariableCatalog::from_file(path) {
                    Ok(catalog) => VariableMap::from(&catalog),
                    Err(err) => {
                        tracing::warn!(error = %err, "variable catalog skipped");
                        VariableMap::new()
                    }
                },
                (None, None) => VariableMap::new(),
            };
            merge_overrides(&mut map, overrides);
            map
        })
    }

    /// Forces a rebuild on the next [`load`](Self::load).
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}

/// Merges colors, scales and user variables over `map`.
///
/// Theme palette colors go first so a configured token of the same type
/// replaces them; user variables go last.
pub fn merge_overrides(map: &mut VariableMap, overrides: &Overrides<'_>) {
    let theme_tokens: Vec<ColorToken> =
        overrides.palette.iter().map(PaletteEntry::to_token).collect();
    for token in theme_tokens.iter().chain(&overrides.system.colors) {
        merge_color(map, token);
    }

    for entry in &overrides.system.fontsize {
        let name = match heading_level(&entry.size) {
            Some(level) => format!("heading--{}", level),
            None => format!("text--{}", entry.size),
        };
        map.set(&name, entry.css_value(), "font-size");
    }

    for entry in &overrides.system.spacing {
        map.set(&format!("space--{}", entry.size), entry.css_value(), "spacing");
    }

    for (name, value) in overrides.user_variables {
        let name = name.trim_start_matches("--");
        map.set(name, value.clone(), "user");
    }
}

fn heading_level(size: &str) -> Option<u8> {
    let level: u8 = size.strip_prefix('h')?.parse().ok()?;
    (1..=6).contains(&level).then_some(level)
}

fn merge_color(map: &mut VariableMap, token: &ColorToken) {
    let Some(raw_hex) = token.normalized_hex() else {
        tracing::warn!(token = %token.kind, hexcode = %token.hexcode, "color token skipped");
        return;
    };
    let effective = token.effective_color();

    for shade in &generate_shades(&raw_hex) {
        let name = match shade.label {
            ShadeLabel::Main => format!("color--{}", token.kind),
            label => format!("color--{}-{}", token.kind, label.as_str()),
        };
        // The main variable may be a var() expression; alpha variants need hex
        let (value, alpha_source) = match shade.label {
            ShadeLabel::Main => (effective.clone(), raw_hex.as_str()),
            _ => (shade.hex.clone(), shade.hex.as_str()),
        };
        map.set(&name, value, "colors");

        for (percent, hex) in translucent_colors(alpha_source) {
            let sanitized = sanitize_hex_alpha(&hex);
            if !sanitized.is_empty() {
                map.set(&format!("{}--{}", name, percent), sanitized, "colors");
            }
        }
    }
}

static CUSTOM_PROPERTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^--[\w-]+$").expect("custom property pattern is valid"));

/// Wraps a custom property reference with a hex fallback.
///
/// Accepts `--name` or `var(--name)` (any fallback already inside is
/// replaced). Returns the bare fallback when the reference is not a valid
/// custom property name.
///
/// ```rust
/// use blockstyle::variables::color_variable_with_fallback;
///
/// assert_eq!(
///     color_variable_with_fallback("var(--brand)", "#3366ff"),
///     "var(--brand, #3366ff)"
/// );
/// assert_eq!(color_variable_with_fallback("brand", "#3366ff"), "#3366ff");
/// ```
pub fn color_variable_with_fallback(var_expr: &str, hex_fallback: &str) -> String {
    let trimmed = var_expr.trim();
    let inner = trimmed
        .strip_prefix("var(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed);
    let name = inner.split(',').next().unwrap_or_default().trim();

    if CUSTOM_PROPERTY.is_match(name) {
        format!("var({}, {})", name, hex_fallback)
    } else {
        hex_fallback.to_string()
    }
}
