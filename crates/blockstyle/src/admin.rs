//! Validated updates of the persisted documents.
//!
//! Every update validates its input before touching anything, applies the
//! change to the stored document, writes it back and returns the updated
//! part. With `destructive` set the entry is deleted instead; deleting an
//! entry that does not exist succeeds without writing.
//!
//! Cache invalidation is the caller's job: [`crate::Engine`] drops its
//! caches only after an update returned `Ok`.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::block_defaults::{BlockDefaults, DEFAULT_SELECTOR};
use crate::color::{hex_string, hex_to_rgb};
use crate::error::{MutationError, ValidationError};
use crate::settings::{ColorToken, PropertyMap, ScaleEntry, UserClassMap};
use crate::store::{self, OptionStore, BLOCK_DEFAULTS_KEY, SYSTEM_VARIABLES_KEY, USER_CSS_KEY};

/// Which size scale an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Spacing,
    FontSize,
}

/// A requested color token change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorUpdate {
    pub kind: String,
    pub hexcode: String,
    pub theme_variable: Option<String>,
    pub theme_label: Option<String>,
}

impl ColorUpdate {
    pub fn new(kind: impl Into<String>, hexcode: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            hexcode: hexcode.into(),
            ..Self::default()
        }
    }

    pub fn with_theme(mut self, variable: impl Into<String>, label: impl Into<String>) -> Self {
        self.theme_variable = Some(variable.into());
        self.theme_label = Some(label.into());
        self
    }
}

/// The JSON envelope returned to the host for a mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MutationResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }

    pub fn from_result<T: Serialize>(result: Result<T, MutationError>) -> Self {
        match result {
            Ok(data) => match serde_json::to_value(data) {
                Ok(value) => Self::ok(value),
                Err(err) => Self::failed(err),
            },
            Err(err) => Self::failed(err),
        }
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(value)
}

/// Mutations over one option store.
pub struct Mutations<'s> {
    store: &'s mut dyn OptionStore,
}

impl<'s> Mutations<'s> {
    pub fn new(store: &'s mut dyn OptionStore) -> Self {
        Self { store }
    }

    /// Upserts or deletes a color token by type.
    ///
    /// The hexcode must be 3- or 6-digit hex and is stored as lower-case
    /// `#rrggbb`.
    pub fn update_color(
        &mut self,
        update: ColorUpdate,
        destructive: bool,
    ) -> Result<Vec<ColorToken>, MutationError> {
        let kind = required("type", &update.kind)?.to_string();
        let mut system = store::system_variables(self.store);

        if destructive {
            let before = system.colors.len();
            system.colors.retain(|token| token.kind != kind);
            if system.colors.len() != before {
                store::save(self.store, SYSTEM_VARIABLES_KEY, &system)?;
            }
            return Ok(system.colors);
        }

        let hexcode = required("hexcode", &update.hexcode)?;
        let hex = hex_to_rgb(hexcode)
            .map(hex_string)
            .ok_or_else(|| ValidationError::new("hexcode", "expected a 3- or 6-digit hex color"))?;
        let theme_variable = update.theme_variable.filter(|v| !v.trim().is_empty());
        let theme_label = update.theme_label.filter(|v| !v.trim().is_empty());

        let token = ColorToken {
            kind: kind.clone(),
            hexcode: hex,
            theme_variable,
            theme_label,
        };
        match system.colors.iter_mut().find(|existing| existing.kind == kind) {
            Some(existing) => *existing = token,
            None => system.colors.push(token),
        }

        store::save(self.store, SYSTEM_VARIABLES_KEY, &system)?;
        Ok(system.colors)
    }

    /// Upserts or deletes one step of the spacing scale.
    pub fn update_spacing(
        &mut self,
        size: &str,
        value: &str,
        unit: &str,
        destructive: bool,
    ) -> Result<Vec<ScaleEntry>, MutationError> {
        self.update_scale(Scale::Spacing, size, value, unit, destructive)
    }

    /// Upserts or deletes one step of the font-size scale.
    pub fn update_font_size(
        &mut self,
        size: &str,
        value: &str,
        unit: &str,
        destructive: bool,
    ) -> Result<Vec<ScaleEntry>, MutationError> {
        self.update_scale(Scale::FontSize, size, value, unit, destructive)
    }

    fn update_scale(
        &mut self,
        scale: Scale,
        size: &str,
        value: &str,
        unit: &str,
        destructive: bool,
    ) -> Result<Vec<ScaleEntry>, MutationError> {
        let size = required("size", size)?.to_string();
        let value = if destructive {
            String::new()
        } else {
            required("value", value)?.to_string()
        };

        let mut system = store::system_variables(self.store);
        let entries = match scale {
            Scale::Spacing => &mut system.spacing,
            Scale::FontSize => &mut system.fontsize,
        };

        if destructive {
            let before = entries.len();
            entries.retain(|entry| entry.size != size);
            if entries.len() == before {
                return Ok(entries.clone());
            }
        } else {
            let entry = ScaleEntry::new(size.clone(), value, unit.trim());
            match entries.iter_mut().find(|existing| existing.size == size) {
                Some(existing) => *existing = entry,
                None => entries.push(entry),
            }
        }

        let updated = entries.clone();
        store::save(self.store, SYSTEM_VARIABLES_KEY, &system)?;
        Ok(updated)
    }

    /// Upserts or deletes a user variable. A leading `--` is dropped.
    pub fn update_user_variable(
        &mut self,
        name: &str,
        value: &str,
        destructive: bool,
    ) -> Result<BTreeMap<String, String>, MutationError> {
        let name = required("name", name)?.trim_start_matches("--").to_string();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(ValidationError::new("name", "expected a custom property name").into());
        }

        let mut css = store::user_css(self.store);
        if destructive {
            if css.variables.remove(&name).is_none() {
                return Ok(css.variables);
            }
        } else {
            let value = required("value", value)?;
            css.variables.insert(name, value.to_string());
        }

        store::save(self.store, USER_CSS_KEY, &css)?;
        Ok(css.variables)
    }

    /// Upserts or deletes a user class for one pseudo-selector.
    ///
    /// An empty `pseudo` means `default`. Deleting the last selector of a
    /// class removes the class.
    pub fn update_user_class(
        &mut self,
        class: &str,
        pseudo: &str,
        properties: PropertyMap,
        destructive: bool,
    ) -> Result<UserClassMap, MutationError> {
        let class = required("class", class)?.to_string();
        if class.contains(char::is_whitespace) || class.contains('[') {
            return Err(ValidationError::new("class", "expected a plain class name").into());
        }
        let pseudo = match pseudo.trim() {
            "" => DEFAULT_SELECTOR.to_string(),
            other => other.to_string(),
        };

        let mut css = store::user_css(self.store);
        if destructive {
            let Some(variants) = css.classes.get_mut(&class) else {
                return Ok(css.classes);
            };
            if variants.remove(&pseudo).is_none() {
                return Ok(css.classes);
            }
            if variants.is_empty() {
                css.classes.remove(&class);
            }
        } else {
            let properties: PropertyMap = properties
                .into_iter()
                .map(|(prop, value)| (prop.trim().to_string(), value.trim().to_string()))
                .filter(|(prop, _)| !prop.is_empty())
                .collect();
            if properties.is_empty() {
                return Err(ValidationError::missing("properties").into());
            }
            css.classes.entry(class).or_default().insert(pseudo, properties);
        }

        store::save(self.store, USER_CSS_KEY, &css)?;
        Ok(css.classes)
    }

    /// Merges block defaults at the pseudo-selector level.
    ///
    /// `incoming` maps block names to either a bare class list (replacing the
    /// block's entry) or `{ selector: [class] }`.
    pub fn update_block_defaults(
        &mut self,
        incoming: &Value,
    ) -> Result<BlockDefaults, MutationError> {
        if !incoming.is_object() {
            return Err(ValidationError::new(
                "block_defaults",
                "expected an object keyed by block name",
            )
            .into());
        }
        let updates = BlockDefaults::parse_updates(incoming);

        let mut defaults = store::block_defaults(self.store);
        defaults.merge(updates);

        store::save(self.store, BLOCK_DEFAULTS_KEY, &defaults)?;
        Ok(defaults)
    }
}
