//! Theme color palettes.
//!
//! The active theme exposes a palette of named colors. Two sources are
//! supported behind [`ThemePaletteProvider`]: a generic `theme.json`
//! document and a vendor "global palette" document. The provider is chosen
//! once, from configuration, when the engine is built.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::color::{hex_string, hex_to_rgb};
use crate::config::{PaletteConfig, PaletteKind};
use crate::error::ParseError;
use crate::settings::ColorToken;

/// One named color of the theme palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub slug: String,
    pub label: String,
    /// Lower-case `#rrggbb`.
    pub color: String,
    /// Custom property the theme defines for this color.
    pub variable: String,
}

impl PaletteEntry {
    /// The color token this entry contributes to the variable store.
    pub fn to_token(&self) -> ColorToken {
        ColorToken::new(&self.slug, &self.color).with_theme(&self.variable, &self.label)
    }
}

/// Source of the active theme's palette.
pub trait ThemePaletteProvider {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// The current palette. Failures are logged and yield an empty palette.
    fn palette(&self) -> Vec<PaletteEntry>;
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    slug: String,
    #[serde(default)]
    name: Option<String>,
    color: String,
}

fn entries_from(raw: Vec<RawEntry>, variable: impl Fn(&str) -> String) -> Vec<PaletteEntry> {
    raw.into_iter()
        .filter_map(|entry| {
            // Gradients and var() colors cannot seed a shade ramp
            let color = hex_to_rgb(&entry.color).map(hex_string)?;
            Some(PaletteEntry {
                label: entry.name.unwrap_or_else(|| entry.slug.clone()),
                variable: variable(&entry.slug),
                slug: entry.slug,
                color,
            })
        })
        .collect()
}

fn read_json(path: &Path) -> Result<Value, ParseError> {
    let source_name = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|e| ParseError::new(&source_name, e))?;
    serde_json::from_str(&text).map_err(|e| ParseError::new(&source_name, e))
}

fn log_failure(provider: &str, err: &ParseError) {
    tracing::warn!(provider, error = %err, "theme palette unavailable");
}

/// Palette read from `settings.color.palette` of a `theme.json` document.
#[derive(Debug, Clone)]
pub struct GenericThemeJson {
    source: PaletteSource,
}

/// Palette read from a vendor global-palette document
/// (`{ "palette": [{ "slug", "name", "color" }] }`).
#[derive(Debug, Clone)]
pub struct VendorPalette {
    source: PaletteSource,
}

#[derive(Debug, Clone)]
enum PaletteSource {
    File(PathBuf),
    Inline(Value),
}

impl PaletteSource {
    fn document(&self) -> Result<Value, ParseError> {
        match self {
            PaletteSource::File(path) => read_json(path),
            PaletteSource::Inline(value) => Ok(value.clone()),
        }
    }
}

impl GenericThemeJson {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: PaletteSource::File(path.into()),
        }
    }

    pub fn from_value(document: Value) -> Self {
        Self {
            source: PaletteSource::Inline(document),
        }
    }

    fn entries(&self) -> Result<Vec<PaletteEntry>, ParseError> {
        let document = self.source.document()?;
        let palette = document
            .pointer("/settings/color/palette")
            .cloned()
            .unwrap_or(Value::Array(Vec::new()));
        let raw: Vec<RawEntry> =
            serde_json::from_value(palette).map_err(|e| ParseError::new("theme.json palette", e))?;
        Ok(entries_from(raw, |slug| format!("--wp--preset--color--{}", slug)))
    }
}

impl ThemePaletteProvider for GenericThemeJson {
    fn name(&self) -> &'static str {
        "theme-json"
    }

    fn palette(&self) -> Vec<PaletteEntry> {
        self.entries().unwrap_or_else(|err| {
            log_failure(self.name(), &err);
            Vec::new()
        })
    }
}

impl VendorPalette {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: PaletteSource::File(path.into()),
        }
    }

    pub fn from_value(document: Value) -> Self {
        Self {
            source: PaletteSource::Inline(document),
        }
    }

    fn entries(&self) -> Result<Vec<PaletteEntry>, ParseError> {
        let document = self.source.document()?;
        let palette = document
            .get("palette")
            .cloned()
            .unwrap_or(Value::Array(Vec::new()));
        let raw: Vec<RawEntry> =
            serde_json::from_value(palette).map_err(|e| ParseError::new("vendor palette", e))?;
        Ok(entries_from(raw, |slug| format!("--global-{}", slug)))
    }
}

impl ThemePaletteProvider for VendorPalette {
    fn name(&self) -> &'static str {
        "vendor"
    }

    fn palette(&self) -> Vec<PaletteEntry> {
        self.entries().unwrap_or_else(|err| {
            log_failure(self.name(), &err);
            Vec::new()
        })
    }
}

/// Used when no theme palette is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPalette;

impl ThemePaletteProvider for NoPalette {
    fn name(&self) -> &'static str {
        "none"
    }

    fn palette(&self) -> Vec<PaletteEntry> {
        Vec::new()
    }
}

/// Builds the provider named by the configuration.
pub fn palette_provider_for(config: &PaletteConfig) -> Box<dyn ThemePaletteProvider> {
    match (&config.kind, &config.path) {
        (PaletteKind::ThemeJson, Some(path)) => Box::new(GenericThemeJson::from_file(path)),
        (PaletteKind::Vendor, Some(path)) => Box::new(VendorPalette::from_file(path)),
        (PaletteKind::None, _) => Box::new(NoPalette),
        (kind, None) => {
            tracing::warn!(?kind, "theme palette configured without a path");
            Box::new(NoPalette)
        }
    }
}

/// Re-syncs tokens that follow a theme palette label.
///
/// When the theme's color at a token's recorded label no longer matches the
/// token's hex, the token takes the theme's color. Returns the kinds of the
/// tokens that changed.
pub fn sync_tokens(tokens: &mut [ColorToken], palette: &[PaletteEntry]) -> Vec<String> {
    let mut changed = Vec::new();
    for token in tokens.iter_mut() {
        let Some(label) = token.theme_label.as_deref() else {
            continue;
        };
        let Some(entry) = palette.iter().find(|entry| entry.label == label) else {
            continue;
        };
        if token.normalized_hex().as_deref() != Some(entry.color.as_str()) {
            token.hexcode = entry.color.clone();
            changed.push(token.kind.clone());
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn theme_json() -> Value {
        json!({
            "version": 2,
            "settings": {
                "color": {
                    "palette": [
                        { "slug": "accent", "name": "Accent", "color": "#FF5500" },
                        { "slug": "base", "name": "Base", "color": "#fff" },
                        { "slug": "fade", "name": "Fade", "color": "linear-gradient(#000, #fff)" }
                    ]
                }
            }
        })
    }

    #[test]
    fn test_generic_theme_json_palette() {
        let provider = GenericThemeJson::from_value(theme_json());
        let palette = provider.palette();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette[0].slug, "accent");
        assert_eq!(palette[0].color, "#ff5500");
        assert_eq!(palette[0].variable, "--wp--preset--color--accent");
        assert_eq!(palette[1].color, "#ffffff");
    }

    #[test]
    fn test_vendor_palette() {
        let provider = VendorPalette::from_value(json!({
            "palette": [{ "slug": "palette1", "name": "Palette Color 1", "color": "#2B6CB0" }]
        }));
        let palette = provider.palette();
        assert_eq!(palette.len(), 1);
        assert_eq!(palette[0].variable, "--global-palette1");
        assert_eq!(palette[0].label, "Palette Color 1");
    }

    #[test]
    fn test_missing_palette_is_empty() {
        assert!(GenericThemeJson::from_value(json!({})).palette().is_empty());
        assert!(GenericThemeJson::from_file("/no/such/theme.json").palette().is_empty());
        assert!(NoPalette.palette().is_empty());
    }

    #[test]
    fn test_entry_to_token() {
        let palette = GenericThemeJson::from_value(theme_json()).palette();
        let token = palette[0].to_token();
        assert_eq!(token.kind, "accent");
        assert_eq!(token.theme_label.as_deref(), Some("Accent"));
        assert_eq!(
            token.effective_color(),
            "var(--wp--preset--color--accent, #ff5500)"
        );
    }

    #[test]
    fn test_sync_tokens_detects_drift() {
        let palette = GenericThemeJson::from_value(theme_json()).palette();
        let mut tokens = vec![
            ColorToken::new("primary", "#000000")
                .with_theme("--wp--preset--color--accent", "Accent"),
            ColorToken::new("secondary", "#FFFFFF").with_theme("--wp--preset--color--base", "Base"),
            ColorToken::new("tertiary", "#123456"),
        ];

        let changed = sync_tokens(&mut tokens, &palette);
        assert_eq!(changed, vec!["primary".to_string()]);
        assert_eq!(tokens[0].hexcode, "#ff5500");
        assert_eq!(tokens[1].hexcode, "#FFFFFF");
        assert_eq!(tokens[2].hexcode, "#123456");
    }

    #[test]
    fn test_provider_selection() {
        let config = PaletteConfig {
            kind: PaletteKind::Vendor,
            path: Some(PathBuf::from("/tmp/palette.json")),
        };
        assert_eq!(palette_provider_for(&config).name(), "vendor");

        let config = PaletteConfig {
            kind: PaletteKind::ThemeJson,
            path: None,
        };
        assert_eq!(palette_provider_for(&config).name(), "none");
    }
}
