//! Engine configuration.
//!
//! Loaded from YAML; every key is optional.
//!
//! ```yaml
//! variables_catalog: assets/variables.json
//! classes_dir: assets/classes
//! selector_prefix: '[class*="wp-block"]'
//! palette:
//!   kind: theme_json
//!   path: theme/theme.json
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Selectors the expander needs to know about the host's markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Wrapper the editor renders around a block's inner blocks.
    pub inner_blocks: String,
    /// Layout container inside the inner-blocks wrapper.
    pub inner_blocks_layout: String,
    /// Background video layer of cover-style blocks.
    pub video_background: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            inner_blocks: ".block-editor-inner-blocks".to_string(),
            inner_blocks_layout: ".block-editor-block-list__layout".to_string(),
            video_background: ".wp-block-cover__video-background".to_string(),
        }
    }
}

/// Which theme palette adapter to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteKind {
    #[default]
    None,
    ThemeJson,
    Vendor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub kind: PaletteKind,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Nested JSON catalog of base variables.
    pub variables_catalog: Option<PathBuf>,
    /// Directory tree of JSON class catalogs.
    pub classes_dir: Option<PathBuf>,
    /// Prepended to every emitted class selector.
    pub selector_prefix: String,
    /// Prefix of the composite classes generated from block defaults.
    pub default_class_prefix: String,
    /// Block attribute that lists a block's classes.
    pub class_attribute: String,
    pub markers: Markers,
    pub palette: PaletteConfig,
    /// Key the variable cache is stored under.
    pub cache_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            variables_catalog: None,
            classes_dir: None,
            selector_prefix: r#"[class*="wp-block"]"#.to_string(),
            default_class_prefix: "default-".to_string(),
            class_attribute: "styleClasses".to_string(),
            markers: Markers::default(),
            palette: PaletteConfig::default(),
            cache_key: "blockstyle_variables".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, EngineError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads a YAML file. Relative paths inside it are resolved against the
    /// file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        let mut config = Self::from_yaml_str(&yaml)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.variables_catalog,
            &mut self.classes_dir,
            &mut self.palette.path,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
