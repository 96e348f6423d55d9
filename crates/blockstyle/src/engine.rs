//! The engine facade an embedding host drives.
//!
//! [`Engine`] owns the configuration, the option store, the theme palette
//! provider, the class catalog, the variable cache and a cache of compiled
//! output per render context. Every successful mutation drops both caches.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::admin::{ColorUpdate, Mutations};
use crate::block_defaults::BlockDefaults;
use crate::classes::{ClassCatalog, ClassDefinition, ClassRegistry};
use crate::compiler::{CompileMode, CompiledStylesheet, StylesheetCompiler};
use crate::config::EngineConfig;
use crate::error::{EngineError, MutationError, ParseError, PersistenceError};
use crate::expand::ExpandContext;
use crate::settings::{ColorToken, PropertyMap, ScaleEntry, UserClassMap, UserCss};
use crate::store::{self, OptionStore, SYSTEM_VARIABLES_KEY};
use crate::usage::{Block, UsageTracker};
use crate::variables::{
    palette_provider_for, sync_tokens, Overrides, ThemePaletteProvider, VariableCache,
    VariableCatalog, VariableMap, VariableStore,
};

/// Where a compiled stylesheet is served.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RenderContext {
    Editor,
    /// The frontend of one document.
    Frontend(String),
}

pub struct Engine {
    config: EngineConfig,
    store: Box<dyn OptionStore>,
    palette: Box<dyn ThemePaletteProvider>,
    classes: ClassRegistry,
    variables: VariableStore,
    output: HashMap<RenderContext, Arc<CompiledStylesheet>>,
}

impl Engine {
    /// Builds an engine, loading the class catalog and choosing the palette
    /// provider from `config`.
    pub fn new(config: EngineConfig, store: Box<dyn OptionStore>) -> Self {
        let mut catalog = match &config.classes_dir {
            Some(dir) => ClassCatalog::load(dir),
            None => ClassCatalog::new(),
        };
        if let Some(path) = &config.variables_catalog {
            match VariableCatalog::from_file(path) {
                Ok(variables) => catalog.add_variable_listing(&variables),
                Err(err) => tracing::warn!(error = %err, "variable listing skipped"),
            }
        }

        let palette = palette_provider_for(&config.palette);
        let variables = VariableStore::new(
            config.variables_catalog.clone(),
            VariableCache::new(config.cache_key.clone()),
        );

        Self {
            config,
            store,
            palette,
            classes: ClassRegistry::new(catalog, UserClassMap::new()),
            variables,
            output: HashMap::new(),
        }
    }

    /// Builds an engine from a YAML configuration file.
    pub fn from_config_file(
        path: impl AsRef<Path>,
        store: Box<dyn OptionStore>,
    ) -> Result<Self, EngineError> {
        let config = EngineConfig::from_file(path)?;
        Ok(Self::new(config, store))
    }

    /// Replaces the palette provider chosen from configuration.
    pub fn with_palette_provider(mut self, provider: Box<dyn ThemePaletteProvider>) -> Self {
        self.palette = provider;
        self.invalidate();
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn OptionStore {
        self.store.as_ref()
    }

    pub fn variable_cache(&self) -> &VariableCache {
        self.variables.cache()
    }

    /// Problems found while loading the class catalog.
    pub fn catalog_issues(&self) -> &[ParseError] {
        self.classes.catalog().issues()
    }

    /// The merged variable view.
    pub fn variables(&mut self) -> Arc<VariableMap> {
        let user = store::user_css(self.store.as_ref());
        self.variables_for(&user)
    }

    /// Re-syncs theme-linked color tokens, then loads the variable view.
    fn variables_for(&mut self, user: &UserCss) -> Arc<VariableMap> {
        let palette = self.palette.palette();
        let mut system = store::system_variables(self.store.as_ref());

        let changed = sync_tokens(&mut system.colors, &palette);
        if !changed.is_empty() {
            tracing::info!(
                provider = self.palette.name(),
                tokens = ?changed,
                "theme colors re-synced"
            );
            if let Err(err) = store::save(self.store.as_mut(), SYSTEM_VARIABLES_KEY, &system) {
                tracing::warn!(error = %err, "re-synced colors not persisted");
            }
            self.variables.invalidate();
            self.output.clear();
        }

        self.variables.load(&Overrides {
            system: &system,
            palette: &palette,
            user_variables: &user.variables,
        })
    }

    /// Every class and variable, for the editor.
    pub fn editor_stylesheet(&mut self) -> Arc<CompiledStylesheet> {
        self.stylesheet(RenderContext::Editor)
    }

    /// Only what `document` uses, for its frontend.
    pub fn document_stylesheet(&mut self, document: &str) -> Arc<CompiledStylesheet> {
        self.stylesheet(RenderContext::Frontend(document.to_string()))
    }

    /// Returns the cached output for `context`, compiling it on a miss.
    pub fn stylesheet(&mut self, context: RenderContext) -> Arc<CompiledStylesheet> {
        if let Some(cached) = self.output.get(&context) {
            return Arc::clone(cached);
        }

        let user = store::user_css(self.store.as_ref());
        let variables = self.variables_for(&user);
        self.classes.set_user(user.classes);
        let block_defaults: BlockDefaults = store::block_defaults(self.store.as_ref());
        let class_map = self.classes.compile_map();
        let compiler = StylesheetCompiler::new(&self.config, &class_map, &variables);

        let compiled = match &context {
            RenderContext::Editor => compiler.compile(CompileMode::Editor, None, &block_defaults),
            RenderContext::Frontend(document) => {
                let used = store::used_classes(self.store.as_ref(), document);
                compiler.compile(CompileMode::Frontend, used.as_deref(), &block_defaults)
            }
        };

        let compiled = Arc::new(compiled);
        self.output.insert(context, Arc::clone(&compiled));
        compiled
    }

    /// Compiles the rules of one cleaned class name, for live preview.
    pub fn class_css(&mut self, name: &str, context: ExpandContext) -> CompiledStylesheet {
        let user = store::user_css(self.store.as_ref());
        let variables = self.variables_for(&user);
        self.classes.set_user(user.classes);
        let class_map = self.classes.compile_map();
        StylesheetCompiler::new(&self.config, &class_map, &variables).compile_class(name, context)
    }

    /// Every known class, sorted by name, for class pickers.
    pub fn class_listing(&mut self) -> Vec<ClassDefinition> {
        self.classes.set_user(store::user_css(self.store.as_ref()).classes);
        self.classes.listing()
    }

    /// Recomputes and stores the classes a document's blocks use.
    pub fn record_document_usage(
        &mut self,
        document: &str,
        blocks: &[Block],
    ) -> Result<Vec<String>, PersistenceError> {
        let used = UsageTracker::new(self.config.class_attribute.as_str()).collect(blocks);
        store::save(self.store.as_mut(), &store::used_classes_key(document), &used)?;
        self.output.remove(&RenderContext::Frontend(document.to_string()));
        tracing::debug!(document, classes = used.len(), "document usage recorded");
        Ok(used)
    }

    /// Drops the variable cache and every compiled stylesheet.
    pub fn invalidate(&mut self) {
        self.variables.invalidate();
        self.output.clear();
    }

    fn mutate<T>(
        &mut self,
        apply: impl FnOnce(&mut Mutations<'_>) -> Result<T, MutationError>,
    ) -> Result<T, MutationError> {
        let result = apply(&mut Mutations::new(self.store.as_mut()));
        if result.is_ok() {
            self.invalidate();
        }
        result
    }

    pub fn update_color(
        &mut self,
        update: ColorUpdate,
        destructive: bool,
    ) -> Result<Vec<ColorToken>, MutationError> {
        self.mutate(|m| m.update_color(update, destructive))
    }

    pub fn update_spacing(
        &mut self,
        size: &str,
        value: &str,
        unit: &str,
        destructive: bool,
    ) -> Result<Vec<ScaleEntry>, MutationError> {
        self.mutate(|m| m.update_spacing(size, value, unit, destructive))
    }

    pub fn update_font_size(
        &mut self,
        size: &str,
        value: &str,
        unit: &str,
        destructive: bool,
    ) -> Result<Vec<ScaleEntry>, MutationError> {
        self.mutate(|m| m.update_font_size(size, value, unit, destructive))
    }

    pub fn update_user_variable(
        &mut self,
        name: &str,
        value: &str,
        destructive: bool,
    ) -> Result<BTreeMap<String, String>, MutationError> {
        self.mutate(|m| m.update_user_variable(name, value, destructive))
    }

    pub fn update_user_class(
        &mut self,
        class: &str,
        pseudo: &str,
        properties: PropertyMap,
        destructive: bool,
    ) -> Result<UserClassMap, MutationError> {
        self.mutate(|m| m.update_user_class(class, pseudo, properties, destructive))
    }

    pub fn update_block_defaults(
        &mut self,
        incoming: &Value,
    ) -> Result<BlockDefaults, MutationError> {
        self.mutate(|m| m.update_block_defaults(incoming))
    }
}
