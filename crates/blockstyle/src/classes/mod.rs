//! Utility classes: the file catalog plus user-authored classes.
//!
//! Class names may carry shortcodes (`btn[hover]`); the registry stores raw
//! names and leaves expansion to [`crate::expand`]. When the same raw name is
//! defined by both sources the user's declaration wins.

mod catalog;
mod user;

pub use catalog::{
    walk_catalog_dir, CatalogFile, ClassCatalog, ClassDefinition, ClassSource, VARIABLES_CATEGORY,
};
pub use user::{join_properties, user_classes, UserClassKeys};

use std::collections::BTreeMap;

use crate::settings::UserClassMap;

/// The catalog and the user classes, merged on demand.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    catalog: ClassCatalog,
    user: UserClassMap,
}

impl ClassRegistry {
    pub fn new(catalog: ClassCatalog, user: UserClassMap) -> Self {
        Self { catalog, user }
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    pub fn user(&self) -> &UserClassMap {
        &self.user
    }

    /// Replaces the user classes after a mutation.
    pub fn set_user(&mut self, user: UserClassMap) {
        self.user = user;
    }

    /// Raw class name to declaration, for compiling.
    ///
    /// User classes are keyed in shortcode form and take precedence; catalog
    /// entries only fill names the user did not define.
    pub fn compile_map(&self) -> BTreeMap<String, String> {
        let mut active = user_classes(&self.user, UserClassKeys::Shortcode);
        for definition in self.catalog.iter() {
            active
                .entry(definition.name.clone())
                .or_insert_with(|| definition.declaration.clone());
        }
        active
    }

    /// Every known class for pickers, sorted by name.
    ///
    /// User classes appear in `class:pseudo` form; variable listing entries
    /// are included but never compiled.
    pub fn listing(&self) -> Vec<ClassDefinition> {
        let mut listed: BTreeMap<String, ClassDefinition> = BTreeMap::new();

        for definition in self.catalog.listing_only().chain(self.catalog.iter()) {
            listed.insert(definition.name.clone(), definition.clone());
        }
        for (name, declaration) in user_classes(&self.user, UserClassKeys::Selector) {
            let mut definition = ClassDefinition::new(&name, declaration, ClassSource::User);
            definition.category = Some("user".to_string());
            listed.insert(name, definition);
        }

        listed.into_values().collect()
    }
}
