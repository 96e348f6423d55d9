//! Utility-class catalogs read from a directory tree.
//!
//! Every `*.json` file under the catalog root holds
//! `{ "<class name>": { "css": "...", "title"?, "description"?, "category"?, "tags"? } }`.
//! A file's parent directory names the default category of its entries.
//! Files are read in sorted path order and later files overwrite earlier
//! ones on a name collision.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::variables::VariableCatalog;

/// Category whose variable catalog leaves are listed as classes.
pub const VARIABLES_CATEGORY: &str = "variables";

/// Where a class definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassSource {
    Catalog,
    User,
    /// A variable catalog leaf shown in class pickers. Never compiled.
    VariableListing,
}

/// A named declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
    /// Raw name, possibly carrying shortcodes (`btn[hover]`).
    pub name: String,
    /// `prop:value;` pairs.
    pub declaration: String,
    pub source: ClassSource,
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl ClassDefinition {
    pub fn new(
        name: impl Into<String>,
        declaration: impl Into<String>,
        source: ClassSource,
    ) -> Self {
        Self {
            name: name.into(),
            declaration: declaration.into(),
            source,
            category: None,
            title: None,
            description: None,
            tags: Vec::new(),
        }
    }

    /// The class applied in markup: the name without shortcodes.
    pub fn clean_name(&self) -> String {
        blockstyle_shortcode::clean_name(&self.name)
    }
}

#[derive(Debug, Deserialize)]
struct RawClassEntry {
    css: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// A catalog file discovered while walking the catalog root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    /// Path relative to the root, `/`-separated, without extension.
    pub name: String,
    pub absolute_path: PathBuf,
    /// Name of the directory holding the file.
    pub category: String,
}

/// Walks a catalog root and collects its JSON files in sorted order.
pub fn walk_catalog_dir(root: impl AsRef<Path>) -> Result<Vec<CatalogFile>, std::io::Error> {
    let root = root.as_ref().canonicalize()?;
    let mut files = Vec::new();
    walk_dir_recursive(&root, &root, &mut files)?;
    files.sort_by(|a, b| a.absolute_path.cmp(&b.absolute_path));
    Ok(files)
}

fn walk_dir_recursive(
    current: &Path,
    root: &Path,
    files: &mut Vec<CatalogFile>,
) -> Result<(), std::io::Error> {
    for entry in std::fs::read_dir(current)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir_recursive(&path, root, files)?;
        } else if path.is_file() {
            if let Some(file) = try_parse_catalog_file(&path, root) {
                files.push(file);
            }
        }
    }
    Ok(())
}

fn try_parse_catalog_file(path: &Path, root: &Path) -> Option<CatalogFile> {
    if path.extension()? != "json" {
        return None;
    }
    let relative = path.strip_prefix(root).ok()?;
    let name = relative
        .with_extension("")
        .to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/");
    let category = path
        .parent()?
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Some(CatalogFile {
        name,
        absolute_path: path.to_path_buf(),
        category,
    })
}

/// The merged utility-class catalog.
#[derive(Debug, Clone, Default)]
pub struct ClassCatalog {
    classes: BTreeMap<String, ClassDefinition>,
    listing_only: BTreeMap<String, ClassDefinition>,
    issues: Vec<ParseError>,
}

impl ClassCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every catalog file under `dir`.
    ///
    /// Unreadable or undecodable files are skipped and recorded in
    /// [`issues`](Self::issues).
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut catalog = Self::new();

        let files = match walk_catalog_dir(dir) {
            Ok(files) => files,
            Err(err) => {
                catalog.record(ParseError::new(dir.display().to_string(), err));
                return catalog;
            }
        };

        for file in &files {
            match std::fs::read_to_string(&file.absolute_path) {
                Ok(json) => catalog.add_json(&file.name, &file.category, &json),
                Err(err) => catalog.record(ParseError::new(&file.name, err)),
            }
        }

        tracing::debug!(
            dir = %dir.display(),
            files = files.len(),
            classes = catalog.classes.len(),
            "class catalog loaded"
        );
        catalog
    }

    /// Adds the entries of one catalog document.
    pub fn add_json(&mut self, source_name: &str, default_category: &str, json: &str) {
        let entries: Map<String, Value> = match serde_json::from_str(json) {
            Ok(entries) => entries,
            Err(err) => {
                self.record(ParseError::new(source_name, err));
                return;
            }
        };

        for (name, value) in entries {
            match serde_json::from_value::<RawClassEntry>(value) {
                Ok(raw) => {
                    let category = raw.category.unwrap_or_else(|| default_category.to_string());
                    self.insert(ClassDefinition {
                        name,
                        declaration: raw.css,
                        source: ClassSource::Catalog,
                        category: Some(category),
                        title: raw.title,
                        description: raw.description,
                        tags: raw.tags,
                    });
                }
                Err(err) => {
                    self.record(ParseError::new(format!("{} ({})", source_name, name), err))
                }
            }
        }
    }

    /// Lists leaves of the variable catalog whose category is `variables`.
    pub fn add_variable_listing(&mut self, variables: &VariableCatalog) {
        for definition in variables.in_category(VARIABLES_CATEGORY) {
            let mut listed = ClassDefinition::new(
                &definition.name,
                &definition.css_value,
                ClassSource::VariableListing,
            );
            listed.category = Some(VARIABLES_CATEGORY.to_string());
            listed.title = definition.title.clone();
            listed.description = definition.description.clone();
            listed.tags = definition.tags.clone();
            self.listing_only.insert(listed.name.clone(), listed);
        }
    }

    pub fn insert(&mut self, definition: ClassDefinition) {
        self.classes.insert(definition.name.clone(), definition);
    }

    fn record(&mut self, issue: ParseError) {
        tracing::warn!(
            source = %issue.source_name,
            error = %issue.message,
            "class catalog entry skipped"
        );
        self.issues.push(issue);
    }

    pub fn get(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.get(name)
    }

    /// Compilable classes, sorted by raw name.
    pub fn iter(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.classes.values()
    }

    /// Listing-only entries taken from the variable catalog.
    pub fn listing_only(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.listing_only.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Problems found while loading.
    pub fn issues(&self) -> &[ParseError] {
        &self.issues
    }
}
