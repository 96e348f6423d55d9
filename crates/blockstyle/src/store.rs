//! Persistence boundary.
//!
//! The engine keeps its documents in a key/value [`OptionStore`] supplied by
//! the host:
//!
//! | key | contents |
//! |---|---|
//! | `system_variables` | [`SystemVariables`] |
//! | `user_css` | [`UserCss`] |
//! | `block_defaults` | [`BlockDefaults`] |
//! | `used_classes:<document>` | class names used by one document |
//!
//! Reads never fail: a missing or undecodable document yields the default
//! value and a warning.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::block_defaults::BlockDefaults;
use crate::error::PersistenceError;
use crate::settings::{SystemVariables, UserCss};

pub const SYSTEM_VARIABLES_KEY: &str = "system_variables";
pub const USER_CSS_KEY: &str = "user_css";
pub const BLOCK_DEFAULTS_KEY: &str = "block_defaults";

/// Key of the class usage recorded for one document.
pub fn used_classes_key(document: &str) -> String {
    format!("used_classes:{}", document)
}

/// Key/value storage for the engine's persisted documents.
pub trait OptionStore {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&mut self, key: &str, value: Value) -> Result<(), PersistenceError>;
}

/// In-memory store, mostly for tests and short-lived hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail.
    pub fn read_only() -> Self {
        Self {
            values: BTreeMap::new(),
            read_only: true,
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl OptionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), PersistenceError> {
        if self.read_only {
            return Err(PersistenceError::new(key, "store is read-only"));
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// One pretty-printed `<key>.json` file per key under a directory.
///
/// Characters outside `[A-Za-z0-9_-]` in a key are written as `_`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file))
    }
}

impl OptionStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        let json = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "stored document is not JSON");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(&value).map_err(|e| PersistenceError::new(key, e))?;
        std::fs::create_dir_all(&self.dir).map_err(|e| PersistenceError::new(key, e))?;
        std::fs::write(self.path_for(key), json).map_err(|e| PersistenceError::new(key, e))
    }
}

/// Reads and decodes a document, falling back to its default.
pub fn load_or_default<T>(store: &dyn OptionStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(value) = store.get(key) else {
        return T::default();
    };
    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::warn!(key, error = %err, "stored document ignored");
            T::default()
        }
    }
}

/// Encodes and writes a document.
pub fn save<T: Serialize>(
    store: &mut dyn OptionStore,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let value = serde_json::to_value(value).map_err(|e| PersistenceError::new(key, e))?;
    store.set(key, value)
}

pub fn system_variables(store: &dyn OptionStore) -> SystemVariables {
    load_or_default(store, SYSTEM_VARIABLES_KEY)
}

pub fn user_css(store: &dyn OptionStore) -> UserCss {
    load_or_default(store, USER_CSS_KEY)
}

pub fn block_defaults(store: &dyn OptionStore) -> BlockDefaults {
    load_or_default(store, BLOCK_DEFAULTS_KEY)
}

/// The classes recorded for a document, or `None` when nothing was recorded.
pub fn used_classes(store: &dyn OptionStore, document: &str) -> Option<Vec<String>> {
    let key = used_classes_key(document);
    let value = store.get(&key)?;
    match serde_json::from_value(value) {
        Ok(classes) => Some(classes),
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "stored class usage ignored");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ColorToken;
    use serde_json::json;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.get("missing").is_none());
        store.set("k", json!({"a": 1})).unwrap();
        assert_eq!(store.get("k"), Some(json!({"a": 1})));
    }

    #[test]
    fn test_read_only_store_fails_writes() {
        let mut store = MemoryStore::read_only();
        let err = store.set("user_css", json!({})).unwrap_err();
        assert_eq!(err.key, "user_css");
    }

    #[test]
    fn test_defaults_when_missing_or_invalid() {
        let store = MemoryStore::new().with_value(SYSTEM_VARIABLES_KEY, json!({"colors": "nope"}));
        let system = system_variables(&store);
        assert_eq!(system, SystemVariables::default());
        assert_eq!(user_css(&store), UserCss::default());
        assert!(block_defaults(&store).is_empty());
    }

    #[test]
    fn test_block_defaults_legacy_decoded() {
        let store =
            MemoryStore::new().with_value(BLOCK_DEFAULTS_KEY, json!({"core/button": ["a", "b"]}));
        let defaults = block_defaults(&store);
        assert_eq!(
            defaults.get("core/button").unwrap()["default"],
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_used_classes() {
        let store = MemoryStore::new()
            .with_value(used_classes_key("42"), json!(["card", "text--bold"]))
            .with_value(used_classes_key("7"), json!({"bad": true}));
        assert_eq!(
            used_classes(&store, "42"),
            Some(vec!["card".to_string(), "text--bold".to_string()])
        );
        assert_eq!(used_classes(&store, "7"), None);
        assert_eq!(used_classes(&store, "1"), None);
    }

    #[test]
    fn test_json_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("options"));

        let mut system = SystemVariables::default();
        system.colors.push(ColorToken::new("primary", "#3366ff"));
        save(&mut store, SYSTEM_VARIABLES_KEY, &system).unwrap();
        save(&mut store, &used_classes_key("home"), &vec!["card"]).unwrap();

        assert!(dir.path().join("options/system_variables.json").is_file());
        assert!(dir.path().join("options/used_classes_home.json").is_file());

        let reopened = JsonFileStore::new(dir.path().join("options"));
        assert_eq!(system_variables(&reopened), system);
        assert_eq!(used_classes(&reopened, "home"), Some(vec!["card".to_string()]));
    }

    #[test]
    fn test_json_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("user_css.json"), "{ nope").unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.get(USER_CSS_KEY).is_none());
    }
}
