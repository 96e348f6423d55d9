//! Design-token resolution and stylesheet generation for block editors.
//!
//! `blockstyle` merges layered style data into a minimal CSS payload:
//!
//! - a base catalog of variables, theme palette colors, brand colors with
//!   generated shade ramps, spacing and font-size scales, user variables
//! - a catalog of utility classes plus user-authored classes, whose names may
//!   carry shortcodes such as `card[hover]` or `hero[before]`
//! - per-block "default classes" compiled into composite classes
//!
//! Two render modes are served. The editor gets every class; a document's
//! frontend gets only the classes its blocks use. In both, the `:root{}`
//! block is pruned to the variables the emitted rules reference.
//!
//! ## Modules
//!
//! - [`color`]: hex/RGB/HSL conversion, shade ramps, alpha variants
//! - [`variables`]: the variable catalog, palette providers and the cached
//!   merged view
//! - [`classes`]: class catalogs and user classes
//! - [`expand`]: shortcode expansion into selectors
//! - [`usage`]: class usage collected from block trees
//! - [`compiler`]: stylesheet compilation
//! - [`patch`]: in-place edits of generated stylesheets
//! - [`admin`]: validated updates of the persisted documents
//! - [`store`]: the persistence boundary
//! - [`engine`]: the facade tying it together
//!
//! ## Example
//!
//! ```rust
//! use blockstyle::{Engine, EngineConfig, MemoryStore};
//!
//! let mut engine = Engine::new(EngineConfig::default(), Box::new(MemoryStore::new()));
//! engine
//!     .update_user_class(
//!         "card",
//!         "hover",
//!         [("opacity".to_string(), "0.8".to_string())].into(),
//!         false,
//!     )
//!     .unwrap();
//!
//! let css = engine.editor_stylesheet().css();
//! assert_eq!(css, r#"[class*="wp-block"].card:hover{opacity:0.8;}"#);
//! ```

pub mod admin;
pub mod block_defaults;
pub mod classes;
pub mod color;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod expand;
pub mod patch;
pub mod settings;
pub mod store;
pub mod usage;
pub mod variables;

pub use admin::{ColorUpdate, MutationResponse, Mutations};
pub use block_defaults::{BlockDefaults, BlockDefaultsUpdate, DEFAULT_SELECTOR};
pub use classes::{ClassCatalog, ClassDefinition, ClassRegistry, ClassSource};
pub use compiler::{CompileMode, CompiledStylesheet, StylesheetCompiler};
pub use config::{EngineConfig, Markers, PaletteConfig, PaletteKind};
pub use engine::{Engine, RenderContext};
pub use error::{EngineError, MutationError, ParseError, PersistenceError, ValidationError};
pub use expand::{ExpandContext, SelectorExpander};
pub use patch::{add_class, locate_class, remove_class};
pub use settings::{ColorToken, ScaleEntry, SystemVariables, UserCss};
pub use store::{JsonFileStore, MemoryStore, OptionStore};
pub use usage::{Block, UsageTracker};
pub use variables::{ThemePaletteProvider, VariableCache, VariableMap, VariableStore};
