//! Design-token variables.
//!
//! The variable view is built in layers, lowest precedence first:
//!
//! 1. the base catalog ([`VariableCatalog`], a nested JSON taxonomy)
//! 2. theme palette colors ([`ThemePaletteProvider`])
//! 3. system variables: brand colors with their shade ramps, spacing and
//!    font-size scales
//! 4. user variables
//!
//! [`VariableStore`] caches the merged [`VariableMap`] in an injected
//! [`VariableCache`] until a mutation invalidates it.

mod node;
mod palette;
mod store;

pub use node::{VariableCatalog, VariableDefinition, VariableLeaf, VariableNode};
pub use palette::{
    palette_provider_for, sync_tokens, GenericThemeJson, NoPalette, PaletteEntry,
    ThemePaletteProvider, VendorPalette,
};
pub use store::{
    color_variable_with_fallback, merge_overrides, Overrides, VariableCache, VariableMap,
    VariableStore,
};
