//! Bracket shortcodes embedded in blockstyle class names.
//!
//! A class name such as `card[hover]` or `hero[before][element~color:#fff]`
//! names one real CSS class (`card`, `hero`) plus shortcodes that decide which
//! selectors the class's declarations are emitted under. This crate turns the
//! raw string into a [`ClassName`]: the cleaned class plus a list of
//! [`ClassNameToken`]s.
//!
//! | Shortcode | Token |
//! |-----------|-------|
//! | `[innerblocks]` | [`ClassNameToken::InnerBlocks`] |
//! | `[before]` | [`ClassNameToken::Before`] |
//! | `[element~k:v~k:v]` | [`ClassNameToken::ElementStyles`] |
//! | `[hover]`, `[checked]`, ... | [`ClassNameToken::Pseudo`] |
//!
//! Parsing never fails. Unknown shortcodes and unterminated brackets are
//! removed from the cleaned name and reported through
//! [`parse_with_diagnostics`].

mod error;
mod parser;
mod pseudo;

pub use error::{ShortcodeError, ShortcodeErrors};
pub use parser::{clean_name, parse, parse_with_diagnostics, ClassName, ClassNameToken};
pub use pseudo::{PseudoSelector, UnknownPseudoSelector};
