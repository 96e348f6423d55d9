//! Diagnostics produced while parsing shortcodes.

use std::fmt;

/// A problem found in a class name's shortcodes.
///
/// None of these are fatal: the offending shortcode is dropped and parsing
/// continues with the rest of the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcodeError {
    /// A `[...]` segment whose name is not a known shortcode.
    UnknownShortcode { name: String, position: usize },
    /// A `[` with no matching `]`.
    Unterminated { position: usize },
    /// An `element` pair that is not `key:value`.
    MalformedStyle { pair: String, position: usize },
}

impl fmt::Display for ShortcodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortcodeError::UnknownShortcode { name, position } => {
                write!(f, "unknown shortcode '[{}]' at byte {}", name, position)
            }
            ShortcodeError::Unterminated { position } => {
                write!(f, "unterminated shortcode starting at byte {}", position)
            }
            ShortcodeError::MalformedStyle { pair, position } => {
                write!(
                    f,
                    "malformed element style '{}' in shortcode at byte {}: expected key:value",
                    pair, position
                )
            }
        }
    }
}

impl std::error::Error for ShortcodeError {}

/// All diagnostics collected for a single class name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcodeErrors(Vec<ShortcodeError>);

impl ShortcodeErrors {
    pub(crate) fn push(&mut self, error: ShortcodeError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShortcodeError> {
        self.0.iter()
    }
}

impl fmt::Display for ShortcodeErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ShortcodeErrors {}

impl IntoIterator for ShortcodeErrors {
    type Item = ShortcodeError;
    type IntoIter = std::vec::IntoIter<ShortcodeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
