//! The pseudo-class shortcodes a class name may carry.

use std::fmt;
use std::str::FromStr;

/// A CSS pseudo-class that can be requested with a `[name]` shortcode.
///
/// The same ten names key user-authored classes, so the set is shared by the
/// parser and by the stylesheet engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PseudoSelector {
    Hover,
    Active,
    FocusVisible,
    FocusWithin,
    Disabled,
    Checked,
    Visited,
    FirstChild,
    LastChild,
    OnlyChild,
}

impl PseudoSelector {
    /// Every recognized pseudo-selector, in declaration order.
    pub const ALL: [PseudoSelector; 10] = [
        PseudoSelector::Hover,
        PseudoSelector::Active,
        PseudoSelector::FocusVisible,
        PseudoSelector::FocusWithin,
        PseudoSelector::Disabled,
        PseudoSelector::Checked,
        PseudoSelector::Visited,
        PseudoSelector::FirstChild,
        PseudoSelector::LastChild,
        PseudoSelector::OnlyChild,
    ];

    /// The CSS spelling, without the leading colon.
    pub fn as_str(&self) -> &'static str {
        match self {
            PseudoSelector::Hover => "hover",
            PseudoSelector::Active => "active",
            PseudoSelector::FocusVisible => "focus-visible",
            PseudoSelector::FocusWithin => "focus-within",
            PseudoSelector::Disabled => "disabled",
            PseudoSelector::Checked => "checked",
            PseudoSelector::Visited => "visited",
            PseudoSelector::FirstChild => "first-child",
            PseudoSelector::LastChild => "last-child",
            PseudoSelector::OnlyChild => "only-child",
        }
    }

    /// Looks up a pseudo-selector by its CSS spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for PseudoSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a recognized pseudo-selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPseudoSelector(pub String);

impl fmt::Display for UnknownPseudoSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown pseudo-selector '{}'", self.0)
    }
}

impl std::error::Error for UnknownPseudoSelector {}

impl FromStr for PseudoSelector {
    type Err = UnknownPseudoSelector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownPseudoSelector(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for pseudo in PseudoSelector::ALL {
            assert_eq!(PseudoSelector::from_name(pseudo.as_str()), Some(pseudo));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(PseudoSelector::from_name("focus"), None);
        assert_eq!(PseudoSelector::from_name("Hover"), None);

        let err = "nth-child".parse::<PseudoSelector>().unwrap_err();
        assert!(err.to_string().contains("nth-child"));
    }

    #[test]
    fn test_display_matches_css() {
        assert_eq!(PseudoSelector::FocusWithin.to_string(), "focus-within");
        assert_eq!(PseudoSelector::OnlyChild.to_string(), "only-child");
    }
}
