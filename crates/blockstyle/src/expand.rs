//! Expansion of shortcode class names into concrete selectors.
//!
//! A class name without `[` expands to itself. Otherwise every shortcode
//! contributes one or more selectors built on the cleaned name:
//!
//! | shortcode | editor | frontend |
//! |---|---|---|
//! | `[innerblocks]` | `c:not(:has(<inner>))`, `c > <inner> > <layout>` | `c` |
//! | `[before]` | `c::before`, `c > *:not(<video>)`, `c > <video>` | same |
//! | `[element~k:v]` | `c` with `k: v; ` | same |
//! | `[hover]` etc. | `c:hover` | same |
//!
//! Selectors are relative: the compiler prepends the selector prefix and the
//! class dot.

use blockstyle_shortcode::{parse_with_diagnostics, ClassNameToken, ShortcodeErrors};

use crate::config::Markers;

/// Where the stylesheet is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpandContext {
    Editor,
    Frontend,
}

/// What part of the block a rule styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// The block element itself.
    Element,
    PseudoClass,
    PseudoElement,
    /// Children or wrappers of the block.
    Structural,
}

/// One selector and the declaration it receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedRule {
    pub selector: String,
    pub declaration: String,
    pub kind: RuleKind,
}

/// The result of expanding one raw class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// The class applied in markup.
    pub clean: String,
    /// Rules in first-emitted order.
    pub rules: Vec<ExpandedRule>,
    /// Shortcodes that were dropped.
    pub diagnostics: ShortcodeErrors,
}

impl Expansion {
    fn push(&mut self, selector: String, declaration: impl Into<String>, kind: RuleKind) {
        let declaration = declaration.into();
        match self.rules.iter_mut().find(|rule| rule.selector == selector) {
            Some(existing) => {
                existing.declaration = declaration;
                existing.kind = kind;
            }
            None => self.rules.push(ExpandedRule {
                selector,
                declaration,
                kind,
            }),
        }
    }
}

/// Expands class names using the configured host markers.
#[derive(Debug, Clone, Default)]
pub struct SelectorExpander {
    markers: Markers,
}

impl SelectorExpander {
    pub fn new(markers: Markers) -> Self {
        Self { markers }
    }

    pub fn expand(&self, raw_name: &str, declaration: &str, context: ExpandContext) -> Expansion {
        if !raw_name.contains('[') {
            return Expansion {
                clean: raw_name.to_string(),
                rules: vec![ExpandedRule {
                    selector: raw_name.to_string(),
                    declaration: declaration.to_string(),
                    kind: RuleKind::Element,
                }],
                diagnostics: ShortcodeErrors::default(),
            };
        }

        let (name, diagnostics) = parse_with_diagnostics(raw_name);
        let clean = name.clean;
        let mut expansion = Expansion {
            clean: clean.clone(),
            rules: Vec::new(),
            diagnostics,
        };

        if name.tokens.is_empty() {
            expansion.push(clean, declaration, RuleKind::Element);
            return expansion;
        }

        let markers = &self.markers;
        for token in &name.tokens {
            match token {
                ClassNameToken::InnerBlocks => match context {
                    ExpandContext::Editor => {
                        expansion.push(
                            format!("{}:not(:has({}))", clean, markers.inner_blocks),
                            declaration,
                            RuleKind::Structural,
                        );
                        expansion.push(
                            format!(
                                "{} > {} > {}",
                                clean, markers.inner_blocks, markers.inner_blocks_layout
                            ),
                            declaration,
                            RuleKind::Structural,
                        );
                    }
                    ExpandContext::Frontend => {
                        expansion.push(clean.clone(), declaration, RuleKind::Element);
                    }
                },
                ClassNameToken::Before => {
                    expansion.push(
                        format!("{}::before", clean),
                        declaration,
                        RuleKind::PseudoElement,
                    );
                    expansion.push(
                        format!("{} > *:not({})", clean, markers.video_background),
                        "position: relative;",
                        RuleKind::Structural,
                    );
                    expansion.push(
                        format!("{} > {}", clean, markers.video_background),
                        "z-index: -1;",
                        RuleKind::Structural,
                    );
                }
                ClassNameToken::ElementStyles(pairs) => {
                    let inline: String = pairs
                        .iter()
                        .map(|(key, value)| format!("{}: {}; ", key, value))
                        .collect();
                    expansion.push(clean.clone(), inline, RuleKind::Element);
                }
                ClassNameToken::Pseudo(pseudo) => {
                    expansion.push(
                        format!("{}:{}", clean, pseudo),
                        declaration,
                        RuleKind::PseudoClass,
                    );
                }
            }
        }

        expansion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expander() -> SelectorExpander {
        SelectorExpander::new(Markers::default())
    }

    fn selectors(expansion: &Expansion) -> Vec<&str> {
        expansion.rules.iter().map(|r| r.selector.as_str()).collect()
    }

    #[test]
    fn test_plain_name_is_identity() {
        let expansion = expander().expand("text--bold", "font-weight:700;", ExpandContext::Editor);
        assert_eq!(expansion.clean, "text--bold");
        assert_eq!(expansion.rules.len(), 1);
        assert_eq!(expansion.rules[0].selector, "text--bold");
        assert_eq!(expansion.rules[0].declaration, "font-weight:700;");
    }

    #[test]
    fn test_pseudo() {
        let expansion =
            expander().expand("text--bold[hover]", "font-weight:700;", ExpandContext::Frontend);
        assert_eq!(selectors(&expansion), vec!["text--bold:hover"]);
        assert_eq!(expansion.rules[0].kind, RuleKind::PseudoClass);
    }

    #[test]
    fn test_innerblocks_by_context() {
        let editor = expander().expand("stack[innerblocks]", "gap:1rem;", ExpandContext::Editor);
        assert_eq!(
            selectors(&editor),
            vec![
                "stack:not(:has(.block-editor-inner-blocks))",
                "stack > .block-editor-inner-blocks > .block-editor-block-list__layout",
            ]
        );

        let frontend =
            expander().expand("stack[innerblocks]", "gap:1rem;", ExpandContext::Frontend);
        assert_eq!(selectors(&frontend), vec!["stack"]);
    }

    #[test]
    fn test_before_adds_stacking_rules() {
        let expansion =
            expander().expand("overlay[before]", "background:#000;", ExpandContext::Editor);
        assert_eq!(expansion.rules.len(), 3);
        assert_eq!(expansion.rules[0].selector, "overlay::before");
        assert_eq!(expansion.rules[0].declaration, "background:#000;");
        assert_eq!(
            expansion.rules[1].selector,
            "overlay > *:not(.wp-block-cover__video-background)"
        );
        assert_eq!(expansion.rules[1].declaration, "position: relative;");
        assert_eq!(expansion.rules[2].declaration, "z-index: -1;");
    }

    #[test]
    fn test_element_styles() {
        let expansion = expander().expand(
            "hero[element~display:flex~gap:2rem]",
            "color:red;",
            ExpandContext::Frontend,
        );
        assert_eq!(expansion.rules.len(), 1);
        assert_eq!(expansion.rules[0].selector, "hero");
        assert_eq!(expansion.rules[0].declaration, "display: flex; gap: 2rem; ");
        assert_eq!(expansion.rules[0].kind, RuleKind::Element);
    }

    #[test]
    fn test_tokens_accumulate() {
        let expansion =
            expander().expand("card[hover][focus-visible]", "outline:0;", ExpandContext::Editor);
        assert_eq!(selectors(&expansion), vec!["card:hover", "card:focus-visible"]);
    }

    #[test]
    fn test_plain_focus_is_not_a_pseudo_shortcode() {
        let expansion = expander().expand("card[focus]", "outline:0;", ExpandContext::Editor);
        assert_eq!(selectors(&expansion), vec!["card"]);
        assert_eq!(expansion.rules[0].kind, RuleKind::Element);
    }

    #[test]
    fn test_exact_collision_overwrites() {
        let expansion = expander().expand(
            "card[element~color:red][element~color:blue]",
            "",
            ExpandContext::Editor,
        );
        assert_eq!(expansion.rules.len(), 1);
        assert_eq!(expansion.rules[0].declaration, "color: blue; ");
    }

    #[test]
    fn test_unknown_shortcode_falls_back_to_clean_name() {
        let expansion = expander().expand("card[wobble]", "color:red;", ExpandContext::Editor);
        assert_eq!(selectors(&expansion), vec!["card"]);
        assert_eq!(expansion.diagnostics.len(), 1);
    }

    #[test]
    fn test_custom_markers() {
        let markers = Markers {
            video_background: ".bg-video".to_string(),
            ..Markers::default()
        };
        let expansion =
            SelectorExpander::new(markers).expand("hero[before]", "", ExpandContext::Frontend);
        assert_eq!(expansion.rules[2].selector, "hero > .bg-video");
    }
}
