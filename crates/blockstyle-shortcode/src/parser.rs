//! Class-name shortcode parser.

use crate::error::{ShortcodeError, ShortcodeErrors};
use crate::pseudo::PseudoSelector;

/// One shortcode found in a class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassNameToken {
    /// `[innerblocks]`: style the block's inner-blocks container.
    InnerBlocks,
    /// `[before]`: style a `::before` overlay.
    Before,
    /// `[element~key:value~key:value]`: inline styles for the element itself.
    ElementStyles(Vec<(String, String)>),
    /// `[hover]`, `[first-child]`, ...
    Pseudo(PseudoSelector),
}

/// A class name split into the class actually applied in markup and the
/// shortcodes that decorate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassName {
    /// The name with every `[...]` segment removed.
    pub clean: String,
    /// Shortcodes in the order they appear.
    pub tokens: Vec<ClassNameToken>,
}

impl ClassName {
    /// Returns true when the name carried at least one recognized shortcode.
    pub fn has_tokens(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Returns the pseudo-selectors requested by the name.
    pub fn pseudo_selectors(&self) -> impl Iterator<Item = PseudoSelector> + '_ {
        self.tokens.iter().filter_map(|token| match token {
            ClassNameToken::Pseudo(p) => Some(*p),
            _ => None,
        })
    }
}

/// Parses a raw class name, dropping anything it cannot understand.
///
/// # Example
///
/// ```rust
/// use blockstyle_shortcode::{parse, ClassNameToken, PseudoSelector};
///
/// let name = parse("card[hover][before]");
/// assert_eq!(name.clean, "card");
/// assert_eq!(
///     name.tokens,
///     vec![
///         ClassNameToken::Pseudo(PseudoSelector::Hover),
///         ClassNameToken::Before,
///     ]
/// );
/// ```
pub fn parse(raw: &str) -> ClassName {
    parse_with_diagnostics(raw).0
}

/// Parses a raw class name and also reports every problem found.
pub fn parse_with_diagnostics(raw: &str) -> (ClassName, ShortcodeErrors) {
    let mut clean = String::with_capacity(raw.len());
    let mut tokens = Vec::new();
    let mut errors = ShortcodeErrors::default();

    let mut rest = raw;
    let mut offset = 0;

    while let Some(open) = rest.find('[') {
        clean.push_str(&rest[..open]);
        let start = offset + open;
        let after_open = &rest[open + 1..];

        let Some(close) = after_open.find(']') else {
            errors.push(ShortcodeError::Unterminated { position: start });
            rest = "";
            break;
        };

        let body = &after_open[..close];
        if let Some(token) = parse_token(body, start, &mut errors) {
            tokens.push(token);
        }

        let consumed = open + 1 + close + 1;
        rest = &rest[consumed..];
        offset += consumed;
    }
    clean.push_str(rest);

    (ClassName { clean, tokens }, errors)
}

/// Strips every `[...]` segment from a class name.
pub fn clean_name(raw: &str) -> String {
    if !raw.contains('[') {
        return raw.to_string();
    }
    parse(raw).clean
}

fn parse_token(
    body: &str,
    position: usize,
    errors: &mut ShortcodeErrors,
) -> Option<ClassNameToken> {
    let body = body.trim();

    match body {
        "innerblocks" => return Some(ClassNameToken::InnerBlocks),
        "before" => return Some(ClassNameToken::Before),
        _ => {}
    }

    if body == "element" || body.starts_with("element~") {
        return Some(ClassNameToken::ElementStyles(parse_element_styles(
            body, position, errors,
        )));
    }

    if let Some(pseudo) = PseudoSelector::from_name(body) {
        return Some(ClassNameToken::Pseudo(pseudo));
    }

    errors.push(ShortcodeError::UnknownShortcode {
        name: body.to_string(),
        position,
    });
    None
}

fn parse_element_styles(
    body: &str,
    position: usize,
    errors: &mut ShortcodeErrors,
) -> Vec<(String, String)> {
    // First segment is the literal `element`
    body.split('~')
        .skip(1)
        .filter(|pair| !pair.trim().is_empty())
        .filter_map(|pair| match pair.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() => {
                Some((key.trim().to_string(), value.trim().to_string()))
            }
            _ => {
                errors.push(ShortcodeError::MalformedStyle {
                    pair: pair.to_string(),
                    position,
                });
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_untouched() {
        let (name, errors) = parse_with_diagnostics("text--bold");
        assert_eq!(name.clean, "text--bold");
        assert!(name.tokens.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_single_pseudo() {
        let name = parse("text--bold[hover]");
        assert_eq!(name.clean, "text--bold");
        assert_eq!(name.tokens, vec![ClassNameToken::Pseudo(PseudoSelector::Hover)]);
    }

    #[test]
    fn test_innerblocks_and_before() {
        let name = parse("hero[innerblocks][before]");
        assert_eq!(name.clean, "hero");
        assert_eq!(
            name.tokens,
            vec![ClassNameToken::InnerBlocks, ClassNameToken::Before]
        );
    }

    #[test]
    fn test_element_styles() {
        let name = parse("overlay[before][element~color:red~padding: 0 1rem]");
        assert_eq!(name.clean, "overlay");
        assert_eq!(
            name.tokens[1],
            ClassNameToken::ElementStyles(vec![
                ("color".to_string(), "red".to_string()),
                ("padding".to_string(), "0 1rem".to_string()),
            ])
        );
    }

    #[test]
    fn test_element_value_keeps_inner_colons() {
        let name = parse("x[element~background:url(data:image/png)]");
        assert_eq!(
            name.tokens,
            vec![ClassNameToken::ElementStyles(vec![(
                "background".to_string(),
                "url(data:image/png)".to_string()
            )])]
        );
    }

    #[test]
    fn test_element_malformed_pair_reported() {
        let (name, errors) = parse_with_diagnostics("x[element~color~gap:1px]");
        assert_eq!(
            name.tokens,
            vec![ClassNameToken::ElementStyles(vec![(
                "gap".to_string(),
                "1px".to_string()
            )])]
        );
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.iter().next(),
            Some(ShortcodeError::MalformedStyle { pair, .. }) if pair == "color"
        ));
    }

    #[test]
    fn test_unknown_shortcode_stripped_and_reported() {
        let (name, errors) = parse_with_diagnostics("card[after][hover]");
        assert_eq!(name.clean, "card");
        assert_eq!(name.tokens, vec![ClassNameToken::Pseudo(PseudoSelector::Hover)]);
        assert!(matches!(
            errors.iter().next(),
            Some(ShortcodeError::UnknownShortcode { name, position: 4 }) if name == "after"
        ));
    }

    #[test]
    fn test_unterminated_drops_tail() {
        let (name, errors) = parse_with_diagnostics("card[hover");
        assert_eq!(name.clean, "card");
        assert!(name.tokens.is_empty());
        assert!(matches!(
            errors.iter().next(),
            Some(ShortcodeError::Unterminated { position: 4 })
        ));
    }

    #[test]
    fn test_shortcode_in_middle() {
        let name = parse("btn[hover]-primary");
        assert_eq!(name.clean, "btn-primary");
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("a[hover]"), "a");
        assert_eq!(clean_name("plain"), "plain");
    }

    #[test]
    fn test_pseudo_selectors_iter() {
        let name = parse("a[hover][before][focus-visible]");
        let pseudos: Vec<_> = name.pseudo_selectors().collect();
        assert_eq!(
            pseudos,
            vec![PseudoSelector::Hover, PseudoSelector::FocusVisible]
        );
    }
}
