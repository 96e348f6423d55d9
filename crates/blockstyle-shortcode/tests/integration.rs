use blockstyle_shortcode::{
    clean_name, parse, parse_with_diagnostics, ClassNameToken, PseudoSelector,
};
use proptest::prelude::*;

#[test]
fn test_every_pseudo_shortcode_parses() {
    for pseudo in PseudoSelector::ALL {
        let raw = format!("link[{}]", pseudo);
        let name = parse(&raw);
        assert_eq!(name.clean, "link");
        assert_eq!(name.tokens, vec![ClassNameToken::Pseudo(pseudo)]);
    }
}

#[test]
fn test_mixed_shortcodes_keep_order() {
    let (name, errors) =
        parse_with_diagnostics("panel[innerblocks][hover][element~gap:2rem][before]");
    assert!(errors.is_empty());
    assert_eq!(name.clean, "panel");
    assert_eq!(
        name.tokens,
        vec![
            ClassNameToken::InnerBlocks,
            ClassNameToken::Pseudo(PseudoSelector::Hover),
            ClassNameToken::ElementStyles(vec![("gap".to_string(), "2rem".to_string())]),
            ClassNameToken::Before,
        ]
    );
}

#[test]
fn test_diagnostics_do_not_stop_parsing() {
    let (name, errors) = parse_with_diagnostics("a[nope][hover][");
    assert_eq!(name.clean, "a");
    assert_eq!(name.tokens.len(), 1);
    assert_eq!(errors.len(), 2);
    let text = errors.to_string();
    assert!(text.contains("unknown shortcode"));
    assert!(text.contains("unterminated"));
}

proptest! {
    #[test]
    fn prop_cleaned_name_has_no_brackets(raw in "[a-z\\-\\[\\]~:]{0,40}") {
        let cleaned = clean_name(&raw);
        prop_assert!(!cleaned.contains('['));
    }

    #[test]
    fn prop_names_without_brackets_are_identity(raw in "[a-z0-9\\-_]{0,32}") {
        let name = parse(&raw);
        prop_assert_eq!(name.clean, raw);
        prop_assert!(name.tokens.is_empty());
    }
}
