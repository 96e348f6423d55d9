//! User-authored classes.

use std::collections::BTreeMap;

use blockstyle_shortcode::PseudoSelector;

use crate::settings::{PropertyMap, UserClassMap};

/// How a pseudo-selector variant is keyed in the flattened map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserClassKeys {
    /// `btn[hover]`, understood by the selector expander.
    Shortcode,
    /// `btn:hover`, for display.
    Selector,
}

/// Joins a property map into a `prop:value;` declaration string.
pub fn join_properties(properties: &PropertyMap) -> String {
    properties
        .iter()
        .filter(|(prop, _)| !prop.trim().is_empty())
        .map(|(prop, value)| format!("{}:{};", prop.trim(), value.trim()))
        .collect()
}

/// Flattens user classes to `name -> declaration`.
///
/// Variants keyed by one of the recognized pseudo-selectors become
/// `class[pseudo]` or `class:pseudo`; any other key (normally `default`)
/// maps to the bare class name. Declarations landing on the same key are
/// concatenated.
pub fn user_classes(classes: &UserClassMap, keys: UserClassKeys) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();

    for (class, variants) in classes {
        for (selector, properties) in variants {
            let declaration = join_properties(properties);
            if declaration.is_empty() {
                continue;
            }

            let key = match (PseudoSelector::from_name(selector), keys) {
                (Some(pseudo), UserClassKeys::Shortcode) => format!("{}[{}]", class, pseudo),
                (Some(pseudo), UserClassKeys::Selector) => format!("{}:{}", class, pseudo),
                (None, _) => class.clone(),
            };
            flat.entry(key)
                .and_modify(|existing: &mut String| existing.push_str(&declaration))
                .or_insert(declaration);
        }
    }

    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classes() -> UserClassMap {
        serde_json::from_str(
            r#"{
                "card": {
                    "default": { "padding": "1rem", "border-radius": "8px" },
                    "hover": { "box-shadow": "0 0 4px var(--color--primary--30)" },
                    "first-child": { "margin-top": "0" }
                },
                "empty": { "default": {} }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_shortcode_keys() {
        let flat = user_classes(&classes(), UserClassKeys::Shortcode);
        assert_eq!(flat["card"], "padding:1rem;border-radius:8px;");
        assert_eq!(
            flat["card[hover]"],
            "box-shadow:0 0 4px var(--color--primary--30);"
        );
        assert_eq!(flat["card[first-child]"], "margin-top:0;");
        assert!(!flat.contains_key("empty"));
    }

    #[test]
    fn test_selector_keys() {
        let flat = user_classes(&classes(), UserClassKeys::Selector);
        assert!(flat.contains_key("card:hover"));
        assert!(flat.contains_key("card:first-child"));
        assert!(flat.contains_key("card"));
    }

    #[test]
    fn test_unknown_selector_key_falls_back_to_bare_name() {
        let classes: UserClassMap = serde_json::from_value(json!({
            "tile": { "default": { "color": "red" }, "mobile": { "font-size": "12px" } }
        }))
        .unwrap();
        let flat = user_classes(&classes, UserClassKeys::Shortcode);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat["tile"], "color:red;font-size:12px;");
    }

    #[test]
    fn test_declarations_keep_authored_order() {
        let classes: UserClassMap =
            serde_json::from_str(r#"{"pad":{"default":{"padding-top":"2rem","padding":"0"}}}"#)
                .unwrap();
        let flat = user_classes(&classes, UserClassKeys::Shortcode);
        assert_eq!(flat["pad"], "padding-top:2rem;padding:0;");

        let mut properties = PropertyMap::new();
        properties.insert("padding".to_string(), "0".to_string());
        properties.insert("padding-top".to_string(), "2rem".to_string());
        assert_eq!(join_properties(&properties), "padding:0;padding-top:2rem;");
    }
}
