//! Stylesheet compilation.
//!
//! A compile selects the active classes for the mode, expands their
//! shortcodes, minifies the declarations and prefixes the selectors. The
//! block-default composites are appended, and finally a `:root{}` block is
//! emitted holding only the variables the rules reference.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::block_defaults::{BlockDefaults, DEFAULT_SELECTOR};
use crate::config::EngineConfig;
use crate::expand::{ExpandContext, RuleKind, SelectorExpander};
use crate::variables::VariableMap;

static AFTER_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([:;])\s+").expect("separator pattern is valid"));

static VAR_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"var\(--([a-zA-Z][\w-]+)").expect("var pattern is valid"));

/// Which classes a compile emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompileMode {
    /// Every known class.
    Editor,
    /// Only the classes a document uses.
    Frontend,
}

impl CompileMode {
    fn context(self) -> ExpandContext {
        match self {
            CompileMode::Editor => ExpandContext::Editor,
            CompileMode::Frontend => ExpandContext::Frontend,
        }
    }
}

/// Compiler output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledStylesheet {
    /// Variables referenced by `rules`, sorted by name.
    ///
    /// Also holds every variable referenced from inside another emitted
    /// value, followed transitively, so `--a:var(--b)` brings `--b` along
    /// even when `rules` never names it.
    pub root_variables: BTreeMap<String, String>,
    /// Concatenated rules.
    pub rules: String,
}

impl CompiledStylesheet {
    pub fn is_empty(&self) -> bool {
        self.root_variables.is_empty() && self.rules.is_empty()
    }

    /// The `:root{}` block, or an empty string when no variable is used.
    pub fn root_block(&self) -> String {
        if self.root_variables.is_empty() {
            return String::new();
        }
        let declarations: String = self
            .root_variables
            .iter()
            .map(|(name, value)| format!("--{}:{};", name, value))
            .collect();
        format!(":root{{{}}}", declarations)
    }

    /// The full stylesheet text.
    pub fn css(&self) -> String {
        format!("{}{}", self.root_block(), self.rules)
    }
}

/// Drops whitespace after `:` and `;` and trims the ends.
pub fn minify_declaration(declaration: &str) -> String {
    AFTER_SEPARATOR
        .replace_all(declaration, "$1")
        .trim()
        .to_string()
}

/// Collects the names of every `var(--name` reference in `text`.
pub fn scan_variables(text: &str, into: &mut BTreeSet<String>) {
    for capture in VAR_REFERENCE.captures_iter(text) {
        into.insert(capture[1].to_string());
    }
}

/// Compiles classes against a merged variable view.
#[derive(Debug)]
pub struct StylesheetCompiler<'a> {
    classes: &'a BTreeMap<String, String>,
    variables: &'a VariableMap,
    expander: SelectorExpander,
    selector_prefix: &'a str,
    default_class_prefix: &'a str,
}

impl<'a> StylesheetCompiler<'a> {
    /// `classes` maps raw class names to declarations, user entries already
    /// merged over the catalog.
    pub fn new(
        config: &'a EngineConfig,
        classes: &'a BTreeMap<String, String>,
        variables: &'a VariableMap,
    ) -> Self {
        Self {
            classes,
            variables,
            expander: SelectorExpander::new(config.markers.clone()),
            selector_prefix: &config.selector_prefix,
            default_class_prefix: &config.default_class_prefix,
        }
    }

    /// Compiles a stylesheet.
    ///
    /// In frontend mode `used` lists the classes the document applies; with
    /// no usage recorded (`None`) the result is empty. Classes named by
    /// `block_defaults` are always active.
    pub fn compile(
        &self,
        mode: CompileMode,
        used: Option<&[String]>,
        block_defaults: &BlockDefaults,
    ) -> CompiledStylesheet {
        let active: Vec<(&str, &str)> = match mode {
            CompileMode::Editor => self.entries().collect(),
            CompileMode::Frontend => {
                let Some(used) = used else {
                    return CompiledStylesheet::default();
                };
                let wanted: HashSet<&str> = used
                    .iter()
                    .map(String::as_str)
                    .chain(block_defaults.class_names())
                    .collect();
                self.entries()
                    .filter(|(raw, _)| {
                        wanted.contains(blockstyle_shortcode::clean_name(raw).as_str())
                    })
                    .collect()
            }
        };

        if mode == CompileMode::Frontend && active.is_empty() && block_defaults.is_empty() {
            return CompiledStylesheet::default();
        }

        let mut rules = String::new();
        let mut referenced = BTreeSet::new();
        for (raw, declaration) in &active {
            self.emit_class(raw, declaration, mode.context(), &mut rules, &mut referenced);
        }
        self.emit_block_defaults(block_defaults, &mut rules, &mut referenced);

        let stylesheet = CompiledStylesheet {
            root_variables: self.root_variables(referenced),
            rules,
        };
        tracing::debug!(
            ?mode,
            classes = active.len(),
            variables = stylesheet.root_variables.len(),
            "stylesheet compiled"
        );
        stylesheet
    }

    /// Compiles every raw entry whose cleaned name is `name`.
    pub fn compile_class(&self, name: &str, context: ExpandContext) -> CompiledStylesheet {
        let mut rules = String::new();
        let mut referenced = BTreeSet::new();
        for (raw, declaration) in self.entries_named(name) {
            self.emit_class(raw, declaration, context, &mut rules, &mut referenced);
        }
        CompiledStylesheet {
            root_variables: self.root_variables(referenced),
            rules,
        }
    }

    fn entries(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.classes.iter().map(|(raw, decl)| (raw.as_str(), decl.as_str()))
    }

    fn entries_named<'n>(&self, name: &'n str) -> impl Iterator<Item = (&'a str, &'a str)> + 'n
    where
        'a: 'n,
    {
        self.entries()
            .filter(move |(raw, _)| blockstyle_shortcode::clean_name(raw) == name)
    }

    fn emit_class(
        &self,
        raw: &str,
        declaration: &str,
        context: ExpandContext,
        rules: &mut String,
        referenced: &mut BTreeSet<String>,
    ) {
        let expansion = self.expander.expand(raw, declaration, context);
        if !expansion.diagnostics.is_empty() {
            tracing::warn!(class = raw, problems = %expansion.diagnostics, "shortcodes dropped");
        }
        for rule in &expansion.rules {
            let declaration = minify_declaration(&rule.declaration);
            scan_variables(&declaration, referenced);
            rules.push_str(&format!(
                "{}.{}{{{}}}",
                self.selector_prefix, rule.selector, declaration
            ));
        }
    }

    fn emit_block_defaults(
        &self,
        block_defaults: &BlockDefaults,
        rules: &mut String,
        referenced: &mut BTreeSet<String>,
    ) {
        for (block, selector, classes) in block_defaults.iter() {
            let mut declaration = String::new();
            for class in classes {
                for (raw, class_declaration) in self.entries_named(class) {
                    let expansion =
                        self.expander.expand(raw, class_declaration, ExpandContext::Frontend);
                    for rule in expansion.rules {
                        if matches!(rule.kind, RuleKind::Element | RuleKind::PseudoClass) {
                            declaration.push_str(&minify_declaration(&rule.declaration));
                        }
                    }
                }
            }
            if declaration.is_empty() {
                continue;
            }

            scan_variables(&declaration, referenced);
            let pseudo = if selector == DEFAULT_SELECTOR {
                String::new()
            } else {
                format!(":{}", selector)
            };
            rules.push_str(&format!(
                "{}.{}{}{}{{{}}}",
                self.selector_prefix,
                self.default_class_prefix,
                block.replace('/', "-"),
                pseudo,
                declaration
            ));
        }
    }

    /// Resolves referenced names against the variable view, following
    /// references inside emitted values.
    fn root_variables(&self, referenced: BTreeSet<String>) -> BTreeMap<String, String> {
        let mut root = BTreeMap::new();
        let mut pending: Vec<String> = referenced.into_iter().collect();

        while let Some(name) = pending.pop() {
            if root.contains_key(&name) {
                continue;
            }
            let Some(value) = self.variables.value(&name) else {
                continue;
            };
            let mut nested = BTreeSet::new();
            scan_variables(value, &mut nested);
            pending.extend(nested.into_iter().filter(|n| !root.contains_key(n)));
            root.insert(name, value.to_string());
        }

        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::VariableDefinition;

    fn variables() -> VariableMap {
        let mut map = VariableMap::new();
        for (name, value) in [
            ("color--primary", "#3366ff"),
            ("color--accent", "var(--color--primary)"),
            ("space--m", "1.5rem"),
            ("space--l", "2rem"),
        ] {
            map.insert(VariableDefinition::new(name, value, "test"));
        }
        map
    }

    fn classes() -> BTreeMap<String, String> {
        [
            ("text--bold", "font-weight: 700;"),
            ("text--bold[hover]", "color: var(--color--primary);"),
            ("pad--m", "padding: var(--space--m);"),
            ("link", "color: var(--color--accent); text-decoration: var(--missing);"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_minify_declaration() {
        assert_eq!(
            minify_declaration("  color: red;  margin: 0 auto; "),
            "color:red;margin:0 auto;"
        );
    }

    #[test]
    fn test_editor_emits_everything() {
        let config = EngineConfig::default();
        let (classes, variables) = (classes(), variables());
        let compiled = StylesheetCompiler::new(&config, &classes, &variables).compile(
            CompileMode::Editor,
            None,
            &BlockDefaults::new(),
        );

        assert!(compiled.rules.contains(r#"[class*="wp-block"].text--bold{font-weight:700;}"#));
        assert!(compiled
            .rules
            .contains(r#"[class*="wp-block"].text--bold:hover{color:var(--color--primary);}"#));
        assert!(compiled.rules.contains(r#"[class*="wp-block"].pad--m{padding:var(--space--m);}"#));
        assert!(compiled.root_variables.contains_key("space--m"));
        assert!(!compiled.root_variables.contains_key("space--l"));
        assert!(!compiled.root_variables.contains_key("missing"));
    }

    #[test]
    fn test_transitive_variables() {
        let config = EngineConfig::default();
        let (classes, variables) = (classes(), variables());
        let used = vec!["link".to_string()];
        let compiled = StylesheetCompiler::new(&config, &classes, &variables).compile(
            CompileMode::Frontend,
            Some(&used),
            &BlockDefaults::new(),
        );

        let names: Vec<&str> = compiled.root_variables.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["color--accent", "color--primary"]);
        assert!(compiled
            .css()
            .starts_with(":root{--color--accent:var(--color--primary);--color--primary:#3366ff;}"));
    }

    #[test]
    fn test_frontend_filters_by_clean_name() {
        let config = EngineConfig::default();
        let (classes, variables) = (classes(), variables());
        let used = vec!["text--bold".to_string()];
        let compiled = StylesheetCompiler::new(&config, &classes, &variables).compile(
            CompileMode::Frontend,
            Some(&used),
            &BlockDefaults::new(),
        );

        assert!(compiled.rules.contains(".text--bold{"));
        assert!(compiled.rules.contains(".text--bold:hover{"));
        assert!(!compiled.rules.contains(".pad--m"));
        assert_eq!(compiled.root_variables.len(), 1);
    }

    #[test]
    fn test_frontend_without_usage_is_empty() {
        let config = EngineConfig::default();
        let (classes, variables) = (classes(), variables());
        let compiler = StylesheetCompiler::new(&config, &classes, &variables);

        let mut defaults = BlockDefaults::new();
        defaults.set("core/button", "default", vec!["pad--m".to_string()]);
        assert!(compiler.compile(CompileMode::Frontend, None, &defaults).is_empty());
        assert!(compiler
            .compile(CompileMode::Frontend, Some(&[]), &BlockDefaults::new())
            .is_empty());
    }

    #[test]
    fn test_block_default_composites() {
        let config = EngineConfig::default();
        let (classes, variables) = (classes(), variables());
        let mut defaults = BlockDefaults::new();
        defaults
            .set("core/button", "default", vec!["text--bold".to_string(), "pad--m".to_string()])
            .set("core/button", "hover", vec!["text--bold".to_string()]);

        let compiled = StylesheetCompiler::new(&config, &classes, &variables).compile(
            CompileMode::Frontend,
            Some(&[]),
            &defaults,
        );

        assert!(compiled.rules.contains(concat!(
            r#"[class*="wp-block"].default-core-button"#,
            "{font-weight:700;color:var(--color--primary);padding:var(--space--m);}"
        )));
        assert!(compiled.rules.contains(concat!(
            r#"[class*="wp-block"].default-core-button:hover"#,
            "{font-weight:700;color:var(--color--primary);}"
        )));
        // Classes named by block defaults are active on their own too
        assert!(compiled.rules.contains(r#"[class*="wp-block"].pad--m{"#));
        assert!(compiled.root_variables.contains_key("space--m"));
    }

    #[test]
    fn test_compile_class() {
        let config = EngineConfig::default();
        let (classes, variables) = (classes(), variables());
        let compiled = StylesheetCompiler::new(&config, &classes, &variables)
            .compile_class("text--bold", ExpandContext::Editor);

        assert_eq!(
            compiled.rules,
            concat!(
                r#"[class*="wp-block"].text--bold{font-weight:700;}"#,
                r#"[class*="wp-block"].text--bold:hover{color:var(--color--primary);}"#
            )
        );
        assert_eq!(compiled.root_variables.len(), 1);
    }
}
