//! Prompt template resolution and tagged-section extraction
//!
//! Templates use `{name}` placeholders. Names present in the variable map
//! are replaced everywhere they occur; unknown names pass through as
//! literal text.
//!
//! Model output may carry tagged sections (`<B_Edits>…</B_Edits>`,
//! `<B_Reasoning>…</B_Reasoning>`) that become derived template variables
//! for downstream nodes.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// One extractable tagged section: `<tag>…</tag>` in model output becomes
/// the `{nodeId}_{suffix}` template variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRule {
    pub tag: &'static str,
    pub suffix: &'static str,
}

/// The fixed extraction conventions. Adding a row here is all it takes to
/// surface another tagged section as a template variable.
pub const EXTRACTION_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        tag: "B_Edits",
        suffix: "edits",
    },
    ExtractionRule {
        tag: "B_Reasoning",
        suffix: "reasoning",
    },
];

pub const EDITS_TAG: &str = "B_Edits";
pub const REASONING_TAG: &str = "B_Reasoning";

/// Compiled `<tag>…</tag>` patterns, non-greedy and newline-spanning
static TAG_PATTERNS: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    EXTRACTION_RULES
        .iter()
        .map(|rule| {
            let pattern = format!("(?s)<{0}>(.*?)</{0}>", rule.tag);
            (rule.tag, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Regex for `{name}` placeholders: alphanumeric with hyphens/underscores
static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-zA-Z0-9][a-zA-Z0-9_-]*)\}").unwrap());

/// Extract the first occurrence of a tagged section, trimmed, or `None`
/// when the tag is absent or unknown.
pub fn extract_tag(text: &str, tag: &str) -> Option<String> {
    TAG_PATTERNS
        .get(tag)?
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

/// All extractable sections present in a text, as (suffix, content) pairs
pub fn extract_sections(text: &str) -> Vec<(&'static str, String)> {
    EXTRACTION_RULES
        .iter()
        .filter_map(|rule| extract_tag(text, rule.tag).map(|content| (rule.suffix, content)))
        .collect()
}

/// Substitute `{name}` placeholders from the variable map in one pass.
/// Unmatched names are left as literal `{name}` text.
pub fn resolve(template: &str, variables: &HashMap<String, String>) -> String {
    VARIABLE_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            match variables.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_simple() {
        let result = resolve("Hello, {name}!", &vars(&[("name", "Alice")]));
        assert_eq!(result, "Hello, Alice!");
    }

    #[test]
    fn test_resolve_global_replace() {
        let result = resolve("{x} and {x} again", &vars(&[("x", "A")]));
        assert_eq!(result, "A and A again");
    }

    #[test]
    fn test_resolve_unknown_name_passes_through() {
        let result = resolve("{unknown_name}", &vars(&[("known", "value")]));
        assert_eq!(result, "{unknown_name}");
    }

    #[test]
    fn test_resolve_exact_name_match() {
        let result = resolve("{name} {nam}", &vars(&[("name", "Alice")]));
        assert_eq!(result, "Alice {nam}");
    }

    #[test]
    fn test_resolve_hyphenated_names() {
        let result = resolve(
            "Summary: {llm-1}, edits: {llm-1_edits}",
            &vars(&[("llm-1", "out"), ("llm-1_edits", "fix X")]),
        );
        assert_eq!(result, "Summary: out, edits: fix X");
    }

    #[test]
    fn test_resolve_does_not_rescan_substituted_text() {
        // A value containing a placeholder-shaped string is not re-resolved
        let result = resolve("{a}", &vars(&[("a", "{b}"), ("b", "oops")]));
        assert_eq!(result, "{b}");
    }

    #[test]
    fn test_extract_tag_simple() {
        let text = "intro <B_Edits>fix X</B_Edits> outro";
        assert_eq!(extract_tag(text, EDITS_TAG), Some("fix X".to_string()));
    }

    #[test]
    fn test_extract_tag_trims_whitespace() {
        let text = "<B_Reasoning>\n  because Y\n</B_Reasoning>";
        assert_eq!(
            extract_tag(text, REASONING_TAG),
            Some("because Y".to_string())
        );
    }

    #[test]
    fn test_extract_tag_multiline_non_greedy() {
        let text = "<B_Edits>first\nsection</B_Edits> and <B_Edits>second</B_Edits>";
        assert_eq!(
            extract_tag(text, EDITS_TAG),
            Some("first\nsection".to_string())
        );
    }

    #[test]
    fn test_extract_tag_absent() {
        assert_eq!(extract_tag("no tags here", EDITS_TAG), None);
    }

    #[test]
    fn test_extract_tag_unknown_tag() {
        assert_eq!(extract_tag("<B_Other>x</B_Other>", "B_Other"), None);
    }

    #[test]
    fn test_extract_sections() {
        let text =
            "intro <B_Edits>fix X</B_Edits> outro <B_Reasoning>because Y</B_Reasoning> end";
        let sections = extract_sections(text);

        assert_eq!(
            sections,
            vec![
                ("edits", "fix X".to_string()),
                ("reasoning", "because Y".to_string())
            ]
        );
    }

    #[test]
    fn test_extract_sections_partial() {
        let sections = extract_sections("only <B_Edits>one</B_Edits> tag");
        assert_eq!(sections, vec![("edits", "one".to_string())]);
    }
}
