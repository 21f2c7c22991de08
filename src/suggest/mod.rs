pub mod panel;
pub mod scaffold;

use crate::language::Language;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Edits at or below this many characters clear suggestions instead.
pub const MIN_EDIT_LEN: usize = 10;

static FUNCTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfunction\b|\bdef\s+\w+\s*\(|\bfn\s+\w+\s*\(|=>\s*\{")
        .expect("function header pattern")
});

static RETURN_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\breturn\b").expect("return pattern"));

static BOOLEAN_COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"if\s*\(\s*([A-Za-z_$][\w$.]*)\s*===?\s*true\s*\)").expect("boolean pattern")
});

static FILTER_MAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_$][\w$]*)\s*\.filter\([^\n]*?\)\s*\.map\(").expect("filter map pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Autocomplete,
    Refactor,
    Optimization,
    Security,
    Test,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSuggestion {
    pub kind: SuggestionKind,
    pub patch_text: String,
    pub description: String,
    pub confidence: f32,
}

struct SuggestionRule {
    kind: SuggestionKind,
    confidence: f32,
    description: &'static str,
    propose: fn(&str, Language) -> Option<String>,
}

static SUGGESTION_RULES: [SuggestionRule; 3] = [
    SuggestionRule {
        kind: SuggestionKind::Autocomplete,
        confidence: 0.9,
        description: "Add return statement",
        propose: missing_return,
    },
    SuggestionRule {
        kind: SuggestionKind::Refactor,
        confidence: 0.8,
        description: "Simplify boolean comparison",
        propose: |code, _| {
            let caps = BOOLEAN_COMPARISON.captures(code)?;
            Some(format!("if ({})", &caps[1]))
        },
    },
    SuggestionRule {
        kind: SuggestionKind::Optimization,
        confidence: 0.7,
        description: "Use reduce for better performance",
        propose: |code, _| {
            let caps = FILTER_MAP.captures(code)?;
            Some(format!("{}.reduce()", &caps[1]))
        },
    },
];

fn missing_return(code: &str, language: Language) -> Option<String> {
    if !FUNCTION_HEADER.is_match(code) || RETURN_STATEMENT.is_match(code) {
        return None;
    }
    let patch = if language == Language::Python {
        "return result"
    } else {
        "return result;"
    };
    Some(patch.to_string())
}

/// Proposals for an in-progress edit, one per rule that fires.
pub fn suggest(code: &str, language: Language) -> Vec<CodeSuggestion> {
    SUGGESTION_RULES
        .iter()
        .filter_map(|rule| {
            (rule.propose)(code, language).map(|patch_text| CodeSuggestion {
                kind: rule.kind,
                patch_text,
                description: rule.description.to_string(),
                confidence: rule.confidence,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_without_return_gets_autocomplete() {
        let suggestions = suggest("function total(xs) {\n  let sum = 0;\n}", Language::JavaScript);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Autocomplete);
        assert_eq!(suggestions[0].patch_text, "return result;");
        assert_eq!(suggestions[0].confidence, 0.9);
    }

    #[test]
    fn python_patch_has_no_semicolon() {
        let suggestions = suggest("def total(xs):\n    pass", Language::Python);
        assert_eq!(suggestions[0].patch_text, "return result");
    }

    #[test]
    fn function_with_return_is_left_alone() {
        assert!(suggest("function one() { return 1; }", Language::JavaScript).is_empty());
    }

    #[test]
    fn boolean_comparison_uses_the_compared_name() {
        let suggestions = suggest("if (isReady === true) { start(); }", Language::JavaScript);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Refactor);
        assert_eq!(suggestions[0].patch_text, "if (isReady)");
    }

    #[test]
    fn filter_then_map_suggests_reduce() {
        let code = "const names = users.filter(u => u.active).map(u => u.name);";
        let suggestions = suggest(code, Language::JavaScript);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Optimization);
        assert_eq!(suggestions[0].patch_text, "users.reduce()");
    }

    #[test]
    fn suggestions_follow_rule_order() {
        let code = "function f() {\n  if (done == true) {}\n  xs.filter(a).map(b);\n}";
        let kinds: Vec<_> = suggest(code, Language::JavaScript)
            .into_iter()
            .map(|s| s.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SuggestionKind::Autocomplete,
                SuggestionKind::Refactor,
                SuggestionKind::Optimization
            ]
        );
    }
}
