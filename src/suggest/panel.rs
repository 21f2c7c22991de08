use super::{CodeSuggestion, MIN_EDIT_LEN, suggest};
use crate::language::Language;

/// The side editor buffer and the suggestions computed for it.
#[derive(Debug, Default, Clone)]
pub struct CodePanel {
    pub code: String,
    pub suggestions: Vec<CodeSuggestion>,
    pub open: bool,
}

impl CodePanel {
    /// Open or close the panel. Opening with an empty buffer seeds it from
    /// `last_code`, the newest code block of the active session.
    pub fn toggle(&mut self, last_code: Option<&str>) -> bool {
        self.open = !self.open;
        if self.open && self.code.trim().is_empty() {
            if let Some(code) = last_code {
                self.code = code.to_string();
            }
        }
        self.open
    }

    /// Replace the buffer and recompute suggestions for it.
    pub fn edit(&mut self, code: &str, language: Language) {
        self.code = code.to_string();
        if self.code.chars().count() > MIN_EDIT_LEN {
            self.suggestions = suggest(&self.code, language);
        } else {
            self.suggestions.clear();
        }
    }

    /// Append the chosen patch on a new line. Applying always clears the list.
    pub fn apply(&mut self, index: usize) -> Option<CodeSuggestion> {
        let suggestion = self.suggestions.get(index).cloned()?;
        self.code.push('\n');
        self.code.push_str(&suggestion.patch_text);
        self.suggestions.clear();
        Some(suggestion)
    }

    pub fn clear(&mut self) {
        self.code.clear();
        self.suggestions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::SuggestionKind;

    #[test]
    fn short_edits_clear_suggestions() {
        let mut panel = CodePanel::default();
        panel.edit("function f() {}", Language::JavaScript);
        assert_eq!(panel.suggestions.len(), 1);

        panel.edit("let x", Language::JavaScript);
        assert!(panel.suggestions.is_empty());
    }

    #[test]
    fn applying_appends_patch_and_clears() {
        let mut panel = CodePanel::default();
        panel.edit("function f() {\n  let result = 1;\n}", Language::JavaScript);

        let applied = panel.apply(0).unwrap();
        assert_eq!(applied.kind, SuggestionKind::Autocomplete);
        assert_eq!(panel.code, "function f() {\n  let result = 1;\n}\nreturn result;");
        assert!(panel.suggestions.is_empty());
        assert!(panel.apply(0).is_none());
    }

    #[test]
    fn opening_seeds_from_last_code_only_when_empty() {
        let mut panel = CodePanel::default();
        assert!(panel.toggle(Some("print(1)")));
        assert_eq!(panel.code, "print(1)");

        assert!(!panel.toggle(Some("other")));
        assert!(panel.toggle(Some("other")));
        assert_eq!(panel.code, "print(1)");
    }
}
