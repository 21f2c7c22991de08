pub mod dictation;
pub mod templates;

use crate::core::error::AssistantError;
use crate::language::Language;
use std::path::Path;
use templates::PromptTemplate;

pub const RECORDING_MARKER: &str = "🎤 Recording... ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Copy,
    Review,
    Tests,
    Optimize,
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        QuickAction::Copy,
        QuickAction::Review,
        QuickAction::Tests,
        QuickAction::Optimize,
    ];

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "copy" => Some(QuickAction::Copy),
            "review" => Some(QuickAction::Review),
            "tests" | "test" => Some(QuickAction::Tests),
            "optimize" => Some(QuickAction::Optimize),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            QuickAction::Copy => "copy",
            QuickAction::Review => "review",
            QuickAction::Tests => "tests",
            QuickAction::Optimize => "optimize",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            QuickAction::Copy => "📋 Copy this code:",
            QuickAction::Review => "🔍 Review this code:",
            QuickAction::Tests => "🧪 Generate tests for:",
            QuickAction::Optimize => "⚡ Optimize this code:",
        }
    }
}

/// A file offered to the composer. Only its name and size are used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub name: String,
    pub size: u64,
}

impl AttachedFile {
    pub fn from_path(path: &Path) -> Result<Self, AssistantError> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            size: metadata.len(),
        })
    }

    pub fn descriptor(&self) -> String {
        format!("📎 File: {} ({:.1} KB)", self.name, self.size as f64 / 1024.0)
    }
}

/// The message being written, plus the interim line of an active dictation.
#[derive(Debug, Default, Clone)]
pub struct Composer {
    buffer: String,
    interim: Option<String>,
}

impl Composer {
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Buffer as shown to the user, with the recording marker while
    /// dictation is in progress.
    pub fn display_text(&self) -> String {
        match &self.interim {
            Some(interim) => format!("{}\n{}{}", self.buffer, RECORDING_MARKER, interim),
            None => self.buffer.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
    }

    /// Return the buffer for sending and clear it.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    pub fn begin_dictation(&mut self) {
        self.interim = Some(String::new());
    }

    pub fn end_dictation(&mut self) {
        self.interim = None;
    }

    pub fn dictation_result(&mut self, text: &str, is_final: bool) {
        if !is_final {
            self.interim = Some(text.to_string());
            return;
        }
        let text = text.trim();
        if !text.is_empty() {
            if !self.buffer.is_empty() && !self.buffer.ends_with(char::is_whitespace) {
                self.buffer.push(' ');
            }
            self.buffer.push_str(text);
        }
        if self.interim.is_some() {
            self.interim = Some(String::new());
        }
    }

    pub fn append_error(&mut self, message: &str) {
        self.buffer.push_str("\n❌ ");
        self.buffer.push_str(message);
    }

    pub fn attach_files(&mut self, files: &[AttachedFile]) {
        if files.is_empty() {
            return;
        }
        let lines: Vec<String> = files.iter().map(AttachedFile::descriptor).collect();
        self.prefix(&lines.join("\n"));
    }

    pub fn quick_action(&mut self, action: QuickAction) {
        self.prefix(action.prefix());
    }

    pub fn add_location(&mut self, location: &str) -> bool {
        let location = location.trim();
        if location.is_empty() {
            return false;
        }
        self.prefix(&format!("📍 Location: {}", location));
        true
    }

    /// Replace the buffer with the template prompt, embedding the panel code
    /// when there is any.
    pub fn apply_template(&mut self, template: &PromptTemplate, panel_code: &str, language: Language) {
        self.buffer = if panel_code.trim().is_empty() {
            template.body.to_string()
        } else {
            format!(
                "{}\n\nCode to analyze:\n```{}\n{}\n```",
                template.body,
                language.as_str(),
                panel_code
            )
        };
    }

    fn prefix(&mut self, head: &str) {
        self.buffer = format!("{}\n\n{}", head, self.buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use templates::TEMPLATES;

    #[test]
    fn file_descriptors_are_prefixed_with_a_blank_line() {
        let mut composer = Composer::default();
        composer.set_text("explain these");
        composer.attach_files(&[
            AttachedFile {
                name: "main.rs".to_string(),
                size: 2048,
            },
            AttachedFile {
                name: "lib.rs".to_string(),
                size: 1500,
            },
        ]);
        assert_eq!(
            composer.text(),
            "📎 File: main.rs (2.0 KB)\n📎 File: lib.rs (1.5 KB)\n\nexplain these"
        );
    }

    #[test]
    fn attaching_nothing_leaves_the_buffer() {
        let mut composer = Composer::default();
        composer.set_text("x");
        composer.attach_files(&[]);
        assert_eq!(composer.text(), "x");
    }

    #[test]
    fn quick_actions_prefix_the_buffer() {
        let mut composer = Composer::default();
        composer.set_text("fn a() {}");
        composer.quick_action(QuickAction::from_str("Review").unwrap());
        assert_eq!(composer.text(), "🔍 Review this code:\n\nfn a() {}");
        assert!(QuickAction::from_str("deploy").is_none());
    }

    #[test]
    fn location_requires_text() {
        let mut composer = Composer::default();
        assert!(!composer.add_location("  "));
        assert!(composer.add_location("Office"));
        assert_eq!(composer.text(), "📍 Location: Office\n\n");
    }

    #[test]
    fn template_embeds_panel_code_when_present() {
        let mut composer = Composer::default();
        let review = &TEMPLATES[0];

        composer.apply_template(review, "", Language::Python);
        assert_eq!(composer.text(), review.body);

        composer.apply_template(review, "print(1)", Language::Python);
        assert_eq!(
            composer.text(),
            format!("{}\n\nCode to analyze:\n```python\nprint(1)\n```", review.body)
        );
    }

    #[test]
    fn take_clears_the_buffer() {
        let mut composer = Composer::default();
        composer.set_text("send me");
        assert_eq!(composer.take(), "send me");
        assert!(composer.is_empty());
    }

    #[test]
    fn attached_file_reads_metadata_only() {
        let path = std::env::temp_dir().join(format!("codeassist-{}.txt", uuid::Uuid::new_v4()));
        std::fs::write(&path, vec![b'a'; 3072]).unwrap();
        let file = AttachedFile::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(file.size, 3072);
        assert!(file.descriptor().ends_with("(3.0 KB)"));
    }
}
