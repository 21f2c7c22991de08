use crate::analysis::CodeAnalysis;
use crate::language::Language;
use crate::suggest::CodeSuggestion;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Title every session starts with until its first user message arrives.
pub const DEFAULT_TITLE: &str = "New Chat";

const TITLE_MAX_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<CodeSuggestion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<CodeAnalysis>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: Utc::now(),
            code: None,
            language: None,
            suggestions: None,
            analysis: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Attach a code block. Empty code is dropped so `code` is never `Some("")`.
    pub fn with_code(mut self, code: impl Into<String>, language: Language) -> Self {
        let code = code.into();
        if !code.is_empty() {
            self.code = Some(code);
            self.language = Some(language);
        }
        self
    }

    pub fn with_analysis(mut self, analysis: CodeAnalysis) -> Self {
        self.analysis = Some(analysis);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub is_pinned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip)]
    pub is_editing_title: bool,
}

impl ChatSession {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            messages,
            created_at: Utc::now(),
            is_pinned: false,
            folder_id: None,
            is_editing_title: false,
        }
    }

    /// Copy for duplication: fresh id and timestamp, unpinned, not editing.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: format!("{} (Copy)", self.title),
            messages: self.messages.clone(),
            created_at: Utc::now(),
            is_pinned: false,
            folder_id: self.folder_id.clone(),
            is_editing_title: false,
        }
    }

    /// Title derived from the first user message, or the placeholder.
    pub fn derived_title(&self) -> String {
        match self.messages.iter().find(|m| m.role == Role::User) {
            Some(message) => truncate_title(&message.content),
            None => DEFAULT_TITLE.to_string(),
        }
    }

    pub fn last_code(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| m.code.as_deref())
    }
}

fn truncate_title(content: &str) -> String {
    if content.chars().count() > TITLE_MAX_CHARS {
        let head: String = content.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}
