use crate::chat::{ChatStore, Message};
use crate::language::Language;
use crate::providers::DEFAULT_MODEL;
use std::fmt;
use tracing::info;

/// Value shipped in sample environment files; treated as "no credential".
pub const PLACEHOLDER_CREDENTIAL: &str = "your_openai_api_key_here";

pub const GREETING: &str = "Hello! I'm your AI coding assistant. I can help you with:\n\n\
• **Code Generation**: Write code from descriptions\n\
• **Code Review**: Analyze and improve your code\n\
• **Debugging**: Find and fix issues\n\
• **Algorithm Design**: Optimize solutions\n\
• **Best Practices**: Follow coding standards\n\n\
Attach a file or describe what you need, and I'll help you code it!";

pub const TERMS_NOTICE: &str = "**Enterprise Assistant Terms of Use**\n\n\
Requests in this mode are sent to a third-party completion service. Treat that \
service as a public platform: traffic and prompts may be retained outside your \
organisation.\n\n\
**DO NOT disclose:**\n\
• Personal data such as salaries, passwords or bank details.\n\
• Internal information that is not already in the public domain.\n\
• Customer, supplier or partner data, or the status of ongoing negotiations.\n\n\
**In addition, DO NOT:**\n\
• Rely on generated answers without review. The assistant is a tool, not a replacement for human judgement.\n\
• Paste documents or text copied from internal systems.\n\n\
**Please accept the terms and conditions to proceed** (`/accept`)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeStatus {
    Active,
    Ready,
    Demo,
}

impl fmt::Display for ModeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ModeStatus::Active => "🟢 Enterprise Mode",
            ModeStatus::Ready => "🟡 Ready",
            ModeStatus::Demo => "🔴 Demo Mode",
        };
        f.write_str(label)
    }
}

/// Which responder handles a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Enterprise { credential: String },
    Direct { credential: String },
    Simulated,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Enterprise { .. } => "enterprise",
            Route::Direct { .. } => "direct",
            Route::Simulated => "simulated",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub enterprise: bool,
    pub credential: Option<String>,
    /// Credential from the config file or environment; restored when
    /// enterprise mode is switched off.
    pub startup_credential: Option<String>,
    pub accepted_terms: bool,
    pub language: Language,
    pub model: String,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            enterprise: false,
            credential: None,
            startup_credential: None,
            accepted_terms: false,
            language: Language::default(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

pub fn is_usable_credential(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != PLACEHOLDER_CREDENTIAL
}

impl AssistantSettings {
    pub fn credential(&self) -> Option<&str> {
        self.credential
            .as_deref()
            .filter(|value| is_usable_credential(value))
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    pub fn status(&self) -> ModeStatus {
        match (self.enterprise, self.has_credential(), self.accepted_terms) {
            (true, true, true) => ModeStatus::Active,
            (true, true, false) => ModeStatus::Ready,
            _ => ModeStatus::Demo,
        }
    }

    /// Sending is blocked while enterprise mode waits for terms acceptance.
    pub fn input_locked(&self) -> bool {
        self.enterprise && !self.accepted_terms
    }

    pub fn route(&self) -> Route {
        match self.credential() {
            Some(credential) if self.enterprise && self.accepted_terms => Route::Enterprise {
                credential: credential.to_string(),
            },
            Some(credential) => Route::Direct {
                credential: credential.to_string(),
            },
            None => Route::Simulated,
        }
    }

    /// Messages a fresh session starts with in the current mode.
    pub fn welcome_messages(&self) -> Vec<Message> {
        if self.enterprise {
            vec![Message::system(TERMS_NOTICE)]
        } else {
            vec![Message::assistant(GREETING)]
        }
    }

    /// Switch into enterprise mode. Requires a usable credential, falling back
    /// to the startup one.
    pub fn enable_enterprise(&mut self, store: &mut ChatStore) -> bool {
        if !self.has_credential() {
            self.credential = self.startup_credential.clone();
        }
        if !self.has_credential() {
            return false;
        }
        self.enterprise = true;
        self.accepted_terms = false;
        self.reset_sessions(store);
        info!("enterprise mode enabled");
        true
    }

    /// Store `key` and enable enterprise mode. Blank keys are ignored.
    pub fn submit_credential(&mut self, store: &mut ChatStore, key: &str) -> bool {
        if key.trim().is_empty() {
            return false;
        }
        self.credential = Some(key.trim().to_string());
        self.enable_enterprise(store)
    }

    pub fn disable_enterprise(&mut self, store: &mut ChatStore) {
        self.enterprise = false;
        self.credential = self.startup_credential.clone();
        self.accepted_terms = false;
        self.reset_sessions(store);
        info!("enterprise mode disabled");
    }

    pub fn accept_terms(&mut self) {
        self.accepted_terms = true;
    }

    /// Open a new chat seeded for the current mode. Terms have to be accepted
    /// again afterwards.
    pub fn new_chat(&mut self, store: &mut ChatStore) -> String {
        self.accepted_terms = false;
        store.create_session(self.welcome_messages())
    }

    fn reset_sessions(&self, store: &mut ChatStore) {
        let welcome = self.welcome_messages();
        store.set_welcome(welcome.clone());
        store.reset(welcome);
    }
}
