pub mod responder;
pub mod settings;

use crate::chat::{ChatStore, Message};
use crate::core::error::AssistantError;
use crate::language::Language;
use crate::providers::{
    CompletionProvider, CompletionRequest, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, Turn,
};
use settings::{AssistantSettings, Route};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    Idle,
    Sending,
    Delivered,
    Failed,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    pub simulated_delay: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            simulated_delay: DEFAULT_SIMULATED_DELAY,
        }
    }
}

/// A send that has left `Idle`: the user message is in the store and the
/// route, language and target session are fixed.
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub session_id: String,
    pub input: String,
    pub route: Route,
    pub language: Language,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub session_id: String,
    pub message: Message,
    pub state: SendState,
}

#[derive(Debug, Clone)]
pub struct SendReport {
    pub session_id: String,
    pub message_id: String,
    pub state: SendState,
    /// False when the session was deleted before the reply arrived.
    pub appended: bool,
}

pub struct Pipeline {
    provider: Arc<dyn CompletionProvider>,
    options: PipelineOptions,
    outstanding: AtomicUsize,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn CompletionProvider>, options: PipelineOptions) -> Self {
        Self {
            provider,
            options,
            outstanding: AtomicUsize::new(0),
        }
    }

    /// Number of sends between [`begin`](Self::begin) and [`deliver`](Self::deliver).
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.outstanding() > 0
    }

    /// `Sending` while any send is outstanding, `Idle` otherwise.
    pub fn state(&self) -> SendState {
        if self.is_loading() {
            SendState::Sending
        } else {
            SendState::Idle
        }
    }

    /// Append the user message to the active session and auto-title it.
    /// Blank input stays `Idle` and returns `None`.
    pub fn begin(
        &self,
        store: &mut ChatStore,
        settings: &AssistantSettings,
        input: &str,
    ) -> Option<PendingSend> {
        if input.trim().is_empty() {
            return None;
        }
        let session_id = store.active_id().to_string();
        store.append_message(&session_id, Message::user(input));
        store.auto_title(&session_id);

        let route = settings.route();
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        info!(session = %session_id, route = route.name(), "send started");

        Some(PendingSend {
            session_id,
            input: input.to_string(),
            route,
            language: settings.language,
            model: settings.model.clone(),
        })
    }

    /// Produce the assistant reply. The provider call or the simulator delay
    /// is the only suspension point of a send.
    pub async fn resolve(&self, pending: &PendingSend) -> Reply {
        let (message, state) = match &pending.route {
            Route::Enterprise { credential } => {
                let outcome = self.request(pending, credential).await;
                let state = outcome_state(&outcome);
                let message = responder::enterprise_reply(&pending.model, pending.language, &outcome);
                (message, state)
            }
            Route::Direct { credential } => {
                let outcome = self.request(pending, credential).await;
                let state = outcome_state(&outcome);
                (responder::direct_reply(&pending.input, &outcome), state)
            }
            Route::Simulated => {
                tokio::time::sleep(self.options.simulated_delay).await;
                (
                    responder::simulated_reply(&pending.input, pending.language),
                    SendState::Delivered,
                )
            }
        };
        Reply {
            session_id: pending.session_id.clone(),
            message,
            state,
        }
    }

    /// Append the reply to the session the send started in.
    pub fn deliver(&self, store: &mut ChatStore, reply: Reply) -> SendReport {
        let message_id = reply.message.id.clone();
        let appended = store.append_message(&reply.session_id, reply.message);
        if !appended {
            warn!(session = %reply.session_id, "reply dropped, session no longer exists");
        }
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
        info!(session = %reply.session_id, state = ?reply.state, "send finished");
        SendReport {
            session_id: reply.session_id,
            message_id,
            state: reply.state,
            appended,
        }
    }

    pub async fn send(
        &self,
        store: &mut ChatStore,
        settings: &AssistantSettings,
        input: &str,
    ) -> Option<SendReport> {
        let pending = self.begin(store, settings, input)?;
        let reply = self.resolve(&pending).await;
        Some(self.deliver(store, reply))
    }

    fn completion_request(&self, pending: &PendingSend) -> CompletionRequest {
        CompletionRequest {
            model: pending.model.clone(),
            messages: vec![
                Turn::system(responder::system_prompt(pending.language)),
                Turn::user(pending.input.as_str()),
            ],
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        }
    }

    async fn request(
        &self,
        pending: &PendingSend,
        credential: &str,
    ) -> Result<String, AssistantError> {
        let request = self.completion_request(pending);
        let outcome = self.provider.complete(credential, &request).await;
        if let Err(err) = &outcome {
            warn!(session = %pending.session_id, status = ?err.status(), "completion failed: {}", err);
        }
        outcome
    }
}

fn outcome_state(outcome: &Result<String, AssistantError>) -> SendState {
    match outcome {
        Ok(_) => SendState::Delivered,
        Err(_) => SendState::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeProvider {
        outcome: Result<String, u16>,
        latency: Duration,
        requests: Mutex<Vec<(String, CompletionRequest)>>,
    }

    impl FakeProvider {
        fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok(text.to_string()),
                latency: Duration::ZERO,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                outcome: Err(status),
                latency: Duration::ZERO,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn slow(text: &str, latency: Duration) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok(text.to_string()),
                latency,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for FakeProvider {
        async fn complete(
            &self,
            credential: &str,
            request: &CompletionRequest,
        ) -> Result<String, AssistantError> {
            self.requests
                .lock()
                .unwrap()
                .push((credential.to_string(), request.clone()));
            tokio::time::sleep(self.latency).await;
            match &self.outcome {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(AssistantError::Api {
                    status: *status,
                    message: "rejected".to_string(),
                }),
            }
        }
    }

    fn fixtures(provider: Arc<FakeProvider>) -> (Pipeline, ChatStore, AssistantSettings) {
        let settings = AssistantSettings::default();
        let store = ChatStore::new(settings.welcome_messages());
        (Pipeline::new(provider, PipelineOptions::default()), store, settings)
    }

    fn last_message(store: &ChatStore, session_id: &str) -> Message {
        store
            .get(session_id)
            .unwrap()
            .messages
            .last()
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn blank_input_stays_idle() {
        let (pipeline, mut store, settings) = fixtures(FakeProvider::answering("x"));
        let before = store.snapshot();
        assert!(pipeline.begin(&mut store, &settings, "   \n").is_none());
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(pipeline.state(), SendState::Idle);
    }

    #[tokio::test]
    async fn begin_appends_and_titles_before_any_reply() {
        let (pipeline, mut store, settings) = fixtures(FakeProvider::answering("x"));
        let pending = pipeline
            .begin(&mut store, &settings, "Write a function to add two numbers")
            .unwrap();

        assert_eq!(pipeline.state(), SendState::Sending);
        assert!(pipeline.is_loading());
        let session = store.get(&pending.session_id).unwrap();
        assert_eq!(session.title, "Write a function to add two nu...");
        assert_eq!(session.messages.last().unwrap().role, Role::User);
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_code_request_waits_then_attaches_analysis() {
        let (pipeline, mut store, settings) = fixtures(FakeProvider::answering("unused"));
        let started = tokio::time::Instant::now();

        let report = pipeline
            .send(&mut store, &settings, "Write a function to add two numbers")
            .await
            .unwrap();

        assert!(started.elapsed() >= DEFAULT_SIMULATED_DELAY);
        assert_eq!(report.state, SendState::Delivered);
        let reply = last_message(&store, &report.session_id);
        assert_eq!(reply.id, report.message_id);
        assert!(!reply.code.unwrap().is_empty());
        assert!(reply.analysis.is_some());
        assert_eq!(pipeline.outstanding(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reply_lands_in_the_session_it_was_sent_from() {
        let (pipeline, mut store, settings) = fixtures(FakeProvider::answering("unused"));
        let pending = pipeline.begin(&mut store, &settings, "hello").unwrap();
        let other = store.create_session(vec![]);
        assert_eq!(store.active_id(), other);

        let reply = pipeline.resolve(&pending).await;
        let report = pipeline.deliver(&mut store, reply);

        assert!(report.appended);
        assert_eq!(report.session_id, pending.session_id);
        assert!(store.get(&other).unwrap().messages.is_empty());
        assert!(
            last_message(&store, &pending.session_id)
                .content
                .contains("This is a simulated response.")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn reply_for_a_deleted_session_is_dropped() {
        let (pipeline, mut store, settings) = fixtures(FakeProvider::answering("unused"));
        let pending = pipeline.begin(&mut store, &settings, "hello").unwrap();
        store.delete_session(&pending.session_id);

        let reply = pipeline.resolve(&pending).await;
        let report = pipeline.deliver(&mut store, reply);
        assert!(!report.appended);
        assert_eq!(pipeline.outstanding(), 0);
    }

    #[tokio::test]
    async fn direct_route_sends_one_system_and_one_user_turn() {
        let provider = FakeProvider::answering("Use a HashMap.");
        let (pipeline, mut store, mut settings) = fixtures(Arc::clone(&provider));
        settings.credential = Some("sk-test".to_string());
        settings.language = Language::Rust;

        let report = pipeline
            .send(&mut store, &settings, "how do I count words?")
            .await
            .unwrap();

        assert_eq!(report.state, SendState::Delivered);
        let reply = last_message(&store, &report.session_id);
        assert_eq!(reply.content, "Use a HashMap.");
        assert!(reply.code.is_none());

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (credential, request) = &requests[0];
        assert_eq!(credential, "sk-test");
        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.max_tokens, 2000);
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert!(request.messages[0].content.starts_with("You are an expert rust coding assistant."));
        assert_eq!(request.messages[1], Turn::user("how do I count words?"));
    }

    #[tokio::test]
    async fn direct_failure_appends_the_fallback() {
        let (pipeline, mut store, mut settings) = fixtures(FakeProvider::failing(500));
        settings.credential = Some("sk-test".to_string());

        let report = pipeline.send(&mut store, &settings, "sort it").await.unwrap();
        assert_eq!(report.state, SendState::Failed);
        assert!(
            last_message(&store, &report.session_id)
                .content
                .contains("This is a fallback response.")
        );
    }

    #[tokio::test]
    async fn enterprise_route_requires_accepted_terms() {
        let (pipeline, mut store, mut settings) = fixtures(FakeProvider::failing(401));
        settings.submit_credential(&mut store, "sk-test");

        let pending = pipeline.begin(&mut store, &settings, "code please").unwrap();
        assert_eq!(pending.route.name(), "direct");
        let reply = pipeline.resolve(&pending).await;
        pipeline.deliver(&mut store, reply);

        settings.accept_terms();
        let report = pipeline.send(&mut store, &settings, "code please").await.unwrap();
        assert_eq!(report.state, SendState::Failed);
        let reply = last_message(&store, &report.session_id);
        assert!(reply.content.starts_with("❌ **Error**: API error: 401"));
    }

    #[tokio::test(start_paused = true)]
    async fn sends_in_different_sessions_resolve_independently() {
        let provider = FakeProvider::slow("ok", Duration::from_millis(300));
        let (pipeline, mut store, mut settings) = fixtures(provider);
        settings.credential = Some("sk-test".to_string());

        let first = pipeline.begin(&mut store, &settings, "one").unwrap();
        store.create_session(vec![]);
        let second = pipeline.begin(&mut store, &settings, "two").unwrap();
        let third = pipeline.begin(&mut store, &settings, "two").unwrap();
        assert_eq!(pipeline.outstanding(), 3);

        let (a, b, c) = tokio::join!(
            pipeline.resolve(&first),
            pipeline.resolve(&second),
            pipeline.resolve(&third)
        );
        for reply in [a, b, c] {
            pipeline.deliver(&mut store, reply);
        }

        assert_eq!(pipeline.outstanding(), 0);
        assert_eq!(store.get(&first.session_id).unwrap().messages.len(), 3);
        let second_session = store.get(&second.session_id).unwrap();
        let roles: Vec<_> = second_session.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::User, Role::Assistant, Role::Assistant]
        );
    }
}
