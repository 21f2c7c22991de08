use super::model::{ChatSession, DEFAULT_TITLE, Message};
use std::sync::Arc;
use tracing::debug;

/// Immutable view of the session list at one point in time.
pub type Snapshot = Arc<Vec<Arc<ChatSession>>>;

/// Owner of every chat session and its messages.
///
/// Each mutation swaps in a new collection in which only the targeted session
/// is a new allocation, so holders of an older [`Snapshot`] keep a consistent
/// view and unchanged sessions compare equal with [`Arc::ptr_eq`].
#[derive(Debug, Clone)]
pub struct ChatStore {
    sessions: Snapshot,
    active_id: String,
    welcome: Vec<Message>,
}

impl ChatStore {
    /// Store holding one session seeded with `welcome`, which is also used
    /// whenever a default session has to be created.
    pub fn new(welcome: Vec<Message>) -> Self {
        let first = ChatSession::new(welcome.clone());
        let active_id = first.id.clone();
        Self {
            sessions: Arc::new(vec![Arc::new(first)]),
            active_id,
            welcome,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.sessions)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<ChatSession>> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn active(&self) -> Option<&Arc<ChatSession>> {
        self.get(&self.active_id)
    }

    pub fn activate(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.active_id = id.to_string();
        true
    }

    pub fn set_welcome(&mut self, welcome: Vec<Message>) {
        self.welcome = welcome;
    }

    /// Insert a new session at the front and make it active.
    pub fn create_session(&mut self, initial_messages: Vec<Message>) -> String {
        let session = ChatSession::new(initial_messages);
        let id = session.id.clone();
        self.push_front(session);
        self.active_id = id.clone();
        debug!(session = %id, "created session");
        id
    }

    /// Replace every session with one fresh session holding `initial_messages`.
    pub fn reset(&mut self, initial_messages: Vec<Message>) -> String {
        let session = ChatSession::new(initial_messages);
        let id = session.id.clone();
        self.sessions = Arc::new(vec![Arc::new(session)]);
        self.active_id = id.clone();
        id
    }

    pub fn delete_session(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let remaining: Vec<_> = self
            .sessions
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();
        self.sessions = Arc::new(remaining);

        if self.active_id == id {
            match self.sessions.first().map(|s| s.id.clone()) {
                Some(next) => self.active_id = next,
                None => {
                    let welcome = self.welcome.clone();
                    self.create_session(welcome);
                }
            }
        }
        debug!(session = %id, "deleted session");
        true
    }

    pub fn rename_session(&mut self, id: &str, title: &str) -> bool {
        self.update(id, |session| {
            session.title = title.to_string();
            session.is_editing_title = false;
        })
    }

    pub fn start_editing_title(&mut self, id: &str) -> bool {
        self.update(id, |session| session.is_editing_title = true)
    }

    pub fn toggle_pin(&mut self, id: &str) -> bool {
        self.update(id, |session| session.is_pinned = !session.is_pinned)
    }

    /// Copy the session to the front of the list and activate the copy.
    pub fn duplicate_session(&mut self, id: &str) -> Option<String> {
        let copy = self.get(id)?.duplicate();
        let new_id = copy.id.clone();
        self.push_front(copy);
        self.active_id = new_id.clone();
        Some(new_id)
    }

    pub fn append_message(&mut self, session_id: &str, message: Message) -> bool {
        self.update(session_id, |session| session.messages.push(message))
    }

    /// Derive the title from the first user message while it is still the
    /// placeholder. Returns whether the title changed.
    pub fn auto_title(&mut self, session_id: &str) -> bool {
        let derived = match self.get(session_id) {
            Some(session) if session.title == DEFAULT_TITLE => session.derived_title(),
            _ => return false,
        };
        if derived == DEFAULT_TITLE {
            return false;
        }
        self.update(session_id, |session| session.title = derived)
    }

    pub fn set_folder(&mut self, session_id: &str, folder_id: Option<String>) -> bool {
        self.update(session_id, |session| session.folder_id = folder_id)
    }

    /// Unassign every session filed under `folder_id`. Returns how many moved.
    pub fn clear_folder(&mut self, folder_id: &str) -> usize {
        let mut moved = 0;
        let sessions: Vec<_> = self
            .sessions
            .iter()
            .map(|s| {
                if s.folder_id.as_deref() == Some(folder_id) {
                    moved += 1;
                    let mut updated = ChatSession::clone(s);
                    updated.folder_id = None;
                    Arc::new(updated)
                } else {
                    Arc::clone(s)
                }
            })
            .collect();
        if moved > 0 {
            self.sessions = Arc::new(sessions);
        }
        moved
    }

    pub fn last_code(&self, session_id: &str) -> Option<&str> {
        self.get(session_id).and_then(|s| s.last_code())
    }

    fn push_front(&mut self, session: ChatSession) {
        let mut sessions = Vec::with_capacity(self.sessions.len() + 1);
        sessions.push(Arc::new(session));
        sessions.extend(self.sessions.iter().cloned());
        self.sessions = Arc::new(sessions);
    }

    fn update(&mut self, id: &str, apply: impl FnOnce(&mut ChatSession)) -> bool {
        let Some(index) = self.sessions.iter().position(|s| s.id == id) else {
            return false;
        };
        let mut updated = ChatSession::clone(&self.sessions[index]);
        apply(&mut updated);

        let mut sessions: Vec<_> = self.sessions.iter().cloned().collect();
        sessions[index] = Arc::new(updated);
        self.sessions = Arc::new(sessions);
        true
    }
}
