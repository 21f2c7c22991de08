use crate::chat::{ChatSession, ChatStore};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

const DEFAULT_ICON: &str = "📁";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatFolder {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl ChatFolder {
    fn seeded(id: &str, name: &str, color: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Where a dragged chat is hovering or being dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Folder(String),
    Unassigned,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DragState {
    pub dragged: Option<String>,
    pub over: Option<DropTarget>,
}

/// One folder row of the sidebar with the chats filed under it.
#[derive(Debug, Clone)]
pub struct FolderGroup {
    pub folder: ChatFolder,
    pub chats: Vec<Arc<ChatSession>>,
    pub expanded: bool,
    pub highlighted: bool,
}

#[derive(Debug, Clone)]
pub struct Sidebar {
    pub pinned: Vec<Arc<ChatSession>>,
    pub folders: Vec<FolderGroup>,
    pub unassigned: Vec<Arc<ChatSession>>,
    pub unassigned_highlighted: bool,
}

/// Owner of the folder list, the expanded-folder view state and the drag
/// protocol. Chat membership itself lives on each session's `folder_id`, which
/// this type changes only through [`ChatStore::set_folder`] and
/// [`ChatStore::clear_folder`].
#[derive(Debug, Clone)]
pub struct FolderOrganizer {
    folders: Vec<ChatFolder>,
    default_id: String,
    expanded: HashSet<String>,
    drag: DragState,
}

impl Default for FolderOrganizer {
    fn default() -> Self {
        let folders = vec![
            ChatFolder::seeded("general", "General", "#6b7280", "📁"),
            ChatFolder::seeded("work", "Work", "#3b82f6", "💼"),
            ChatFolder::seeded("personal", "Personal", "#10b981", "👤"),
            ChatFolder::seeded("projects", "Projects", "#f59e0b", "🚀"),
        ];
        Self {
            default_id: folders[0].id.clone(),
            folders,
            expanded: HashSet::new(),
            drag: DragState::default(),
        }
    }
}

impl FolderOrganizer {
    pub fn folders(&self) -> &[ChatFolder] {
        &self.folders
    }

    pub fn default_folder_id(&self) -> &str {
        &self.default_id
    }

    pub fn get(&self, id: &str) -> Option<&ChatFolder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Case-insensitive first match on the folder name.
    pub fn find_by_name(&self, name: &str) -> Option<&ChatFolder> {
        let wanted = name.trim().to_lowercase();
        self.folders.iter().find(|f| f.name.to_lowercase() == wanted)
    }

    /// Folder a session actually belongs to; dangling ids resolve to `None`.
    pub fn folder_of(&self, session: &ChatSession) -> Option<&ChatFolder> {
        session.folder_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn create_folder(&mut self, name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let uuid = Uuid::new_v4();
        let bytes = uuid.as_bytes();
        let folder = ChatFolder {
            id: uuid.to_string(),
            name: name.to_string(),
            color: format!("#{:02x}{:02x}{:02x}", bytes[0], bytes[1], bytes[2]),
            icon: DEFAULT_ICON.to_string(),
        };
        let id = folder.id.clone();
        info!(folder = %id, name, "created folder");
        self.folders.push(folder);
        Some(id)
    }

    pub fn rename_folder(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.folders.iter_mut().find(|f| f.id == id) {
            Some(folder) => {
                folder.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Unassign the folder's chats, then remove it. The default folder stays.
    pub fn delete_folder(&mut self, store: &mut ChatStore, id: &str) -> bool {
        if id == self.default_id || self.get(id).is_none() {
            return false;
        }
        let moved = store.clear_folder(id);
        self.folders.retain(|f| f.id != id);
        self.expanded.remove(id);
        if self.drag.over == Some(DropTarget::Folder(id.to_string())) {
            self.drag.over = None;
        }
        info!(folder = %id, moved, "deleted folder");
        true
    }

    pub fn assign_chat(&self, store: &mut ChatStore, chat_id: &str, folder_id: &str) -> bool {
        if self.get(folder_id).is_none() {
            return false;
        }
        debug!(chat = %chat_id, folder = %folder_id, "assigning chat");
        store.set_folder(chat_id, Some(folder_id.to_string()))
    }

    pub fn unassign_chat(&self, store: &mut ChatStore, chat_id: &str) -> bool {
        debug!(chat = %chat_id, "unassigning chat");
        store.set_folder(chat_id, None)
    }

    /// Manual reassignment from free text: empty input unassigns, a name match
    /// assigns, anything else leaves the chat where it is.
    pub fn reassign_by_name(&self, store: &mut ChatStore, chat_id: &str, input: &str) -> bool {
        if input.trim().is_empty() {
            return self.unassign_chat(store, chat_id);
        }
        match self.find_by_name(input) {
            Some(folder) => {
                let folder_id = folder.id.clone();
                self.assign_chat(store, chat_id, &folder_id)
            }
            None => false,
        }
    }

    pub fn toggle_expanded(&mut self, folder_id: &str) -> bool {
        if !self.expanded.remove(folder_id) {
            self.expanded.insert(folder_id.to_string());
        }
        self.is_expanded(folder_id)
    }

    pub fn is_expanded(&self, folder_id: &str) -> bool {
        self.expanded.contains(folder_id)
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn begin_drag(&mut self, chat_id: &str) {
        self.drag.dragged = Some(chat_id.to_string());
    }

    pub fn drag_over(&mut self, target: DropTarget) {
        self.drag.over = Some(target);
    }

    pub fn drag_leave(&mut self) {
        self.drag.over = None;
    }

    /// Complete a drag onto `target`. State is cleared whether or not a chat
    /// was being dragged.
    pub fn drop(&mut self, store: &mut ChatStore, target: DropTarget) -> bool {
        let dragged = std::mem::take(&mut self.drag).dragged;
        let Some(chat_id) = dragged else {
            debug!("drop without an active drag");
            return false;
        };
        match target {
            DropTarget::Folder(folder_id) => self.assign_chat(store, &chat_id, &folder_id),
            DropTarget::Unassigned => self.unassign_chat(store, &chat_id),
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = DragState::default();
    }

    /// Group the store's sessions for display, keeping list order inside
    /// each group.
    pub fn partition(&self, store: &ChatStore) -> Sidebar {
        let snapshot = store.snapshot();
        let mut pinned = Vec::new();
        let mut unassigned = Vec::new();
        let mut filed: Vec<Vec<Arc<ChatSession>>> = vec![Vec::new(); self.folders.len()];

        for session in snapshot.iter() {
            if session.is_pinned {
                pinned.push(Arc::clone(session));
                continue;
            }
            let position = session
                .folder_id
                .as_deref()
                .and_then(|id| self.folders.iter().position(|f| f.id == id));
            match position {
                Some(index) => filed[index].push(Arc::clone(session)),
                None => unassigned.push(Arc::clone(session)),
            }
        }

        let folders = self
            .folders
            .iter()
            .zip(filed)
            .map(|(folder, chats)| FolderGroup {
                expanded: self.is_expanded(&folder.id),
                highlighted: self.drag.over == Some(DropTarget::Folder(folder.id.clone())),
                folder: folder.clone(),
                chats,
            })
            .collect();

        Sidebar {
            pinned,
            folders,
            unassigned,
            unassigned_highlighted: self.drag.over == Some(DropTarget::Unassigned),
        }
    }
}
