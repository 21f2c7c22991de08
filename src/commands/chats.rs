use super::handler::{CommandHandler, chat_arg};
use crate::core::error::AssistantError;
use crate::display;
use crate::workspace::Workspace;

pub struct NewChatCommand;
pub struct ListChatsCommand;
pub struct SwitchCommand;
pub struct RenameCommand;
pub struct PinCommand;
pub struct DuplicateCommand;
pub struct DeleteCommand;

macro_rules! chat_or_usage {
    ($state:expr, $args:expr) => {
        match chat_arg($state, $args.first()) {
            Ok(id) => id,
            Err(message) => return Ok(Some(message)),
        }
    };
}

impl CommandHandler for NewChatCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        _args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let id = state.new_chat();
        let session = state.store.get(&id).map(|s| s.messages.clone()).unwrap_or_default();
        let rendered: Vec<String> = session.iter().map(display::render_message).collect();
        Ok(Some(rendered.join("\n\n")))
    }

    fn help(&self) -> &'static str {
        "/new - Start a new chat"
    }
}

impl CommandHandler for ListChatsCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        _args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        Ok(Some(display::render_chat_list(state)))
    }

    fn help(&self) -> &'static str {
        "/chats - List chats by position"
    }
}

impl CommandHandler for SwitchCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let id = chat_or_usage!(state, args);
        state.store.activate(&id);
        let Some(session) = state.store.active() else {
            return Ok(None);
        };
        let mut out = vec![format!("Switched to: {}", session.title)];
        out.extend(session.messages.iter().map(display::render_message));
        Ok(Some(out.join("\n\n")))
    }

    fn help(&self) -> &'static str {
        "/switch <n> - Make chat n active and show its messages"
    }
}

impl CommandHandler for RenameCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let id = chat_or_usage!(state, args);
        let title = args[1..].join(" ");
        if title.trim().is_empty() {
            state.store.start_editing_title(&id);
            return Ok(Some("Type the new title on the next line.".to_string()));
        }
        state.store.rename_session(&id, title.trim());
        Ok(Some(format!("Renamed to: {}", title.trim())))
    }

    fn help(&self) -> &'static str {
        "/rename <n> [title] - Rename chat n (without a title, the next line is used)"
    }
}

impl CommandHandler for PinCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let id = chat_or_usage!(state, args);
        state.store.toggle_pin(&id);
        let pinned = state.store.get(&id).is_some_and(|s| s.is_pinned);
        Ok(Some(if pinned { "Pinned." } else { "Unpinned." }.to_string()))
    }

    fn help(&self) -> &'static str {
        "/pin <n> - Pin or unpin chat n"
    }
}

impl CommandHandler for DuplicateCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let id = chat_or_usage!(state, args);
        match state.store.duplicate_session(&id) {
            Some(copy) => {
                let title = state.store.get(&copy).map(|s| s.title.clone()).unwrap_or_default();
                Ok(Some(format!("Created: {}", title)))
            }
            None => Ok(None),
        }
    }

    fn help(&self) -> &'static str {
        "/dup <n> - Duplicate chat n"
    }
}

impl CommandHandler for DeleteCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let id = chat_or_usage!(state, args);
        let title = state.store.get(&id).map(|s| s.title.clone()).unwrap_or_default();
        state.store.delete_session(&id);
        Ok(Some(format!("Deleted: {}", title)))
    }

    fn help(&self) -> &'static str {
        "/delete <n> - Delete chat n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Message;
    use crate::pipeline::settings::AssistantSettings;

    fn workspace() -> Workspace {
        Workspace::new(AssistantSettings::default())
    }

    #[test]
    fn rename_without_title_starts_editing() {
        let mut state = workspace();
        RenameCommand.execute(&mut state, &["1"]).unwrap();
        assert!(state.store.active().unwrap().is_editing_title);
        assert_eq!(state.editing_title_id(), Some(state.store.active_id().to_string()));

        RenameCommand.execute(&mut state, &["1", "Graph", "search"]).unwrap();
        let session = state.store.active().unwrap();
        assert_eq!(session.title, "Graph search");
        assert!(!session.is_editing_title);
    }

    #[test]
    fn dup_and_delete_address_by_position() {
        let mut state = workspace();
        let id = state.store.active_id().to_string();
        state.store.append_message(&id, Message::user("hello"));

        let out = DuplicateCommand.execute(&mut state, &["1"]).unwrap().unwrap();
        assert_eq!(out, "Created: New Chat (Copy)");
        assert_eq!(state.store.len(), 2);

        DeleteCommand.execute(&mut state, &["2"]).unwrap();
        assert!(state.store.get(&id).is_none());
        assert_eq!(state.store.len(), 1);
    }

    #[test]
    fn bad_position_is_reported_not_raised() {
        let mut state = workspace();
        let out = PinCommand.execute(&mut state, &["7"]).unwrap();
        assert_eq!(out.as_deref(), Some("No chat at position 7"));
    }

    #[test]
    fn switch_changes_the_active_chat() {
        let mut state = workspace();
        let oldest = state.store.active_id().to_string();
        state.new_chat();
        SwitchCommand.execute(&mut state, &["2"]).unwrap();
        assert_eq!(state.store.active_id(), oldest);
    }
}
