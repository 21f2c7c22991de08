use super::{
    chats::{
        DeleteCommand, DuplicateCommand, ListChatsCommand, NewChatCommand, PinCommand,
        RenameCommand, SwitchCommand,
    },
    compose::{
        ActionCommand, ApplyCommand, AttachCommand, DictateCommand, DraftCommand, EditCommand,
        LocationCommand, PanelCommand, ScaffoldCommand, TemplateCommand, TemplatesCommand,
    },
    handler::{
        AcceptCommand, EnterpriseCommand, HelpCommand, KeyCommand, LanguageCommand, QuitCommand,
        StatusCommand,
    },
    organize::{DragCommand, DropCommand, FolderCommand, FoldersCommand, MoveCommand},
    registry::CommandRegistry,
};
use crate::core::error::AssistantError;
use crate::workspace::Workspace;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[&str],
        state: &mut Workspace,
    ) -> Result<Option<String>, AssistantError> {
        self.registry.execute(command, args, state)
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("status", StatusCommand);
    registry.register("lang", LanguageCommand);
    registry.register("enterprise", EnterpriseCommand);
    registry.register("key", KeyCommand);
    registry.register("accept", AcceptCommand);

    registry.register("new", NewChatCommand);
    registry.register("chats", ListChatsCommand);
    registry.register("switch", SwitchCommand);
    registry.register("rename", RenameCommand);
    registry.register("pin", PinCommand);
    registry.register("dup", DuplicateCommand);
    registry.register("delete", DeleteCommand);

    registry.register("folders", FoldersCommand);
    registry.register("folder", FolderCommand);
    registry.register("move", MoveCommand);
    registry.register("drag", DragCommand);
    registry.register("drop", DropCommand);

    registry.register("draft", DraftCommand);
    registry.register("templates", TemplatesCommand);
    registry.register("template", TemplateCommand);
    registry.register("action", ActionCommand);
    registry.register("location", LocationCommand);
    registry.register("attach", AttachCommand);
    registry.register("dictate", DictateCommand);
    registry.register("panel", PanelCommand);
    registry.register("edit", EditCommand);
    registry.register("apply", ApplyCommand);
    registry.register("scaffold", ScaffoldCommand);

    let help = HelpCommand::new(registry.help_lines());
    registry.register("help", help);

    CommandDispatcher::new(Arc::new(registry))
}
