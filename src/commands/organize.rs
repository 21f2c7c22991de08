use super::handler::{CommandHandler, chat_arg};
use crate::core::error::AssistantError;
use crate::display;
use crate::folders::DropTarget;
use crate::workspace::Workspace;

pub struct FoldersCommand;
pub struct FolderCommand;
pub struct MoveCommand;
pub struct DragCommand;
pub struct DropCommand;

/// Folder id from a 1-based position or a name. `-` means unassigned.
fn drop_target(state: &Workspace, reference: &str) -> Option<DropTarget> {
    let reference = reference.trim();
    if reference == "-" {
        return Some(DropTarget::Unassigned);
    }
    folder_id(state, reference).map(DropTarget::Folder)
}

fn folder_id(state: &Workspace, reference: &str) -> Option<String> {
    let folders = state.folders.folders();
    if let Some(folder) = reference
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| folders.get(index))
    {
        return Some(folder.id.clone());
    }
    state.folders.find_by_name(reference).map(|f| f.id.clone())
}

impl CommandHandler for FoldersCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        _args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        Ok(Some(display::render_sidebar(state)))
    }

    fn help(&self) -> &'static str {
        "/folders - Show chats grouped by folder"
    }
}

impl CommandHandler for FolderCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        const USAGE: &str = "Usage: /folder new <name> | rename <folder> <name> | delete <folder> | toggle <folder>";
        let Some((action, rest)) = args.split_first() else {
            return Ok(Some(USAGE.to_string()));
        };
        match *action {
            "new" => match state.folders.create_folder(&rest.join(" ")) {
                Some(id) => {
                    let name = state.folders.get(&id).map(|f| f.name.clone()).unwrap_or_default();
                    Ok(Some(format!("Created folder: {}", name)))
                }
                None => Ok(None),
            },
            "rename" => {
                let Some((reference, name)) = rest.split_first() else {
                    return Ok(Some(USAGE.to_string()));
                };
                let Some(id) = folder_id(state, reference) else {
                    return Ok(Some(format!("No folder named {}", reference)));
                };
                if state.folders.rename_folder(&id, &name.join(" ")) {
                    Ok(Some("Folder renamed.".to_string()))
                } else {
                    Ok(None)
                }
            }
            "delete" => {
                let reference = rest.join(" ");
                let Some(id) = folder_id(state, &reference) else {
                    return Ok(Some(format!("No folder named {}", reference)));
                };
                if id == state.folders.default_folder_id() {
                    return Ok(Some("The default folder cannot be deleted.".to_string()));
                }
                state.folders.delete_folder(&mut state.store, &id);
                Ok(Some("Folder deleted. Its chats are now unassigned.".to_string()))
            }
            "toggle" => {
                let reference = rest.join(" ");
                let Some(id) = folder_id(state, &reference) else {
                    return Ok(Some(format!("No folder named {}", reference)));
                };
                state.folders.toggle_expanded(&id);
                Ok(Some(display::render_sidebar(state)))
            }
            _ => Ok(Some(USAGE.to_string())),
        }
    }

    fn help(&self) -> &'static str {
        "/folder new|rename|delete|toggle ... - Manage folders"
    }
}

impl CommandHandler for MoveCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let id = match chat_arg(state, args.first()) {
            Ok(id) => id,
            Err(message) => return Ok(Some(message)),
        };
        let name = args[1..].join(" ");
        if state.folders.reassign_by_name(&mut state.store, &id, &name) {
            let label = state
                .store
                .get(&id)
                .and_then(|chat| state.folders.folder_of(chat))
                .map(|f| f.name.clone())
                .unwrap_or_else(|| "Unassigned".to_string());
            Ok(Some(format!("Moved to {}", label)))
        } else {
            Ok(Some(format!("No folder named {}; chat left where it was.", name.trim())))
        }
    }

    fn help(&self) -> &'static str {
        "/move <n> [folder] - File chat n under a folder by name (no name unassigns)"
    }
}

impl CommandHandler for DragCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        match args.first().copied() {
            Some("over") => {
                let reference = args[1..].join(" ");
                match drop_target(state, &reference) {
                    Some(target) => state.folders.drag_over(target),
                    None => return Ok(Some(format!("No folder named {}", reference))),
                }
            }
            Some("leave") => state.folders.drag_leave(),
            Some("cancel") => state.folders.end_drag(),
            _ => {
                let id = match chat_arg(state, args.first()) {
                    Ok(id) => id,
                    Err(message) => return Ok(Some(message)),
                };
                state.folders.begin_drag(&id);
            }
        }
        Ok(Some(display::render_sidebar(state)))
    }

    fn help(&self) -> &'static str {
        "/drag <n> | over <folder|-> | leave | cancel - Drag a chat between folders"
    }
}

impl CommandHandler for DropCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let reference = args.join(" ");
        let Some(target) = drop_target(state, &reference) else {
            state.folders.end_drag();
            return Ok(Some(format!("No folder named {}", reference)));
        };
        if !state.folders.drop(&mut state.store, target) {
            return Ok(Some("Nothing was being dragged.".to_string()));
        }
        Ok(Some(display::render_sidebar(state)))
    }

    fn help(&self) -> &'static str {
        "/drop <folder|-> - Drop the dragged chat on a folder, or '-' to unassign"
    }
}
