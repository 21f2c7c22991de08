use crate::commands::handler::CommandHandler;
use crate::core::error::AssistantError;
use crate::workspace::Workspace;
use std::collections::HashMap;
use std::sync::Arc;

pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
    order: Vec<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn register<C: CommandHandler + 'static>(&mut self, name: &str, command: C) {
        if self
            .handlers
            .insert(name.to_string(), Arc::new(command))
            .is_none()
        {
            self.order.push(name.to_string());
        }
    }

    pub fn execute(
        &self,
        name: &str,
        args: &[&str],
        state: &mut Workspace,
    ) -> Result<Option<String>, AssistantError> {
        self.handlers
            .get(name)
            .ok_or_else(|| AssistantError::Input(format!("Unknown command: /{}", name)))
            .and_then(|handler| handler.execute(state, args))
    }

    /// Names in registration order.
    pub fn get_command_names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn help_lines(&self) -> Vec<&'static str> {
        self.order
            .iter()
            .filter_map(|name| self.handlers.get(name))
            .map(|handler| handler.help())
            .collect()
    }
}
