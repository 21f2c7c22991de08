use crate::commands::CommandDispatcher;
use crate::core::error::AssistantError;
use crate::display;
use crate::input;
use crate::pipeline::{Pipeline, SendState};
use crate::workspace::Workspace;
use console::style;
use tracing::{debug, warn};

pub struct Application {
    pub pipeline: Pipeline,
    pub command_dispatcher: CommandDispatcher,
    pub workspace: Workspace,
}

impl Application {
    pub fn new(
        pipeline: Pipeline,
        command_dispatcher: CommandDispatcher,
        workspace: Workspace,
    ) -> Self {
        Self {
            pipeline,
            command_dispatcher,
            workspace,
        }
    }

    pub async fn run(&mut self) -> Result<(), AssistantError> {
        println!(
            "{}\n",
            display::render_status(
                &self.workspace.settings,
                self.pipeline.state() == SendState::Sending
            )
        );
        if let Some(session) = self.workspace.store.active() {
            for message in &session.messages {
                display::display_message(message);
            }
        }
        println!(
            "{}",
            style("Type '/help' for available commands. Press Ctrl+D or type /quit to exit.").dim()
        );

        let mut editor = input::create_editor(self.command_dispatcher.clone())?;

        while self.workspace.should_continue {
            let Some(line) = input::read_input(&mut editor)? else {
                break;
            };
            match self.process_line(&line).await {
                Ok(Some(output)) => println!("{}", output),
                Ok(None) => {}
                Err(e) => display::display_error(&e.to_string()),
            }
        }

        if let Err(err) = input::save_history(&mut editor) {
            warn!(%err, "failed to save input history");
        }
        Ok(())
    }

    /// Handle one line typed at the prompt and return what to print.
    pub async fn process_line(&mut self, raw: &str) -> Result<Option<String>, AssistantError> {
        let line = raw.trim();

        if let Some(command_line) = line.strip_prefix('/') {
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                return Ok(None);
            };
            return self
                .command_dispatcher
                .execute(command, args, &mut self.workspace);
        }

        if let Some(chat_id) = self.workspace.editing_title_id() {
            if line.is_empty() {
                return Ok(None);
            }
            self.workspace.store.rename_session(&chat_id, line);
            return Ok(Some(format!("Renamed to: {}", line)));
        }

        if line.is_empty() && self.workspace.composer.is_empty() {
            return Ok(None);
        }

        if self.workspace.settings.input_locked() {
            return Ok(Some(
                style("Accept the terms of use with /accept before sending messages.")
                    .yellow()
                    .to_string(),
            ));
        }

        // The message keeps the line as typed; only blank checks use the trimmed form.
        let text = self
            .workspace
            .outgoing(if line.is_empty() { line } else { raw });
        display::display_thinking();
        let Some(report) = self
            .pipeline
            .send(&mut self.workspace.store, &self.workspace.settings, &text)
            .await
        else {
            return Ok(None);
        };

        if report.state == SendState::Failed {
            debug!(session = %report.session_id, "reply carries a failure notice");
        }
        if !report.appended {
            return Ok(None);
        }
        let rendered = self
            .workspace
            .store
            .get(&report.session_id)
            .and_then(|session| session.messages.iter().find(|m| m.id == report.message_id))
            .map(display::render_message);
        Ok(rendered)
    }
}
