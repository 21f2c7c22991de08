use crate::core::error::AssistantError;
use crate::display;
use crate::language::Language;
use crate::workspace::Workspace;
use console::style;

pub trait CommandHandler {
    fn execute(&self, state: &mut Workspace, args: &[&str])
    -> Result<Option<String>, AssistantError>;
    fn help(&self) -> &'static str;
}

/// Resolve a 1-based chat position argument, or explain what went wrong.
pub(crate) fn chat_arg(state: &Workspace, arg: Option<&&str>) -> Result<String, String> {
    let Some(raw) = arg else {
        return Err("Please specify a chat number (see /chats)".to_string());
    };
    raw.parse::<usize>()
        .ok()
        .and_then(|position| state.chat_id_at(position))
        .ok_or_else(|| format!("No chat at position {}", raw))
}

pub struct QuitCommand;
pub struct HelpCommand {
    lines: Vec<&'static str>,
}
pub struct StatusCommand;
pub struct LanguageCommand;
pub struct EnterpriseCommand;
pub struct KeyCommand;
pub struct AcceptCommand;

impl HelpCommand {
    pub const HELP: &'static str = "/help - Show available commands";

    pub fn new(lines: Vec<&'static str>) -> Self {
        Self { lines }
    }
}

impl CommandHandler for QuitCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        _args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the assistant"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(
        &self,
        _state: &mut Workspace,
        _args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let title = style("Available Commands").bold().underlined();
        let mut help_text = vec![title.to_string(), Self::HELP.to_string()];
        help_text.extend(self.lines.iter().map(|line| line.to_string()));
        help_text.push(
            style("Anything not starting with '/' is sent to the assistant.")
                .dim()
                .to_string(),
        );
        Ok(Some(help_text.join("\n")))
    }

    fn help(&self) -> &'static str {
        Self::HELP
    }
}

impl CommandHandler for StatusCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        _args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        Ok(Some(display::render_status(&state.settings, false)))
    }

    fn help(&self) -> &'static str {
        "/status - Show mode, language, model and credential state"
    }
}

impl CommandHandler for LanguageCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let Some(name) = args.first() else {
            let names: Vec<_> = Language::ALL.iter().map(|l| l.as_str()).collect();
            return Ok(Some(format!(
                "Current language: {}\nAvailable: {}",
                state.settings.language.display_name(),
                names.join(", ")
            )));
        };
        match Language::from_str(name) {
            Some(language) => {
                state.settings.language = language;
                Ok(Some(format!("Language set to {}", language.display_name())))
            }
            None => Ok(Some(format!("Unknown language: {}", name))),
        }
    }

    fn help(&self) -> &'static str {
        "/lang [name] - Show or change the target language"
    }
}

impl CommandHandler for EnterpriseCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        _args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        if state.settings.enterprise {
            state.settings.disable_enterprise(&mut state.store);
            return Ok(Some("Enterprise mode off. Back to demo mode.".to_string()));
        }
        if state.settings.enable_enterprise(&mut state.store) {
            let notice = display::render_message(&state.settings.welcome_messages()[0]);
            Ok(Some(notice))
        } else {
            Ok(Some(
                "No API key configured. Use /key <credential> to enable enterprise mode."
                    .to_string(),
            ))
        }
    }

    fn help(&self) -> &'static str {
        "/enterprise - Toggle enterprise mode (resets all chats)"
    }
}

impl CommandHandler for KeyCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let key = args.join(" ");
        if !state.settings.submit_credential(&mut state.store, &key) {
            return Ok(None);
        }
        Ok(Some(format!(
            "{}\n{}",
            style("API key stored. Enterprise mode enabled.").green(),
            display::render_message(&state.settings.welcome_messages()[0])
        )))
    }

    fn help(&self) -> &'static str {
        "/key <credential> - Store an API key and enable enterprise mode"
    }
}

impl CommandHandler for AcceptCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        _args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        if !state.settings.enterprise {
            return Ok(Some("Nothing to accept outside enterprise mode.".to_string()));
        }
        state.settings.accept_terms();
        Ok(Some(state.settings.status().to_string()))
    }

    fn help(&self) -> &'static str {
        "/accept - Accept the enterprise terms of use"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::settings::{AssistantSettings, ModeStatus};

    #[test]
    fn quit_stops_the_loop() {
        let mut state = Workspace::new(AssistantSettings::default());
        QuitCommand.execute(&mut state, &[]).unwrap();
        assert!(!state.should_continue);
    }

    #[test]
    fn lang_accepts_aliases() {
        let mut state = Workspace::new(AssistantSettings::default());
        LanguageCommand.execute(&mut state, &["c++"]).unwrap();
        assert_eq!(state.settings.language, Language::Cpp);

        let out = LanguageCommand.execute(&mut state, &["cobol"]).unwrap();
        assert_eq!(out.as_deref(), Some("Unknown language: cobol"));
        assert_eq!(state.settings.language, Language::Cpp);
    }

    #[test]
    fn key_then_accept_activates_enterprise() {
        let mut state = Workspace::new(AssistantSettings::default());
        assert!(KeyCommand.execute(&mut state, &[]).unwrap().is_none());
        assert!(!state.settings.enterprise);

        KeyCommand.execute(&mut state, &["sk-test"]).unwrap();
        AcceptCommand.execute(&mut state, &[]).unwrap();
        assert_eq!(state.settings.status(), ModeStatus::Active);

        EnterpriseCommand.execute(&mut state, &[]).unwrap();
        assert_eq!(state.settings.status(), ModeStatus::Demo);
    }

    #[test]
    fn enterprise_toggle_keeps_the_configured_key() {
        let config = crate::config::Config::parse("api_key: sk-env\n").unwrap();
        let mut state = Workspace::new(config.settings());

        EnterpriseCommand.execute(&mut state, &[]).unwrap();
        assert!(state.settings.enterprise);

        EnterpriseCommand.execute(&mut state, &[]).unwrap();
        assert!(!state.settings.enterprise);
        assert_eq!(state.settings.route().name(), "direct");
        assert_eq!(state.settings.credential(), Some("sk-env"));

        let out = EnterpriseCommand.execute(&mut state, &[]).unwrap().unwrap();
        assert!(state.settings.enterprise);
        assert!(!out.starts_with("No API key"));
    }

    #[test]
    fn chat_arg_explains_bad_positions() {
        let state = Workspace::new(AssistantSettings::default());
        assert!(chat_arg(&state, Some(&"1")).is_ok());
        assert_eq!(chat_arg(&state, Some(&"9")).unwrap_err(), "No chat at position 9");
        assert!(chat_arg(&state, Some(&"x")).is_err());
        assert!(chat_arg(&state, None).is_err());
    }
}
