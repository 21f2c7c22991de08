use super::handler::CommandHandler;
use crate::composer::dictation::TranscriptRecognizer;
use crate::composer::templates::{self, TEMPLATES};
use crate::composer::{AttachedFile, QuickAction};
use crate::core::error::AssistantError;
use crate::display;
use crate::suggest::scaffold::test_scaffold;
use crate::workspace::Workspace;
use console::style;
use std::path::Path;

pub struct DraftCommand;
pub struct TemplatesCommand;
pub struct TemplateCommand;
pub struct ActionCommand;
pub struct LocationCommand;
pub struct AttachCommand;
pub struct DictateCommand;
pub struct PanelCommand;
pub struct EditCommand;
pub struct ApplyCommand;
pub struct ScaffoldCommand;

fn draft(state: &Workspace) -> Option<String> {
    display::render_composer(&state.composer)
}

fn panel(state: &Workspace) -> String {
    display::render_panel(&state.panel, state.settings.language.as_str())
}

impl CommandHandler for DraftCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        if !args.is_empty() {
            state.composer.set_text(&args.join(" "));
        } else if state.composer.is_empty() {
            return Ok(Some("The draft is empty.".to_string()));
        }
        Ok(draft(state))
    }

    fn help(&self) -> &'static str {
        "/draft [text] - Show the draft, or replace it with text"
    }
}

impl CommandHandler for TemplatesCommand {
    fn execute(
        &self,
        _state: &mut Workspace,
        _args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let mut lines = vec![style("Prompt Templates").bold().underlined().to_string()];
        for (index, template) in TEMPLATES.iter().enumerate() {
            lines.push(format!(
                "{:>2}. {} {} {}",
                index + 1,
                template.name,
                style(format!("[{}]", template.category)).dim(),
                style(template.description).dim()
            ));
        }
        Ok(Some(lines.join("\n")))
    }

    fn help(&self) -> &'static str {
        "/templates - List prompt templates"
    }
}

impl CommandHandler for TemplateCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let Some(template) = args
            .first()
            .and_then(|raw| raw.parse::<usize>().ok())
            .and_then(templates::by_position)
        else {
            return Ok(Some("Usage: /template <n> (see /templates)".to_string()));
        };
        let code = state.panel.code.clone();
        state
            .composer
            .apply_template(template, &code, state.settings.language);
        Ok(draft(state))
    }

    fn help(&self) -> &'static str {
        "/template <n> - Load template n into the draft, with the panel code if any"
    }
}

impl CommandHandler for ActionCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let Some(action) = args.first().and_then(|raw| QuickAction::from_str(raw)) else {
            let names: Vec<_> = QuickAction::ALL.iter().map(QuickAction::name).collect();
            return Ok(Some(format!("Usage: /action <{}>", names.join("|"))));
        };
        state.composer.quick_action(action);
        Ok(draft(state))
    }

    fn help(&self) -> &'static str {
        "/action <copy|review|tests|optimize> - Prefix the draft with a quick action"
    }
}

impl CommandHandler for LocationCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        if !state.composer.add_location(&args.join(" ")) {
            return Ok(Some("Usage: /location <place>".to_string()));
        }
        Ok(draft(state))
    }

    fn help(&self) -> &'static str {
        "/location <place> - Prefix the draft with a location"
    }
}

impl CommandHandler for AttachCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        if args.is_empty() {
            return Ok(Some("Usage: /attach <path>...".to_string()));
        }
        let files = args
            .iter()
            .map(|path| AttachedFile::from_path(Path::new(path)))
            .collect::<Result<Vec<_>, _>>()?;
        state.composer.attach_files(&files);
        Ok(draft(state))
    }

    fn help(&self) -> &'static str {
        "/attach <path>... - Prefix the draft with file names and sizes"
    }
}

impl CommandHandler for DictateCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        if args.first() == Some(&"stop") {
            state.dictation.stop(&mut state.composer);
            return Ok(draft(state));
        }
        let recognizer = Box::new(TranscriptRecognizer::new(&args.join(" ")));
        if state.dictation.start(recognizer, &mut state.composer) {
            state.dictation.pump(&mut state.composer);
        }
        Ok(draft(state))
    }

    fn help(&self) -> &'static str {
        "/dictate <words> | stop - Dictate into the draft"
    }
}

impl CommandHandler for PanelCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        _args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        if state.toggle_panel() {
            Ok(Some(panel(state)))
        } else {
            Ok(Some("Panel closed.".to_string()))
        }
    }

    fn help(&self) -> &'static str {
        "/panel - Open or close the code panel"
    }
}

impl CommandHandler for EditCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        state.panel.open = true;
        if args.is_empty() {
            state.panel.clear();
            return Ok(Some(panel(state)));
        }
        let code = args.join(" ").replace("\\n", "\n");
        state.panel.edit(&code, state.settings.language);
        Ok(Some(panel(state)))
    }

    fn help(&self) -> &'static str {
        "/edit [code] - Replace the panel code (\\n for newlines); no code clears it"
    }
}

impl CommandHandler for ApplyCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let index = args
            .first()
            .and_then(|raw| raw.parse::<usize>().ok())
            .and_then(|position| position.checked_sub(1));
        let Some(index) = index else {
            return Ok(Some("Usage: /apply <n>".to_string()));
        };
        match state.panel.apply(index) {
            Some(applied) => Ok(Some(format!(
                "Applied: {}\n{}",
                applied.description,
                panel(state)
            ))),
            None => Ok(Some(format!("No suggestion {}", index + 1))),
        }
    }

    fn help(&self) -> &'static str {
        "/apply <n> - Append suggestion n to the panel code"
    }
}

impl CommandHandler for ScaffoldCommand {
    fn execute(
        &self,
        state: &mut Workspace,
        _args: &[&str],
    ) -> Result<Option<String>, AssistantError> {
        let language = state.settings.language;
        state.panel.open = true;
        state.panel.edit(&test_scaffold(language), language);
        Ok(Some(panel(state)))
    }

    fn help(&self) -> &'static str {
        "/scaffold - Load a test skeleton for the current language into the panel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::pipeline::settings::AssistantSettings;

    fn workspace() -> Workspace {
        Workspace::new(AssistantSettings::default())
    }

    #[test]
    fn template_uses_panel_code() {
        let mut state = workspace();
        state.settings.language = Language::Python;
        EditCommand.execute(&mut state, &["print(1)"]).unwrap();
        TemplateCommand.execute(&mut state, &["2"]).unwrap();

        assert!(state.composer.text().starts_with(TEMPLATES[1].body));
        assert!(state.composer.text().ends_with("```python\nprint(1)\n```"));
    }

    #[test]
    fn draft_replaces_and_reports_empty() {
        let mut state = workspace();
        let out = DraftCommand.execute(&mut state, &[]).unwrap();
        assert_eq!(out.as_deref(), Some("The draft is empty."));

        DraftCommand.execute(&mut state, &["explain", "lifetimes"]).unwrap();
        assert_eq!(state.composer.text(), "explain lifetimes");
    }

    #[test]
    fn unknown_template_position_shows_usage() {
        let mut state = workspace();
        let out = TemplateCommand.execute(&mut state, &["9"]).unwrap().unwrap();
        assert!(out.starts_with("Usage"));
        assert!(state.composer.is_empty());
    }

    #[test]
    fn dictation_lands_in_the_draft() {
        let mut state = workspace();
        state.composer.set_text("Please");
        DictateCommand.execute(&mut state, &["write", "a", "parser"]).unwrap();
        assert_eq!(state.composer.text(), "Please write a parser");
        assert!(!state.dictation.is_recording());
    }

    #[test]
    fn edit_then_apply_suggestion() {
        let mut state = workspace();
        EditCommand
            .execute(&mut state, &["function", "f()", "{\\n", "let", "result", "=", "1;\\n}"])
            .unwrap();
        assert!(state.panel.open);
        assert!(!state.panel.suggestions.is_empty());

        ApplyCommand.execute(&mut state, &["1"]).unwrap();
        assert!(state.panel.code.ends_with("\nreturn result;"));
        assert!(state.panel.suggestions.is_empty());

        let out = ApplyCommand.execute(&mut state, &["1"]).unwrap();
        assert_eq!(out.as_deref(), Some("No suggestion 1"));
    }

    #[test]
    fn attach_missing_file_is_an_error() {
        let mut state = workspace();
        let missing = format!("/nonexistent/{}", uuid::Uuid::new_v4());
        assert!(AttachCommand.execute(&mut state, &[missing.as_str()]).is_err());
    }

    #[test]
    fn scaffold_follows_the_language() {
        let mut state = workspace();
        state.settings.language = Language::Python;
        ScaffoldCommand.execute(&mut state, &[]).unwrap();
        assert!(state.panel.code.starts_with("# Unit Tests for python"));
        assert!(state.panel.open);
    }
}
