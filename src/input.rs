use crate::commands::CommandDispatcher;
use crate::config::Config;
use crate::core::error::AssistantError;
use crate::language::Language;

use console::style;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Context, EditMode, Editor, Helper};
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::debug;

pub type AssistantEditor = Editor<AssistantHelper, FileHistory>;

/// Completes command names, `/lang` arguments and `/attach` paths.
pub struct AssistantHelper {
    filenames: FilenameCompleter,
    hinter: HistoryHinter,
    commands: CommandDispatcher,
}

impl AssistantHelper {
    pub fn new(commands: CommandDispatcher) -> Self {
        Self {
            filenames: FilenameCompleter::new(),
            hinter: HistoryHinter {},
            commands,
        }
    }
}

fn pairs<'a>(candidates: impl Iterator<Item = &'a str>, prefix: &str) -> Vec<Pair> {
    candidates
        .filter(|candidate| candidate.starts_with(prefix))
        .map(|candidate| Pair {
            display: candidate.to_string(),
            replacement: candidate.to_string(),
        })
        .collect()
}

impl Completer for AssistantHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        let Some(command) = head.strip_prefix('/') else {
            return Ok((pos, Vec::new()));
        };

        if !command.contains(' ') {
            let names = self.commands.get_command_names();
            return Ok((1, pairs(names.iter().map(String::as_str), command)));
        }

        if let Some(partial) = command.strip_prefix("lang ") {
            let names = Language::ALL.iter().map(|l| l.as_str());
            return Ok((pos - partial.len(), pairs(names, partial)));
        }
        if command.starts_with("attach ") {
            return self.filenames.complete(line, pos, ctx);
        }
        Ok((pos, Vec::new()))
    }
}

impl Hinter for AssistantHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for AssistantHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(style(hint).dim().to_string())
    }
}

impl Validator for AssistantHelper {}

impl Helper for AssistantHelper {}

fn history_path() -> PathBuf {
    Config::config_dir().join("input_history.txt")
}

pub fn create_editor(commands: CommandDispatcher) -> Result<AssistantEditor, AssistantError> {
    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| AssistantError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(AssistantHelper::new(commands)));

    if let Err(err) = editor.load_history(&history_path()) {
        debug!(%err, "no input history loaded");
    }
    Ok(editor)
}

/// Read one line. `None` means the user asked to leave (Ctrl-C or Ctrl-D).
pub fn read_input(editor: &mut AssistantEditor) -> Result<Option<String>, AssistantError> {
    let prompt = style("> ").bold().cyan().to_string();
    match editor.readline(&prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor.add_history_entry(line.as_str())?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Exiting...");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

pub fn save_history(editor: &mut AssistantEditor) -> Result<(), AssistantError> {
    let path = history_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    editor.save_history(&path)?;
    Ok(())
}
