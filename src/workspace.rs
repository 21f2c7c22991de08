use crate::chat::ChatStore;
use crate::composer::Composer;
use crate::composer::dictation::DictationController;
use crate::folders::FolderOrganizer;
use crate::pipeline::settings::AssistantSettings;
use crate::suggest::panel::CodePanel;

/// Everything the front end mutates, passed explicitly to each command.
pub struct Workspace {
    pub store: ChatStore,
    pub folders: FolderOrganizer,
    pub settings: AssistantSettings,
    pub composer: Composer,
    pub panel: CodePanel,
    pub dictation: DictationController,
    pub should_continue: bool,
}

impl Workspace {
    pub fn new(settings: AssistantSettings) -> Self {
        Self {
            store: ChatStore::new(settings.welcome_messages()),
            folders: FolderOrganizer::default(),
            settings,
            composer: Composer::default(),
            panel: CodePanel::default(),
            dictation: DictationController::default(),
            should_continue: true,
        }
    }

    /// Session id at a 1-based position of the session list.
    pub fn chat_id_at(&self, position: usize) -> Option<String> {
        let index = position.checked_sub(1)?;
        self.store.snapshot().get(index).map(|s| s.id.clone())
    }

    pub fn position_of(&self, chat_id: &str) -> Option<usize> {
        self.store
            .snapshot()
            .iter()
            .position(|s| s.id == chat_id)
            .map(|index| index + 1)
    }

    /// Session waiting for a title typed on the next line.
    pub fn editing_title_id(&self) -> Option<String> {
        self.store
            .snapshot()
            .iter()
            .find(|s| s.is_editing_title)
            .map(|s| s.id.clone())
    }

    pub fn new_chat(&mut self) -> String {
        self.settings.new_chat(&mut self.store)
    }

    pub fn toggle_panel(&mut self) -> bool {
        let last_code = self.store.last_code(self.store.active_id()).map(str::to_string);
        self.panel.toggle(last_code.as_deref())
    }

    /// Text to send for a typed line: pending composer content first, then
    /// the line itself. Clears the composer.
    pub fn outgoing(&mut self, line: &str) -> String {
        let pending = self.composer.take();
        if pending.trim().is_empty() {
            line.to_string()
        } else if line.is_empty() || pending.ends_with('\n') {
            pending + line
        } else {
            format!("{}\n{}", pending, line)
        }
    }
}
