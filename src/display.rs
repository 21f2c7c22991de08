use crate::analysis::{CodeAnalysis, Severity};
use crate::chat::{Message, Role};
use crate::composer::Composer;
use crate::folders::FolderOrganizer;
use crate::pipeline::settings::AssistantSettings;
use crate::suggest::CodeSuggestion;
use crate::suggest::panel::CodePanel;
use crate::workspace::Workspace;
use chrono::Local;
use console::{Style, measure_text_width, style};
use std::fmt::Write;
use std::sync::Arc;
use termimad::MadSkin;

fn box_width() -> usize {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    std::cmp::min(terminal_width.saturating_sub(4), 100).max(50)
}

/// Draw `lines` inside a box whose top border carries `label`.
fn boxed(label: &str, lines: &[&str], border: &Style) -> String {
    let width = box_width();
    let header_fill = width.saturating_sub(measure_text_width(label) + 5);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        border.apply_to(format!("┌─ {} {}┐", label, "─".repeat(header_fill)))
    );
    for line in lines {
        let padding = width.saturating_sub(measure_text_width(line) + 3);
        let _ = writeln!(
            out,
            "{} {}{}{}",
            border.apply_to("│"),
            line,
            " ".repeat(padding),
            border.apply_to("│")
        );
    }
    let _ = write!(
        out,
        "{}",
        border.apply_to(format!("└{}┘", "─".repeat(width.saturating_sub(2))))
    );
    out
}

pub fn markdown(text: &str) -> String {
    MadSkin::default().term_text(text).to_string()
}

fn role_label(role: Role) -> String {
    match role {
        Role::User => style("🧑 YOU").bold().cyan().to_string(),
        Role::Assistant => style("🤖 ASSISTANT").bold().blue().to_string(),
        Role::System => style("📜 SYSTEM").bold().yellow().to_string(),
    }
}

pub fn render_message(message: &Message) -> String {
    let mut out = format!(
        "{} {}\n",
        role_label(message.role),
        style(message.created_at.with_timezone(&Local).format("%H:%M")).dim()
    );

    // Simulated replies already carry the code inline in their text.
    let code_in_content = message
        .code
        .as_deref()
        .is_some_and(|code| message.content.contains(code));
    let text = match (&message.code, code_in_content) {
        (Some(code), true) => message.content.replacen(code.as_str(), "", 1),
        _ => message.content.clone(),
    };
    if !text.trim().is_empty() {
        out.push_str(&markdown(text.trim_end()));
    }

    if let Some(code) = &message.code {
        let language = message.language.map(|l| l.as_str()).unwrap_or("code");
        let lines: Vec<&str> = code.lines().collect();
        out.push('\n');
        out.push_str(&boxed(language, &lines, &Style::new().dim().green()));
    }
    if let Some(analysis) = &message.analysis {
        out.push('\n');
        out.push_str(&render_analysis(analysis));
    }
    out
}

pub fn display_message(message: &Message) {
    println!("\n{}", render_message(message));
}

fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::High => style("high").bold().red().to_string(),
        Severity::Medium => style("medium").yellow().to_string(),
        Severity::Low => style("low").dim().to_string(),
    }
}

fn line_suffix(line: Option<u32>) -> String {
    line.map(|n| format!(" (line {})", n)).unwrap_or_default()
}

pub fn render_analysis(analysis: &CodeAnalysis) -> String {
    let mut out = format!(
        "{} complexity: {:?}",
        style("🔍 CODE ANALYSIS").bold().magenta(),
        analysis.complexity
    );
    if analysis.is_clean() {
        out.push_str(&format!("\n  {}", style("✅ No issues found").green()));
        return out;
    }
    for issue in &analysis.security {
        let _ = write!(
            out,
            "\n  🔒 [{}] {}{}\n     ↳ {}",
            severity_label(issue.severity),
            issue.description,
            line_suffix(issue.line),
            style(&issue.remediation).dim()
        );
    }
    for issue in &analysis.performance {
        let _ = write!(
            out,
            "\n  ⚡ [{}] {}{}\n     ↳ {}",
            severity_label(issue.severity),
            issue.description,
            line_suffix(issue.line),
            style(&issue.remediation).dim()
        );
    }
    for practice in &analysis.best_practices {
        let _ = write!(out, "\n  💡 {}", practice);
    }
    out
}

pub fn render_suggestions(suggestions: &[CodeSuggestion]) -> String {
    if suggestions.is_empty() {
        return style("No suggestions for this code.").dim().to_string();
    }
    let mut out = style("💡 Suggestions").bold().to_string();
    for (index, suggestion) in suggestions.iter().enumerate() {
        let _ = write!(
            out,
            "\n  {}. [{:?}] {} ({:.0}%)\n     {}",
            index + 1,
            suggestion.kind,
            suggestion.description,
            suggestion.confidence * 100.0,
            style(&suggestion.patch_text).green()
        );
    }
    out
}

pub fn render_panel(panel: &CodePanel, language: &str) -> String {
    let lines: Vec<&str> = if panel.code.is_empty() {
        vec!["(empty)"]
    } else {
        panel.code.lines().collect()
    };
    let mut out = boxed(
        &format!("panel · {}", language),
        &lines,
        &Style::new().dim().cyan(),
    );
    if !panel.suggestions.is_empty() {
        out.push('\n');
        out.push_str(&render_suggestions(&panel.suggestions));
    }
    out
}

pub fn render_composer(composer: &Composer) -> Option<String> {
    let text = composer.display_text();
    if text.is_empty() {
        return None;
    }
    let lines: Vec<&str> = text.lines().collect();
    Some(boxed("draft", &lines, &Style::new().dim().yellow()))
}

fn chat_line(workspace: &Workspace, position: usize, chat: &crate::chat::ChatSession) -> String {
    let marker = if chat.id == workspace.store.active_id() {
        style("▶").bold().green().to_string()
    } else {
        " ".to_string()
    };
    let pin = if chat.is_pinned { "📌 " } else { "" };
    format!(
        "{} {:>2}. {}{} {}",
        marker,
        position,
        pin,
        style(&chat.title).bold(),
        style(format!("({} messages)", chat.messages.len())).dim()
    )
}

fn folder_tag(folders: &FolderOrganizer, chat: &crate::chat::ChatSession) -> String {
    folders
        .folder_of(chat)
        .map(|f| format!(" {} {}", f.icon, style(&f.name).dim()))
        .unwrap_or_default()
}

pub fn render_chat_list(workspace: &Workspace) -> String {
    let snapshot = workspace.store.snapshot();
    let mut out = style(format!("Chats ({})", workspace.store.len()))
        .bold()
        .underlined()
        .to_string();
    for (index, chat) in snapshot.iter().enumerate() {
        let _ = write!(
            out,
            "\n{}{}",
            chat_line(workspace, index + 1, chat),
            folder_tag(&workspace.folders, chat)
        );
    }
    out
}

pub fn render_sidebar(workspace: &Workspace) -> String {
    let sidebar = workspace.folders.partition(&workspace.store);
    let dragged = workspace.folders.drag_state().dragged.clone();
    let line = |chat: &Arc<crate::chat::ChatSession>| {
        let position = workspace.position_of(&chat.id).unwrap_or(0);
        let mut text = chat_line(workspace, position, chat);
        if dragged.as_deref() == Some(chat.id.as_str()) {
            text.push_str(&format!(" {}", style("(dragging)").italic()));
        }
        text
    };

    let mut out = String::new();
    if !sidebar.pinned.is_empty() {
        out.push_str(&style("📌 Pinned").bold().to_string());
        for chat in &sidebar.pinned {
            let _ = write!(out, "\n  {}", line(chat));
        }
        out.push('\n');
    }

    for group in &sidebar.folders {
        let arrow = if group.expanded { "▾" } else { "▸" };
        let name = if group.highlighted {
            style(&group.folder.name).bold().reverse().to_string()
        } else {
            style(&group.folder.name).bold().to_string()
        };
        let _ = write!(
            out,
            "{} {} {} {} {}",
            arrow,
            group.folder.icon,
            name,
            style(format!("({})", group.chats.len())).dim(),
            style(&group.folder.color).dim()
        );
        if group.expanded {
            for chat in &group.chats {
                let _ = write!(out, "\n    {}", line(chat));
            }
        }
        out.push('\n');
    }

    let unassigned = if sidebar.unassigned_highlighted {
        style("Unassigned").bold().reverse().to_string()
    } else {
        style("Unassigned").bold().to_string()
    };
    out.push_str(&unassigned);
    for chat in &sidebar.unassigned {
        let _ = write!(out, "\n  {}", line(chat));
    }
    out
}

pub fn render_status(settings: &AssistantSettings, loading: bool) -> String {
    let credential = match settings.credential() {
        Some(_) => style("configured").green().to_string(),
        None => style("none").dim().to_string(),
    };
    let mut out = format!(
        "{}\n  language: {}\n  model: {}\n  credential: {}\n  terms accepted: {}",
        style(settings.status().to_string()).bold(),
        settings.language.display_name(),
        settings.model,
        credential,
        settings.accepted_terms
    );
    if loading {
        out.push_str(&format!("\n  {}", style("⏳ waiting for a reply").yellow()));
    }
    out
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("❌").bold().red(), style(message).red());
}

pub fn display_thinking() {
    println!("{}", style("⏳ Thinking...").dim());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::language::Language;

    #[test]
    fn clean_analysis_says_so() {
        console::set_colors_enabled(false);
        let text = render_analysis(&analyze("let x = 1;", Language::JavaScript));
        assert!(text.contains("complexity: Low"));
        assert!(text.contains("No issues found"));
    }

    #[test]
    fn best_practices_are_listed() {
        console::set_colors_enabled(false);
        let text = render_analysis(&analyze("let a = 1;\nvar x = 1;", Language::JavaScript));
        assert!(text.contains("💡"));
    }

    #[test]
    fn boxed_lines_share_a_width() {
        console::set_colors_enabled(false);
        let out = boxed("rust", &["fn main() {}", "", "// end"], &Style::new());
        let widths: Vec<usize> = out.lines().map(measure_text_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn sidebar_marks_the_drop_target() {
        console::set_colors_enabled(false);
        let mut workspace = Workspace::new(AssistantSettings::default());
        let chat = workspace.store.active_id().to_string();
        workspace.folders.begin_drag(&chat);
        workspace
            .folders
            .drag_over(crate::folders::DropTarget::Unassigned);
        let out = render_sidebar(&workspace);
        assert!(out.contains("(dragging)"));
        assert!(out.contains("📁 General (0)"));
    }

    #[test]
    fn chat_list_counts_sessions() {
        console::set_colors_enabled(false);
        let mut workspace = Workspace::new(AssistantSettings::default());
        workspace.store.create_session(vec![]);
        let out = render_chat_list(&workspace);
        assert!(out.starts_with("Chats (2)"));
        assert_eq!(out.lines().count(), 3);
    }
}
