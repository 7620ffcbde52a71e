//! Console front end: input commands and colored rendering of turns and
//! the results panel.

use colored::Colorize;

use medinet_chat::{render_message, ActionItem, ConversationTurn, Fragment, ResultsPanel};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text for the assistant.
    Submit(String),
    /// Click the N-th (1-based) action of the latest AI turn.
    Click(usize),
    /// Show the route of the N-th (1-based) result in the panel.
    Open(usize),
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse an input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Some(Command::Submit(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let cmd = match (parts.next(), parts.next()) {
            (Some("quit" | "exit"), None) => Command::Quit,
            (Some("help"), None) => Command::Help,
            (Some("open"), Some(n)) => match n.parse() {
                Ok(n) if n > 0 => Command::Open(n),
                _ => Command::Unknown(line.to_string()),
            },
            (Some(n), None) => match n.parse() {
                Ok(n) if n > 0 => Command::Click(n),
                _ => Command::Unknown(line.to_string()),
            },
            _ => Command::Unknown(line.to_string()),
        };
        Some(cmd)
    }
}

pub const HELP: &str = "Type a question, or:\n  \
    /N        click action N\n  \
    /open N   show the page for result N\n  \
    /help     show this help\n  \
    /quit     exit";

/// Render an AI message with terminal styling, one output line per line.
pub fn format_message(text: &str) -> String {
    render_message(text)
        .iter()
        .map(|line| line.iter().map(format_fragment).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_fragment(fragment: &Fragment) -> String {
    match fragment {
        Fragment::Text(s) => s.clone(),
        Fragment::Bold(s) => s.bold().to_string(),
        Fragment::Italic(s) => s.italic().to_string(),
        Fragment::Stars(s) => s.yellow().to_string(),
        Fragment::Bullet => fragment.to_string().cyan().to_string(),
    }
}

/// Numbered action buttons.
pub fn format_actions(actions: &[ActionItem]) -> String {
    actions
        .iter()
        .enumerate()
        .map(|(i, a)| format!("  [{}] {}", i + 1, a.label).green().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A whole AI turn: message, then its actions.
pub fn format_turn(turn: &ConversationTurn) -> String {
    let body = format_message(&turn.text);
    let body = if turn.is_error {
        body.red().to_string()
    } else {
        body
    };
    match turn.actions.as_deref() {
        Some(actions) if !actions.is_empty() => format!("{}\n{}", body, format_actions(actions)),
        _ => body,
    }
}

/// The results panel, or `None` when there is nothing to show.
pub fn format_panel(panel: &ResultsPanel) -> Option<String> {
    if let Some(ref error) = panel.error {
        return Some(format!("Search failed: {}", error).red().to_string());
    }
    if panel.results.is_empty() {
        return None;
    }

    let mut out = format!("-- {} --", panel.search_type.noun(panel.results.len()))
        .bold()
        .to_string();
    for (i, result) in panel.results.iter().enumerate() {
        out.push_str(&format!(
            "\n  {}. {} {} {}",
            i + 1,
            result.name(),
            format!("★ {:.1}", result.rating()).yellow(),
            format!("({:.0}% match)", result.similarity() * 100.0).dimmed()
        ));
    }
    Some(out)
}
