//! Shared terminal primitives for museumcmd
//!
//! Conventions:
//! - Prompts: lowercase field name with colon: `inn: `
//! - Key hints in brackets: `[n]ext [p]rev [q]uit`
//! - Feedback: short sentence: `Saved.`

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
    ExecutableCommand,
};
use inquire::{ui::RenderConfig, Confirm, InquireError, MultiSelect, Select, Text};
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

// ============================================================================
// Status Bar
// ============================================================================

/// Builder for the key-hint line under a screen.
///
/// Example output: "Showing 1–10 of 42  [n]ext [p]rev [q]uit"
pub struct StatusBar<'a> {
    info: Option<String>,
    actions: Vec<(&'a str, &'a str)>,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self {
            info: None,
            actions: Vec::new(),
        }
    }

    /// Leading text, e.g. a range or a counter
    pub fn info(mut self, text: impl Into<String>) -> Self {
        self.info = Some(text.into());
        self
    }

    /// `.action("e", "dit")` produces `[e]dit`
    pub fn action(mut self, key: &'a str, label: &'a str) -> Self {
        self.actions.push((key, label));
        self
    }

    /// Add the action only when `enabled`
    pub fn action_if(self, enabled: bool, key: &'a str, label: &'a str) -> Self {
        if enabled {
            self.action(key, label)
        } else {
            self
        }
    }

    fn render_actions(&self) -> String {
        let mut out = String::new();
        for (key, label) in &self.actions {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push('[');
            out.push_str(key);
            out.push(']');
            out.push_str(label);
        }
        out
    }

    /// One line when it fits the terminal, otherwise info and actions on
    /// separate lines.
    pub fn render(&self) -> String {
        let actions = self.render_actions();
        let info = self.info.as_deref().unwrap_or("");
        let full = match (info.is_empty(), actions.is_empty()) {
            (true, _) => actions.clone(),
            (false, true) => info.to_string(),
            (false, false) => format!("{}  {}", info, actions),
        };

        let (width, _) = term_size();
        if full.chars().count() > width.saturating_sub(2) && !info.is_empty() && !actions.is_empty() {
            format!("{}\n{}", info, actions)
        } else {
            full
        }
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Layout Primitives
// ============================================================================

#[inline]
pub fn selection_prefix(selected: bool) -> &'static str {
    if selected { "> " } else { "  " }
}

/// Truncate to at most `max_chars` characters, ending in `…` when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/// Left-align `s` in a column of `width` characters, truncating if needed.
pub fn column(s: &str, width: usize) -> String {
    let cut = truncate(s, width);
    let pad = width.saturating_sub(cut.chars().count());
    format!("{}{}", cut, " ".repeat(pad))
}

// ============================================================================
// Messages
// ============================================================================

#[inline]
pub fn status(msg: &str) {
    println!("{}", msg);
}

#[inline]
pub fn error(msg: &str) {
    eprintln!("Error: {}", msg);
}

#[inline]
pub fn warning(msg: &str) {
    eprintln!("Warning: {}", msg);
}

/// Both ends attached to a terminal
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// Fail early for commands that cannot run without prompts.
pub fn require_interactive(command: &str) -> Result<()> {
    if is_interactive() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("{} needs an interactive terminal", command))
    }
}

// ============================================================================
// Raw Mode
// ============================================================================

/// RAII guard that disables raw mode on drop
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Wait up to `timeout` for a key press. `None` on timeout or non-key
/// events. Ctrl+C is reported as Esc.
pub fn read_key(timeout: Duration) -> Result<Option<KeyCode>> {
    let _guard = RawModeGuard::new()?;
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) if kind != KeyEventKind::Release => {
            if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                Ok(Some(KeyCode::Esc))
            } else {
                Ok(Some(code))
            }
        }
        _ => Ok(None),
    }
}

/// Block until a key is pressed.
pub fn wait_key() -> Result<KeyCode> {
    loop {
        if let Some(code) = read_key(Duration::from_secs(3600))? {
            return Ok(code);
        }
    }
}

pub fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(Clear(ClearType::All))?;
    stdout.execute(cursor::MoveTo(0, 0))?;
    stdout.flush()?;
    Ok(())
}

/// Terminal dimensions, 80x24 when unavailable (pipes, non-TTY)
pub fn term_size() -> (usize, usize) {
    crossterm::terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or((80, 24))
}

/// Content rows left after title, header, status and filter lines.
pub fn visible_lines() -> usize {
    let (_, height) = term_size();
    height.saturating_sub(7).max(5)
}

// ============================================================================
// Prompts
// ============================================================================

pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Yes/no confirmation, default no. Cancelling counts as no.
pub fn confirm(prompt: &str) -> Result<bool> {
    let result = Confirm::new(prompt)
        .with_render_config(minimal_render_config())
        .with_default(false)
        .prompt();
    Ok(matches!(answer(result)?, FormResult::Value(true)))
}

// ============================================================================
// Form Input Helpers
// ============================================================================

/// A form answer, or the user backing out (Esc/Ctrl+C)
pub enum FormResult<T> {
    Value(T),
    Cancelled,
}

fn answer<T>(result: Result<T, InquireError>) -> Result<FormResult<T>> {
    match result {
        Ok(value) => Ok(FormResult::Value(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Ok(FormResult::Cancelled)
        }
        Err(e) => Err(e.into()),
    }
}

/// Prompt for a text field.
///
/// Shown as `field [current] (- clears): ` when there is a current value.
/// Empty input keeps the current value; `-` clears it.
pub fn prompt_field(field: &str, current: &str) -> Result<FormResult<String>> {
    let prompt = if current.is_empty() {
        format!("{}: ", field)
    } else {
        format!("{} [{}] (- clears): ", field, truncate(current, 30))
    };

    let result = Text::new(&prompt)
        .with_render_config(minimal_render_config())
        .prompt();

    answer(result.map(|input| resolve_field_input(&input, current)))
}

fn resolve_field_input(input: &str, current: &str) -> String {
    match input.trim() {
        "-" if !current.is_empty() => String::new(),
        "" => current.to_string(),
        value => value.to_string(),
    }
}

/// Prompt for a yes/no flag with the current value as default.
pub fn prompt_flag(field: &str, current: bool) -> Result<FormResult<bool>> {
    let result = Confirm::new(field)
        .with_render_config(minimal_render_config())
        .with_default(current)
        .prompt();

    answer(result)
}

/// Pick any number of options; `selected` are pre-checked.
pub fn prompt_multi<T: ToString>(prompt: &str, options: &[T], selected: &[usize]) -> Result<FormResult<Vec<usize>>> {
    let items: Vec<String> = options.iter().map(|o| o.to_string()).collect();
    let result = MultiSelect::new(prompt, items.clone())
        .with_render_config(minimal_render_config())
        .with_default(selected)
        .with_page_size(visible_lines())
        .prompt();

    answer(result.map(|chosen| {
        chosen
            .iter()
            .filter_map(|c| items.iter().position(|i| i == c))
            .collect()
    }))
}

/// Pick one option, starting at `current`.
pub fn prompt_choice<T: ToString>(prompt: &str, options: &[T], current: usize) -> Result<FormResult<usize>> {
    let items: Vec<String> = options.iter().map(|o| o.to_string()).collect();
    let result = Select::new(prompt, items.clone())
        .with_render_config(minimal_render_config())
        .with_starting_cursor(current.min(items.len().saturating_sub(1)))
        .with_page_size(visible_lines())
        .prompt();

    answer(result.map(|chosen| items.iter().position(|i| *i == chosen).unwrap_or(0)))
}

/// Unwrap a form answer or return `Ok(None)` from the enclosing function.
macro_rules! field {
    ($prompt:expr) => {
        match $prompt? {
            $crate::cli::ui::FormResult::Value(v) => v,
            $crate::cli::ui::FormResult::Cancelled => {
                println!("Cancelled.");
                return Ok(None);
            }
        }
    };
}
pub(crate) use field;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_render_config_drops_prefixes() {
        let config = minimal_render_config();
        assert_eq!(config.prompt_prefix.content, "");
        assert_eq!(config.answered_prompt_prefix.content, "");
    }

    #[test]
    fn test_status_bar_empty() {
        assert_eq!(StatusBar::new().render(), "");
    }

    #[test]
    fn test_status_bar_actions_only() {
        let bar = StatusBar::new().action("e", "dit").action("q", "uit");
        assert_eq!(bar.render(), "[e]dit [q]uit");
    }

    #[test]
    fn test_status_bar_info_and_actions() {
        let bar = StatusBar::new()
            .info("Showing 1–10 of 42")
            .action("n", "ext")
            .action_if(false, "p", "rev")
            .action("q", "uit");
        assert_eq!(bar.render(), "Showing 1–10 of 42  [n]ext [q]uit");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello world", 8), "hello w…");
        assert_eq!(truncate("Эрмитаж музей", 4), "Эрм…");
        assert_eq!(truncate("x", 0), "");
    }

    #[test]
    fn test_column_pads_and_cuts() {
        assert_eq!(column("ab", 4), "ab  ");
        assert_eq!(column("abcdef", 4), "abc…");
    }

    #[test]
    fn test_resolve_field_input() {
        assert_eq!(resolve_field_input("", "Hermitage"), "Hermitage");
        assert_eq!(resolve_field_input("  ", ""), "");
        assert_eq!(resolve_field_input("-", "Hermitage"), "");
        assert_eq!(resolve_field_input("-", ""), "-");
        assert_eq!(resolve_field_input(" Louvre ", "Hermitage"), "Louvre");
    }

    #[test]
    fn test_selection_prefix() {
        assert_eq!(selection_prefix(true), "> ");
        assert_eq!(selection_prefix(false), "  ");
    }
}
