//! Ratatui TUI frontend for the Dots client.
//!
//! Pure UI module: terminal lifecycle, rendering, and keystrokes → submitted
//! lines. It never classifies input; every submitted line goes to the
//! client's interpreter as typed.

use std::collections::VecDeque;
use std::io::{self, Stdout};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dots_core::command::LOCAL_ECHO;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

/// Lines kept in the scrollback.
const MAX_LOG_LINES: usize = 500;

// ---------------------------------------------------------------------------
// UserIntent — result of processing user input
// ---------------------------------------------------------------------------

/// The result of processing a user input event.
#[derive(Debug, PartialEq, Eq)]
pub enum UserIntent {
    /// Nothing to do (cursor movement, help toggle, ...).
    None,
    /// The user wants to leave the application.
    Quit,
    /// The user pressed Enter on this line.
    Submit(String),
}

/// Connection facts shown in the status bar.
pub struct Status {
    pub connected: bool,
    pub host: String,
    pub port: u16,
    pub login_id: String,
    pub is_host: bool,
}

/// Where a displayed line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Local,
    Server,
}

/// Split the local echo marker off `text`.
fn origin_of(text: &str) -> (Origin, &str) {
    match text.strip_prefix(LOCAL_ECHO) {
        Some(rest) => (Origin::Local, rest),
        None => (Origin::Server, text),
    }
}

// ---------------------------------------------------------------------------
// TUI-only state
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TuiState {
    /// Line being typed
    input: String,
    /// Cursor position in chars
    cursor: usize,
    /// Displayed lines, oldest first
    log: VecDeque<String>,
    show_help: bool,
}

impl TuiState {
    fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.cursor.saturating_sub(1);
        self.cursor = self.clamp_cursor(cursor_moved_left);
    }

    fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor.saturating_add(1);
        self.cursor = self.clamp_cursor(cursor_moved_right);
    }

    fn enter_char(&mut self, new_char: char) {
        let index = self.byte_index();
        self.input.insert(index, new_char);
        self.move_cursor_right();
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor)
            .unwrap_or(self.input.len())
    }

    fn delete_char(&mut self) {
        if self.cursor != 0 {
            let current_index = self.cursor;
            let before = self.input.chars().take(current_index - 1);
            let after = self.input.chars().skip(current_index);
            self.input = before.chain(after).collect();
            self.move_cursor_left();
        }
    }

    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.input.chars().count())
    }

    /// Take the typed line, leaving the input empty.
    fn submit(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.input)
    }

    fn push_line(&mut self, line: String) {
        if self.log.len() == MAX_LOG_LINES {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }
}

// ---------------------------------------------------------------------------
// Tui
// ---------------------------------------------------------------------------

/// Terminal handle plus UI state.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    state: TuiState,
}

impl Tui {
    /// Set up the terminal (raw mode, alternate screen) and return a ready `Tui`.
    pub fn setup() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            state: TuiState::default(),
        })
    }

    /// Restore the terminal to its original state.
    pub fn teardown(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    pub fn render(&mut self, status: &Status) -> io::Result<()> {
        self.terminal.draw(|f| ui(f, &self.state, status))?;
        Ok(())
    }

    /// Append a line handed to the console.
    pub fn push_line(&mut self, line: String) {
        self.state.push_line(line);
    }

    /// Poll for a keyboard event and, if one is available, translate it into
    /// a [`UserIntent`]. Never blocks.
    pub fn poll_and_handle_input(&mut self) -> io::Result<UserIntent> {
        if !event::poll(std::time::Duration::from_millis(0))? {
            return Ok(UserIntent::None);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(UserIntent::None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(UserIntent::None);
        }
        Ok(handle_key_event(&mut self.state, key))
    }
}

fn handle_key_event(tui: &mut TuiState, key: KeyEvent) -> UserIntent {
    match key.code {
        KeyCode::Esc => {
            if tui.show_help {
                tui.show_help = false;
                UserIntent::None
            } else {
                UserIntent::Quit
            }
        }
        KeyCode::F(1) => {
            tui.show_help = !tui.show_help;
            UserIntent::None
        }
        _ if tui.show_help => UserIntent::None,
        KeyCode::Enter => UserIntent::Submit(tui.submit()),
        KeyCode::Char(c) => {
            tui.enter_char(c);
            UserIntent::None
        }
        KeyCode::Backspace => {
            tui.delete_char();
            UserIntent::None
        }
        KeyCode::Left => {
            tui.move_cursor_left();
            UserIntent::None
        }
        KeyCode::Right => {
            tui.move_cursor_right();
            UserIntent::None
        }
        KeyCode::Home => {
            tui.cursor = 0;
            UserIntent::None
        }
        KeyCode::End => {
            tui.cursor = tui.input.chars().count();
            UserIntent::None
        }
        _ => UserIntent::None,
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn ui(frame: &mut Frame, tui: &TuiState, status: &Status) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Log
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_log(frame, tui, main_layout[0]);
    render_input(frame, tui, main_layout[1]);
    render_status_bar(frame, status, main_layout[2]);

    if tui.show_help {
        render_help_popup(frame);
    }
}

fn render_log(frame: &mut Frame, tui: &TuiState, area: Rect) {
    let lines: Vec<ListItem> = tui
        .log
        .iter()
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .rev()
        .map(|line| {
            let (origin, text) = origin_of(line);
            let style = match origin {
                Origin::Local => Style::default().fg(Color::Yellow),
                Origin::Server => Style::default().fg(Color::White),
            };
            ListItem::new(Span::styled(text.to_string(), style))
        })
        .collect();

    let list = List::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Log ")
            .title_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(list, area);
}

fn render_input(frame: &mut Frame, tui: &TuiState, area: Rect) {
    let input = Paragraph::new(tui.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Message ")
            .title_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(input, area);

    if !tui.show_help {
        frame.set_cursor_position((area.x + 1 + tui.cursor as u16, area.y + 1));
    }
}

fn render_status_bar(frame: &mut Frame, status: &Status, area: Rect) {
    let (state, color) = if status.connected {
        ("connected", Color::Green)
    } else {
        ("disconnected", Color::Red)
    };
    let mut spans = vec![
        Span::styled(format!(" {state} "), Style::default().fg(color).bold()),
        Span::raw(format!(
            "{}:{} as {}",
            status.host, status.port, status.login_id
        )),
    ];
    if status.is_host {
        spans.push(Span::styled("  [host]", Style::default().fg(Color::Magenta)));
    }
    spans.push(Span::styled(
        "  F1 help  ESC quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());

    frame.render_widget(Clear, area);

    let help_text = Text::from(vec![
        Line::from(vec![Span::styled(
            "COMMANDS",
            Style::default().fg(Color::Yellow).bold(),
        )]),
        Line::from(""),
        Line::from("  #GetHost      Show the server host"),
        Line::from("  #GetPort      Show the server port"),
        Line::from("  #Logoff       Log off and disconnect"),
        Line::from("  #Quit         Log off and quit the session"),
        Line::from("  #<anything>   Sent to the server as typed"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  HOST ONLY",
            Style::default().fg(Color::Cyan).bold(),
        )]),
        Line::from("  #KICK<name>   Remove a player"),
        Line::from("  #Quit         Passed to the server"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  KEYS",
            Style::default().fg(Color::Cyan).bold(),
        )]),
        Line::from("  Enter         Send the line"),
        Line::from("  F1            Toggle this help"),
        Line::from("  ESC           Quit"),
    ]);

    let help = Paragraph::new(help_text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help ")
            .title_style(Style::default().fg(Color::Cyan).bold())
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(tui: &mut TuiState, code: KeyCode) -> UserIntent {
        handle_key_event(tui, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            press(tui, KeyCode::Char(c));
        }
    }

    #[test]
    fn enter_submits_the_typed_line() {
        let mut tui = TuiState::default();
        type_str(&mut tui, "#GetPort");
        assert_eq!(
            press(&mut tui, KeyCode::Enter),
            UserIntent::Submit("#GetPort".to_string())
        );
        assert!(tui.input.is_empty());
        assert_eq!(tui.cursor, 0);
    }

    #[test]
    fn enter_on_empty_input_submits_empty_line() {
        let mut tui = TuiState::default();
        assert_eq!(
            press(&mut tui, KeyCode::Enter),
            UserIntent::Submit(String::new())
        );
    }

    #[test]
    fn editing_in_the_middle() {
        let mut tui = TuiState::default();
        type_str(&mut tui, "#Qit");
        press(&mut tui, KeyCode::Left);
        press(&mut tui, KeyCode::Left);
        press(&mut tui, KeyCode::Char('u'));
        assert_eq!(tui.input, "#Quit");

        press(&mut tui, KeyCode::End);
        press(&mut tui, KeyCode::Backspace);
        assert_eq!(tui.input, "#Qui");
    }

    #[test]
    fn help_swallows_keys_and_esc_closes_it() {
        let mut tui = TuiState::default();
        press(&mut tui, KeyCode::F(1));
        assert_eq!(press(&mut tui, KeyCode::Char('x')), UserIntent::None);
        assert!(tui.input.is_empty());
        assert_eq!(press(&mut tui, KeyCode::Esc), UserIntent::None);
        assert_eq!(press(&mut tui, KeyCode::Esc), UserIntent::Quit);
    }

    #[test]
    fn scrollback_is_bounded() {
        let mut tui = TuiState::default();
        for i in 0..MAX_LOG_LINES + 10 {
            tui.push_line(i.to_string());
        }
        assert_eq!(tui.log.len(), MAX_LOG_LINES);
        assert_eq!(tui.log.front().map(String::as_str), Some("10"));
    }

    #[test]
    fn local_echo_is_told_apart_from_server_text() {
        assert_eq!(
            origin_of("#CLThe current port is: 5555"),
            (Origin::Local, "The current port is: 5555")
        );
        assert_eq!(origin_of("#CL"), (Origin::Local, ""));
        assert_eq!(origin_of("player2 joined"), (Origin::Server, "player2 joined"));
    }
}
