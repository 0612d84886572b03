use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver};
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use unicode_width::UnicodeWidthChar;

use crate::controller::{Controller, Event, Settings};
use crate::fonts::ListItem;
use crate::logging::debug_log;
use crate::session::{Screen, Session, TextField};
use crate::tasks::{Runner, TaskContext};

const COLOR_TEXT_PRIMARY: Color = Color::Rgb(205, 214, 244);
const COLOR_TEXT_SECONDARY: Color = Color::Rgb(166, 173, 200);
const COLOR_TEXT_FAINT: Color = Color::Rgb(108, 112, 134);
const COLOR_ACCENT: Color = Color::Rgb(137, 180, 250);
const COLOR_HIGHLIGHT: Color = Color::Rgb(250, 179, 135);
const COLOR_OUTPUT: Color = Color::Rgb(203, 166, 247);
const COLOR_SUCCESS: Color = Color::Rgb(166, 227, 161);
const COLOR_ERROR: Color = Color::Rgb(243, 139, 168);
const COLOR_SPINNER: Color = Color::Rgb(245, 194, 231);

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const TITLE: &str = "FontLet 🎨";
const MARGIN_HORIZONTAL: u16 = 2;
const MARGIN_VERTICAL: u16 = 1;
const HEADER_HEIGHT: u16 = 2;
const FOOTER_HEIGHT: u16 = 2;
// List title plus the count/filter bar.
const LIST_CHROME_HEIGHT: usize = 2;

/// Rows left for the main pane once margins, header and footer are drawn.
pub fn body_height(terminal_height: u16) -> usize {
    usize::from(terminal_height)
        .saturating_sub(usize::from(2 * MARGIN_VERTICAL + HEADER_HEIGHT + FOOTER_HEIGHT))
}

/// Rows taken by one font in the list: name, preview, spacing.
pub fn font_item_height(preview_lines: usize) -> usize {
    preview_lines + 2
}

pub fn font_page_size(terminal_height: u16, preview_lines: usize) -> usize {
    (body_height(terminal_height).saturating_sub(LIST_CHROME_HEIGHT)
        / font_item_height(preview_lines))
    .max(1)
}

/// Every style the view uses, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub title: Style,
    pub subtitle: Style,
    pub help: Style,
    pub error: Style,
    pub success: Style,
    pub status: Style,
    pub output: Style,
    pub list_title: Style,
    pub item: Style,
    pub item_selected: Style,
    pub preview: Style,
    pub preview_selected: Style,
    pub prompt: Style,
    pub input: Style,
    pub placeholder: Style,
    pub spinner: Style,
}

impl Theme {
    pub fn named(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mono" | "monochrome" => Self::mono(),
            _ => Self::colored(),
        }
    }

    fn colored() -> Self {
        Self {
            title: Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
            subtitle: Style::default().fg(COLOR_TEXT_SECONDARY),
            help: Style::default()
                .fg(COLOR_TEXT_FAINT)
                .add_modifier(Modifier::ITALIC),
            error: Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            success: Style::default()
                .fg(COLOR_SUCCESS)
                .add_modifier(Modifier::BOLD),
            status: Style::default().fg(COLOR_HIGHLIGHT),
            output: Style::default().fg(COLOR_OUTPUT),
            list_title: Style::default()
                .fg(COLOR_TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
            item: Style::default()
                .fg(COLOR_TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
            item_selected: Style::default()
                .fg(COLOR_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
            preview: Style::default()
                .fg(COLOR_TEXT_SECONDARY)
                .add_modifier(Modifier::DIM),
            preview_selected: Style::default().fg(COLOR_HIGHLIGHT),
            prompt: Style::default()
                .fg(COLOR_TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
            input: Style::default().fg(COLOR_TEXT_PRIMARY),
            placeholder: Style::default().fg(COLOR_TEXT_FAINT),
            spinner: Style::default().fg(COLOR_SPINNER),
        }
    }

    fn mono() -> Self {
        let plain = Style::default();
        let bold = plain.add_modifier(Modifier::BOLD);
        Self {
            title: bold,
            subtitle: plain,
            help: plain.add_modifier(Modifier::DIM),
            error: bold,
            success: bold,
            status: plain,
            output: plain,
            list_title: bold,
            item: plain,
            item_selected: bold.add_modifier(Modifier::REVERSED),
            preview: plain.add_modifier(Modifier::DIM),
            preview_selected: plain,
            prompt: bold,
            input: plain,
            placeholder: plain.add_modifier(Modifier::DIM),
            spinner: plain,
        }
    }
}

struct Spinner {
    index: usize,
    last_tick: Instant,
}

impl Spinner {
    fn new() -> Self {
        Self {
            index: 0,
            last_tick: Instant::now(),
        }
    }

    fn frame(&self) -> &'static str {
        SPINNER_FRAMES[self.index % SPINNER_FRAMES.len()]
    }

    fn advance(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_tick) >= Duration::from_millis(120) {
            self.index = (self.index + 1) % SPINNER_FRAMES.len();
            self.last_tick = now;
            true
        } else {
            false
        }
    }

    fn reset(&mut self) {
        self.index = 0;
        self.last_tick = Instant::now();
    }
}

pub struct Options {
    pub settings: Settings,
    pub theme: Theme,
    pub tasks: TaskContext,
}

pub struct Model {
    session: Session,
    controller: Controller,
    runner: Runner,
    theme: Theme,
    spinner: Spinner,
    event_rx: Receiver<Event>,
    needs_redraw: bool,
    quit: bool,
}

impl Model {
    pub fn new(opts: Options) -> Self {
        let (event_tx, event_rx) = unbounded();
        Self {
            session: Session::new(0, 0),
            controller: Controller::new(opts.settings),
            runner: Runner::new(opts.tasks, event_tx),
            theme: opts.theme,
            spinner: Spinner::new(),
            event_rx,
            needs_redraw: true,
            quit: false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("enable raw mode")?;
        stdout
            .execute(EnterAlternateScreen)
            .context("enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let size = terminal.size()?;
        self.session.terminal_width = size.width;
        self.session.terminal_height = size.height;
        let effects = self.controller.start(&mut self.session);
        self.quit |= self.runner.apply(effects);

        let mut last_tick = Instant::now();
        let tick_rate = Duration::from_millis(120);

        while !self.quit {
            self.poll_async();

            if self.needs_redraw {
                let spinner = self.spinner.frame();
                let preview_lines = self.controller.settings().preview_lines;
                terminal.draw(|frame| draw(frame, &self.session, &self.theme, preview_lines, spinner))?;
                self.needs_redraw = false;
            }

            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(16));

            if event::poll(timeout)? {
                match event::read()? {
                    TermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                        self.dispatch(Event::Key(key));
                    }
                    TermEvent::Resize(width, height) => {
                        self.dispatch(Event::Resize { width, height });
                    }
                    _ => {}
                }
            }

            self.poll_async();

            if last_tick.elapsed() >= tick_rate {
                last_tick = Instant::now();
                if self.session.screen.is_loading() || self.session.pending.save.is_some() {
                    if self.spinner.advance() {
                        self.needs_redraw = true;
                    }
                } else {
                    self.spinner.reset();
                }
            }
        }

        debug_log("quit requested");
        Ok(())
    }

    fn poll_async(&mut self) {
        while let Ok(message) = self.event_rx.try_recv() {
            self.dispatch(message);
        }
    }

    fn dispatch(&mut self, event: Event) {
        let effects = self.controller.update(&mut self.session, event);
        self.quit |= self.runner.apply(effects);
        self.needs_redraw = true;
    }
}

/// Draw the whole screen for `session`. Reads nothing but its arguments.
pub fn draw(
    frame: &mut Frame<'_>,
    session: &Session,
    theme: &Theme,
    preview_lines: usize,
    spinner: &str,
) {
    let area = frame.size();
    let inner = Layout::default()
        .horizontal_margin(MARGIN_HORIZONTAL)
        .vertical_margin(MARGIN_VERTICAL)
        .constraints([Constraint::Min(0)])
        .split(area)[0];
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(header_text(session, theme)), layout[0]);

    let body = layout[1];
    match session.screen {
        Screen::InitialLoading | Screen::LoadingPreviews | Screen::GeneratingOutput => {
            let lines = vec![
                Line::default(),
                Line::from(vec![
                    Span::styled(spinner.to_string(), theme.spinner),
                    Span::raw(" "),
                    Span::styled(loading_message(session), theme.subtitle),
                ]),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body);
        }
        Screen::InputText => draw_input(
            frame,
            body,
            &session.input,
            "Enter text to figletize...",
            theme,
            None,
        ),
        Screen::SaveFilenameInput => {
            let note = if !session.error_message.is_empty() {
                Some(Line::styled(session.error_message.clone(), theme.error))
            } else if session.pending.save.is_some() {
                Some(Line::from(vec![
                    Span::styled(spinner.to_string(), theme.spinner),
                    Span::styled(" Saving…", theme.subtitle),
                ]))
            } else {
                None
            };
            draw_input(
                frame,
                body,
                &session.input,
                "Enter filename (e.g., output.txt)",
                theme,
                note,
            );
        }
        Screen::SelectFont => draw_font_list(frame, body, session, theme, preview_lines),
        Screen::DisplayOutput => draw_output(frame, body, session, theme),
        Screen::OutputChoice => {
            let text = Line::styled(session.status_message.clone(), theme.status);
            frame.render_widget(Paragraph::new(vec![Line::default(), text]), body);
        }
        Screen::StatusMessage => {
            let text = Line::styled(session.status_message.clone(), theme.success);
            frame.render_widget(
                Paragraph::new(vec![Line::default(), text]).wrap(Wrap { trim: false }),
                body,
            );
        }
        Screen::Error => {
            let text = Line::styled(session.error_message.clone(), theme.error);
            frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), body);
        }
    }

    let footer = vec![
        Line::default(),
        Line::styled(footer_text(session), theme.help),
    ];
    frame.render_widget(Paragraph::new(footer), layout[2]);
}

fn header_text(session: &Session, theme: &Theme) -> Text<'static> {
    let subtitle = match session.screen {
        Screen::SelectFont | Screen::LoadingPreviews => {
            format!("Text: \"{}\"", session.input_text)
        }
        Screen::GeneratingOutput
        | Screen::OutputChoice
        | Screen::SaveFilenameInput
        | Screen::DisplayOutput
        | Screen::StatusMessage => session
            .selected_font
            .as_ref()
            .map(|font| format!("Font: {} · Text: \"{}\"", font.name, session.input_text))
            .unwrap_or_default(),
        Screen::InputText if !session.fonts.is_empty() => {
            format!("{} fonts available", session.fonts.len())
        }
        _ => String::new(),
    };
    Text::from(vec![
        Line::styled(TITLE, theme.title),
        Line::styled(subtitle, theme.subtitle),
    ])
}

fn loading_message(session: &Session) -> String {
    match session.screen {
        Screen::InitialLoading => "Looking for figlet fonts…".to_string(),
        Screen::LoadingPreviews => format!(
            "Rendering previews for {} fonts… Please wait...",
            session.fonts.len()
        ),
        Screen::GeneratingOutput => match &session.selected_font {
            Some(font) => format!("Rendering with {}… Please wait...", font.name),
            None => "Please wait...".to_string(),
        },
        _ => String::new(),
    }
}

fn draw_input(
    frame: &mut Frame<'_>,
    area: Rect,
    field: &TextField,
    placeholder: &str,
    theme: &Theme,
    note: Option<Line<'static>>,
) {
    const PROMPT: &str = "> ";
    let prompt_width = PROMPT.chars().count();
    let available = usize::from(area.width).saturating_sub(prompt_width + 1);
    let (visible, cursor_col) = input_window(field.value(), field.cursor(), available);

    let value = if field.value().is_empty() {
        Span::styled(placeholder.to_string(), theme.placeholder)
    } else {
        Span::styled(visible, theme.input)
    };
    let mut lines = vec![Line::from(vec![Span::styled(PROMPT, theme.prompt), value])];
    if let Some(note) = note {
        lines.push(Line::default());
        lines.push(note);
    }
    frame.render_widget(Paragraph::new(lines), area);

    if area.height > 0 {
        let x = area.x + (prompt_width + cursor_col) as u16;
        frame.set_cursor(x.min(area.right().saturating_sub(1)), area.y);
    }
}

/// Slice of `value` that fits in `width` columns while keeping the cursor
/// visible, plus the cursor column within that slice.
fn input_window(value: &str, cursor: usize, width: usize) -> (String, usize) {
    let chars: Vec<char> = value.chars().collect();
    let cursor = cursor.min(chars.len());
    let widths: Vec<usize> = chars.iter().map(|ch| ch.width().unwrap_or(0)).collect();
    let width = width.max(1);

    let mut start = 0;
    let mut before: usize = widths[..cursor].iter().sum();
    while before >= width && start < cursor {
        before -= widths[start];
        start += 1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for (ch, w) in chars[start..].iter().zip(&widths[start..]) {
        if used + w > width {
            break;
        }
        visible.push(*ch);
        used += w;
    }
    (visible, before)
}

fn draw_font_list(
    frame: &mut Frame<'_>,
    area: Rect,
    session: &Session,
    theme: &Theme,
    preview_lines: usize,
) {
    let visible = session.visible_fonts();
    let per_page = font_page_size(session.terminal_height, preview_lines);
    let selected = session.picker.selected.min(visible.len().saturating_sub(1));
    let start = (selected / per_page) * per_page;

    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::styled("Available Fonts (with Previews)", theme.list_title));

    let mut status = format!("{} of {} fonts", visible.len(), session.fonts.len());
    if session.picker.filtering {
        status.push_str(&format!(" · Filter: {}_", session.picker.filter));
    } else if !session.picker.filter.is_empty() {
        status.push_str(&format!(" · Filtered by \"{}\"", session.picker.filter));
    }
    if visible.len() > per_page {
        let pages = visible.len().div_ceil(per_page);
        status.push_str(&format!(" · Page {}/{}", start / per_page + 1, pages));
    }
    lines.push(Line::styled(status, theme.status));

    if visible.is_empty() {
        lines.push(Line::styled("No fonts match the filter.", theme.subtitle));
    }

    for (offset, (_, font)) in visible.iter().enumerate().skip(start).take(per_page) {
        let is_selected = offset == selected;
        let (marker, name_style, preview_style) = if is_selected {
            ("➤ ", theme.item_selected, theme.preview_selected)
        } else {
            ("  ", theme.item, theme.preview)
        };
        lines.push(Line::styled(
            format!("{marker}{}", font.display_key()),
            name_style,
        ));
        for preview_line in font.preview.split('\n').take(preview_lines) {
            lines.push(Line::styled(format!("  {preview_line}"), preview_style));
        }
        lines.push(Line::default());
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_output(frame: &mut Frame<'_>, area: Rect, session: &Session, theme: &Theme) {
    let height = usize::from(area.height);
    let width = usize::from(area.width);
    let lines: Vec<Line<'static>> = session
        .full_output
        .lines()
        .skip(session.output_scroll)
        .take(height)
        .map(|line| Line::styled(clip_line(line, width), theme.output))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// Cut `line` to `width` columns, ending in `…` when anything was dropped.
fn clip_line(line: &str, width: usize) -> String {
    let total: usize = line.chars().map(|ch| ch.width().unwrap_or(0)).sum();
    if total <= width {
        return line.to_string();
    }
    let mut clipped = String::new();
    let mut used = 0;
    for ch in line.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        clipped.push(ch);
        used += ch_width;
    }
    if width > 0 {
        clipped.push('…');
    }
    clipped
}

fn footer_text(session: &Session) -> String {
    match session.screen {
        Screen::InputText => "enter: confirm text • ctrl+c: quit".to_string(),
        Screen::SelectFont if session.picker.filtering => {
            "type to filter • enter: apply filter • esc: clear filter • ctrl+c: quit".to_string()
        }
        Screen::SelectFont => {
            "↑/↓: navigate • /: filter • enter: select font • esc: change text • ctrl+c: quit"
                .to_string()
        }
        Screen::DisplayOutput => {
            let mut help =
                "↑/↓/pgup/pgdn: scroll • esc/q: back to font list • ctrl+c: quit".to_string();
            if !session.status_message.is_empty() {
                help = format!("{} • {help}", session.status_message);
            }
            help
        }
        Screen::OutputChoice => "t: terminal • f: file • esc: back to font list • ctrl+c: quit".to_string(),
        Screen::SaveFilenameInput => "enter: save file • esc: cancel save • ctrl+c: quit".to_string(),
        Screen::LoadingPreviews | Screen::GeneratingOutput => "esc: cancel • ctrl+c: quit".to_string(),
        Screen::InitialLoading => "Processing... • ctrl+c: quit".to_string(),
        Screen::Error => "Press any key to quit.".to_string(),
        Screen::StatusMessage => "Press any key to continue...".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontEntry;
    use crate::session::OutputKey;
    use ratatui::backend::TestBackend;

    fn render(session: &Session, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let theme = Theme::named("default");
        terminal
            .draw(|frame| draw(frame, session, &theme, 3, "*"))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut rows = Vec::new();
        for y in 0..buffer.area.height {
            let mut row = String::new();
            for x in 0..buffer.area.width {
                row.push_str(buffer.get(x, y).symbol());
            }
            rows.push(row);
        }
        rows
    }

    fn contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|row| row.contains(needle))
    }

    fn font(name: &str, preview: &str) -> FontEntry {
        let mut font = FontEntry::new(name, format!("/fonts/{name}.flf"));
        font.preview = preview.to_string();
        font
    }

    #[test]
    fn layout_helpers_track_terminal_height() {
        assert_eq!(body_height(30), 24);
        assert_eq!(body_height(3), 0);
        assert_eq!(font_item_height(11), 13);
        assert_eq!(font_page_size(30, 3), 4);
        assert_eq!(font_page_size(5, 11), 1);
    }

    #[test]
    fn input_window_keeps_cursor_visible() {
        assert_eq!(input_window("hello", 5, 10), ("hello".to_string(), 5));
        assert_eq!(input_window("abcdef", 6, 4), ("def".to_string(), 3));
        assert_eq!(input_window("abcdef", 0, 4), ("abcd".to_string(), 0));
    }

    #[test]
    fn loading_screen_shows_spinner() {
        let session = Session::new(60, 12);
        let rows = render(&session, 60, 12);
        assert!(contains(&rows, "FontLet"));
        assert!(contains(&rows, "* Looking for figlet fonts"));
    }

    #[test]
    fn input_screen_shows_placeholder_then_value() {
        let mut session = Session::new(60, 12);
        session.screen = Screen::InputText;
        assert!(contains(&render(&session, 60, 12), "Enter text to figletize..."));
        session.input.set("Hello");
        let rows = render(&session, 60, 12);
        assert!(contains(&rows, "> Hello"));
        assert!(contains(&rows, "enter: confirm text"));
    }

    #[test]
    fn font_list_pages_to_the_selected_font() {
        let mut session = Session::new(60, 20);
        session.screen = Screen::SelectFont;
        session.input_text = "Hi".into();
        session.fonts = (0..6)
            .map(|i| font(&format!("font{i}"), &format!("preview {i}\nsecond {i}")))
            .collect();
        // body 14 rows, 12 for items, 5 rows each: 2 fonts per page.
        session.picker.selected = 4;
        let rows = render(&session, 60, 20);
        assert!(contains(&rows, "➤ font4"));
        assert!(contains(&rows, "  preview 4"));
        assert!(contains(&rows, "font5"));
        assert!(!contains(&rows, "font1"));
        assert!(contains(&rows, "Page 3/3"));
    }

    #[test]
    fn failed_preview_is_shown_inline() {
        let mut session = Session::new(70, 20);
        session.screen = Screen::SelectFont;
        session.fonts = vec![
            font("good", "ok"),
            font("bad", "Error rendering: figlet exited"),
        ];
        let rows = render(&session, 70, 20);
        assert!(contains(&rows, "Error rendering: figlet exited"));
    }

    #[test]
    fn output_view_scrolls() {
        let mut session = Session::new(40, 10);
        session.screen = Screen::DisplayOutput;
        session.selected_font = Some(font("big", ""));
        session.output_key = Some(OutputKey {
            font_path: "/fonts/big.flf".into(),
            text: "Hi".into(),
            width: 32,
        });
        session.full_output = (0..10).map(|i| format!("row{i}\n")).collect();
        session.output_scroll = 3;
        let rows = render(&session, 40, 10);
        assert!(contains(&rows, "row3"));
        assert!(!contains(&rows, "row2"));
        assert!(contains(&rows, "Font: big"));
    }

    #[test]
    fn wide_output_lines_end_in_a_marker() {
        assert_eq!(clip_line("abc", 3), "abc");
        assert_eq!(clip_line("abcdef", 4), "abc…");
        assert_eq!(clip_line("日本語", 4), "日…");

        let mut session = Session::new(40, 10);
        session.screen = Screen::DisplayOutput;
        session.selected_font = Some(font("big", ""));
        session.full_output = format!("{}\nshort\n", "#".repeat(60));
        let rows = render(&session, 40, 10);
        assert!(contains(&rows, "#…"));
        assert!(!contains(&rows, &"#".repeat(40)));
        assert!(contains(&rows, "short"));
        assert!(!contains(&rows, "short…"));
    }

    #[test]
    fn save_error_is_rendered_under_prompt() {
        let mut session = Session::new(60, 12);
        session.screen = Screen::SaveFilenameInput;
        session.input.set("/nope/out.txt");
        session.error_message = "failed to save file '/nope/out.txt'".into();
        let rows = render(&session, 60, 12);
        assert!(contains(&rows, "> /nope/out.txt"));
        assert!(contains(&rows, "failed to save file"));
    }

    #[test]
    fn error_screen_prompts_to_quit() {
        let mut session = Session::new(60, 12);
        session.fail("could not find figlet font directory");
        let rows = render(&session, 60, 12);
        assert!(contains(&rows, "could not find figlet font directory"));
        assert!(contains(&rows, "Press any key to quit."));
    }

    #[test]
    fn mono_theme_has_no_colors() {
        let theme = Theme::named("MONO");
        assert_eq!(theme.output.fg, None);
        assert_ne!(Theme::named("default"), theme);
    }
}
