//! Screen state machine.
//!
//! [`Controller::update`] is the only code that mutates a [`Session`]. It
//! takes one [`Event`] at a time and answers with the [`Effect`]s the runtime
//! should carry out: tasks to spawn, timers to arm, or quitting.

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::UIConfig;
use crate::logging::debug_log;
use crate::session::{OutputKey, PendingPreviews, PendingRender, Screen, Session, TextField};
use crate::tasks::{Completion, RenderedOutput, Task};
use crate::ui;

pub const OUTPUT_CHOICE_PROMPT: &str = "Output to (t)erminal or save to (f)ile?";

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    Completed(Completion),
    StatusTimeout { request_id: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Spawn(Task),
    StartStatusTimer { request_id: u64, after: Duration },
    Quit,
}

/// Sizing knobs the state machine needs, fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub preview_lines: usize,
    pub preview_margin: usize,
    pub output_margin: usize,
    pub min_width: usize,
    pub status_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&UIConfig::default())
    }
}

impl Settings {
    pub fn from_config(cfg: &UIConfig) -> Self {
        Self {
            preview_lines: cfg.preview_lines.max(1),
            preview_margin: cfg.preview_margin,
            output_margin: cfg.output_margin,
            min_width: cfg.min_width.max(1),
            status_timeout: cfg.status_timeout,
        }
    }

    pub fn preview_width(&self, terminal_width: u16) -> usize {
        usize::from(terminal_width)
            .saturating_sub(self.preview_margin)
            .max(self.min_width)
    }

    pub fn output_width(&self, terminal_width: u16) -> usize {
        usize::from(terminal_width)
            .saturating_sub(self.output_margin)
            .max(self.min_width)
    }
}

pub struct Controller {
    settings: Settings,
}

impl Controller {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Kick off font discovery for a fresh session.
    pub fn start(&self, session: &mut Session) -> Vec<Effect> {
        if session.pending.discovery.is_some() || session.screen != Screen::InitialLoading {
            return Vec::new();
        }
        let request_id = session.next_request_id();
        session.pending.discovery = Some(request_id);
        vec![Effect::Spawn(Task::DiscoverFonts { request_id })]
    }

    pub fn update(&self, session: &mut Session, event: Event) -> Vec<Effect> {
        match event {
            Event::Key(key) => self.handle_key(session, key),
            Event::Resize { width, height } => self.handle_resize(session, width, height),
            Event::Completed(completion) => self.handle_completion(session, completion),
            Event::StatusTimeout { request_id } => {
                if session.screen == Screen::StatusMessage
                    && session.pending.status_timer == Some(request_id)
                {
                    leave_status(session);
                }
                Vec::new()
            }
        }
    }

    fn handle_key(&self, session: &mut Session, key: KeyEvent) -> Vec<Effect> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        if is_quit(&key) {
            return vec![Effect::Quit];
        }

        match session.screen {
            Screen::InitialLoading => Vec::new(),
            Screen::InputText => match key.code {
                KeyCode::Enter => self.confirm_text(session),
                _ => {
                    edit_field(&mut session.input, &key);
                    Vec::new()
                }
            },
            Screen::LoadingPreviews => {
                if key.code == KeyCode::Esc {
                    back_to_input(session);
                }
                Vec::new()
            }
            Screen::SelectFont => self.handle_select_key(session, &key),
            Screen::GeneratingOutput => {
                if key.code == KeyCode::Esc {
                    session.screen = Screen::SelectFont;
                }
                Vec::new()
            }
            Screen::OutputChoice => {
                match key.code {
                    KeyCode::Char('t') | KeyCode::Char('T') => {
                        session.output_scroll = 0;
                        session.status_message.clear();
                        session.screen = Screen::DisplayOutput;
                    }
                    KeyCode::Char('f') | KeyCode::Char('F') => {
                        session.input.clear();
                        session.error_message.clear();
                        session.status_message.clear();
                        session.screen = Screen::SaveFilenameInput;
                    }
                    KeyCode::Esc => {
                        session.status_message.clear();
                        session.screen = Screen::SelectFont;
                    }
                    _ => {}
                }
                Vec::new()
            }
            Screen::SaveFilenameInput => match key.code {
                KeyCode::Enter => self.confirm_filename(session),
                KeyCode::Esc => {
                    session.error_message.clear();
                    session.status_message = OUTPUT_CHOICE_PROMPT.to_string();
                    session.screen = Screen::OutputChoice;
                    Vec::new()
                }
                _ => {
                    edit_field(&mut session.input, &key);
                    Vec::new()
                }
            },
            Screen::DisplayOutput => {
                self.handle_output_key(session, &key);
                Vec::new()
            }
            Screen::StatusMessage => {
                leave_status(session);
                Vec::new()
            }
            Screen::Error => vec![Effect::Quit],
        }
    }

    fn confirm_text(&self, session: &mut Session) -> Vec<Effect> {
        let text = session.input.value().trim().to_string();
        if text.is_empty() {
            return Vec::new();
        }
        let width = self.settings.preview_width(session.terminal_width);
        session.input_text = text.clone();

        if session.previews_for.as_ref() == Some(&(text, width)) {
            session.screen = Screen::SelectFont;
            return Vec::new();
        }

        session.screen = Screen::LoadingPreviews;
        if session.pending.previews.is_some() {
            // The running batch is checked against the text when it lands.
            return Vec::new();
        }
        vec![self.dispatch_previews(session)]
    }

    fn dispatch_previews(&self, session: &mut Session) -> Effect {
        let request_id = session.next_request_id();
        let text = session.input_text.clone();
        let width = self.settings.preview_width(session.terminal_width);
        session.pending.previews = Some(PendingPreviews {
            request_id,
            text: text.clone(),
            width,
        });
        Effect::Spawn(Task::GeneratePreviews {
            request_id,
            fonts: session.fonts.clone(),
            text,
            width,
            max_lines: self.settings.preview_lines,
        })
    }

    fn handle_select_key(&self, session: &mut Session, key: &KeyEvent) -> Vec<Effect> {
        let visible_len = session.visible_fonts().len();
        let page = ui::font_page_size(session.terminal_height, self.settings.preview_lines) as i64;

        if session.picker.filtering {
            match key.code {
                KeyCode::Esc => {
                    session.picker.filter.clear();
                    session.picker.filtering = false;
                    session.picker.selected = 0;
                }
                KeyCode::Enter => session.picker.filtering = false,
                KeyCode::Backspace => {
                    session.picker.filter.pop();
                    session.picker.selected = 0;
                }
                KeyCode::Up => session.picker.step(-1, visible_len),
                KeyCode::Down => session.picker.step(1, visible_len),
                KeyCode::Char(ch) if !ch.is_control() => {
                    session.picker.filter.push(ch);
                    session.picker.selected = 0;
                }
                _ => {}
            }
            let visible_len = session.visible_fonts().len();
            session.picker.clamp(visible_len);
            return Vec::new();
        }

        match key.code {
            KeyCode::Esc => {
                if session.picker.filter.is_empty() {
                    back_to_input(session);
                } else {
                    session.picker.filter.clear();
                    session.picker.selected = 0;
                }
                Vec::new()
            }
            KeyCode::Enter => match session.highlighted_font() {
                Some(index) => self.choose_font(session, index),
                None => Vec::new(),
            },
            KeyCode::Up | KeyCode::Char('k') => {
                session.picker.step(-1, visible_len);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                session.picker.step(1, visible_len);
                Vec::new()
            }
            KeyCode::PageUp => {
                session.picker.step(-page, visible_len);
                Vec::new()
            }
            KeyCode::PageDown => {
                session.picker.step(page, visible_len);
                Vec::new()
            }
            KeyCode::Home | KeyCode::Char('g') => {
                session.picker.selected = 0;
                Vec::new()
            }
            KeyCode::End | KeyCode::Char('G') => {
                session.picker.selected = visible_len.saturating_sub(1);
                Vec::new()
            }
            KeyCode::Char('/') => {
                session.picker.filtering = true;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn choose_font(&self, session: &mut Session, index: usize) -> Vec<Effect> {
        let Some(font) = session.fonts.get(index).cloned() else {
            return Vec::new();
        };
        let key = OutputKey {
            font_path: font.path.clone(),
            text: session.input_text.clone(),
            width: self.settings.output_width(session.terminal_width),
        };
        session.selected_font = Some(font);

        if session.output_key.as_ref() == Some(&key) {
            session.output_scroll = 0;
            session.status_message = OUTPUT_CHOICE_PROMPT.to_string();
            session.screen = Screen::OutputChoice;
            return Vec::new();
        }

        session.screen = Screen::GeneratingOutput;
        if session.pending.render.is_some() {
            // The running render is checked against the selection when it lands.
            return Vec::new();
        }
        vec![self.dispatch_render(session, key)]
    }

    fn dispatch_render(&self, session: &mut Session, key: OutputKey) -> Effect {
        let request_id = session.next_request_id();
        session.pending.render = Some(PendingRender {
            request_id,
            key: key.clone(),
        });
        Effect::Spawn(Task::RenderFullOutput {
            request_id,
            font_path: key.font_path,
            text: key.text,
            width: key.width,
        })
    }

    /// The render the GeneratingOutput screen is waiting for.
    fn wanted_output(&self, session: &Session) -> Option<OutputKey> {
        let font = session.selected_font.as_ref()?;
        Some(OutputKey {
            font_path: font.path.clone(),
            text: session.input_text.clone(),
            width: self.settings.output_width(session.terminal_width),
        })
    }

    fn confirm_filename(&self, session: &mut Session) -> Vec<Effect> {
        if session.pending.save.is_some() {
            return Vec::new();
        }
        let filename = session.input.value().trim().to_string();
        if filename.is_empty() {
            return Vec::new();
        }
        session.error_message.clear();
        let request_id = session.next_request_id();
        session.pending.save = Some(request_id);
        vec![Effect::Spawn(Task::SaveFile {
            request_id,
            path: PathBuf::from(filename),
            content: session.full_output.clone(),
        })]
    }

    fn handle_output_key(&self, session: &mut Session, key: &KeyEvent) {
        let page = ui::body_height(session.terminal_height).max(1);
        let max_scroll = self.max_output_scroll(session);
        let scroll = &mut session.output_scroll;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => session.screen = Screen::SelectFont,
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = (*scroll + 1).min(max_scroll),
            KeyCode::PageUp => *scroll = scroll.saturating_sub(page),
            KeyCode::PageDown | KeyCode::Char(' ') => *scroll = (*scroll + page).min(max_scroll),
            KeyCode::Home | KeyCode::Char('g') => *scroll = 0,
            KeyCode::End | KeyCode::Char('G') => *scroll = max_scroll,
            _ => {}
        }
    }

    fn max_output_scroll(&self, session: &Session) -> usize {
        let lines = session.full_output.lines().count();
        lines.saturating_sub(ui::body_height(session.terminal_height))
    }

    fn handle_resize(&self, session: &mut Session, width: u16, height: u16) -> Vec<Effect> {
        session.terminal_width = width;
        session.terminal_height = height;
        session.output_scroll = session.output_scroll.min(self.max_output_scroll(session));
        let visible_len = session.visible_fonts().len();
        session.picker.clamp(visible_len);
        self.maybe_refresh_output(session).into_iter().collect()
    }

    /// Re-render the chosen font when the output width no longer matches the
    /// terminal. Only one render may be in flight; a busy slot re-checks when
    /// its result lands.
    fn maybe_refresh_output(&self, session: &mut Session) -> Option<Effect> {
        if !matches!(
            session.screen,
            Screen::OutputChoice
                | Screen::SaveFilenameInput
                | Screen::DisplayOutput
                | Screen::StatusMessage
        ) || session.pending.render.is_some()
        {
            return None;
        }
        let key = self.wanted_output(session)?;
        if session.output_key.as_ref() == Some(&key) {
            return None;
        }
        Some(self.dispatch_render(session, key))
    }

    fn handle_completion(&self, session: &mut Session, completion: Completion) -> Vec<Effect> {
        match completion {
            Completion::FontsDiscovered { request_id, result } => {
                if session.pending.discovery != Some(request_id)
                    || session.screen != Screen::InitialLoading
                {
                    return stale("discover-fonts", request_id);
                }
                session.pending.discovery = None;
                match result {
                    Ok(fonts) if fonts.is_empty() => session.fail("no figlet fonts found"),
                    Ok(fonts) => {
                        debug_log(format!("discovered {} fonts", fonts.len()));
                        session.fonts = fonts;
                        session.input.clear();
                        session.screen = Screen::InputText;
                    }
                    Err(err) => session.fail(err.to_string()),
                }
                Vec::new()
            }
            Completion::PreviewsGenerated { request_id, fonts } => {
                if session.pending.previews.as_ref().map(|pending| pending.request_id)
                    != Some(request_id)
                {
                    return stale("generate-previews", request_id);
                }
                let Some(pending) = session.pending.previews.take() else {
                    return stale("generate-previews", request_id);
                };
                if session.screen != Screen::LoadingPreviews {
                    return stale("generate-previews", request_id);
                }
                if pending.text != session.input_text {
                    return vec![self.dispatch_previews(session)];
                }
                session.fonts = fonts;
                session.previews_for = Some((pending.text, pending.width));
                session.picker = Default::default();
                session.screen = Screen::SelectFont;
                Vec::new()
            }
            Completion::OutputRendered { request_id, result } => {
                if session.pending.render.as_ref().map(|pending| pending.request_id)
                    != Some(request_id)
                {
                    return stale("render-output", request_id);
                }
                let Some(pending) = session.pending.render.take() else {
                    return stale("render-output", request_id);
                };
                let same_selection = |key: &OutputKey, session: &Session| {
                    session
                        .selected_font
                        .as_ref()
                        .is_some_and(|font| font.path == key.font_path)
                        && session.input_text == key.text
                };
                match session.screen {
                    Screen::GeneratingOutput => {
                        if !same_selection(&pending.key, &*session) {
                            return self
                                .wanted_output(session)
                                .map(|key| self.dispatch_render(session, key))
                                .into_iter()
                                .collect();
                        }
                        match result {
                            Ok(rendered) => {
                                apply_output(session, rendered);
                                session.output_scroll = 0;
                                session.status_message = OUTPUT_CHOICE_PROMPT.to_string();
                                session.screen = Screen::OutputChoice;
                            }
                            Err(err) => {
                                session.fail(format!("failed to run figlet for full output: {err}"));
                                return Vec::new();
                            }
                        }
                    }
                    Screen::OutputChoice
                    | Screen::SaveFilenameInput
                    | Screen::DisplayOutput
                    | Screen::StatusMessage => match result {
                        Ok(rendered) => {
                            if same_selection(&pending.key, &*session) {
                                apply_output(session, rendered);
                                session.output_scroll =
                                    session.output_scroll.min(self.max_output_scroll(session));
                            }
                        }
                        Err(err) => {
                            debug_log(format!("refresh render failed: {err}"));
                            if session.screen == Screen::DisplayOutput {
                                session.status_message =
                                    format!("Could not re-render at the new width: {err}");
                            }
                            // Retried on the next resize.
                            return Vec::new();
                        }
                    },
                    _ => return stale("render-output", request_id),
                }
                self.maybe_refresh_output(session).into_iter().collect()
            }
            Completion::FileSaved { request_id, result } => {
                if session.pending.save != Some(request_id) {
                    return stale("save-file", request_id);
                }
                session.pending.save = None;
                if session.screen != Screen::SaveFilenameInput {
                    if let Ok(path) = &result {
                        debug_log(format!("saved {} after the prompt was left", path.display()));
                    }
                    return stale("save-file", request_id);
                }
                match result {
                    Ok(path) => {
                        session.status_message = format!("Saved to {}!", path.display());
                        session.screen = Screen::StatusMessage;
                        let timer = session.next_request_id();
                        session.pending.status_timer = Some(timer);
                        vec![Effect::StartStatusTimer {
                            request_id: timer,
                            after: self.settings.status_timeout,
                        }]
                    }
                    Err(err) => {
                        debug_log(format!("save failed: {err}"));
                        session.error_message = err.to_string();
                        Vec::new()
                    }
                }
            }
        }
    }
}

fn stale(kind: &str, request_id: u64) -> Vec<Effect> {
    debug_log(format!("dropping stale {kind} result (request {request_id})"));
    Vec::new()
}

fn apply_output(session: &mut Session, rendered: RenderedOutput) {
    session.full_output = rendered.output;
    session.output_key = Some(OutputKey {
        font_path: rendered.font_path,
        text: rendered.text,
        width: rendered.width,
    });
}

fn back_to_input(session: &mut Session) {
    let previous = session.input_text.clone();
    session.input.set(&previous);
    session.screen = Screen::InputText;
}

fn leave_status(session: &mut Session) {
    session.status_message.clear();
    session.pending.status_timer = None;
    session.screen = Screen::SelectFont;
}

fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

fn edit_field(field: &mut TextField, key: &KeyEvent) {
    match key.code {
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            field.insert(ch)
        }
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left => field.left(),
        KeyCode::Right => field.right(),
        KeyCode::Home => field.home(),
        KeyCode::End => field.end(),
        _ => {}
    }
}
