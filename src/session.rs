use std::path::PathBuf;

use crate::fonts::{FontEntry, ListItem};

pub const INPUT_CHAR_LIMIT: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    InitialLoading,
    InputText,
    LoadingPreviews,
    SelectFont,
    GeneratingOutput,
    OutputChoice,
    SaveFilenameInput,
    DisplayOutput,
    StatusMessage,
    Error,
}

impl Screen {
    pub fn is_loading(self) -> bool {
        matches!(
            self,
            Screen::InitialLoading | Screen::LoadingPreviews | Screen::GeneratingOutput
        )
    }
}

/// Single-line editor used for both the text prompt and the filename prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set(&mut self, value: &str) {
        self.value = value.chars().take(INPUT_CHAR_LIMIT).collect();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, ch: char) {
        if ch.is_control() || self.value.chars().count() >= INPUT_CHAR_LIMIT {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.value.chars().count() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }
}

/// Cursor and filter over the font list. `selected` indexes the filtered view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontPicker {
    pub selected: usize,
    pub filter: String,
    pub filtering: bool,
}

impl FontPicker {
    pub fn visible<'a, T: ListItem>(&self, items: &'a [T]) -> Vec<(usize, &'a T)> {
        let needle = self.filter.to_lowercase();
        items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                needle.is_empty() || item.filter_key().to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn clamp(&mut self, visible_len: usize) {
        if visible_len == 0 {
            self.selected = 0;
        } else if self.selected >= visible_len {
            self.selected = visible_len - 1;
        }
    }

    pub fn step(&mut self, delta: i64, visible_len: usize) {
        if visible_len == 0 {
            self.selected = 0;
            return;
        }
        let max = (visible_len - 1) as i64;
        self.selected = (self.selected as i64 + delta).clamp(0, max) as usize;
    }
}

/// Identifies what `full_output` was rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputKey {
    pub font_path: PathBuf,
    pub text: String,
    pub width: usize,
}

/// A preview batch in flight, with the text and width it was sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPreviews {
    pub request_id: u64,
    pub text: String,
    pub width: usize,
}

/// A full render in flight and what it was asked to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRender {
    pub request_id: u64,
    pub key: OutputKey,
}

/// One slot per kind of task. A slot stays occupied until its task reports
/// back, even after the screen that started it has been left, so a kind never
/// has two tasks running. The result is applied only when its id is the one
/// recorded here and the current screen still wants it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pending {
    pub discovery: Option<u64>,
    pub previews: Option<PendingPreviews>,
    pub render: Option<PendingRender>,
    pub save: Option<u64>,
    pub status_timer: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub screen: Screen,
    pub input: TextField,
    pub input_text: String,
    pub fonts: Vec<FontEntry>,
    /// Text and preview width the current `fonts` previews were rendered for.
    pub previews_for: Option<(String, usize)>,
    pub picker: FontPicker,
    pub selected_font: Option<FontEntry>,
    pub full_output: String,
    pub output_key: Option<OutputKey>,
    pub output_scroll: usize,
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub error_message: String,
    pub status_message: String,
    pub pending: Pending,
    next_request_id: u64,
}

impl Session {
    pub fn new(terminal_width: u16, terminal_height: u16) -> Self {
        Self {
            screen: Screen::InitialLoading,
            input: TextField::default(),
            input_text: String::new(),
            fonts: Vec::new(),
            previews_for: None,
            picker: FontPicker::default(),
            selected_font: None,
            full_output: String::new(),
            output_key: None,
            output_scroll: 0,
            terminal_width,
            terminal_height,
            error_message: String::new(),
            status_message: String::new(),
            pending: Pending::default(),
            next_request_id: 1,
        }
    }

    pub fn next_request_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn visible_fonts(&self) -> Vec<(usize, &FontEntry)> {
        self.picker.visible(&self.fonts)
    }

    /// The font under the cursor, as an index into `fonts`.
    pub fn highlighted_font(&self) -> Option<usize> {
        self.visible_fonts()
            .get(self.picker.selected)
            .map(|(index, _)| *index)
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error_message = message.into();
        self.status_message.clear();
        self.screen = Screen::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_field_edits_at_cursor() {
        let mut field = TextField::default();
        for ch in "hllo".chars() {
            field.insert(ch);
        }
        field.home();
        field.right();
        field.insert('e');
        assert_eq!(field.value(), "hello");
        field.end();
        field.backspace();
        assert_eq!(field.value(), "hell");
        field.home();
        field.delete();
        assert_eq!(field.value(), "ell");
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn text_field_handles_multibyte_chars() {
        let mut field = TextField::default();
        field.set("héllo");
        field.left();
        field.left();
        field.left();
        field.backspace();
        assert_eq!(field.value(), "hllo");
        field.insert('ë');
        assert_eq!(field.value(), "hëllo");
    }

    #[test]
    fn text_field_respects_char_limit() {
        let mut field = TextField::default();
        field.set(&"x".repeat(INPUT_CHAR_LIMIT + 10));
        assert_eq!(field.value().chars().count(), INPUT_CHAR_LIMIT);
        field.insert('y');
        assert!(!field.value().contains('y'));
        field.insert('\n');
        assert_eq!(field.value().chars().count(), INPUT_CHAR_LIMIT);
    }

    #[test]
    fn picker_filters_on_filter_key() {
        let fonts = vec![
            FontEntry::new("banner", "/f/banner.flf"),
            FontEntry::new("Big", "/f/Big.flf"),
            FontEntry::new("slant", "/f/slant.flf"),
        ];
        let mut picker = FontPicker {
            filter: "b".into(),
            ..FontPicker::default()
        };
        let visible: Vec<usize> = picker.visible(&fonts).iter().map(|(i, _)| *i).collect();
        assert_eq!(visible, vec![0, 1]);

        picker.step(5, visible.len());
        assert_eq!(picker.selected, 1);
        picker.step(-9, visible.len());
        assert_eq!(picker.selected, 0);
    }

    #[test]
    fn request_ids_increase() {
        let mut session = Session::new(80, 24);
        let first = session.next_request_id();
        assert!(session.next_request_id() > first);
    }
}
