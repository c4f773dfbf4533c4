//! Text fields: the add-task field and the inline edit field

use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::domain::{Task, TaskId};

/// Single-line text buffer with a byte cursor on a char boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    /// Buffer pre-filled with `value`, cursor at the end
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Terminal columns before the cursor, counting wide glyphs as two
    pub fn cursor_width(&self) -> usize {
        self.value[..self.cursor].width()
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.prev_char_boundary(self.cursor);
        self.value.replace_range(prev..self.cursor, "");
        self.cursor = prev;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        let next = self.next_char_boundary(self.cursor);
        self.value.replace_range(self.cursor..next, "");
    }

    pub fn left(&mut self) {
        self.cursor = self.prev_char_boundary(self.cursor);
    }

    pub fn right(&mut self) {
        self.cursor = self.next_char_boundary(self.cursor);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn prev_char_boundary(&self, pos: usize) -> usize {
        self.value[..pos].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
    }

    fn next_char_boundary(&self, pos: usize) -> usize {
        self.value[pos..]
            .chars()
            .next()
            .map(|c| pos + c.len_utf8())
            .unwrap_or(self.value.len())
    }
}

/// The add-task field and the enabled state of its add action
#[derive(Debug, Clone, Default)]
pub struct AddField {
    pub input: TextInput,
    add_enabled: bool,
}

impl AddField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input-change hook: the add action is enabled only for non-blank text
    pub fn on_change(&mut self) {
        self.add_enabled = !self.input.value().trim().is_empty();
    }

    pub fn add_enabled(&self) -> bool {
        self.add_enabled
    }

    /// Take the current text for submission and reset the field
    pub fn take(&mut self) -> String {
        let value = self.input.value().to_string();
        self.input.clear();
        self.on_change();
        debug!(len = value.len(), "AddField::take: submitted");
        value
    }
}

/// Inline editor replacing one item's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditField {
    pub id: TaskId,
    pub input: TextInput,
}

impl EditField {
    /// Start editing: field pre-filled with the current text, cursor at end
    pub fn start(task: &Task) -> Self {
        debug!(id = %task.id, "EditField::start: called");
        Self {
            id: task.id.clone(),
            input: TextInput::with_value(task.text.clone()),
        }
    }
}

/// How an inline edit ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEnd {
    /// Enter pressed
    Enter,
    /// Escape pressed
    Escape,
    /// Focus moved elsewhere
    Blur,
}

impl EditEnd {
    /// Whether the edited text should be saved
    pub fn commits(self) -> bool {
        !matches!(self, Self::Escape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_value_cursor_at_end() {
        let input = TextInput::with_value("héllo");
        assert_eq!(input.cursor(), "héllo".len());
        assert_eq!(input.cursor_width(), 5);
    }

    #[test]
    fn test_editing_multibyte() {
        let mut input = TextInput::with_value("añb");
        input.left();
        input.backspace();
        assert_eq!(input.value(), "ab");
        input.insert('ü');
        assert_eq!(input.value(), "aüb");
        input.home();
        input.delete();
        assert_eq!(input.value(), "üb");
        input.end();
        input.right();
        assert_eq!(input.cursor(), input.value().len());
    }

    #[test]
    fn test_cursor_width_counts_wide_glyphs() {
        let mut input = TextInput::with_value("日本x");
        assert_eq!(input.cursor_width(), 5);
        input.left();
        input.left();
        assert_eq!(input.cursor_width(), 2);
        input.home();
        assert_eq!(input.cursor_width(), 0);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = TextInput::with_value("x");
        input.home();
        input.backspace();
        assert_eq!(input.value(), "x");
    }

    #[test]
    fn test_add_field_enabled_tracks_blankness() {
        let mut field = AddField::new();
        assert!(!field.add_enabled());

        field.input.insert(' ');
        field.on_change();
        assert!(!field.add_enabled());

        field.input.insert('a');
        field.on_change();
        assert!(field.add_enabled());

        assert_eq!(field.take(), " a");
        assert!(!field.add_enabled());
        assert_eq!(field.input.value(), "");
    }

    #[test]
    fn test_edit_field_prefilled() {
        let task = Task::new(TaskId::from("a"), "Walk dog").unwrap();
        let edit = EditField::start(&task);
        assert_eq!(edit.input.value(), "Walk dog");
        assert_eq!(edit.input.cursor(), "Walk dog".len());
    }

    #[test]
    fn test_edit_end_commits() {
        assert!(EditEnd::Enter.commits());
        assert!(EditEnd::Blur.commits());
        assert!(!EditEnd::Escape.commits());
    }
}
