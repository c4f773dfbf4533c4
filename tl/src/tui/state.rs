//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here. Task data lives
//! in the `Session`; this holds only what the terminal front end adds on top:
//! focus, selection, and modal dialogs.

use tracing::debug;

use crate::confirm::{CLEAR_ALL_MESSAGE, Confirm};
use crate::render::{AddField, EditField};

/// Interaction mode (modal)
#[derive(Debug, Clone, Default)]
pub enum InteractionMode {
    /// List navigation
    #[default]
    Normal,
    /// Typing in the add-task field
    AddInput,
    /// Inline edit of one task
    Edit(EditField),
    /// Confirmation dialog; all other input is suspended
    Confirm(ConfirmDialog),
    /// Help overlay
    Help,
}

impl InteractionMode {
    pub fn is_add_input(&self) -> bool {
        matches!(self, Self::AddInput)
    }

    /// The inline editor, if one is open
    pub fn edit(&self) -> Option<&EditField> {
        match self {
            Self::Edit(edit) => Some(edit),
            _ => None,
        }
    }
}

/// Confirmation dialog for destructive actions
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub message: String,
    pub action: ConfirmAction,
    pub selected_button: bool, // false = No, true = Yes
}

impl ConfirmDialog {
    pub fn new(action: ConfirmAction, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action,
            selected_button: false,
        }
    }

    pub fn clear_all() -> Self {
        Self::new(ConfirmAction::ClearAll, CLEAR_ALL_MESSAGE)
    }
}

/// The dialog's answer is whichever button is selected when Enter is pressed
impl Confirm for ConfirmDialog {
    fn confirm(&mut self, message: &str) -> bool {
        debug!(%message, answer = self.selected_button, "ConfirmDialog::confirm: called");
        self.selected_button
    }
}

/// Action to perform on confirm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearAll,
}

/// Complete TUI state
#[derive(Debug, Default)]
pub struct AppState {
    pub interaction_mode: InteractionMode,
    /// Add-task field, kept across focus changes
    pub add_field: AddField,
    /// Index into the visible list
    pub selected_index: usize,
    /// Transient status line message
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Keep the selection inside a list of `len` items
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected_index = if len == 0 { 0 } else { self.selected_index.min(len - 1) };
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 && self.selected_index + 1 < len {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected_index = len.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        let mut state = AppState::new();
        state.select_prev();
        assert_eq!(state.selected_index, 0);

        state.select_next(3);
        state.select_next(3);
        state.select_next(3);
        assert_eq!(state.selected_index, 2);

        state.clamp_selection(1);
        assert_eq!(state.selected_index, 0);

        state.select_last(5);
        assert_eq!(state.selected_index, 4);
        state.clamp_selection(0);
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_confirm_dialog_defaults_to_no() {
        let mut dialog = ConfirmDialog::clear_all();
        assert_eq!(dialog.message, CLEAR_ALL_MESSAGE);
        assert!(!dialog.confirm(CLEAR_ALL_MESSAGE));
        dialog.selected_button = true;
        assert!(dialog.confirm(CLEAR_ALL_MESSAGE));
    }

    #[test]
    fn test_status_message() {
        let mut state = AppState::new();
        state.set_status("Saved");
        assert_eq!(state.status_message.as_deref(), Some("Saved"));
        state.clear_status();
        assert!(state.status_message.is_none());
    }
}
