//! TUI application - event handling and state management
//!
//! The App struct owns the Session and AppState and handles all keyboard
//! events. It does not do any rendering - that's delegated to the views module.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, trace};

use crate::animator::Started;
use crate::domain::TaskId;
use crate::render::{EditEnd, ItemHandler};
use crate::session::Session;

use super::state::{AppState, ConfirmAction, ConfirmDialog, InteractionMode};

/// TUI application
#[derive(Debug)]
pub struct App {
    session: Session,
    state: AppState,
}

impl App {
    /// Create the application and draw the initial list
    pub fn new(mut session: Session) -> Self {
        debug!("App::new: called");
        session.render();
        Self {
            session,
            state: AppState::new(),
        }
    }

    pub fn session(&self) -> &Session {
        trace!("App::session: called");
        &self.session
    }

    /// Get reference to state
    pub fn state(&self) -> &AppState {
        trace!("App::state: called");
        &self.state
    }

    /// Get mutable reference to state
    pub fn state_mut(&mut self) -> &mut AppState {
        trace!("App::state_mut: called");
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.handle_key_at(key, Instant::now())
    }

    /// Handle a key event with an explicit clock reading
    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) -> bool {
        debug!(?key, "App::handle_key: called");
        // Clear any transient status message on key press
        self.state.clear_status();

        match &self.state.interaction_mode {
            InteractionMode::Normal => self.handle_normal_key(key, now),
            InteractionMode::AddInput => self.handle_add_input_key(key),
            InteractionMode::Edit(_) => self.handle_edit_key(key),
            InteractionMode::Confirm(_) => self.handle_confirm_key(key, now),
            InteractionMode::Help => self.handle_help_key(key),
        }
    }

    /// Deliver due exit-animation signals
    pub fn tick(&mut self, now: Instant) {
        let selected = self.selected_id();
        if self.session.tick(now) > 0 {
            debug!("App::tick: removals committed");
            self.sync_selection(selected);
        }
    }

    /// Commit removals still animating, e.g. before exit
    pub fn flush(&mut self) {
        let selected = self.selected_id();
        if self.session.flush() > 0 {
            debug!("App::flush: removals committed");
            self.sync_selection(selected);
        }
    }

    /// The task under the cursor
    pub fn selected_id(&self) -> Option<TaskId> {
        self.session
            .view()
            .items()
            .get(self.state.selected_index)
            .map(|item| item.id.clone())
    }

    /// Selected task, if it exposes the given handler
    fn selected_for(&self, handler: ItemHandler) -> Option<TaskId> {
        let item = self.session.view().items().get(self.state.selected_index)?;
        item.handles(handler).then(|| item.id.clone())
    }

    /// Keep the cursor on the same task after a rebuild when it still exists
    fn sync_selection(&mut self, previous: Option<TaskId>) {
        let view = self.session.view();
        if let Some(index) = previous.as_ref().and_then(|id| view.position(id)) {
            self.state.selected_index = index;
        }
        self.state.clamp_selection(view.len());
    }

    /// Handle key in normal mode
    fn handle_normal_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        debug!(?key, "App::handle_normal_key: called");
        let len = self.session.view().len();
        match (key.code, key.modifiers) {
            // === Quit ===
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                debug!("App::handle_normal_key: Ctrl+C force quit");
                return true;
            }
            (KeyCode::Char('q'), _) => {
                debug!("App::handle_normal_key: quit requested");
                self.state.should_quit = true;
            }

            // === Help ===
            (KeyCode::Char('?'), _) | (KeyCode::F(1), _) => {
                debug!("App::handle_normal_key: showing help");
                self.state.interaction_mode = InteractionMode::Help;
            }

            // === Focus the add field ===
            (KeyCode::Char('a'), _) | (KeyCode::Char('i'), _) | (KeyCode::Char('n'), _) => {
                debug!("App::handle_normal_key: focus add field");
                self.state.interaction_mode = InteractionMode::AddInput;
            }

            // === Navigation ===
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => self.state.select_next(len),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => {
                if self.state.selected_index == 0 {
                    debug!("App::handle_normal_key: top of list, focus add field");
                    self.state.interaction_mode = InteractionMode::AddInput;
                } else {
                    self.state.select_prev();
                }
            }
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => self.state.select_first(),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => self.state.select_last(len),

            // === Item actions ===
            (KeyCode::Char(' '), _) | (KeyCode::Char('x'), _) => self.handle_toggle(),
            (KeyCode::Char('e'), _) | (KeyCode::Enter, _) => self.handle_start_edit(),
            (KeyCode::Char('d'), _) | (KeyCode::Delete, _) => self.handle_delete(now),

            // === Bulk actions ===
            (KeyCode::Char('c'), _) => self.handle_clear_completed(now),
            (KeyCode::Char('C'), _) => self.handle_clear_all(),

            // === Theme ===
            (KeyCode::Char('t'), _) => {
                let theme = self.session.toggle_theme();
                debug!(%theme, "App::handle_normal_key: theme toggled");
            }

            _ => {
                debug!("App::handle_normal_key: unhandled key");
            }
        }

        false
    }

    fn handle_toggle(&mut self) {
        let Some(id) = self.selected_for(ItemHandler::Toggle) else {
            debug!("App::handle_toggle: nothing selected");
            return;
        };
        self.session.toggle(&id);
        self.sync_selection(Some(id));
    }

    fn handle_start_edit(&mut self) {
        let Some(id) = self.selected_for(ItemHandler::StartEdit) else {
            debug!("App::handle_start_edit: nothing selected");
            return;
        };
        if let Some(edit) = self.session.start_edit(&id) {
            debug!(%id, "App::handle_start_edit: editing");
            self.state.interaction_mode = InteractionMode::Edit(edit);
        }
    }

    fn handle_delete(&mut self, now: Instant) {
        let Some(id) = self.selected_for(ItemHandler::Delete) else {
            debug!("App::handle_delete: nothing selected");
            return;
        };
        let started = self.session.delete(&id, now);
        debug!(%id, ?started, "App::handle_delete: removal started");
        self.sync_selection(Some(id));
    }

    fn handle_clear_completed(&mut self, now: Instant) {
        let selected = self.selected_id();
        match self.session.clear_completed(now) {
            Started::Nothing => self.state.set_status("No completed tasks"),
            started => debug!(?started, "App::handle_clear_completed: started"),
        }
        self.sync_selection(selected);
    }

    fn handle_clear_all(&mut self) {
        if self.session.store().is_empty() {
            debug!("App::handle_clear_all: list already empty");
            return;
        }
        self.state.interaction_mode = InteractionMode::Confirm(ConfirmDialog::clear_all());
    }

    /// Handle key while the add field has focus
    fn handle_add_input_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_add_input_key: called");
        let field = &mut self.state.add_field;
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Esc, _) | (KeyCode::Tab, _) | (KeyCode::Down, _) => {
                debug!("App::handle_add_input_key: leaving add field");
                self.state.interaction_mode = InteractionMode::Normal;
            }
            (KeyCode::Enter, _) => {
                let text = field.take();
                if let Some(id) = self.session.add(&text) {
                    debug!(%id, "App::handle_add_input_key: task added");
                    self.state.selected_index = 0;
                }
            }
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => {
                field.input.insert(c);
                field.on_change();
            }
            (KeyCode::Backspace, _) => {
                field.input.backspace();
                field.on_change();
            }
            (KeyCode::Delete, _) => {
                field.input.delete();
                field.on_change();
            }
            (KeyCode::Left, _) => field.input.left(),
            (KeyCode::Right, _) => field.input.right(),
            (KeyCode::Home, _) => field.input.home(),
            (KeyCode::End, _) => field.input.end(),
            _ => {
                debug!("App::handle_add_input_key: unhandled key");
            }
        }
        false
    }

    /// Handle key while an inline editor is open
    fn handle_edit_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_edit_key: called");
        let end = match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => Some(EditEnd::Enter),
            (KeyCode::Esc, _) => Some(EditEnd::Escape),
            // Moving focus away commits
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) | (KeyCode::Up, _) | (KeyCode::Down, _) => Some(EditEnd::Blur),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.finish_edit(EditEnd::Blur);
                return true;
            }
            _ => None,
        };

        if let Some(end) = end {
            self.finish_edit(end);
            match key.code {
                KeyCode::Up => self.state.select_prev(),
                KeyCode::Down => self.state.select_next(self.session.view().len()),
                _ => {}
            }
            return false;
        }

        let InteractionMode::Edit(edit) = &mut self.state.interaction_mode else {
            return false;
        };
        let input = &mut edit.input;
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.left(),
            KeyCode::Right => input.right(),
            KeyCode::Home => input.home(),
            KeyCode::End => input.end(),
            _ => {
                debug!("App::handle_edit_key: unhandled key");
            }
        }
        false
    }

    fn finish_edit(&mut self, end: EditEnd) {
        let mode = std::mem::take(&mut self.state.interaction_mode);
        let InteractionMode::Edit(edit) = mode else {
            self.state.interaction_mode = mode;
            return;
        };
        let id = edit.id.clone();
        let changed = self.session.finish_edit(edit, end);
        debug!(%id, ?end, changed, "App::finish_edit: done");
        self.sync_selection(Some(id));
    }

    /// Handle key in confirm mode
    fn handle_confirm_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        debug!(?key, "App::handle_confirm_key: called");
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                debug!("App::handle_confirm_key: cancel confirm");
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter => {
                debug!("App::handle_confirm_key: Enter - process confirm");
                let mode = std::mem::take(&mut self.state.interaction_mode);
                if let InteractionMode::Confirm(mut dialog) = mode {
                    match dialog.action {
                        ConfirmAction::ClearAll => {
                            let started = self.session.clear_all(&mut dialog, now);
                            debug!(?started, "App::handle_confirm_key: clear all");
                            self.state.clamp_selection(self.session.view().len());
                        }
                    }
                }
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('y') | KeyCode::Char('Y') => {
                debug!("App::handle_confirm_key: toggle button selection");
                if let InteractionMode::Confirm(dialog) = &mut self.state.interaction_mode {
                    if key.code == KeyCode::Char('y') || key.code == KeyCode::Char('Y') {
                        dialog.selected_button = true;
                    } else {
                        dialog.selected_button = !dialog.selected_button;
                    }
                }
            }
            _ => {
                debug!("App::handle_confirm_key: unhandled key");
            }
        }

        false
    }

    /// Handle key in help mode
    fn handle_help_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_help_key: called");
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                debug!("App::handle_help_key: closing help");
                self.state.interaction_mode = InteractionMode::Normal;
            }
            _ => {
                debug!("App::handle_help_key: unhandled key");
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::domain::Theme;
    use crate::storage::{KeyValueStore, MemoryStore, Persistence, THEME_KEY};

    const DELAY: Duration = Duration::from_millis(100);

    fn new_app() -> (App, MemoryStore) {
        let backend = MemoryStore::new();
        let session = Session::open(Persistence::new(backend.clone()), DELAY);
        (App::new(session), backend)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::from(code))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add_tasks(app: &mut App, texts: &[&str]) {
        press(app, KeyCode::Char('a'));
        for text in texts {
            type_text(app, text);
            press(app, KeyCode::Enter);
        }
        press(app, KeyCode::Esc);
    }

    fn visible_texts(app: &App) -> Vec<String> {
        app.session().view().items().iter().map(|i| i.text.clone()).collect()
    }

    #[test]
    fn test_app_new_renders_empty_state() {
        let (app, _) = new_app();
        assert!(matches!(app.state().interaction_mode, InteractionMode::Normal));
        assert!(app.session().view().empty_visible());
        assert_eq!(app.session().view().counts_text(), "0 / 0");
    }

    #[test]
    fn test_app_quit_keys() {
        let (mut app, _) = new_app();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.handle_key(key));

        let (mut app, _) = new_app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(app.state().should_quit);
    }

    #[test]
    fn test_app_help_toggle() {
        let (mut app, _) = new_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.state().interaction_mode, InteractionMode::Help));
        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.state().interaction_mode, InteractionMode::Normal));
    }

    #[test]
    fn test_add_field_enable_and_submit() {
        let (mut app, _) = new_app();
        press(&mut app, KeyCode::Char('a'));
        assert!(app.state().interaction_mode.is_add_input());

        type_text(&mut app, "  ");
        assert!(!app.state().add_field.add_enabled());
        type_text(&mut app, "Buy milk");
        assert!(app.state().add_field.add_enabled());

        press(&mut app, KeyCode::Enter);
        assert_eq!(visible_texts(&app), vec!["Buy milk"]);
        assert_eq!(app.session().view().counts_text(), "1 / 1");
        assert_eq!(app.state().add_field.input.value(), "");
        assert!(!app.state().add_field.add_enabled());
        // Focus stays in the field
        assert!(app.state().interaction_mode.is_add_input());
    }

    #[test]
    fn test_most_recent_first_and_toggle_counts() {
        let (mut app, _) = new_app();
        add_tasks(&mut app, &["A", "B"]);
        assert_eq!(visible_texts(&app), vec!["B", "A"]);

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.session().view().counts_text(), "1 / 2");
        assert_eq!(visible_texts(&app), vec!["B", "A"]);
        assert!(app.session().view().items()[1].strikethrough);
        assert_eq!(app.state().selected_index, 1);
    }

    #[test]
    fn test_edit_enter_commits() {
        let (mut app, _) = new_app();
        add_tasks(&mut app, &["X"]);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state().interaction_mode.edit().unwrap().input.value(), "X");

        type_text(&mut app, "YZ");
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.state().interaction_mode, InteractionMode::Normal));
        assert_eq!(visible_texts(&app), vec!["XYZ"]);
    }

    #[test]
    fn test_edit_blank_keeps_text() {
        let (mut app, _) = new_app();
        add_tasks(&mut app, &["X"]);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(visible_texts(&app), vec!["X"]);
    }

    #[test]
    fn test_edit_escape_discards() {
        let (mut app, _) = new_app();
        add_tasks(&mut app, &["X"]);
        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "changed");
        let renders = app.session().view().render_count();
        press(&mut app, KeyCode::Esc);
        assert_eq!(visible_texts(&app), vec!["X"]);
        assert_eq!(app.session().view().render_count(), renders + 1);
    }

    #[test]
    fn test_edit_blur_commits() {
        let (mut app, _) = new_app();
        add_tasks(&mut app, &["A", "B"]);
        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "2");
        press(&mut app, KeyCode::Down);
        assert_eq!(visible_texts(&app), vec!["B2", "A"]);
        assert_eq!(app.state().selected_index, 1);
    }

    #[test]
    fn test_delete_after_animation() {
        let (mut app, _) = new_app();
        add_tasks(&mut app, &["A", "B"]);
        let t0 = Instant::now();
        app.handle_key_at(KeyEvent::from(KeyCode::Char('d')), t0);
        assert!(app.session().view().items()[0].exiting);
        assert_eq!(app.session().store().len(), 2);

        app.tick(t0 + DELAY);
        assert_eq!(visible_texts(&app), vec!["A"]);
        assert_eq!(app.state().selected_index, 0);
    }

    #[test]
    fn test_flush_before_exit_commits_delete() {
        let (mut app, _) = new_app();
        add_tasks(&mut app, &["A", "B"]);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.session().store().len(), 2);

        app.flush();
        assert_eq!(visible_texts(&app), vec!["A"]);
        assert!(!app.session().animator().is_busy());
        assert_eq!(app.state().selected_index, 0);
    }

    #[test]
    fn test_clear_completed_via_keys() {
        let (mut app, _) = new_app();
        add_tasks(&mut app, &["A", "B"]);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('x'));
        let t0 = Instant::now();
        app.handle_key_at(KeyEvent::from(KeyCode::Char('c')), t0);
        app.tick(t0 + DELAY);
        assert_eq!(visible_texts(&app), vec!["B"]);
    }

    #[test]
    fn test_clear_completed_nothing_sets_status() {
        let (mut app, _) = new_app();
        add_tasks(&mut app, &["A"]);
        press(&mut app, KeyCode::Char('c'));
        assert!(app.state().status_message.is_some());
        assert!(!app.session().animator().is_busy());
    }

    #[test]
    fn test_clear_all_requires_yes() {
        let (mut app, _) = new_app();
        add_tasks(&mut app, &["A", "B"]);

        press(&mut app, KeyCode::Char('C'));
        assert!(matches!(app.state().interaction_mode, InteractionMode::Confirm(_)));
        // Default button is No
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.state().interaction_mode, InteractionMode::Normal));
        assert!(!app.session().animator().is_busy());

        press(&mut app, KeyCode::Char('C'));
        press(&mut app, KeyCode::Char('y'));
        let t0 = Instant::now();
        app.handle_key_at(KeyEvent::from(KeyCode::Enter), t0);
        assert!(app.session().view().items().iter().all(|i| i.exiting));

        app.tick(t0 + DELAY);
        assert!(app.session().store().is_empty());
        assert!(app.session().view().empty_visible());
    }

    #[test]
    fn test_confirm_suspends_other_keys() {
        let (mut app, _) = new_app();
        add_tasks(&mut app, &["A"]);
        press(&mut app, KeyCode::Char('C'));
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.session().store().len(), 1);
        assert_eq!(app.session().root().applied_theme(), Theme::Light);
        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.state().interaction_mode, InteractionMode::Normal));
    }

    #[test]
    fn test_clear_all_on_empty_list_is_noop() {
        let (mut app, _) = new_app();
        press(&mut app, KeyCode::Char('C'));
        assert!(matches!(app.state().interaction_mode, InteractionMode::Normal));
    }

    #[test]
    fn test_theme_key_persists() {
        let (mut app, backend) = new_app();
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(backend.get_item(THEME_KEY).unwrap().as_deref(), Some("dark"));
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(backend.get_item(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_actions_on_empty_list_are_noops() {
        let (mut app, _) = new_app();
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.state().interaction_mode, InteractionMode::Normal));
        assert!(app.session().view().empty_visible());
    }
}
