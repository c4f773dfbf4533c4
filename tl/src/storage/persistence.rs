//! Persistence adapter for the task list and theme preference
//!
//! Reads fail soft: a missing key, an unreadable store, or a value that does
//! not parse all come back as "no data". Writes are fire-and-forget; a failed
//! write is logged and otherwise ignored.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Task, Theme, normalize_text};

use super::KeyValueStore;

/// Key holding the JSON-serialized task list
pub const TASKS_KEY: &str = "minimal_todos_v1";

/// Key holding the theme preference
pub const THEME_KEY: &str = "minimal_theme_v1";

/// Cloneable handle to the durable store
#[derive(Debug, Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self { store: Arc::new(store) }
    }

    /// Load the task list, or an empty list if nothing usable is stored
    pub fn load_tasks(&self) -> Vec<Task> {
        debug!("Persistence::load_tasks: called");
        let raw = match self.store.get_item(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Persistence::load_tasks: no stored list");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read task list, starting empty");
                return Vec::new();
            }
        };

        let parsed: Vec<Task> = match serde_json::from_str(&raw) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "Stored task list is malformed, starting empty");
                return Vec::new();
            }
        };

        let tasks = sanitize(parsed);
        debug!(count = tasks.len(), "Persistence::load_tasks: loaded");
        tasks
    }

    /// Overwrite the stored task list
    pub fn save_tasks(&self, tasks: &[Task]) {
        debug!(count = tasks.len(), "Persistence::save_tasks: called");
        let json = match serde_json::to_string(tasks) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize task list");
                return;
            }
        };
        if let Err(e) = self.store.set_item(TASKS_KEY, &json) {
            warn!(error = %e, "Failed to write task list");
        }
    }

    /// Load the theme preference, defaulting to light
    pub fn load_theme(&self) -> Theme {
        match self.store.get_item(THEME_KEY) {
            Ok(Some(raw)) => Theme::from_stored(raw.trim()),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read theme, using default");
                Theme::default()
            }
        }
    }

    pub fn save_theme(&self, theme: Theme) {
        debug!(%theme, "Persistence::save_theme: called");
        if let Err(e) = self.store.set_item(THEME_KEY, theme.as_str()) {
            warn!(error = %e, "Failed to write theme");
        }
    }
}

/// Drop entries with blank text or an id seen earlier in the list
fn sanitize(parsed: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(parsed.len());
    for mut task in parsed {
        let Some(text) = normalize_text(&task.text) else {
            warn!(id = %task.id, "Dropping stored task with blank text");
            continue;
        };
        if !seen.insert(task.id.clone()) {
            warn!(id = %task.id, "Dropping stored task with duplicate id");
            continue;
        }
        task.text = text;
        tasks.push(task);
    }
    tasks
}
