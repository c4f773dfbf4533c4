//! TaskStore - owner of the canonical task list
//!
//! Every mutation that changes state writes the full list through the
//! persistence adapter before returning, so the caller's next render always
//! reflects what is on disk. Mutations return whether anything changed; the
//! caller skips the render when nothing did.

use tracing::{debug, info};

use crate::domain::{IdResolver, Task, TaskId, generate_unique_id, normalize_text};
use crate::storage::Persistence;

/// In-memory task list, most recent first
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    persistence: Persistence,
}

impl TaskStore {
    /// Load the stored list through the given adapter
    pub fn open(persistence: Persistence) -> Self {
        let tasks = persistence.load_tasks();
        info!(count = tasks.len(), "TaskStore opened");
        Self { tasks, persistence }
    }

    /// Snapshot of the current list
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn has_completed(&self) -> bool {
        self.tasks.iter().any(|t| t.completed)
    }

    /// IDs of completed tasks, in list order
    pub fn completed_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().filter(|t| t.completed).map(|t| t.id.clone()).collect()
    }

    /// Resolve an ID or unique ID prefix
    pub fn resolve(&self, reference: &str) -> Result<Option<TaskId>, Vec<TaskId>> {
        IdResolver::new(&self.tasks).resolve(reference)
    }

    /// Add a task to the front of the list
    ///
    /// Returns the new ID, or None when the trimmed text is empty.
    pub fn add(&mut self, raw_text: &str) -> Option<TaskId> {
        debug!(raw_len = raw_text.len(), "TaskStore::add: called");
        let id = generate_unique_id(&self.tasks);
        let task = Task::new(id.clone(), raw_text)?;
        self.tasks.insert(0, task);
        self.persist();
        debug!(%id, "TaskStore::add: added");
        Some(id)
    }

    /// Flip the completion flag
    pub fn toggle(&mut self, id: &TaskId) -> bool {
        debug!(%id, "TaskStore::toggle: called");
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            debug!(%id, "TaskStore::toggle: not found");
            return false;
        };
        task.completed = !task.completed;
        self.persist();
        true
    }

    /// Replace the text; blank input keeps the existing text
    pub fn edit(&mut self, id: &TaskId, raw_text: &str) -> bool {
        debug!(%id, "TaskStore::edit: called");
        let Some(text) = normalize_text(raw_text) else {
            debug!(%id, "TaskStore::edit: blank text, keeping old value");
            return false;
        };
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            debug!(%id, "TaskStore::edit: not found");
            return false;
        };
        if task.text == text {
            return false;
        }
        task.text = text;
        self.persist();
        true
    }

    pub fn remove(&mut self, id: &TaskId) -> bool {
        debug!(%id, "TaskStore::remove: called");
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Remove every completed task
    pub fn clear_completed(&mut self) -> bool {
        debug!("TaskStore::clear_completed: called");
        if !self.has_completed() {
            return false;
        }
        self.tasks.retain(|t| !t.completed);
        self.persist();
        true
    }

    /// Remove every task
    ///
    /// Callers gate this behind a user confirmation.
    pub fn clear_all(&mut self) -> bool {
        debug!("TaskStore::clear_all: called");
        if self.tasks.is_empty() {
            return false;
        }
        self.tasks.clear();
        self.persist();
        true
    }

    fn persist(&self) {
        self.persistence.save_tasks(&self.tasks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, TASKS_KEY};

    fn new_store() -> (TaskStore, MemoryStore) {
        let backend = MemoryStore::new();
        (TaskStore::open(Persistence::new(backend.clone())), backend)
    }

    fn texts(store: &TaskStore) -> Vec<&str> {
        store.tasks().iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_add_prepends() {
        let (mut store, _) = new_store();
        store.add("A");
        store.add("B");
        assert_eq!(texts(&store), vec!["B", "A"]);
    }

    #[test]
    fn test_add_trims_and_rejects_blank() {
        let (mut store, backend) = new_store();
        assert!(store.add("   ").is_none());
        assert!(backend.get_item(TASKS_KEY).unwrap().is_none());

        store.add("  Buy milk  ");
        assert_eq!(texts(&store), vec!["Buy milk"]);
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn test_add_ids_unique() {
        let (mut store, _) = new_store();
        let a = store.add("A").unwrap();
        let b = store.add("B").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_toggle_keeps_order() {
        let (mut store, _) = new_store();
        let a = store.add("A").unwrap();
        store.add("B");
        assert!(store.toggle(&a));
        assert_eq!(texts(&store), vec!["B", "A"]);
        assert!(store.get(&a).unwrap().completed);

        assert!(store.toggle(&a));
        assert!(!store.get(&a).unwrap().completed);
    }

    #[test]
    fn test_toggle_unknown_is_noop() {
        let (mut store, backend) = new_store();
        assert!(!store.toggle(&TaskId::from("missing")));
        assert!(backend.is_empty());
    }

    #[test]
    fn test_edit_blank_keeps_text() {
        let (mut store, _) = new_store();
        let x = store.add("X").unwrap();
        assert!(!store.edit(&x, "   "));
        assert_eq!(store.get(&x).unwrap().text, "X");
    }

    #[test]
    fn test_edit_replaces_trimmed() {
        let (mut store, backend) = new_store();
        let x = store.add("X").unwrap();
        assert!(store.edit(&x, "  Y "));
        assert_eq!(store.get(&x).unwrap().text, "Y");
        assert!(backend.get_item(TASKS_KEY).unwrap().unwrap().contains("\"Y\""));
    }

    #[test]
    fn test_remove() {
        let (mut store, _) = new_store();
        let a = store.add("A").unwrap();
        store.add("B");
        assert!(store.remove(&a));
        assert!(!store.remove(&a));
        assert_eq!(texts(&store), vec!["B"]);
    }

    #[test]
    fn test_clear_completed() {
        let (mut store, _) = new_store();
        let a = store.add("A").unwrap();
        store.add("B");
        store.toggle(&a);
        assert!(store.clear_completed());
        assert_eq!(texts(&store), vec!["B"]);
    }

    #[test]
    fn test_clear_completed_noop_leaves_storage_untouched() {
        let (mut store, backend) = new_store();
        store.add("A");
        let before = backend.get_item(TASKS_KEY).unwrap();
        assert!(!store.clear_completed());
        assert_eq!(backend.get_item(TASKS_KEY).unwrap(), before);
    }

    #[test]
    fn test_clear_all() {
        let (mut store, _) = new_store();
        assert!(!store.clear_all());
        store.add("A");
        store.add("B");
        assert!(store.clear_all());
        assert!(store.is_empty());
    }

    #[test]
    fn test_reopen_sees_saved_state() {
        let (mut store, backend) = new_store();
        let a = store.add("A").unwrap();
        store.toggle(&a);

        let reopened = TaskStore::open(Persistence::new(backend));
        assert_eq!(reopened.tasks(), store.tasks());
    }
}
