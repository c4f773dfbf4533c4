//! Session - keeps the task store, its persisted copy, and the visible list
//! in step
//!
//! Flow for every user action:
//!
//! ```text
//! action ──► TaskStore mutation ──► save ──► ListView::render ──► counts
//!    │                                 ▲
//!    └──► RemovalAnimator ── signals ──┘ (deferred removals)
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::animator::{BulkClear, Commit, RemovalAnimator, Started};
use crate::confirm::{CLEAR_ALL_MESSAGE, Confirm};
use crate::domain::{TaskId, Theme};
use crate::render::{EditEnd, EditField, ListView};
use crate::storage::Persistence;
use crate::store::TaskStore;
use crate::theme::{RootView, ThemeController};

#[derive(Debug)]
pub struct Session {
    store: TaskStore,
    view: ListView,
    animator: RemovalAnimator,
    root: RootView,
    theme: ThemeController,
}

impl Session {
    /// Load tasks and theme. The list is not rendered until `render` is called.
    pub fn open(persistence: Persistence, exit_delay: Duration) -> Self {
        let theme = ThemeController::new(persistence.clone());
        let mut root = RootView::default();
        theme.init(&mut root);
        let store = TaskStore::open(persistence);
        info!(tasks = store.len(), ?exit_delay, "Session opened");
        Self {
            store,
            view: ListView::new(),
            animator: RemovalAnimator::new(exit_delay),
            root,
            theme,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    pub fn root(&self) -> &RootView {
        &self.root
    }

    pub fn animator(&self) -> &RemovalAnimator {
        &self.animator
    }

    /// Full rebuild of the visible list, keeping in-flight exit marks
    pub fn render(&mut self) {
        self.view.render(self.store.tasks());
        self.animator.apply_marks(&mut self.view);
    }

    pub fn add(&mut self, raw_text: &str) -> Option<TaskId> {
        let id = self.store.add(raw_text)?;
        self.render();
        Some(id)
    }

    pub fn toggle(&mut self, id: &TaskId) -> bool {
        let changed = self.store.toggle(id);
        if changed {
            self.render();
        }
        changed
    }

    /// Open an inline editor for a task
    pub fn start_edit(&self, id: &TaskId) -> Option<EditField> {
        self.store.get(id).map(EditField::start)
    }

    /// Close an inline editor. The list is re-rendered whatever the outcome.
    pub fn finish_edit(&mut self, edit: EditField, end: EditEnd) -> bool {
        debug!(id = %edit.id, ?end, "Session::finish_edit: called");
        let changed = end.commits() && self.store.edit(&edit.id, edit.input.value());
        self.render();
        changed
    }

    /// Start removing one task
    pub fn delete(&mut self, id: &TaskId, now: Instant) -> Started {
        let started = self.animator.remove_one(&mut self.view, id, now);
        self.settle(&started);
        started
    }

    pub fn clear_completed(&mut self, now: Instant) -> Started {
        let started = self.animator.clear(&mut self.view, &self.store, BulkClear::Completed, now);
        self.settle(&started);
        started
    }

    /// Remove every task after an explicit confirmation
    pub fn clear_all(&mut self, confirm: &mut dyn Confirm, now: Instant) -> Started {
        if self.store.is_empty() {
            return Started::Nothing;
        }
        if !confirm.confirm(CLEAR_ALL_MESSAGE) {
            debug!("Session::clear_all: declined");
            return Started::Nothing;
        }
        let started = self.animator.clear(&mut self.view, &self.store, BulkClear::All, now);
        self.settle(&started);
        started
    }

    /// Deliver due exit signals. Returns how many commits ran.
    pub fn tick(&mut self, now: Instant) -> usize {
        let commits = self.animator.tick(now);
        let count = commits.len();
        for commit in commits {
            self.apply(commit);
        }
        count
    }

    /// Commit every pending removal without waiting. Returns how many ran.
    pub fn flush(&mut self) -> usize {
        let commits = self.animator.flush();
        let count = commits.len();
        for commit in commits {
            self.apply(commit);
        }
        count
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle(&mut self.root)
    }

    fn settle(&mut self, started: &Started) {
        if let Started::Immediate(commit) = started {
            self.apply(commit.clone());
        }
    }

    fn apply(&mut self, commit: Commit) {
        debug!(?commit, "Session::apply: called");
        match &commit {
            Commit::Remove(id) => self.store.remove(id),
            Commit::ClearCompleted => self.store.clear_completed(),
            Commit::ClearAll => self.store.clear_all(),
        };
        self.render();
    }
}
