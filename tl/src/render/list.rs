//! Visible list representation
//!
//! `ListView` is rebuilt wholesale from a task snapshot on every render. Each
//! visible item is a pure function of the task it shows; the only state the
//! view adds on top is the exiting mark placed by the removal animator.

use tracing::{debug, trace};

use crate::domain::{Task, TaskId};

/// Glyph shown in a completed task's checkbox
pub const CHECK_GLYPH: &str = "✓";

/// Interaction handlers wired to every visible item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemHandler {
    /// Checkbox activation
    Toggle,
    /// Edit icon activation
    StartEdit,
    /// Delete icon activation
    Delete,
}

const ITEM_HANDLERS: &[ItemHandler] = &[ItemHandler::Toggle, ItemHandler::StartEdit, ItemHandler::Delete];

/// One rendered task row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleItem {
    pub id: TaskId,
    pub text: String,
    /// Checkbox glyph, empty when open
    pub checkbox: &'static str,
    /// Pressed state of the checkbox
    pub pressed: bool,
    pub strikethrough: bool,
    /// Playing its exit transition
    pub exiting: bool,
    pub handlers: &'static [ItemHandler],
}

impl VisibleItem {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            text: task.text.clone(),
            checkbox: if task.completed { CHECK_GLYPH } else { "" },
            pressed: task.completed,
            strikethrough: task.completed,
            exiting: false,
            handlers: ITEM_HANDLERS,
        }
    }

    pub fn handles(&self, handler: ItemHandler) -> bool {
        self.handlers.contains(&handler)
    }
}

/// Summary counts for the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub remaining: usize,
    pub total: usize,
}

impl Counts {
    pub fn of(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            remaining: total - completed,
            total,
        }
    }
}

impl std::fmt::Display for Counts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.remaining, self.total)
    }
}

/// The rendered task list
#[derive(Debug, Clone, Default)]
pub struct ListView {
    items: Vec<VisibleItem>,
    empty_visible: bool,
    counts: Counts,
    counts_text: String,
    renders: u64,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the visible list from a snapshot
    pub fn render(&mut self, tasks: &[Task]) {
        debug!(count = tasks.len(), "ListView::render: called");
        self.renders += 1;
        self.items.clear();

        if tasks.is_empty() {
            self.empty_visible = true;
            self.update_counts(tasks);
            return;
        }

        self.empty_visible = false;
        self.items.extend(tasks.iter().map(VisibleItem::from_task));
        self.update_counts(tasks);
    }

    /// Recompute the "{remaining} / {total}" summary
    pub fn update_counts(&mut self, tasks: &[Task]) {
        self.counts = Counts::of(tasks);
        self.counts_text = self.counts.to_string();
        trace!(counts = %self.counts_text, "ListView::update_counts: published");
    }

    pub fn items(&self) -> &[VisibleItem] {
        &self.items
    }

    pub fn item(&self, id: &TaskId) -> Option<&VisibleItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.items.iter().position(|i| &i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the empty-state indicator is shown
    pub fn empty_visible(&self) -> bool {
        self.empty_visible
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    pub fn counts_text(&self) -> &str {
        &self.counts_text
    }

    /// Number of full renders performed so far
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Start an item's exit transition. Returns false if it is not visible.
    pub fn mark_exiting(&mut self, id: &TaskId) -> bool {
        match self.items.iter_mut().find(|i| &i.id == id) {
            Some(item) => {
                item.exiting = true;
                true
            }
            None => false,
        }
    }
}
