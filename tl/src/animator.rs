//! Removal animator - defers store removals until exit transitions finish
//!
//! Each removal (a single delete or a bulk clear) is a `PendingRemoval`
//! holding the set of item IDs still animating and the store mutation to run
//! once that set drains. Exit-complete signals come from `ExitTimer`, a
//! fixed-delay clock polled on every UI tick. A signal is consumed at most
//! once per waiting removal; repeats are ignored.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::domain::TaskId;
use crate::render::ListView;
use crate::store::TaskStore;

/// Store mutation to run when a removal's animations complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    Remove(TaskId),
    ClearCompleted,
    ClearAll,
}

/// Which bulk clear to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkClear {
    Completed,
    All,
}

impl BulkClear {
    fn commit(self) -> Commit {
        match self {
            Self::Completed => Commit::ClearCompleted,
            Self::All => Commit::ClearAll,
        }
    }
}

/// Result of starting a removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Started {
    /// Nothing qualifies; no mutation will happen
    Nothing,
    /// Items are animating; the commit arrives through `signal`/`tick`
    Waiting { items: usize },
    /// No visible item qualified; run this commit now
    Immediate(Commit),
}

#[derive(Debug)]
struct PendingRemoval {
    pending_ids: HashSet<TaskId>,
    commit: Commit,
}

/// Fixed-delay stand-in for an animation-end event
#[derive(Debug, Clone)]
pub struct ExitTimer {
    delay: Duration,
    started: HashMap<TaskId, Instant>,
}

impl ExitTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: HashMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Begin timing an item; an already running item keeps its start time
    pub fn start(&mut self, id: &TaskId, now: Instant) -> bool {
        if self.started.contains_key(id) {
            return false;
        }
        self.started.insert(id.clone(), now);
        true
    }

    /// Items whose delay has elapsed, oldest first. Each is returned once.
    pub fn due(&mut self, now: Instant) -> Vec<TaskId> {
        let mut due: Vec<(Instant, TaskId)> = self
            .started
            .iter()
            .filter(|(_, started)| now.saturating_duration_since(**started) >= self.delay)
            .map(|(id, started)| (*started, id.clone()))
            .collect();
        due.sort();
        for (_, id) in &due {
            self.started.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Fraction of the transition elapsed, if the item is animating
    pub fn progress(&self, id: &TaskId, now: Instant) -> Option<f64> {
        let started = self.started.get(id)?;
        if self.delay.is_zero() {
            return Some(1.0);
        }
        let elapsed = now.saturating_duration_since(*started).as_secs_f64();
        Some((elapsed / self.delay.as_secs_f64()).min(1.0))
    }

    pub fn is_running(&self) -> bool {
        !self.started.is_empty()
    }

    /// Forget every running transition
    pub fn clear(&mut self) {
        self.started.clear();
    }
}

/// Coordinates exit transitions and the removals waiting on them
#[derive(Debug)]
pub struct RemovalAnimator {
    removals: Vec<PendingRemoval>,
    timer: ExitTimer,
}

impl RemovalAnimator {
    pub fn new(exit_delay: Duration) -> Self {
        Self {
            removals: Vec::new(),
            timer: ExitTimer::new(exit_delay),
        }
    }

    /// Start removing one item
    pub fn remove_one(&mut self, view: &mut ListView, id: &TaskId, now: Instant) -> Started {
        debug!(%id, "RemovalAnimator::remove_one: called");
        if !view.mark_exiting(id) {
            debug!(%id, "RemovalAnimator::remove_one: not visible, committing now");
            return Started::Immediate(Commit::Remove(id.clone()));
        }
        self.timer.start(id, now);
        self.removals.push(PendingRemoval {
            pending_ids: HashSet::from([id.clone()]),
            commit: Commit::Remove(id.clone()),
        });
        Started::Waiting { items: 1 }
    }

    /// Start a bulk clear over every qualifying visible item
    pub fn clear(&mut self, view: &mut ListView, store: &TaskStore, kind: BulkClear, now: Instant) -> Started {
        debug!(?kind, "RemovalAnimator::clear: called");
        let targets: Vec<TaskId> = match kind {
            BulkClear::Completed => store.completed_ids(),
            BulkClear::All => store.tasks().iter().map(|t| t.id.clone()).collect(),
        };
        if targets.is_empty() {
            debug!(?kind, "RemovalAnimator::clear: nothing qualifies");
            return Started::Nothing;
        }

        let qualifying: HashSet<TaskId> = match kind {
            BulkClear::Completed => targets.into_iter().filter(|id| view.mark_exiting(id)).collect(),
            // Clear-all takes whatever is on screen
            BulkClear::All => {
                let visible: Vec<TaskId> = view.items().iter().map(|i| i.id.clone()).collect();
                visible.into_iter().filter(|id| view.mark_exiting(id)).collect()
            }
        };

        if qualifying.is_empty() {
            debug!(?kind, "RemovalAnimator::clear: no visible items, committing now");
            return Started::Immediate(kind.commit());
        }

        for id in &qualifying {
            self.timer.start(id, now);
        }
        let items = qualifying.len();
        info!(?kind, items, "Bulk removal animating");
        self.removals.push(PendingRemoval {
            pending_ids: qualifying,
            commit: kind.commit(),
        });
        Started::Waiting { items }
    }

    /// Deliver an exit-complete signal for one item
    ///
    /// Returns the commits whose last pending item this was.
    pub fn signal(&mut self, id: &TaskId) -> Vec<Commit> {
        let mut commits = Vec::new();
        self.removals.retain_mut(|removal| {
            if !removal.pending_ids.remove(id) {
                return true;
            }
            if removal.pending_ids.is_empty() {
                commits.push(removal.commit.clone());
                return false;
            }
            true
        });
        if !commits.is_empty() {
            debug!(%id, ?commits, "RemovalAnimator::signal: removals complete");
        }
        commits
    }

    /// Poll the exit timer and deliver signals for finished transitions
    pub fn tick(&mut self, now: Instant) -> Vec<Commit> {
        let mut commits = Vec::new();
        for id in self.timer.due(now) {
            commits.extend(self.signal(&id));
        }
        commits
    }

    /// Finish every waiting removal now, in the order they started
    pub fn flush(&mut self) -> Vec<Commit> {
        self.timer.clear();
        let commits: Vec<Commit> = self.removals.drain(..).map(|removal| removal.commit).collect();
        if !commits.is_empty() {
            info!(count = commits.len(), "Flushing pending removals");
        }
        commits
    }

    /// Re-mark animating items after the list was rebuilt
    pub fn apply_marks(&self, view: &mut ListView) {
        for removal in &self.removals {
            for id in &removal.pending_ids {
                view.mark_exiting(id);
            }
        }
    }

    pub fn is_exiting(&self, id: &TaskId) -> bool {
        self.removals.iter().any(|r| r.pending_ids.contains(id))
    }

    /// Whether any removal is still waiting on a transition
    pub fn is_busy(&self) -> bool {
        !self.removals.is_empty()
    }

    pub fn progress(&self, id: &TaskId, now: Instant) -> Option<f64> {
        self.timer.progress(id, now)
    }
}
