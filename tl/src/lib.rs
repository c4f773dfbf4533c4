//! tasklist - a small persistent task list for the terminal
//!
//! Tasks are kept newest first, saved after every change, and shown either in
//! an interactive terminal UI or through one-shot subcommands.
//!
//! # Modules
//!
//! - [`storage`] - Key/value backends and the persistence adapter
//! - [`store`] - The authoritative task collection and its mutations
//! - [`render`] - Visible list projection, counts, and input fields
//! - [`animator`] - Deferred removals behind exit transitions
//! - [`theme`] - Light/dark preference and the root view attribute
//! - [`session`] - Keeps store, view, and theme in step
//! - [`tui`] - Interactive front end
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod animator;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod domain;
pub mod print;
pub mod render;
pub mod session;
pub mod storage;
pub mod store;
pub mod theme;
pub mod tui;

// Re-export commonly used types
pub use animator::{BulkClear, Commit, ExitTimer, RemovalAnimator, Started};
pub use config::Config;
pub use confirm::{AssumeYes, CLEAR_ALL_MESSAGE, Confirm, TerminalConfirm};
pub use domain::{IdResolver, Task, TaskId, Theme};
pub use render::{AddField, Counts, EditEnd, EditField, ListView, TextInput, VisibleItem};
pub use session::Session;
pub use storage::{FileStore, KeyValueStore, MemoryStore, Persistence, StorageError};
pub use store::TaskStore;
pub use theme::{RootView, ThemeController};
