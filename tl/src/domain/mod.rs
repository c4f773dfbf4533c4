//! Domain types: tasks, their identifiers, and the theme preference

mod id;
mod task;
mod theme;

pub use id::{IdResolver, generate_id, generate_unique_id};
pub use task::{Task, TaskId, normalize_text};
pub use theme::Theme;
