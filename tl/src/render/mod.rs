//! Render engine: pure projections of the task list and its input fields
//!
//! Nothing here draws to a terminal. The TUI views and the CLI printer both
//! consume these types.

mod input;
mod list;

pub use input::{AddField, EditEnd, EditField, TextInput};
pub use list::{CHECK_GLYPH, Counts, ItemHandler, ListView, VisibleItem};
