//! Blocking yes/no confirmation

use rustyline::DefaultEditor;
use tracing::{debug, warn};

/// Message shown before deleting every task
pub const CLEAR_ALL_MESSAGE: &str = "Delete ALL tasks? This cannot be undone.";

/// A yes/no prompt. Only an explicit yes proceeds.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Skips the prompt (`--yes`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

/// Line prompt on the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        debug!(%message, "TerminalConfirm::confirm: called");
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                warn!(error = %e, "Failed to open prompt, treating as declined");
                return false;
            }
        };
        match editor.readline(&format!("{} [y/N] ", message)) {
            Ok(line) => is_affirmative(&line),
            Err(e) => {
                debug!(error = %e, "TerminalConfirm::confirm: no answer");
                false
            }
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
