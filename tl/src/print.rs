//! Plain-terminal presentation of the rendered list, for the headless CLI

use colored::*;

use crate::render::ListView;

/// Message shown in place of an empty list
pub const EMPTY_MESSAGE: &str = "No tasks yet. Add one to get started.";

/// Format the visible list with its counts header
pub fn format_list(view: &ListView) -> String {
    let mut out = format!("{} {}\n", "Tasks".bold(), view.counts_text());

    if view.empty_visible() {
        out.push_str(&format!("  {}\n", EMPTY_MESSAGE.dimmed()));
        return out;
    }

    for item in view.items() {
        let checkbox = if item.checkbox.is_empty() { " " } else { item.checkbox };
        let text = if item.strikethrough {
            item.text.strikethrough().dimmed().to_string()
        } else {
            item.text.clone()
        };
        out.push_str(&format!("  [{}] {}  {}\n", checkbox.green(), text, item.id.as_str().dimmed()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Task, TaskId};

    fn plain(s: &str) -> String {
        // Strip ANSI escapes so assertions hold with or without color
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_format_empty() {
        let mut view = ListView::new();
        view.render(&[]);
        let text = plain(&format_list(&view));
        assert!(text.contains("Tasks 0 / 0"));
        assert!(text.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn test_format_items() {
        let mut view = ListView::new();
        view.render(&[
            Task {
                id: TaskId::from("b1"),
                text: "B".to_string(),
                completed: false,
            },
            Task {
                id: TaskId::from("a1"),
                text: "A".to_string(),
                completed: true,
            },
        ]);
        let text = plain(&format_list(&view));
        assert!(text.contains("Tasks 1 / 2"));
        assert!(text.contains("[ ] B  b1"));
        assert!(text.contains("[✓] A  a1"));
        assert!(text.find("B  b1").unwrap() < text.find("A  a1").unwrap());
    }
}
