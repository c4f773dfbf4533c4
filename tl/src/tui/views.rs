//! TUI views and rendering
//!
//! All drawing logic is contained here. Views read the Session's list and root
//! projections plus the AppState, but never modify either.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use tracing::trace;

use crate::domain::Theme;
use crate::print::EMPTY_MESSAGE;
use crate::render::VisibleItem;
use crate::session::Session;
use crate::theme::RootView;

use super::app::App;
use super::state::{AppState, ConfirmDialog, InteractionMode};

/// Placeholder shown in an empty add field
const ADD_PLACEHOLDER: &str = "What needs doing?";

/// Colors for one display mode
#[derive(Debug, Clone, Copy)]
struct Palette {
    bg: Color,
    fg: Color,
    dim: Color,
    accent: Color,
    done: Color,
    danger: Color,
    selected_bg: Color,
}

impl Palette {
    /// Palette for whatever mode the root currently shows
    fn for_root(root: &RootView) -> Self {
        match root.applied_theme() {
            Theme::Light => Self {
                bg: Color::Rgb(250, 250, 250),
                fg: Color::Rgb(30, 30, 30),
                dim: Color::Rgb(140, 140, 140),
                accent: Color::Rgb(37, 99, 235),
                done: Color::Rgb(22, 163, 74),
                danger: Color::Rgb(220, 38, 38),
                selected_bg: Color::Rgb(225, 230, 240),
            },
            Theme::Dark => Self {
                bg: Color::Rgb(18, 18, 18),
                fg: Color::Rgb(230, 230, 230),
                dim: Color::DarkGray,
                accent: Color::Rgb(0, 255, 255),
                done: Color::Rgb(50, 205, 50),
                danger: Color::Rgb(220, 20, 60),
                selected_bg: Color::Rgb(40, 40, 40),
            },
        }
    }
}

/// Main render function
pub fn render(app: &App, frame: &mut Frame, now: Instant) {
    let session = app.session();
    let state = app.state();
    let palette = Palette::for_root(session.root());
    trace!(mode = ?state.interaction_mode, "render: called");

    frame.render_widget(Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)), frame.area());

    // Create main layout: header, add field, list, footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Add field
            Constraint::Min(0),    // Task list
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(session, &palette, frame, chunks[0]);
    render_add_field(state, &palette, frame, chunks[1]);
    render_list(session, state, &palette, frame, chunks[2], now);
    render_footer(state, &palette, frame, chunks[3]);

    // Render overlays
    match &state.interaction_mode {
        InteractionMode::Help => render_help_overlay(&palette, frame, frame.area()),
        InteractionMode::Confirm(dialog) => render_confirm_dialog(dialog, &palette, frame, frame.area()),
        _ => {}
    }
}

/// Render header with title, counts and theme toggle
fn render_header(session: &Session, palette: &Palette, frame: &mut Frame, area: Rect) {
    trace!("render_header: called");
    let root = session.root();
    let toggle_style = if root.toggle_pressed {
        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.dim)
    };

    let left = Line::from(vec![
        Span::styled(" Tasks", Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)),
        Span::raw(" │ "),
        Span::styled(session.view().counts_text().to_string(), Style::default().fg(palette.fg)),
        Span::styled(" remaining", Style::default().fg(palette.dim)),
    ]);
    let right = Line::from(vec![
        Span::styled(root.toggle_glyph, toggle_style),
        Span::styled(" t ", Style::default().fg(palette.dim)),
    ])
    .alignment(Alignment::Right);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.dim));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(left), inner);
    frame.render_widget(Paragraph::new(right), inner);
}

/// Render the add-task field
fn render_add_field(state: &AppState, palette: &Palette, frame: &mut Frame, area: Rect) {
    trace!("render_add_field: called");
    let focused = state.interaction_mode.is_add_input();
    let field = &state.add_field;

    let border = if focused { palette.accent } else { palette.dim };
    let add_style = if field.add_enabled() {
        Style::default().fg(palette.done).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.dim)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" New task ")
        .title(Line::styled(" Add ", add_style).alignment(Alignment::Right));

    let content = if field.input.value().is_empty() {
        Line::styled(ADD_PLACEHOLDER, Style::default().fg(palette.dim))
    } else {
        Line::from(field.input.value().to_string())
    };

    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(content).block(block), area);

    if focused {
        frame.set_cursor_position((cursor_column(inner, field.input.cursor_width()), inner.y));
    }
}

/// Render the task list, or the empty-state message
fn render_list(session: &Session, state: &AppState, palette: &Palette, frame: &mut Frame, area: Rect, now: Instant) {
    trace!("render_list: called");
    let view = session.view();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.dim));

    if view.empty_visible() {
        frame.render_widget(block, area);
        render_empty_message(palette, frame, area, EMPTY_MESSAGE);
        return;
    }

    let editing = state.interaction_mode.edit();
    let items: Vec<ListItem> = view
        .items()
        .iter()
        .map(|item| {
            let edit_value = editing.filter(|e| e.id == item.id).map(|e| e.input.value());
            let progress = session.animator().progress(&item.id, now);
            ListItem::new(item_line(item, edit_value, progress, palette))
        })
        .collect();

    let list_focused = matches!(state.interaction_mode, InteractionMode::Normal | InteractionMode::Edit(_));
    let highlight = if list_focused {
        Style::default().bg(palette.selected_bg)
    } else {
        Style::default()
    };
    let list = List::new(items).block(block).highlight_style(highlight);
    let mut list_state = ListState::default().with_selected(Some(state.selected_index));

    let inner = area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    frame.render_stateful_widget(list, area, &mut list_state);

    // Place the terminal cursor inside the inline editor
    if let Some(edit) = editing
        && let Some(row) = view.position(&edit.id)
    {
        let visible_row = row.saturating_sub(list_state.offset());
        if visible_row < usize::from(inner.height) {
            // "[x] " precedes the editor text
            let x = cursor_column(inner, edit.input.cursor_width().saturating_add(4));
            frame.set_cursor_position((x, inner.y.saturating_add(visible_row as u16)));
        }
    }
}

/// Column for a cursor `offset` cells into `area`, kept inside it
fn cursor_column(area: Rect, offset: usize) -> u16 {
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    area.x.saturating_add(offset).min(area.right().saturating_sub(1))
}

/// One list row: checkbox, then text or the inline editor
fn item_line<'a>(item: &'a VisibleItem, edit_value: Option<&'a str>, progress: Option<f64>, palette: &Palette) -> Line<'a> {
    let checkbox_style = if item.pressed {
        Style::default().fg(palette.done).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.dim)
    };
    let checkbox = if item.checkbox.is_empty() { " " } else { item.checkbox };

    let mut text_style = Style::default().fg(palette.fg);
    if item.strikethrough {
        text_style = text_style.fg(palette.dim).add_modifier(Modifier::CROSSED_OUT);
    }
    if item.exiting {
        // Fade out over the transition
        let fade = if progress.unwrap_or(1.0) < 0.5 { palette.dim } else { palette.bg };
        text_style = text_style.fg(fade).add_modifier(Modifier::DIM);
    }

    let mut spans = vec![
        Span::styled("[", Style::default().fg(palette.dim)),
        Span::styled(checkbox, checkbox_style),
        Span::styled("] ", Style::default().fg(palette.dim)),
    ];
    match edit_value {
        Some(value) => spans.push(Span::styled(
            value,
            Style::default().fg(palette.accent).add_modifier(Modifier::UNDERLINED),
        )),
        None => spans.push(Span::styled(item.text.as_str(), text_style)),
    }
    if item.exiting {
        spans.push(Span::styled("  removing…", Style::default().fg(palette.danger)));
    }
    Line::from(spans)
}

/// Render footer with keybind hints or the status message
fn render_footer(state: &AppState, palette: &Palette, frame: &mut Frame, area: Rect) {
    trace!("render_footer: called");
    let key = |k: &'static str| Span::styled(k, Style::default().fg(palette.accent));
    let desc = |d: &'static str| Span::styled(d, Style::default().fg(palette.dim));

    let line = if let Some(message) = &state.status_message {
        Line::from(Span::styled(message.clone(), Style::default().fg(palette.danger)))
    } else {
        match &state.interaction_mode {
            InteractionMode::AddInput => Line::from(vec![
                key(" Enter"),
                desc(" add  "),
                key("Esc/Tab"),
                desc(" to list"),
            ]),
            InteractionMode::Edit(_) => Line::from(vec![
                key(" Enter"),
                desc(" save  "),
                key("Esc"),
                desc(" cancel  "),
                key("Tab/↑↓"),
                desc(" save and move"),
            ]),
            _ => Line::from(vec![
                key(" a"),
                desc(" add  "),
                key("space"),
                desc(" toggle  "),
                key("e"),
                desc(" edit  "),
                key("d"),
                desc(" delete  "),
                key("c"),
                desc(" clear done  "),
                key("C"),
                desc(" clear all  "),
                key("t"),
                desc(" theme  "),
                key("?"),
                desc(" help  "),
                key("q"),
                desc(" quit"),
            ]),
        }
    };

    let footer = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.dim)),
    );
    frame.render_widget(footer, area);
}

/// Render help overlay
fn render_help_overlay(palette: &Palette, frame: &mut Frame, area: Rect) {
    trace!("render_help_overlay: called");
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(vec![Span::styled(title, Style::default().add_modifier(Modifier::BOLD))])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                .fg(palette.accent),
        )]),
        Line::from(""),
        section("List"),
        key_line("a / i", "Focus the add field", palette),
        key_line("j/↓  k/↑", "Move down / up", palette),
        key_line("g / G", "Top / bottom", palette),
        key_line("space / x", "Toggle done", palette),
        key_line("e / Enter", "Edit text", palette),
        key_line("d / Del", "Delete task", palette),
        key_line("c", "Clear completed", palette),
        key_line("C", "Clear all (asks first)", palette),
        Line::from(""),
        section("Editing"),
        key_line("Enter", "Save", palette),
        key_line("Esc", "Cancel", palette),
        key_line("Tab / ↑↓", "Save and move focus", palette),
        Line::from(""),
        section("Global"),
        key_line("t", "Toggle light/dark theme", palette),
        key_line("?", "Toggle help", palette),
        key_line("q", "Quit", palette),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (? to close) ")
                .style(Style::default().bg(palette.bg).fg(palette.fg)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

/// Helper to create a key binding line
fn key_line<'a>(key: &'a str, desc: &'a str, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", key), Style::default().fg(palette.accent)),
        Span::raw(desc),
    ])
}

/// Render confirmation dialog
fn render_confirm_dialog(dialog: &ConfirmDialog, palette: &Palette, frame: &mut Frame, area: Rect) {
    trace!("render_confirm_dialog: called");
    let yes_style = if dialog.selected_button {
        Style::default()
            .fg(Color::Black)
            .bg(palette.done)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.done)
    };

    let no_style = if !dialog.selected_button {
        Style::default()
            .fg(Color::Black)
            .bg(palette.danger)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.danger)
    };

    let content = vec![
        Line::from(dialog.message.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::styled(" No ", no_style),
            Span::raw("    "),
            Span::styled(" Yes ", yes_style),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Tab: switch  y: yes  Enter: confirm  Esc: cancel",
            Style::default().fg(palette.dim),
        )]),
    ];

    // Size the popup to its content: borders plus one column of padding
    let width = content.iter().map(Line::width).max().unwrap_or(0).saturating_add(4);
    let height = content.len().saturating_add(2);
    let popup_area = centered_fixed(width, height, area);
    frame.render_widget(Clear, popup_area);

    let dialog_widget = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm ")
                .style(Style::default().bg(palette.bg).fg(palette.fg)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(dialog_widget, popup_area);
}

/// Render empty state message
fn render_empty_message(palette: &Palette, frame: &mut Frame, area: Rect, message: &str) {
    trace!(%message, "render_empty_message: called");
    let inner = area.inner(Margin {
        horizontal: 2,
        vertical: 2,
    });

    let empty = Paragraph::new(message)
        .style(Style::default().fg(palette.dim))
        .alignment(Alignment::Center);

    frame.render_widget(empty, inner);
}

/// Centered rect of a fixed size, shrunk to fit `area`
fn centered_fixed(width: usize, height: usize, area: Rect) -> Rect {
    let width = u16::try_from(width).unwrap_or(u16::MAX).min(area.width);
    let height = u16::try_from(height).unwrap_or(u16::MAX).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
