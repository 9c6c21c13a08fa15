use std::cmp::min;

use chrono::NaiveDateTime;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::model::{Category, StatusFilter, TaskCounts, TaskStatus};

pub const BG_BASE: Color = Color::Rgb(14, 17, 23);
pub const BG_PANEL: Color = Color::Rgb(22, 26, 34);
pub const BG_ACCENT: Color = Color::Rgb(32, 37, 47);
pub const FG_ACCENT: Color = Color::Rgb(120, 161, 255);

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

/// Tab label for a filter, carrying the matching count.
pub fn filter_label(filter: StatusFilter, counts: &TaskCounts) -> String {
    match filter {
        StatusFilter::All => format!("All {}", counts.total),
        StatusFilter::Pending => format!("Pending ({})", counts.pending),
        StatusFilter::Completed => format!("Completed ({})", counts.completed),
    }
}

pub fn status_style(status: &TaskStatus) -> Style {
    match status {
        TaskStatus::Pending => Style::default().fg(Color::Yellow),
        TaskStatus::Completed => Style::default().fg(Color::Green),
        TaskStatus::Other(_) => Style::default().fg(Color::Gray),
    }
}

pub fn category_style(category: &Category) -> Style {
    match category {
        Category::Urgent => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Category::Important => Style::default().fg(Color::Magenta),
        Category::Later => Style::default().fg(Color::Cyan),
        Category::Other(_) => Style::default().fg(Color::Gray),
    }
}

pub fn format_timestamp(value: Option<NaiveDateTime>) -> String {
    value
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn build_help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Tab / Shift+Tab", "Switch filter (All, Pending, Completed)"),
        ("1 / 2 / 3", "Jump to a filter"),
        ("j / k or ↓ / ↑", "Move selection"),
        ("a / n", "Focus the new task form"),
        ("d / Space", "Mark selected task as completed"),
        ("x / Delete", "Delete task (with confirmation)"),
        ("r", "Reload from the task service"),
        ("h / ?", "Toggle this help overlay"),
        ("q", "Quit"),
        ("Tab (in form)", "Next field"),
        ("←/→ (category)", "Pick a category"),
        ("Alt+Enter / Ctrl+J", "New line in the description"),
        ("Enter (in form)", "Create the task"),
        ("Esc", "Leave the form / close overlays"),
    ]
}

pub fn accent_title(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_owned(),
        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
    )])
}
