use std::cmp::min;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::Frame;

use crate::components::{FormField, TaskForm, DELETE_PROMPT, LOADING_TEXT};
use crate::model::{StatusFilter, Task};
use crate::tui::constants::{APP_SUBTITLE, APP_TITLE, APP_VERSION};
use crate::tui::helpers::{
    accent_title, build_help_lines, category_style, centered_rect, filter_label,
    format_timestamp, inset_rect, status_style, BG_ACCENT, BG_BASE, BG_PANEL, FG_ACCENT,
};

use super::{App, ConfirmChoice, InputMode};

const FORM_INDENT: u16 = 2;

impl App {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>) {
        let size = f.size();
        f.render_widget(Clear, size);
        f.render_widget(Block::default().style(Style::default().bg(BG_BASE)), size);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(2),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_banner(f, chunks[1]);
        self.draw_body(f, chunks[2]);
        self.draw_footer(f, chunks[3]);

        match self.input_mode {
            InputMode::Help => self.draw_help_overlay(f, size),
            InputMode::ConfirmDelete => self.draw_confirm_overlay(f, size),
            InputMode::Normal | InputMode::Form => {}
        }
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let left = vec![
            Line::from(vec![
                Span::styled(
                    format!(" {} ", APP_TITLE),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("v{}", APP_VERSION),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            Line::from(Span::styled(
                format!(" {}", APP_SUBTITLE),
                Style::default().fg(Color::Gray),
            )),
        ];
        f.render_widget(
            Paragraph::new(left).style(Style::default().bg(BG_BASE)),
            cols[0],
        );

        let right = Line::from(Span::styled(
            format!("🌐 {} ", self.config.api_base_url()),
            Style::default().fg(Color::DarkGray),
        ));
        f.render_widget(
            Paragraph::new(right)
                .alignment(Alignment::Right)
                .style(Style::default().bg(BG_BASE)),
            cols[1],
        );
    }

    fn draw_banner(&self, f: &mut Frame<'_>, area: Rect) {
        let Some(text) = self.view.banner() else {
            return;
        };
        let line = Line::from(Span::styled(
            format!(" ✔ {}", text),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
        f.render_widget(Paragraph::new(line).style(Style::default().bg(BG_BASE)), area);
    }

    fn draw_body(&mut self, f: &mut Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(area);

        self.draw_form(f, cols[0]);
        self.draw_tasks(f, cols[1]);
    }

    fn draw_form(&self, f: &mut Frame<'_>, area: Rect) {
        let focused = self.input_mode == InputMode::Form;
        let border = if focused { FG_ACCENT } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("➕ New Task"))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(BG_PANEL));
        let inner = inset_rect(block.inner(area), 1);
        f.render_widget(block, area);

        let form = self.view.form();
        let (lines, cursor) = form_lines(form, focused);
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .style(Style::default().bg(BG_PANEL)),
            inner,
        );

        if let Some((col, row)) = cursor {
            if row < inner.height && col < inner.width {
                f.set_cursor(inner.x + col, inner.y + row);
            }
        }
    }

    fn draw_tasks(&mut self, f: &mut Frame<'_>, area: Rect) {
        let error_height = u16::from(self.view.error().is_some());
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(error_height),
                Constraint::Min(3),
            ])
            .split(area);

        self.draw_filter_tabs(f, rows[0]);
        if let Some(error) = self.view.error() {
            f.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("⚠️  {}", error),
                    Style::default().fg(Color::Red),
                )))
                .style(Style::default().bg(BG_BASE)),
                rows[1],
            );
        }

        if self.view.is_loading() {
            self.draw_placeholder(f, rows[2], vec![Line::from(LOADING_TEXT)]);
        } else if self.view.tasks().is_empty() {
            let lines = vec![
                Line::from(Span::styled(
                    self.view.empty_message(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::default(),
                Line::from(Span::styled(
                    "Press 'a' to add a task or 'r' to reload.",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            self.draw_placeholder(f, rows[2], lines);
        } else {
            self.draw_task_table(f, rows[2]);
        }
    }

    fn draw_filter_tabs(&self, f: &mut Frame<'_>, area: Rect) {
        let counts = self.view.counts();
        let titles: Vec<Line> = StatusFilter::ALL
            .iter()
            .map(|filter| Line::from(filter_label(*filter, &counts)))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.view.filter().index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(accent_title("Tasks"))
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, area);
    }

    fn draw_placeholder(&self, f: &mut Frame<'_>, area: Rect, lines: Vec<Line<'static>>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(area);
        f.render_widget(block, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let width = inner.width.min(80).max(1);
        let height = (lines.len() as u16).saturating_add(2).min(inner.height);
        let content_area = centered_rect(width, height, inner);
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .style(Style::default().bg(BG_PANEL)),
            content_area,
        );
    }

    fn draw_task_table(&mut self, f: &mut Frame<'_>, area: Rect) {
        let header = Row::new(vec![
            Cell::from("📝 Task"),
            Cell::from("🏷 Category"),
            Cell::from("🔖 Status"),
            Cell::from("⏰ Deadline"),
            Cell::from("🕒 Created"),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .view
            .tasks()
            .iter()
            .map(|task| self.task_row(task))
            .collect();

        let widths = [
            Constraint::Percentage(40),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(17),
            Constraint::Length(17),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn task_row(&self, task: &Task) -> Row<'static> {
        let row_state = self.view.row(&task.id);
        let busy = row_state.is_some_and(|row| row.is_busy());
        let marker = if busy {
            "⏳ "
        } else if task.is_completed() {
            "✔ "
        } else {
            "  "
        };

        let mut lines = vec![Line::from(vec![
            Span::raw(marker),
            Span::styled(
                task.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])];
        if let Some(first) = task.description.lines().next() {
            lines.push(Line::from(Span::styled(
                format!("   {}", first),
                Style::default().fg(Color::DarkGray),
            )));
        }
        if let Some(error) = row_state.and_then(|row| row.error()) {
            lines.push(Line::from(Span::styled(
                format!("   ⚠️  {}", error),
                Style::default().fg(Color::Red),
            )));
        }
        let height = lines.len() as u16;

        let deadline = task
            .deadline_at()
            .map(|dt| format_timestamp(Some(dt)))
            .or_else(|| task.deadline.clone())
            .unwrap_or_default();

        Row::new(vec![
            Cell::from(Text::from(lines)),
            Cell::from(task.category.label().to_string()).style(category_style(&task.category)),
            Cell::from(task.status.label().to_string()).style(status_style(&task.status)),
            Cell::from(deadline),
            Cell::from(format_timestamp(task.created_at())),
        ])
        .height(height)
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.style())])
        } else {
            Line::from(vec![Span::raw("Ready")])
        };

        f.render_widget(Paragraph::new(status_line), lines[0]);

        let help = match self.input_mode {
            InputMode::Normal => {
                "nav: tab/shift+tab filter | 1-3 jump | j/k move | q quit | actions: a add ✚ | d done ✅ | x delete 🗑️ | r reload 🔄 | h help ❔"
            }
            InputMode::Form => {
                "tab/shift+tab field | ←/→ category | shift+enter newline | enter create ✍️ | esc back"
            }
            InputMode::Help => "Enter/Esc to close ❔",
            InputMode::ConfirmDelete => "←/→ choose • y/n answer • Enter confirm • Esc cancel",
        };

        let help_line = Line::from(vec![Span::styled(
            help,
            Style::default().fg(Color::DarkGray),
        )]);
        f.render_widget(Paragraph::new(help_line), lines[1]);
    }

    fn draw_help_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = build_help_lines();
        let width = min(area.width.saturating_sub(10), 80);
        let height = min(lines.len() as u16 + 4, area.height.saturating_sub(2)).max(10);
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("⌨️ Keyboard Reference"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        if inner.width < 3 || inner.height < 3 {
            return;
        }

        let help_lines: Vec<Line> = lines
            .into_iter()
            .map(|(combo, desc)| {
                Line::from(vec![
                    Span::styled(format!("{:<18}", combo), Style::default().fg(Color::Cyan)),
                    Span::raw(desc),
                ])
            })
            .collect();

        f.render_widget(
            Paragraph::new(help_lines)
                .wrap(Wrap { trim: true })
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }

    fn draw_confirm_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(20), 60).max(40);
        let popup_area = centered_rect(width, 8, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("🗑 Confirm Deletion"))
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let task_title = self
            .pending_delete
            .as_ref()
            .and_then(|id| self.view.task(id))
            .map(|task| task.title.as_str())
            .unwrap_or("selected task");

        let yes_style = if self.confirm_choice == ConfirmChoice::Yes {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };
        let no_style = if self.confirm_choice == ConfirmChoice::No {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let lines = vec![
            Line::from(Span::styled(DELETE_PROMPT, Style::default().fg(Color::White))),
            Line::from(Span::styled(
                format!("'{}'", task_title),
                Style::default().fg(Color::Red),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("  Yes  ", yes_style),
                Span::raw("    "),
                Span::styled("  No  ", no_style),
            ]),
        ];

        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }
}

fn placeholder(field: FormField) -> &'static str {
    match field {
        FormField::Title => "Task title",
        FormField::Description => "What needs to be done?",
        FormField::Category => "Select a category",
        FormField::Deadline => "YYYY-MM-DDTHH:MM",
    }
}

/// Lines of the form panel, plus the cursor cell (column, row) relative to
/// the panel when a text field has focus.
fn form_lines(form: &TaskForm, focused: bool) -> (Vec<Line<'static>>, Option<(u16, u16)>) {
    let mut lines = Vec::new();
    let mut cursor = None;
    let indent = " ".repeat(FORM_INDENT as usize);

    for field in FormField::ALL {
        let active = focused && form.focus() == field;
        let label_style = if active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if active { "▸ " } else { "  " };
        lines.push(Line::from(Span::styled(
            format!("{}{}", marker, field.label()),
            label_style,
        )));

        match form.text_field(field) {
            Some(text) => {
                if active {
                    let before = text.before_cursor();
                    let row = lines.len() + before.matches('\n').count();
                    let col = before.rsplit('\n').next().unwrap_or("").chars().count();
                    cursor = Some((FORM_INDENT + col as u16, row as u16));
                }
                if text.as_str().is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("{}{}", indent, placeholder(field)),
                        Style::default().fg(Color::DarkGray),
                    )));
                } else {
                    for value in text.as_str().split('\n') {
                        lines.push(Line::from(format!("{}{}", indent, value)));
                    }
                }
            }
            None => {
                let line = match form.category() {
                    Some(category) => Line::from(vec![
                        Span::raw(indent.clone()),
                        Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
                        Span::styled(category.label().to_string(), category_style(category)),
                        Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
                    ]),
                    None => Line::from(Span::styled(
                        format!("{}{}", indent, placeholder(field)),
                        Style::default().fg(Color::DarkGray),
                    )),
                };
                lines.push(line);
            }
        }
        lines.push(Line::default());
    }

    if let Some(error) = form.error() {
        lines.push(Line::from(Span::styled(
            format!("⚠️  {}", error),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::default());
    }

    let button = if form.is_submitting() {
        Span::styled("Creating...", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            "[ Enter ] Create Task",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    };
    lines.push(Line::from(button));

    (lines, cursor)
}
