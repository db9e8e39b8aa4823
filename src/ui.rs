use tuirealm::ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::types::SaveStatus;

pub fn render(frame: &mut Frame<'_>, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_task_list(frame, chunks[1], app);
    render_detail(frame, chunks[2], app);
    render_input(frame, chunks[3], app);
    render_footer(frame, chunks[4], app);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let header = Block::default()
        .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
        .title(" task-board ")
        .title_alignment(Alignment::Left);

    let progress = format!(
        " {}/{} done — {}% ",
        app.completed_count(),
        app.total_count(),
        app.percent()
    );
    let header_right = Block::default()
        .title(progress)
        .title_alignment(Alignment::Right);

    frame.render_widget(header, area);
    frame.render_widget(header_right, area);
}

fn render_task_list(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::LEFT | Borders::RIGHT);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let visible = app.visible_tasks();

    if visible.is_empty() {
        let notice = if app.loading {
            "Loading tasks…"
        } else if app.total_count() > 0 {
            "Focus mode: nothing open"
        } else {
            "No tasks yet — press n to add one"
        };
        let paragraph = Paragraph::new(notice)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, inner_area);
        return;
    }

    // Keep the selected row on screen.
    let height = inner_area.height as usize;
    let scroll_offset = app.selected.saturating_sub(height.saturating_sub(1));

    let mut lines = Vec::new();
    for (index, task) in visible.iter().enumerate().skip(scroll_offset) {
        if lines.len() >= height {
            break;
        }

        let is_selected = index == app.selected;
        let prefix = if is_selected { "▸ " } else { "  " };
        let checkbox = if task.completed { "[x] " } else { "[ ] " };

        let title_style = if task.completed {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default()
        };
        let row_style = if is_selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };

        lines.push(
            Line::from(vec![
                Span::styled(prefix, Style::default().fg(Color::Yellow)),
                Span::styled(
                    checkbox,
                    Style::default().fg(if task.completed {
                        Color::Green
                    } else {
                        Color::White
                    }),
                ),
                Span::styled(task.title.clone(), title_style),
            ])
            .style(row_style),
        );
    }

    frame.render_widget(Paragraph::new(lines), inner_area);
}

fn render_detail(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::LEFT | Borders::RIGHT);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let line = if app.all_done() {
        Line::from(Span::styled(
            " All tasks done ✓",
            Style::default().fg(Color::Green),
        ))
    } else if let Some(task) = app.selected_task() {
        Line::from(Span::styled(
            format!(
                " created {} · updated {}",
                task.created_at.format("%Y-%m-%d %H:%M"),
                task.updated_at.format("%Y-%m-%d %H:%M")
            ),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::default()
    };

    frame.render_widget(Paragraph::new(line), inner_area);
}

fn render_input(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::LEFT | Borders::RIGHT);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let line = match &app.input {
        Some(buffer) => Line::from(vec![
            Span::styled(" New task: ", Style::default().fg(Color::Cyan)),
            Span::raw(buffer.clone()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
            Span::styled(
                "  (Enter to add, Esc to cancel)",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        None => Line::default(),
    };

    frame.render_widget(Paragraph::new(line), inner_area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let status = save_status_label(app.save_status);

    let notice = if let Some(banner) = &app.banner {
        format!(" {status}  ⚠ {banner} ")
    } else {
        let focus = if app.focus_mode { "  [focus] " } else { " " };
        format!(
            " {status}{focus} n: new  space: toggle  d: delete  f: focus  r: reload  q: quit "
        )
    };

    let footer = Block::default()
        .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
        .title(notice)
        .title_alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

fn save_status_label(status: SaveStatus) -> &'static str {
    match status {
        SaveStatus::Idle => "·",
        SaveStatus::Saving => "… saving",
        SaveStatus::Saved => "✓ saved",
        SaveStatus::Error => "✗ error",
    }
}
