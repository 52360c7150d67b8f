use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
    Frame,
};
use crate::models::Priority;
use super::app::{App, InputMode, ViewMode};

fn priority_style(p: Priority) -> Style {
    match p {
        Priority::High => Style::default().fg(Color::Red),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Green),
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stats
            Constraint::Min(0),    // Table + activity
            Constraint::Length(3), // Status / help
        ])
        .split(f.area());

    let stats = Paragraph::new(app.engine.stats().to_string())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("DevList"));
    f.render_widget(stats, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(34)])
        .split(chunks[1]);

    let header_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let highlight = Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray);

    match app.view_mode {
        ViewMode::Active => {
            let rows: Vec<Row> = app
                .engine
                .list_active()
                .iter()
                .map(|t| {
                    Row::new(vec![
                        Cell::from(if t.done { "[x]" } else { "[ ]" }),
                        Cell::from(t.name.clone()),
                        Cell::from(t.description.clone()),
                        Cell::from(t.date_added.clone()),
                        Cell::from(t.priority.to_string()),
                    ])
                    .style(priority_style(t.priority))
                })
                .collect();

            let widths = [
                Constraint::Length(4),
                Constraint::Min(20),
                Constraint::Min(20),
                Constraint::Length(12),
                Constraint::Length(8),
            ];

            let table = Table::new(rows, widths)
                .header(Row::new(vec!["", "Task Name", "Description", "Date Added", "Priority"])
                    .style(header_style)
                    .bottom_margin(1))
                .block(Block::default().borders(Borders::ALL).title("Active Tasks"))
                .row_highlight_style(highlight)
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, body[0], &mut app.state);
        }
        ViewMode::Finished => {
            let rows: Vec<Row> = app
                .engine
                .list_finished()
                .iter()
                .map(|t| {
                    Row::new(vec![
                        Cell::from(t.name.clone()),
                        Cell::from(t.description.clone()),
                        Cell::from(t.date_added.clone()),
                        Cell::from(t.priority.to_string()),
                    ])
                    .style(Style::default().fg(Color::Gray))
                })
                .collect();

            let widths = [
                Constraint::Min(20),
                Constraint::Min(20),
                Constraint::Length(12),
                Constraint::Length(8),
            ];

            let table = Table::new(rows, widths)
                .header(Row::new(vec!["Task Name", "Description", "Date Added", "Priority"])
                    .style(header_style)
                    .bottom_margin(1))
                .block(Block::default().borders(Borders::ALL).title("Completed Tasks"))
                .row_highlight_style(highlight)
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, body[0], &mut app.finished_state);
        }
    }

    let activity: Vec<ListItem> = app
        .activity
        .borrow()
        .iter()
        .map(|l| ListItem::new(l.clone()))
        .collect();
    let activity = List::new(activity)
        .block(Block::default().borders(Borders::ALL).title("Activity"));
    f.render_widget(activity, body[1]);

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Active => "q: Quit | a: Add | c: Category | Space: Done | d: Del | n: Process Next | u: Undo | s: Sort Date | p: Sort Priority | f: Completed",
            ViewMode::Finished => "q: Quit | u: Undo | n: Process Next | f: Active Tasks",
        },
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
        InputMode::Category => "Up/Down: Choose | Enter: Add Tasks | Esc: Cancel",
    };
    let footer = if app.status.is_empty() {
        help_text.to_string()
    } else {
        format!("{} | {}", app.status, help_text)
    };

    let help = Paragraph::new(footer)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[2]);

    match app.input_mode {
        InputMode::Adding => {
            let area = centered_rect(60, 3, f.area());
            f.render_widget(Clear, area);

            let title = match app.add_state.step {
                0 => "Add Task: Enter Name",
                1 => "Add Task: Enter Description (Optional)",
                2 => "Add Task: Enter Priority (High/Medium/Low)",
                _ => "Add Task",
            };

            let input = Paragraph::new(app.input_buffer.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title(title));

            f.render_widget(input, area);
        }
        InputMode::Category => {
            let height = app.catalog.categories.len() as u16 + 2;
            let area = centered_rect(40, height, f.area());
            f.render_widget(Clear, area);

            let items: Vec<ListItem> = app
                .catalog
                .categories
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    let label = format!("{} ({} tasks)", c.name, c.tasks.len());
                    if i == app.category_index {
                        ListItem::new(format!(">> {label}")).style(highlight)
                    } else {
                        ListItem::new(format!("   {label}"))
                    }
                })
                .collect();

            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title("Preloaded Categories"));
            f.render_widget(list, area);
        }
        InputMode::Normal => {}
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height - height) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
