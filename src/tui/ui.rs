//! UI layout and rendering logic for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::app::{App, Field};

/// Render the whole form
pub fn render_ui(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // API key
            Constraint::Length(3), // Document
            Constraint::Length(3), // Question
            Constraint::Min(3),    // Answer
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let title = Paragraph::new(Line::from(Span::styled(
        "DOCQUERY - ask your documents",
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, layout[0]);

    for (field, area) in Field::ALL.into_iter().zip(layout[1..4].iter().copied()) {
        render_field(frame, app, field, area);
    }

    render_output(frame, app, layout[4]);
    render_status_bar(frame, app, layout[5]);
}

fn render_field(frame: &mut Frame, app: &App, field: Field, area: Rect) {
    let input = app.field(field);
    let focused = app.focus == field && !app.is_busy;
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    // Keep the cursor visible on long values.
    let inner_width = area.width.saturating_sub(2) as usize;
    let column = input.cursor_column();
    let offset = column.saturating_sub(inner_width.saturating_sub(1));

    let paragraph = Paragraph::new(input.display())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(field.title()),
        )
        .scroll((0, offset as u16));
    frame.render_widget(paragraph, area);

    if focused {
        let x = area.x + 1 + (column - offset) as u16;
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}

fn render_output(frame: &mut Frame, app: &App, area: Rect) {
    let answer_style = Style::default().fg(Color::Cyan);
    let failure_style = Style::default().fg(Color::Red);

    let lines: Vec<Line> = if app.is_busy {
        vec![Line::styled("Working on it...", answer_style)]
    } else {
        let mut lines = Vec::new();
        for (i, response) in app.output.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            let style = if response.is_answer() { answer_style } else { failure_style };
            lines.extend(response.to_string().lines().map(|l| Line::styled(l.to_string(), style)));
        }
        lines
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("AI response"))
        .wrap(Wrap { trim: false })
        .scroll((app.output_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.is_busy {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(app.status_message.as_str()).style(style), area);
}
