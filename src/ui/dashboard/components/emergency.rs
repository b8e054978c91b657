//! Emergency stop panel

use super::super::state::DashboardState;
use super::super::utils::tone_color;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

pub fn render_emergency_panel(f: &mut Frame, area: Rect, state: &DashboardState) {
    let cell = &state.view.emergency_status;
    let hint = match state.view.emergency_stopped {
        Some(true) => "[E] Resume",
        Some(false) => "[E] Stop",
        None => "",
    };

    let lines = vec![
        Line::from(""),
        Line::from(cell.text.as_str()).style(
            Style::default()
                .fg(tone_color(cell.tone))
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(hint).style(Style::default().fg(Color::DarkGray)),
    ];

    let border_color = match state.view.emergency_stopped {
        Some(true) => Color::Red,
        _ if cell.is_error() => Color::Red,
        _ => Color::Yellow,
    };
    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("EMERGENCY")
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(border_color)),
        );
    f.render_widget(panel, area);
}
