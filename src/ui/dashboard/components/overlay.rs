//! Popups
//!
//! The error overlay shown when a refresh cycle breaks down, and the
//! emergency-stop confirmation

use super::super::state::{DashboardState, EmergencyRequest};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

pub fn render_error_overlay(f: &mut Frame, state: &DashboardState) {
    if !state.view.overlay.visible {
        return;
    }

    let area = centered(f.area(), 50, 7);
    let lines = vec![
        Line::from(state.view.overlay.message.as_str()).style(
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from("[R] 다시 시도").style(Style::default().fg(Color::Gray)),
    ];

    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("ERROR")
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Red)),
        );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

/// Confirmation popup for a pending emergency-stop change.
pub fn render_emergency_prompt(f: &mut Frame, state: &DashboardState) {
    let Some(request) = state.emergency_prompt else {
        return;
    };

    let (title, details): (&str, &[&str]) = match request {
        EmergencyRequest::Stop => (
            "CONFIRM EMERGENCY STOP",
            &["New entries will be blocked", "Existing positions remain open"],
        ),
        EmergencyRequest::Resume => ("CONFIRM RESUME", &["Automated trading restarts"]),
    };

    let mut lines = vec![Line::from(title).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];
    lines.extend(details.iter().map(|d| Line::from(format!("• {}", d))));
    lines.push(Line::from(""));
    lines.push(
        Line::from("[Y] Confirm  [any key] Cancel").style(Style::default().fg(Color::Gray)),
    );

    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("EMERGENCY")
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Yellow)),
        );

    let area = centered(f.area(), 50, 8);
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
