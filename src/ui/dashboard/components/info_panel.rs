//! Dashboard info panel component
//!
//! Renders connection details and service health

use crate::environment::Environment;

use super::super::state::DashboardState;
use super::super::utils::tone_color;
use ratatui::Frame;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

/// Render info panel with API details and per-service status.
pub fn render_info_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let mut info_lines = Vec::new();

    // Environment with color coding
    let env_color = match state.environment {
        Environment::Local => Color::Green,
        Environment::Custom { api_url: _ } => Color::Yellow,
    };
    info_lines.push(Line::from(vec![Span::styled(
        format!("API: {}", state.environment.api_url()),
        Style::default().fg(env_color),
    )]));

    info_lines.push(Line::from(vec![Span::styled(
        format!("Refresh: every {}s", state.refresh_interval.as_secs()),
        Style::default().fg(Color::LightBlue),
    )]));

    let uptime = state.start_time.elapsed().as_secs();
    let uptime_string = if uptime >= 3600 {
        format!(
            "Uptime: {}h {}m {}s",
            uptime / 3600,
            (uptime % 3600) / 60,
            uptime % 60
        )
    } else {
        format!("Uptime: {}m {}s", uptime / 60, uptime % 60)
    };
    info_lines.push(Line::from(vec![Span::styled(
        uptime_string,
        Style::default().fg(Color::LightGreen),
    )]));

    info_lines.push(Line::from(vec![Span::styled(
        format!(
            "Cycles: {}  Failed fetches: {}",
            state.cycles_completed, state.failed_fetches
        ),
        Style::default().fg(Color::LightYellow),
    )]));

    info_lines.push(Line::from(""));

    let status = &state.view.system_status;
    info_lines.push(Line::from(vec![
        Span::styled("Services: ", Style::default().fg(Color::Gray)),
        Span::styled(
            status.text.as_str(),
            Style::default()
                .fg(tone_color(status.tone))
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    for service in &state.view.services {
        let color = if service.up {
            Color::LightGreen
        } else {
            Color::LightRed
        };
        info_lines.push(Line::from(vec![
            Span::styled("● ", Style::default().fg(color)),
            Span::raw(service.name.as_str()),
        ]));
    }

    let border_color = if status.is_error() {
        Color::Red
    } else {
        Color::Cyan
    };
    let info_block = Block::default()
        .title("SYSTEM STATUS")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .padding(Padding::horizontal(1));

    let info_paragraph = Paragraph::new(info_lines)
        .block(info_block)
        .wrap(Wrap { trim: true });
    f.render_widget(info_paragraph, area);
}
