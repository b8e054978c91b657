//! Dashboard header component
//!
//! Renders the title, last update stamp and the countdown to the next refresh

use super::super::state::DashboardState;
use crate::consts::dashboard_consts::labels;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

/// Render header with title and refresh countdown.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let version = env!("CARGO_PKG_VERSION");
    let last_updated = state
        .view
        .last_updated
        .clone()
        .unwrap_or_else(|| format!("{}: {}", labels::LAST_UPDATED_PREFIX, labels::MISSING));
    let title = Paragraph::new(format!("KIMP DASHBOARD v{}  |  {}", version, last_updated))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let (label, color) = match state.time_until_next_refresh() {
        Some(remaining) if remaining.is_zero() => ("REFRESHING".to_string(), Color::LightGreen),
        Some(remaining) => (
            format!("Next refresh in {}s", remaining.as_secs() + 1),
            Color::LightBlue,
        ),
        None => ("Loading...".to_string(), Color::LightYellow),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .percent(state.refresh_progress_percent())
        .label(label);

    f.render_widget(gauge, header_chunks[1]);
}
