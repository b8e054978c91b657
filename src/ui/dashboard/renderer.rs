//! Dashboard main renderer

use super::components::{
    chart, emergency, footer, header, info_panel, kpi, logs, overlay, positions,
};
use super::state::DashboardState;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Block;

pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 20, 24))),
            f.area(),
        );
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Fill(1),
            Constraint::Percentage(25),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(f, main_chunks[0], state);

    let kpi_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55),
            Constraint::Percentage(20),
            Constraint::Percentage(25),
        ])
        .split(main_chunks[1]);
    kpi::render_kpi_section(f, kpi_chunks[0], state);
    emergency::render_emergency_panel(f, kpi_chunks[1], state);
    info_panel::render_info_panel(f, kpi_chunks[2], state);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[2]);
    chart::render_chart(f, content_chunks[0], state);
    positions::render_positions(f, content_chunks[1], state);

    logs::render_logs_panel(f, main_chunks[3], state);
    footer::render_footer(f, main_chunks[4]);

    overlay::render_error_overlay(f, state);
    overlay::render_emergency_prompt(f, state);
}
