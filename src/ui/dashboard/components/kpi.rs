//! KPI panels
//!
//! Renders the market, position and P&L value cells

use super::super::state::DashboardState;
use super::super::utils::tone_color;
use crate::view::{Cell, ElementId, Section};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};

/// Render the market and P&L panels side by side.
pub fn render_kpi_section(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_panel(
        f,
        chunks[0],
        state,
        "MARKET",
        &[
            ("김프", ElementId::CurrentKimp),
            ("USD/KRW", ElementId::UsdKrw),
            ("총 투자금", ElementId::TotalInvested),
        ],
    );
    render_panel(
        f,
        chunks[1],
        state,
        "P&L",
        &[
            ("진입 김프", ElementId::EntryKimp),
            ("손익분기 김프", ElementId::BreakevenKimp),
            ("김프 수익", ElementId::KimpProfit),
            ("순수익", ElementId::NetProfit),
            ("상태", ElementId::ProfitStatus),
        ],
    );
}

fn render_panel(
    f: &mut Frame,
    area: Rect,
    state: &DashboardState,
    title: &str,
    rows: &[(&str, ElementId)],
) {
    let lines: Vec<Line> = rows
        .iter()
        .filter_map(|(label, id)| state.view.cell(*id).map(|cell| value_line(label, cell)))
        .collect();

    let failed = rows
        .iter()
        .filter_map(|(_, id)| id.section())
        .any(|section: Section| state.view.section_has_error(section));
    let border_color = if failed { Color::Red } else { Color::Cyan };

    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .padding(Padding::horizontal(1));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn value_line<'a>(label: &'a str, cell: &'a Cell) -> Line<'a> {
    let mut value_style = Style::default().fg(tone_color(cell.tone));
    if cell.loading {
        value_style = value_style.fg(Color::DarkGray);
    } else {
        value_style = value_style.add_modifier(Modifier::BOLD);
    }
    Line::from(vec![
        Span::styled(format!("{:<10} ", label), Style::default().fg(Color::Gray)),
        Span::styled(cell.text.as_str(), value_style),
    ])
}
