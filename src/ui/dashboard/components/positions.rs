//! Positions table component

use super::super::state::DashboardState;
use super::super::utils::tone_color;
use crate::consts::dashboard_consts::labels;
use crate::view::PositionsTable;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table};

pub fn render_positions(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title("POSITIONS")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    let rows = match &state.view.positions_table {
        PositionsTable::Loading => {
            let p = Paragraph::new(labels::LOADING)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(p, area);
            return;
        }
        PositionsTable::Empty => {
            let p = Paragraph::new(labels::NO_OPEN_POSITION)
                .style(Style::default().fg(Color::Gray))
                .block(block);
            f.render_widget(p, area);
            return;
        }
        PositionsTable::Rows(rows) => rows,
    };

    let table_rows = rows.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.symbol.as_str()),
            Cell::from(row.quantity.as_str()),
            Cell::from(row.entry_price.as_str()),
            Cell::from(row.current_price.as_str()),
            Cell::from(row.pnl.as_str()).style(Style::default().fg(tone_color(row.pnl_tone))),
        ])
    });

    let header = Row::new(vec!["심볼", "수량", "진입가", "현재가", "손익"]).style(
        Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}
