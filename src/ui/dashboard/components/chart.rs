//! Premium history chart component

use super::super::state::DashboardState;
use crate::consts::dashboard_consts::labels;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph};

pub fn render_chart(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(labels::CHART_SERIES)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(chart) = state.view.chart.as_ref().filter(|c| c.has_data()) else {
        f.render_widget(
            Paragraph::new(labels::LOADING)
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    };

    // One dataset per run so null samples break the line.
    let segments = chart.segments();

    let (min, max) = chart
        .values
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let pad = ((max - min) * 0.1).max(0.05);
    let (lo, hi) = (min - pad, max + pad);

    let x_labels: Vec<Span> = match (chart.labels.first(), chart.labels.last()) {
        (Some(first), Some(last)) => vec![Span::raw(first.clone()), Span::raw(last.clone())],
        _ => Vec::new(),
    };

    let datasets: Vec<Dataset> = segments
        .iter()
        .enumerate()
        .map(|(i, points)| {
            let dataset = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::LightCyan))
                .data(points);
            if i == 0 {
                dataset.name(labels::CHART_SERIES)
            } else {
                dataset
            }
        })
        .collect();

    let widget = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, (chart.values.len().saturating_sub(1)).max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([lo, hi])
                .labels(vec![
                    Span::raw(format!("{:.2}", lo)),
                    Span::raw(format!("{:.2}", hi)),
                ]),
        );

    f.render_widget(widget, area);
}
