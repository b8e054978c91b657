//! Section renderers
//!
//! Pure functions of (payload, view) that write only the cells their section
//! owns. Absent fields leave the corresponding cell as it was, and rendering
//! the same payload twice yields the same view.

use crate::consts::dashboard_consts::labels;
use crate::models::{
    EmergencyStatus, HealthStatus, KimpHistoryPoint, KimpSnapshot, PnlSnapshot, Position,
    PositionSummary, ServiceHealth,
};
use crate::view::{DashboardView, PositionRow, PositionsTable, ServiceIndicator, Tone};
use chrono::{DateTime, Local, TimeZone, Timelike};

/// `1.234` -> `1.23%`
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// `0.5` -> `+0.50%`, `-0.5` -> `-0.50%`
pub fn format_signed_percent(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, value)
}

/// Thousands separators with at most three fraction digits, trailing zeros dropped.
pub fn format_grouped(value: f64) -> String {
    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(rounded.len() + int_part.len() / 3 + 1);
    let negative = value < 0.0 && rounded.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    if negative {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// `1350` -> `₩1,350`
pub fn format_krw(value: f64) -> String {
    format!("₩{}", format_grouped(value))
}

/// Chart axis label, `H:MM`.
pub fn format_chart_label<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String {
    format!("{}:{:02}", timestamp.hour(), timestamp.minute())
}

pub fn render_kimp(view: &mut DashboardView, data: &KimpSnapshot) {
    if let Some(kimp) = data.premium_percent {
        view.current_kimp.set(format_percent(kimp), Tone::Neutral);
    }
    if let Some(rate) = data.usd_krw_rate {
        view.usd_krw.set(format_krw(rate), Tone::Neutral);
    }
}

pub fn render_position(view: &mut DashboardView, data: &PositionSummary) {
    if let Some(total) = data.total_invested_krw {
        view.total_invested.set(format_krw(total), Tone::Neutral);
    }
    if let Some(positions) = &data.positions {
        render_positions_table(view, positions);
    }
}

pub fn render_positions_table(view: &mut DashboardView, positions: &[Position]) {
    if positions.is_empty() {
        view.positions_table = PositionsTable::Empty;
        return;
    }

    let rows = positions
        .iter()
        .map(|pos| PositionRow {
            symbol: pos.symbol.clone(),
            quantity: pos
                .quantity
                .map(|q| format!("{:.6}", q))
                .unwrap_or_else(|| labels::MISSING.to_string()),
            entry_price: pos
                .entry_price
                .map(format_krw)
                .unwrap_or_else(|| labels::MISSING.to_string()),
            current_price: pos
                .current_price
                .map(format_krw)
                .unwrap_or_else(|| labels::MISSING.to_string()),
            pnl: pos
                .pnl_percent
                .map(format_signed_percent)
                .unwrap_or_else(|| labels::MISSING.to_string()),
            pnl_tone: pos.pnl_percent.map(Tone::for_value).unwrap_or_default(),
        })
        .collect();
    view.positions_table = PositionsTable::Rows(rows);
}

pub fn render_pnl(view: &mut DashboardView, data: &PnlSnapshot) {
    if let Some(entry) = data.entry_kimp {
        view.entry_kimp.set(format_percent(entry), Tone::Neutral);
    }
    if let Some(breakeven) = data.breakeven_kimp {
        view.breakeven_kimp.set(format_percent(breakeven), Tone::Neutral);
    }
    if let Some(profit) = data.kimp_profit_percent {
        view.kimp_profit
            .set(format_signed_percent(profit), Tone::for_value(profit));
    }
    if let Some(net) = data.net_profit_percent {
        view.net_profit
            .set(format_signed_percent(net), Tone::for_value(net));
    }
    match data.is_profitable {
        Some(true) => view.profit_status.set(labels::PROFIT_ZONE, Tone::Profit),
        Some(false) => view.profit_status.set(labels::LOSS_ZONE, Tone::Loss),
        None => {}
    }
}

/// Rebuilds the status panel from scratch.
pub fn render_health(view: &mut DashboardView, data: &HealthStatus) {
    view.services = vec![
        ServiceIndicator {
            name: "Dashboard".to_string(),
            up: data.status == ServiceHealth::Healthy,
        },
        ServiceIndicator {
            name: "Supabase".to_string(),
            up: data.supabase,
        },
        ServiceIndicator {
            name: "Upbit".to_string(),
            up: data.upbit,
        },
        ServiceIndicator {
            name: "Binance".to_string(),
            up: data.binance,
        },
    ];

    let up = view.services.iter().filter(|s| s.up).count();
    let total = view.services.len();
    let tone = if up == total { Tone::Profit } else { Tone::Loss };
    view.system_status
        .set(format!("{}/{} online", up, total), tone);
}

/// `SYSTEM ACTIVE`, or `STOPPED` with the reason when the emergency stop is on.
pub fn render_emergency(view: &mut DashboardView, data: &EmergencyStatus) {
    view.emergency_stopped = Some(data.active);
    if data.active {
        let text = match data.reason.as_deref().filter(|r| !r.is_empty()) {
            Some(reason) => format!("{}: {}", labels::SYSTEM_STOPPED, reason.to_uppercase()),
            None => labels::SYSTEM_STOPPED.to_string(),
        };
        view.emergency_status.set(text, Tone::Loss);
    } else {
        view.emergency_status.set(labels::SYSTEM_ACTIVE, Tone::Profit);
    }
}

/// Replaces the chart series in place; does nothing before the chart exists.
/// Samples without a premium keep their label and become gaps in the line.
pub fn render_chart(view: &mut DashboardView, history: &[KimpHistoryPoint]) {
    let Some(chart) = view.chart.as_mut() else {
        return;
    };
    let labels = history
        .iter()
        .map(|point| format_chart_label(&point.timestamp.with_timezone(&Local)))
        .collect();
    let values = history.iter().map(|point| point.premium_percent).collect();
    chart.replace(labels, values);
}

pub fn render_last_updated<Tz: TimeZone>(view: &mut DashboardView, now: &DateTime<Tz>)
where
    Tz::Offset: std::fmt::Display,
{
    view.last_updated = Some(format!(
        "{}: {}",
        labels::LAST_UPDATED_PREFIX,
        now.format("%H:%M:%S")
    ));
}
