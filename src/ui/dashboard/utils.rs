//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Source;
use crate::view::{Section, Tone};
use ratatui::prelude::Color;

/// Get a ratatui color for an event based on where it came from
pub fn get_source_color(source: &Source) -> Color {
    match source {
        Source::Controller => Color::Cyan,
        Source::Section(Section::Kimp) => Color::LightBlue,
        Source::Section(Section::Position) => Color::Yellow,
        Source::Section(Section::Pnl) => Color::LightMagenta,
        Source::Section(Section::Health) => Color::Green,
        Source::Section(Section::Emergency) => Color::LightRed,
    }
}

/// Color for a value's tone
pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Neutral => Color::White,
        Tone::Profit => Color::LightGreen,
        Tone::Loss => Color::LightRed,
        Tone::Error => Color::Red,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    if let Some((date_part, time_part)) = timestamp.split_once(' ') {
        if let (Some(month_day), Some(time)) = (date_part.get(5..10), time_part.get(0..8)) {
            return format!("{} {}", month_day, time);
        }
    }
    // Fallback to original timestamp if parsing fails
    timestamp.to_string()
}

/// Clean HTTP error messages
pub fn clean_http_error_message(msg: &str) -> String {
    if msg.contains("Reqwest error") && msg.contains("timed out") {
        return "Request timed out - retrying next refresh".to_string();
    }
    if msg.contains("Reqwest error") {
        return "Network error - retrying next refresh".to_string();
    }
    msg.to_string()
}
