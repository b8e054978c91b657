//! One-shot snapshot mode

use super::setup::build_controller;
use crate::config::Config;
use crate::controller::{RefreshController, RefreshReport};
use crate::events::EventSender;
use crate::logging::init_console_logger;
use crate::view::DashboardView;
use std::error::Error;

/// Runs a single refresh cycle and prints every element of the view.
///
/// Section failures are part of the output, not an error.
pub async fn run_snapshot(config: Config) -> Result<(), Box<dyn Error>> {
    init_console_logger();
    let controller = build_controller(&config, EventSender::disabled())?;
    let (view, report) = take_snapshot(&controller).await;
    print!("{}", format_snapshot(&view, &report));
    Ok(())
}

/// One full cycle, chart included, without arming the timer.
pub async fn take_snapshot(controller: &RefreshController) -> (DashboardView, RefreshReport) {
    controller.ensure_chart();
    let report = controller.load_all_data().await;
    (controller.snapshot(), report)
}

/// Plain-text rendering of the view, one element per line.
pub fn format_snapshot(view: &DashboardView, report: &RefreshReport) -> String {
    let mut out = String::new();
    for (id, text) in view.text_snapshot() {
        if text.is_empty() {
            continue;
        }
        let text = text.replace('\n', "\n    ");
        out.push_str(&format!("{:<15} {}\n", id.as_str(), text));
    }
    if !report.failed.is_empty() {
        let failed: Vec<String> = report.failed.iter().map(ToString::to_string).collect();
        out.push_str(&format!("{:<15} {}\n", "failedSections", failed.join(", ")));
    }
    out
}
