//! Emergency stop commands
//!
//! Reads or flips the bot's emergency stop without starting a dashboard.

use crate::api::error::ApiError;
use crate::api::{DashboardApi, DashboardClient};
use crate::config::Config;
use crate::consts::dashboard_consts::labels;
use crate::environment::Environment;
use crate::logging::init_console_logger;
use crate::models::EmergencyStatus;
use crate::{print_cmd_info, print_cmd_success, print_cmd_warn};
use std::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmergencyAction {
    Status,
    Stop { reason: Option<String> },
    Resume,
}

pub async fn run_emergency(config: Config, action: EmergencyAction) -> Result<(), Box<dyn Error>> {
    init_console_logger();
    let environment = Environment::from_api_url(&config.api_url);
    let client = DashboardClient::new(environment, config.request_timeout())?;

    let status = execute(&client, action.clone())
        .await
        .map_err(|e| format!("Emergency {} request failed: {}", action_name(&action), e))?;

    match action {
        EmergencyAction::Status => {
            print_cmd_info!("Emergency stop", "{}", describe_status(&status))
        }
        EmergencyAction::Stop { .. } => {
            print_cmd_success!("Emergency stop activated", "{}", describe_status(&status))
        }
        EmergencyAction::Resume => {
            print_cmd_success!("Emergency stop released", "{}", describe_status(&status))
        }
    }
    if let Some(warning) = &status.warning {
        print_cmd_warn!("Backend warning", "{}", warning);
    }
    Ok(())
}

/// Sends the request for `action` and returns the state the backend reports.
pub async fn execute(
    api: &dyn DashboardApi,
    action: EmergencyAction,
) -> Result<EmergencyStatus, ApiError> {
    match action {
        EmergencyAction::Status => api.get_emergency_status().await,
        EmergencyAction::Stop { reason } => {
            let reason = reason.unwrap_or_else(|| labels::MANUAL_STOP_REASON.to_string());
            api.activate_emergency(Some(reason)).await
        }
        EmergencyAction::Resume => api.deactivate_emergency().await,
    }
}

fn action_name(action: &EmergencyAction) -> &'static str {
    match action {
        EmergencyAction::Status => "status",
        EmergencyAction::Stop { .. } => "stop",
        EmergencyAction::Resume => "resume",
    }
}

/// One-line summary, e.g. `STOPPED (reason: maintenance, since 2025-12-17T12:00:00Z)`.
pub fn describe_status(status: &EmergencyStatus) -> String {
    if !status.active {
        return labels::SYSTEM_ACTIVE.to_string();
    }
    let mut details = Vec::new();
    if let Some(reason) = status.reason.as_deref().filter(|r| !r.is_empty()) {
        details.push(format!("reason: {}", reason));
    }
    if let Some(at) = &status.activated_at {
        details.push(format!("since {}", at));
    }
    if details.is_empty() {
        labels::SYSTEM_STOPPED.to_string()
    } else {
        format!("{} ({})", labels::SYSTEM_STOPPED, details.join(", "))
    }
}
