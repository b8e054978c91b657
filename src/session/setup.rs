//! Session setup and initialization

use crate::api::DashboardClient;
use crate::config::Config;
use crate::consts::dashboard_consts::EVENT_QUEUE_SIZE;
use crate::controller::{RefreshController, RefreshHandle};
use crate::environment::Environment;
use crate::events::{Event, EventSender};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Event receiver for refresh events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Join handles for background tasks
    pub join_handles: Vec<JoinHandle<()>>,
    /// Shutdown sender to stop polling
    pub shutdown_sender: broadcast::Sender<()>,
    /// Handle for manual retries and view snapshots
    pub refresh: RefreshHandle,
    /// API the session polls
    pub environment: Environment,
    /// Interval between refresh cycles
    pub refresh_interval: Duration,
}

/// Builds a refresh controller polling the configured API.
pub fn build_controller(
    config: &Config,
    events: EventSender,
) -> Result<RefreshController, Box<dyn Error>> {
    let environment = Environment::from_api_url(&config.api_url);
    let client = DashboardClient::new(environment, config.request_timeout())?;
    Ok(RefreshController::new(Arc::new(client), events))
}

/// Sets up a polling session
///
/// This function handles all the common setup required for both TUI and headless modes:
/// 1. Builds the API client and refresh controller
/// 2. Sets up the event and shutdown channels
/// 3. Starts the polling task, which refreshes once and then on every tick
/// 4. Returns session data for mode-specific handling
///
/// # Arguments
/// * `config` - Resolved configuration
///
/// # Returns
/// * `Ok(SessionData)` - Successfully set up session
/// * `Err` - Session setup failed
pub async fn setup_session(config: Config) -> Result<SessionData, Box<dyn Error>> {
    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let mut controller = build_controller(&config, EventSender::new(event_sender))?;
    let refresh = controller.handle();
    let environment = Environment::from_api_url(&config.api_url);
    let refresh_interval = config.refresh_interval();

    // Create shutdown channel - only one shutdown signal needed
    let (shutdown_sender, _) = broadcast::channel(1);
    let mut shutdown_receiver = shutdown_sender.subscribe();

    let polling = tokio::spawn(async move {
        tokio::select! {
            _ = controller.init(refresh_interval) => {}
            _ = shutdown_receiver.recv() => {
                controller.stop().await;
                return;
            }
        }
        let _ = shutdown_receiver.recv().await;
        controller.stop().await;
    });

    Ok(SessionData {
        event_receiver,
        join_handles: vec![polling],
        shutdown_sender,
        refresh,
        environment,
        refresh_interval,
    })
}
