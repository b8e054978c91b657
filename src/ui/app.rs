//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::consts::dashboard_consts::labels;
use crate::controller::RefreshHandle;
use crate::environment::Environment;
use crate::events::Event as RefreshEvent;
use crate::ui::dashboard::{DashboardState, EmergencyRequest, render_dashboard};
use crate::ui::splash::render_splash;
use crossterm::event::{self, Event, KeyCode};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
    pub refresh_interval: Duration,
}

impl UIConfig {
    pub fn new(with_background_color: bool, refresh_interval: Duration) -> Self {
        Self {
            with_background_color,
            refresh_interval,
        }
    }
}

/// The different screens in the application.
#[derive(Debug)]
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Dashboard screen displaying the latest refresh.
    Dashboard(Box<DashboardState>),
}

/// Application state
pub struct App {
    /// The start time of the application, used for computing uptime.
    start_time: Instant,

    /// The API the dashboard polls.
    environment: Environment,

    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Source of view snapshots and manual retries.
    refresh: RefreshHandle,

    /// Receives events from the refresh tasks.
    event_receiver: mpsc::Receiver<RefreshEvent>,

    /// Broadcasts shutdown signal to the polling task.
    shutdown_sender: broadcast::Sender<()>,

    ui_config: UIConfig,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        environment: Environment,
        refresh: RefreshHandle,
        event_receiver: mpsc::Receiver<RefreshEvent>,
        shutdown_sender: broadcast::Sender<()>,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            start_time: Instant::now(),
            environment,
            current_screen: Screen::Splash,
            refresh,
            event_receiver,
            shutdown_sender,
            ui_config,
        }
    }

    fn show_dashboard(&mut self) {
        self.current_screen = Screen::Dashboard(Box::new(DashboardState::new(
            self.environment.clone(),
            self.start_time,
            self.ui_config.clone(),
        )));
    }

    /// Hides the overlay and refreshes once, without blocking the UI loop.
    fn retry(&self) {
        let refresh = self.refresh.clone();
        tokio::spawn(async move {
            refresh.retry_load().await;
        });
    }

    /// Sends a confirmed emergency-stop change in the background.
    fn change_emergency(&self, request: EmergencyRequest) {
        let refresh = self.refresh.clone();
        tokio::spawn(async move {
            // Failures are logged and reported as events by the handle.
            let _ = match request {
                EmergencyRequest::Stop => {
                    refresh
                        .activate_emergency(Some(labels::MANUAL_STOP_REASON.to_string()))
                        .await
                }
                EmergencyRequest::Resume => refresh.deactivate_emergency().await,
            };
        });
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(2);

    // UI event loop
    loop {
        // Queue all incoming events for processing
        while let Ok(event) = app.event_receiver.try_recv() {
            if let Screen::Dashboard(state) = &mut app.current_screen {
                state.add_event(event);
            }
        }

        if let Screen::Dashboard(state) = &mut app.current_screen {
            state.update(app.refresh.snapshot());
        }
        terminal.draw(|f| render(f, &app.current_screen))?;

        // Handle splash-to-dashboard transition
        if let Screen::Splash = app.current_screen {
            if splash_start.elapsed() >= splash_duration {
                app.show_dashboard();
                continue;
            }
        }

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                // An open confirmation takes the key: 'y' confirms, anything else cancels
                if let Screen::Dashboard(state) = &mut app.current_screen {
                    if state.emergency_prompt.is_some() {
                        let confirmed = if matches!(key.code, KeyCode::Char('y' | 'Y')) {
                            state.confirm_emergency()
                        } else {
                            state.cancel_emergency();
                            None
                        };
                        if let Some(request) = confirmed {
                            app.change_emergency(request);
                        }
                        continue;
                    }
                }

                // Handle exit events
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    // Send shutdown signal to the polling task
                    let _ = app.shutdown_sender.send(());
                    return Ok(());
                }

                match &mut app.current_screen {
                    Screen::Splash => {
                        // Any key press will skip the splash screen
                        app.show_dashboard();
                    }
                    Screen::Dashboard(state) => match key.code {
                        KeyCode::Char('r' | 'R') => app.retry(),
                        KeyCode::Char('e' | 'E') => {
                            state.request_emergency_toggle();
                        }
                        _ => {}
                    },
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, screen: &Screen) {
    match screen {
        Screen::Splash => render_splash(f),
        Screen::Dashboard(state) => render_dashboard(f, state),
    }
}
