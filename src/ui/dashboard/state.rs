//! Dashboard state management
//!
//! Contains the main dashboard state struct

use crate::consts::dashboard_consts::MAX_ACTIVITY_LOGS;
use crate::environment::Environment;
use crate::events::Event as RefreshEvent;
use crate::ui::app::UIConfig;
use crate::view::DashboardView;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Emergency-stop change awaiting confirmation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EmergencyRequest {
    Stop,
    Resume,
}

/// Dashboard state: the latest view snapshot plus UI-only bookkeeping.
#[derive(Debug)]
pub struct DashboardState {
    /// The API being polled.
    pub environment: Environment,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    /// Interval between refresh cycles.
    pub refresh_interval: Duration,
    /// Latest copy of the controller's view.
    pub view: DashboardView,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<RefreshEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<RefreshEvent>,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,

    /// Refresh cycles completed since startup
    pub cycles_completed: u64,
    /// Section fetches that failed since startup
    pub failed_fetches: u64,
    /// When the last refresh cycle completed
    last_cycle_at: Option<Instant>,
    /// Open confirmation prompt, if any
    pub emergency_prompt: Option<EmergencyRequest>,
}

impl DashboardState {
    /// Creates a new instance of the dashboard state.
    pub fn new(environment: Environment, start_time: Instant, ui_config: UIConfig) -> Self {
        Self {
            environment,
            start_time,
            refresh_interval: ui_config.refresh_interval,
            view: DashboardView::new(),
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            with_background_color: ui_config.with_background_color,
            tick: 0,
            cycles_completed: 0,
            failed_fetches: 0,
            last_cycle_at: None,
            emergency_prompt: None,
        }
    }

    pub fn last_cycle_at(&self) -> Option<Instant> {
        self.last_cycle_at
    }

    pub fn set_last_cycle_at(&mut self, at: Instant) {
        self.last_cycle_at = Some(at);
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: RefreshEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: RefreshEvent) {
        self.pending_events.push_back(event);
    }
}
