//! Dashboard state update logic
//!
//! Contains all methods for updating dashboard state from events

use super::state::{DashboardState, EmergencyRequest};

use crate::events::{Event as RefreshEvent, EventType, Source};
use crate::view::DashboardView;

use std::time::{Duration, Instant};

impl DashboardState {
    /// Update the dashboard state with a new tick and view snapshot.
    pub fn update(&mut self, view: DashboardView) {
        self.tick += 1;
        self.view = view;

        // Process all queued events one by one
        while let Some(event) = self.pending_events.pop_front() {
            self.process_event(&event);
            self.add_to_activity_log(event);
        }
    }

    /// Process a single event and update relevant state
    fn process_event(&mut self, event: &RefreshEvent) {
        match (event.source, event.event_type) {
            (Source::Controller, EventType::Refresh) => {
                self.cycles_completed += 1;
                self.set_last_cycle_at(Instant::now());
            }
            (Source::Section(_), EventType::Error) => {
                self.failed_fetches += 1;
            }
            _ => {}
        }
    }

    /// Opens the confirmation prompt for the change that applies to the
    /// current state. Nothing happens while the state is still unknown.
    pub fn request_emergency_toggle(&mut self) -> Option<EmergencyRequest> {
        self.emergency_prompt = match self.view.emergency_stopped {
            Some(true) => Some(EmergencyRequest::Resume),
            Some(false) => Some(EmergencyRequest::Stop),
            None => None,
        };
        self.emergency_prompt
    }

    /// Closes the prompt and hands back the confirmed change.
    pub fn confirm_emergency(&mut self) -> Option<EmergencyRequest> {
        self.emergency_prompt.take()
    }

    pub fn cancel_emergency(&mut self) {
        self.emergency_prompt = None;
    }

    /// Time left until the next scheduled refresh, if one has completed yet.
    pub fn time_until_next_refresh(&self) -> Option<Duration> {
        self.last_cycle_at()
            .map(|at| self.refresh_interval.saturating_sub(at.elapsed()))
    }

    /// Fraction of the current interval already elapsed, in percent.
    pub fn refresh_progress_percent(&self) -> u16 {
        match self.last_cycle_at() {
            Some(at) if !self.refresh_interval.is_zero() => {
                let ratio = at.elapsed().as_secs_f64() / self.refresh_interval.as_secs_f64();
                ((ratio * 100.0) as u16).min(100)
            }
            _ => 0,
        }
    }
}
