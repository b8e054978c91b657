//! Dashboard Refresh Controller
//!
//! Owns the polling timer and drives the refresh cycle:
//! - fans out one fetch per section and waits for all of them to settle
//! - isolates failures so one section never cancels or corrupts another
//! - stamps "last updated" once every section has settled
//! - raises the error overlay only when the cycle itself breaks

use crate::api::DashboardApi;
use crate::api::error::ApiError;
use crate::consts::dashboard_consts::labels;
use crate::error_classifier::ErrorClassifier;
use crate::events::{EventSender, EventType};
use crate::logging::LogLevel;
use crate::models::EmergencyStatus;
use crate::render::{
    render_chart, render_emergency, render_health, render_kimp, render_last_updated, render_pnl,
    render_position,
};
use crate::view::{DashboardView, Section};
use chrono::Local;
use futures::future::join_all;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

const HISTORY_UNAVAILABLE: &str = "Chart history unavailable";

/// View shared between the refresh tasks and whatever draws it.
pub type SharedView = Arc<Mutex<DashboardView>>;

#[derive(Error, Debug)]
#[error("{section} fetch failed: {source}")]
pub struct SectionError {
    pub section: Section,
    #[source]
    pub source: ApiError,
}

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub succeeded: Vec<Section>,
    pub failed: Vec<Section>,
    /// A fetch task died instead of settling; the overlay is shown.
    pub aborted: bool,
}

impl RefreshReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && !self.aborted
    }
}

/// Cloneable half of the controller: everything a refresh cycle needs.
#[derive(Clone)]
pub struct RefreshHandle {
    api: Arc<dyn DashboardApi>,
    view: SharedView,
    events: EventSender,
    classifier: ErrorClassifier,
    cycles: Arc<AtomicU64>,
}

impl RefreshHandle {
    fn with_view<R>(&self, f: impl FnOnce(&mut DashboardView) -> R) -> R {
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut view)
    }

    /// Copy of the current view.
    pub fn snapshot(&self) -> DashboardView {
        self.with_view(|view| view.clone())
    }

    pub fn base_url(&self) -> String {
        self.api.base_url()
    }

    /// Number of refresh cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    /// Fetches every section concurrently and waits for all of them.
    pub async fn refresh_all(&self) -> RefreshReport {
        self.cycles.fetch_add(1, Ordering::SeqCst);
        log::debug!("Refreshing all data from {}", self.api.base_url());

        let handles: Vec<JoinHandle<Result<(), SectionError>>> = Section::ALL
            .into_iter()
            .map(|section| {
                let handle = self.clone();
                tokio::spawn(async move { handle.fetch_section(section).await })
            })
            .collect();

        let mut report = RefreshReport::default();
        for (section, joined) in Section::ALL.into_iter().zip(join_all(handles).await) {
            match joined {
                Ok(Ok(())) => report.succeeded.push(section),
                Ok(Err(_)) => report.failed.push(section),
                Err(e) => {
                    log::error!("Refresh task for {} did not settle: {}", section, e);
                    report.aborted = true;
                }
            }
        }

        if report.aborted {
            self.show_error(labels::REFRESH_FAILED);
            self.events
                .send_controller_event(
                    labels::REFRESH_FAILED.to_string(),
                    EventType::Error,
                    LogLevel::Error,
                )
                .await;
            return report;
        }

        self.with_view(|view| render_last_updated(view, &Local::now()));

        if report.failed.is_empty() {
            self.events
                .send_controller_event(
                    "All sections refreshed".to_string(),
                    EventType::Refresh,
                    LogLevel::Debug,
                )
                .await;
        } else {
            let failed: Vec<String> = report.failed.iter().map(ToString::to_string).collect();
            log::warn!("Some data fetches failed: {}", failed.join(", "));
            self.events
                .send_controller_event(
                    format!(
                        "Refreshed {} of {} sections, failed: {}",
                        report.succeeded.len(),
                        Section::ALL.len(),
                        failed.join(", ")
                    ),
                    EventType::Refresh,
                    LogLevel::Warn,
                )
                .await;
        }
        report
    }

    /// Alias of [`RefreshHandle::refresh_all`].
    pub async fn load_all_data(&self) -> RefreshReport {
        self.refresh_all().await
    }

    /// Hides the overlay and runs one refresh cycle right away.
    pub async fn retry_load(&self) -> RefreshReport {
        self.hide_error();
        self.refresh_all().await
    }

    pub fn show_error(&self, message: &str) {
        self.with_view(|view| {
            view.overlay.message = message.to_string();
            view.overlay.visible = true;
        });
    }

    pub fn hide_error(&self) {
        self.with_view(|view| view.overlay.visible = false);
    }

    /// Creates the chart so later cycles can fill it.
    pub fn ensure_chart(&self) {
        self.with_view(|view| {
            view.ensure_chart();
        });
    }

    /// Turns the emergency stop on and renders the state the backend reports.
    pub async fn activate_emergency(
        &self,
        reason: Option<String>,
    ) -> Result<EmergencyStatus, ApiError> {
        log::warn!(
            "Requesting emergency stop: {}",
            reason.as_deref().unwrap_or("no reason given")
        );
        let result = self.api.activate_emergency(reason).await;
        self.apply_emergency_change(result, "Emergency stop activated")
            .await
    }

    /// Turns the emergency stop off and renders the state the backend reports.
    pub async fn deactivate_emergency(&self) -> Result<EmergencyStatus, ApiError> {
        log::info!("Requesting emergency stop release");
        let result = self.api.deactivate_emergency().await;
        self.apply_emergency_change(result, "Emergency stop deactivated")
            .await
    }

    async fn apply_emergency_change(
        &self,
        result: Result<EmergencyStatus, ApiError>,
        done: &str,
    ) -> Result<EmergencyStatus, ApiError> {
        let section = Section::Emergency;
        match result {
            Ok(status) => {
                self.with_view(|view| render_emergency(view, &status));
                self.events
                    .send_section_event(
                        section,
                        done.to_string(),
                        EventType::Success,
                        LogLevel::Warn,
                    )
                    .await;
                if let Some(warning) = &status.warning {
                    log::warn!("{}: {}", done, warning);
                    self.events
                        .send_section_event(
                            section,
                            warning.clone(),
                            EventType::Degraded,
                            LogLevel::Warn,
                        )
                        .await;
                }
                Ok(status)
            }
            Err(e) => {
                // The last fetched state stays on screen; the next cycle re-reads it.
                log::error!("Emergency stop change failed: {}", e);
                self.events
                    .send_section_event(section, e.to_string(), EventType::Error, LogLevel::Error)
                    .await;
                Err(e)
            }
        }
    }

    async fn fetch_section(self, section: Section) -> Result<(), SectionError> {
        let result = match section {
            Section::Kimp => self.fetch_kimp().await,
            Section::Position => self
                .api
                .get_position()
                .await
                .map(|data| self.with_view(|view| render_position(view, &data))),
            Section::Pnl => self
                .api
                .get_pnl()
                .await
                .map(|data| self.with_view(|view| render_pnl(view, &data))),
            Section::Health => self
                .api
                .get_health()
                .await
                .map(|data| self.with_view(|view| render_health(view, &data))),
            Section::Emergency => self
                .api
                .get_emergency_status()
                .await
                .map(|data| self.with_view(|view| render_emergency(view, &data))),
        };

        match result {
            Ok(()) => {
                self.events
                    .send_section_event(
                        section,
                        "Updated".to_string(),
                        EventType::Success,
                        LogLevel::Debug,
                    )
                    .await;
                Ok(())
            }
            Err(source) => {
                self.with_view(|view| view.mark_section_error(section));
                let level = self.classifier.classify_fetch_error(&source);
                log::log!(log::Level::from(level), "{} fetch error: {}", section, source);
                self.events
                    .send_section_event(section, source.to_string(), EventType::Error, level)
                    .await;
                Err(SectionError { section, source })
            }
        }
    }

    /// Current snapshot first, then the chart history. A non-2xx history
    /// answer only skips the chart update; a transport or decode failure
    /// fails the whole section.
    async fn fetch_kimp(&self) -> Result<(), ApiError> {
        let data = self.api.get_current_kimp().await?;
        self.with_view(|view| render_kimp(view, &data));

        match self.api.get_kimp_history().await {
            Ok(history) => self.with_view(|view| render_chart(view, &history)),
            Err(e @ ApiError::Http { .. }) => {
                log::warn!("Kimp history fetch error: {}", e);
                self.events
                    .send_section_event(
                        Section::Kimp,
                        format!("{}: {}", HISTORY_UNAVAILABLE, e),
                        EventType::Degraded,
                        self.classifier.classify_fetch_error(&e),
                    )
                    .await;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

/// Decrements the armed-timer count when the timer task ends.
struct ArmedGuard(Arc<AtomicUsize>);

impl Drop for ArmedGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

struct RefreshTimer {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Polling controller with an explicit start/stop lifecycle.
pub struct RefreshController {
    handle: RefreshHandle,
    timer: Option<RefreshTimer>,
    armed: Arc<AtomicUsize>,
}

impl RefreshController {
    pub fn new(api: Arc<dyn DashboardApi>, events: EventSender) -> Self {
        Self {
            handle: RefreshHandle {
                api,
                view: Arc::new(Mutex::new(DashboardView::new())),
                events,
                classifier: ErrorClassifier::new(),
                cycles: Arc::new(AtomicU64::new(0)),
            },
            timer: None,
            armed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn handle(&self) -> RefreshHandle {
        self.handle.clone()
    }

    pub fn snapshot(&self) -> DashboardView {
        self.handle.snapshot()
    }

    /// Refreshes once, then polls every `interval`. Calling it again replaces
    /// the running timer rather than adding a second one.
    pub async fn init(&mut self, interval: Duration) -> RefreshReport {
        self.stop().await;
        log::info!(
            "Initializing dashboard with refresh interval: {}ms",
            interval.as_millis()
        );

        self.handle.ensure_chart();
        let report = self.handle.refresh_all().await;

        let token = CancellationToken::new();
        self.armed.fetch_add(1, Ordering::SeqCst);
        let guard = ArmedGuard(self.armed.clone());
        let handle = tokio::spawn(run_timer(
            self.handle.clone(),
            interval,
            token.clone(),
            guard,
        ));
        self.timer = Some(RefreshTimer { token, handle });
        report
    }

    /// Disarms the timer and waits for its task to finish.
    pub async fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.token.cancel();
            if let Err(e) = timer.handle.await {
                log::warn!("Refresh timer ended abnormally: {}", e);
            }
        }
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Number of timer tasks currently alive.
    pub fn armed_timers(&self) -> usize {
        self.armed.load(Ordering::SeqCst)
    }

    pub async fn refresh_all(&self) -> RefreshReport {
        self.handle.refresh_all().await
    }

    pub async fn load_all_data(&self) -> RefreshReport {
        self.handle.load_all_data().await
    }

    pub async fn retry_load(&self) -> RefreshReport {
        self.handle.retry_load().await
    }

    pub fn show_error(&self, message: &str) {
        self.handle.show_error(message);
    }

    pub fn hide_error(&self) {
        self.handle.hide_error();
    }

    pub fn ensure_chart(&self) {
        self.handle.ensure_chart();
    }

    pub async fn activate_emergency(
        &self,
        reason: Option<String>,
    ) -> Result<EmergencyStatus, ApiError> {
        self.handle.activate_emergency(reason).await
    }

    pub async fn deactivate_emergency(&self) -> Result<EmergencyStatus, ApiError> {
        self.handle.deactivate_emergency().await
    }
}

async fn run_timer(
    handle: RefreshHandle,
    period: Duration,
    token: CancellationToken,
    _guard: ArmedGuard,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                handle.refresh_all().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::events::Source;
    use crate::models::{
        HealthStatus, KimpHistoryPoint, KimpSnapshot, PnlSnapshot, PositionSummary, ServiceHealth,
    };
    use crate::view::{ElementId, PositionsTable, Tone};
    use chrono::Utc;
    use tokio::sync::mpsc;

    fn http_error(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: "boom".to_string(),
        }
    }

    fn kimp() -> KimpSnapshot {
        KimpSnapshot {
            premium_percent: Some(1.23),
            usd_krw_rate: Some(1350.0),
        }
    }

    fn history() -> Vec<KimpHistoryPoint> {
        vec![KimpHistoryPoint {
            timestamp: Utc::now(),
            premium_percent: Some(1.23),
        }]
    }

    fn emergency() -> EmergencyStatus {
        EmergencyStatus::default()
    }

    fn decode_error() -> ApiError {
        ApiError::Decode(serde_json::from_str::<Vec<KimpHistoryPoint>>("<html>").unwrap_err())
    }

    fn position() -> PositionSummary {
        PositionSummary {
            total_invested_krw: Some(28_500_000.0),
            positions: Some(Vec::new()),
        }
    }

    fn pnl() -> PnlSnapshot {
        PnlSnapshot {
            entry_kimp: Some(3.5),
            breakeven_kimp: Some(3.88),
            kimp_profit_percent: Some(0.6),
            net_profit_percent: Some(-0.5),
            is_profitable: Some(false),
        }
    }

    fn health() -> HealthStatus {
        HealthStatus {
            status: ServiceHealth::Healthy,
            supabase: true,
            upbit: true,
            binance: true,
        }
    }

    /// Every endpoint answers successfully, any number of times.
    fn healthy_api() -> MockDashboardApi {
        let mut mock = MockDashboardApi::new();
        mock.expect_base_url()
            .return_const("http://localhost:8502".to_string());
        mock.expect_get_current_kimp().returning(|| Ok(kimp()));
        mock.expect_get_kimp_history().returning(|| Ok(history()));
        mock.expect_get_position().returning(|| Ok(position()));
        mock.expect_get_pnl().returning(|| Ok(pnl()));
        mock.expect_get_health().returning(|| Ok(health()));
        mock.expect_get_emergency_status()
            .returning(|| Ok(emergency()));
        mock
    }

    fn controller(mock: MockDashboardApi) -> RefreshController {
        RefreshController::new(Arc::new(mock), EventSender::disabled())
    }

    #[tokio::test]
    async fn test_refresh_renders_every_section() {
        let controller = controller(healthy_api());
        let report = controller.refresh_all().await;
        assert!(report.is_clean());
        assert_eq!(report.succeeded.len(), Section::ALL.len());

        let view = controller.snapshot();
        assert_eq!(view.text(ElementId::CurrentKimp).unwrap(), "1.23%");
        assert_eq!(view.text(ElementId::UsdKrw).unwrap(), "₩1,350");
        assert_eq!(view.text(ElementId::TotalInvested).unwrap(), "₩28,500,000");
        assert_eq!(view.positions_table, PositionsTable::Empty);
        assert_eq!(view.text(ElementId::NetProfit).unwrap(), "-0.50%");
        assert_eq!(view.net_profit.tone, Tone::Loss);
        assert_eq!(view.text(ElementId::SystemStatus).unwrap(), "4/4 online");
        assert_eq!(
            view.text(ElementId::EmergencyStatus).unwrap(),
            labels::SYSTEM_ACTIVE
        );
        assert!(view.last_updated.is_some());
        // No chart until the controller is initialized.
        assert!(view.chart.is_none());
    }

    #[tokio::test]
    // A non-2xx on any one endpoint marks only that section and keeps the others.
    async fn test_single_section_failure_is_isolated() {
        for failing in Section::ALL {
            let good = controller(healthy_api());
            good.refresh_all().await;
            let baseline = good.snapshot();

            let mut mock = MockDashboardApi::new();
            mock.expect_base_url()
                .return_const("http://localhost:8502".to_string());
            mock.expect_get_kimp_history().returning(|| Ok(history()));
            if failing == Section::Kimp {
                mock.expect_get_current_kimp()
                    .returning(|| Err(http_error(500)));
            } else {
                mock.expect_get_current_kimp().returning(|| Ok(kimp()));
            }
            if failing == Section::Position {
                mock.expect_get_position().returning(|| Err(http_error(404)));
            } else {
                mock.expect_get_position().returning(|| Ok(position()));
            }
            if failing == Section::Pnl {
                mock.expect_get_pnl().returning(|| Err(http_error(502)));
            } else {
                mock.expect_get_pnl().returning(|| Ok(pnl()));
            }
            if failing == Section::Health {
                mock.expect_get_health().returning(|| Err(http_error(503)));
            } else {
                mock.expect_get_health().returning(|| Ok(health()));
            }
            if failing == Section::Emergency {
                mock.expect_get_emergency_status()
                    .returning(|| Err(http_error(500)));
            } else {
                mock.expect_get_emergency_status()
                    .returning(|| Ok(emergency()));
            }

            let controller = controller(mock);
            let report = controller.refresh_all().await;
            assert_eq!(report.failed, vec![failing]);
            assert!(!report.aborted);

            let view = controller.snapshot();
            for section in Section::ALL {
                for id in section.value_cells() {
                    let text = view.text(*id).unwrap();
                    if section == failing {
                        assert_eq!(text, labels::ERROR_INDICATOR, "{}", id.as_str());
                        assert_eq!(view.cell(*id).unwrap().tone, Tone::Error);
                    } else {
                        assert_eq!(Some(text), baseline.text(*id), "{}", id.as_str());
                    }
                }
            }
            // Partial failures still stamp the update time and never raise the overlay.
            assert!(view.last_updated.is_some());
            assert!(!view.overlay.visible);
        }
    }

    #[tokio::test]
    // A failed fetch keeps previously rendered data outside the value cells.
    async fn test_failure_keeps_previous_state() {
        let mut calls = 0;
        let mut mock = MockDashboardApi::new();
        mock.expect_base_url()
            .return_const("http://localhost:8502".to_string());
        mock.expect_get_current_kimp().returning(|| Ok(kimp()));
        mock.expect_get_kimp_history().returning(|| Ok(history()));
        mock.expect_get_pnl().returning(|| Ok(pnl()));
        mock.expect_get_health().returning(|| Ok(health()));
        mock.expect_get_emergency_status()
            .returning(|| Ok(emergency()));
        mock.expect_get_position().returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(position())
            } else {
                Err(http_error(500))
            }
        });

        let controller = controller(mock);
        controller.refresh_all().await;
        let report = controller.refresh_all().await;
        assert_eq!(report.failed, vec![Section::Position]);

        let view = controller.snapshot();
        assert_eq!(view.positions_table, PositionsTable::Empty);
        assert_eq!(
            view.text(ElementId::TotalInvested).unwrap(),
            labels::ERROR_INDICATOR
        );
    }

    /// Healthy endpoints except for the kimp history, which returns `history_error`.
    fn api_with_history_error(history_error: fn() -> ApiError) -> MockDashboardApi {
        let mut mock = MockDashboardApi::new();
        mock.expect_base_url()
            .return_const("http://localhost:8502".to_string());
        mock.expect_get_current_kimp().returning(|| Ok(kimp()));
        mock.expect_get_kimp_history()
            .returning(move || Err(history_error()));
        mock.expect_get_position().returning(|| Ok(position()));
        mock.expect_get_pnl().returning(|| Ok(pnl()));
        mock.expect_get_health().returning(|| Ok(health()));
        mock.expect_get_emergency_status()
            .returning(|| Ok(emergency()));
        mock
    }

    #[tokio::test]
    // A non-2xx history answer skips the chart but keeps the kimp section healthy.
    async fn test_history_status_error_does_not_fail_kimp() {
        let (sender, mut receiver) = mpsc::channel(32);
        let mut controller = RefreshController::new(
            Arc::new(api_with_history_error(|| http_error(500))),
            EventSender::new(sender),
        );
        let report = controller.init(Duration::from_secs(3600)).await;
        controller.stop().await;

        assert!(report.is_clean());
        let view = controller.snapshot();
        assert_eq!(view.text(ElementId::CurrentKimp).unwrap(), "1.23%");
        assert_eq!(view.chart.unwrap().revision, 0);

        drop(controller);
        let mut events = Vec::new();
        while let Some(event) = receiver.recv().await {
            events.push(event);
        }
        assert!(events.iter().any(|e| {
            e.source == Source::Section(Section::Kimp) && e.event_type == EventType::Degraded
        }));
        assert!(!events.iter().any(|e| e.event_type == EventType::Error));
    }

    #[tokio::test]
    // An undecodable history body fails the kimp section like any other fetch error.
    async fn test_history_decode_error_fails_kimp() {
        let mut controller = controller(api_with_history_error(decode_error));
        let report = controller.init(Duration::from_secs(3600)).await;
        controller.stop().await;

        assert_eq!(report.failed, vec![Section::Kimp]);
        assert!(!report.aborted);
        let view = controller.snapshot();
        assert_eq!(
            view.text(ElementId::CurrentKimp).unwrap(),
            labels::ERROR_INDICATOR
        );
        assert_eq!(view.text(ElementId::UsdKrw).unwrap(), labels::ERROR_INDICATOR);
        assert_eq!(view.chart.as_ref().unwrap().revision, 0);
        assert_eq!(view.text(ElementId::TotalInvested).unwrap(), "₩28,500,000");
    }

    #[tokio::test]
    // Initializing twice must leave exactly one armed timer.
    async fn test_reinit_keeps_single_timer() {
        let mut mock = MockDashboardApi::new();
        mock.expect_base_url()
            .return_const("http://localhost:8502".to_string());
        mock.expect_get_current_kimp().times(2).returning(|| Ok(kimp()));
        mock.expect_get_kimp_history()
            .times(2)
            .returning(|| Ok(history()));
        mock.expect_get_position().times(2).returning(|| Ok(position()));
        mock.expect_get_pnl().times(2).returning(|| Ok(pnl()));
        mock.expect_get_health().times(2).returning(|| Ok(health()));
        mock.expect_get_emergency_status()
            .times(2)
            .returning(|| Ok(emergency()));

        let mut controller = controller(mock);
        controller.init(Duration::from_secs(3600)).await;
        controller.init(Duration::from_secs(3600)).await;

        assert!(controller.is_armed());
        assert_eq!(controller.armed_timers(), 1);
        assert_eq!(controller.handle().cycles(), 2);
        // The chart was created once and updated in place by both cycles.
        assert_eq!(controller.snapshot().chart.unwrap().revision, 2);

        controller.stop().await;
        assert!(!controller.is_armed());
        assert_eq!(controller.armed_timers(), 0);
    }

    #[tokio::test]
    async fn test_timer_keeps_polling() {
        let mut controller = controller(healthy_api());
        controller.init(Duration::from_millis(20)).await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        controller.stop().await;

        let cycles = controller.handle().cycles();
        assert!(cycles >= 3, "expected at least 3 cycles, got {}", cycles);
        let settled = controller.handle().cycles();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(controller.handle().cycles(), settled);
    }

    #[tokio::test]
    async fn test_overlay_show_and_hide() {
        let controller = controller(MockDashboardApi::new());
        controller.show_error("연결 실패");
        let view = controller.snapshot();
        assert!(view.overlay.visible);
        assert_eq!(view.text(ElementId::ErrorMessage).unwrap(), "연결 실패");

        controller.hide_error();
        assert!(!controller.snapshot().overlay.visible);
    }

    #[tokio::test]
    // Retry hides the overlay and runs exactly one more fan-out.
    async fn test_retry_load_runs_one_cycle() {
        let mut mock = MockDashboardApi::new();
        mock.expect_base_url()
            .return_const("http://localhost:8502".to_string());
        mock.expect_get_current_kimp().times(1).returning(|| Ok(kimp()));
        mock.expect_get_kimp_history()
            .times(1)
            .returning(|| Ok(history()));
        mock.expect_get_position().times(1).returning(|| Ok(position()));
        mock.expect_get_pnl().times(1).returning(|| Ok(pnl()));
        mock.expect_get_health().times(1).returning(|| Ok(health()));
        mock.expect_get_emergency_status()
            .times(1)
            .returning(|| Ok(emergency()));

        let controller = controller(mock);
        controller.show_error(labels::REFRESH_FAILED);
        let report = controller.retry_load().await;

        assert!(report.is_clean());
        assert_eq!(controller.handle().cycles(), 1);
        assert!(!controller.snapshot().overlay.visible);
    }

    /// Answers every endpoint except P&L, whose task panics.
    struct PanickingPnlApi;

    #[async_trait::async_trait]
    impl DashboardApi for PanickingPnlApi {
        fn base_url(&self) -> String {
            "http://localhost:8502".to_string()
        }

        async fn get_current_kimp(&self) -> Result<KimpSnapshot, ApiError> {
            Ok(kimp())
        }

        async fn get_kimp_history(&self) -> Result<Vec<KimpHistoryPoint>, ApiError> {
            Ok(history())
        }

        async fn get_position(&self) -> Result<PositionSummary, ApiError> {
            Ok(position())
        }

        async fn get_pnl(&self) -> Result<PnlSnapshot, ApiError> {
            panic!("render task crashed")
        }

        async fn get_health(&self) -> Result<HealthStatus, ApiError> {
            Ok(health())
        }

        async fn get_emergency_status(&self) -> Result<EmergencyStatus, ApiError> {
            Ok(emergency())
        }

        async fn activate_emergency(
            &self,
            _reason: Option<String>,
        ) -> Result<EmergencyStatus, ApiError> {
            Ok(emergency())
        }

        async fn deactivate_emergency(&self) -> Result<EmergencyStatus, ApiError> {
            Ok(emergency())
        }
    }

    #[tokio::test]
    // A fetch task that dies instead of settling raises the overlay.
    async fn test_broken_cycle_shows_overlay() {
        let controller = RefreshController::new(Arc::new(PanickingPnlApi), EventSender::disabled());
        let report = controller.refresh_all().await;

        assert!(report.aborted);
        let view = controller.snapshot();
        assert!(view.overlay.visible);
        assert_eq!(view.overlay.message, labels::REFRESH_FAILED);
        assert!(view.last_updated.is_none());
        assert_eq!(view.text(ElementId::CurrentKimp).unwrap(), "1.23%");

        // Manual retry hides the overlay again before the next fan-out.
        controller.hide_error();
        assert!(!controller.snapshot().overlay.visible);
    }

    #[tokio::test]
    async fn test_events_report_failed_sections() {
        let mut mock = MockDashboardApi::new();
        mock.expect_base_url()
            .return_const("http://localhost:8502".to_string());
        mock.expect_get_current_kimp().returning(|| Ok(kimp()));
        mock.expect_get_kimp_history().returning(|| Ok(history()));
        mock.expect_get_position().returning(|| Ok(position()));
        mock.expect_get_pnl().returning(|| Ok(pnl()));
        mock.expect_get_health().returning(|| Err(http_error(503)));
        mock.expect_get_emergency_status()
            .returning(|| Ok(emergency()));

        let (sender, mut receiver) = mpsc::channel(32);
        let controller = RefreshController::new(Arc::new(mock), EventSender::new(sender));
        controller.refresh_all().await;
        drop(controller);

        let mut events = Vec::new();
        while let Some(event) = receiver.recv().await {
            events.push(event);
        }
        assert!(events.iter().any(|e| {
            e.event_type == EventType::Error && e.msg.contains("503") && e.log_level == LogLevel::Warn
        }));
        let summary = events.last().unwrap();
        assert!(summary.msg.contains("failed: health"));
    }

    #[tokio::test]
    async fn test_activate_emergency_renders_stopped() {
        let mut mock = healthy_api();
        mock.expect_activate_emergency()
            .withf(|reason| reason.as_deref() == Some(labels::MANUAL_STOP_REASON))
            .times(1)
            .returning(|reason| {
                Ok(EmergencyStatus {
                    active: true,
                    reason,
                    ..Default::default()
                })
            });

        let (sender, mut receiver) = mpsc::channel(32);
        let controller = RefreshController::new(Arc::new(mock), EventSender::new(sender));
        controller.refresh_all().await;
        let status = controller
            .activate_emergency(Some(labels::MANUAL_STOP_REASON.to_string()))
            .await
            .unwrap();
        assert!(status.active);

        let view = controller.snapshot();
        assert_eq!(view.emergency_stopped, Some(true));
        assert_eq!(view.emergency_status.tone, Tone::Loss);
        assert!(
            view.text(ElementId::EmergencyStatus)
                .unwrap()
                .starts_with(labels::SYSTEM_STOPPED)
        );

        drop(controller);
        let mut events = Vec::new();
        while let Some(event) = receiver.recv().await {
            events.push(event);
        }
        let last = events.last().unwrap();
        assert_eq!(last.source, Source::Section(Section::Emergency));
        assert_eq!(last.event_type, EventType::Success);
    }

    #[tokio::test]
    // A rejected toggle keeps the last known state and reports the error.
    async fn test_failed_emergency_change_keeps_state() {
        let mut mock = healthy_api();
        mock.expect_deactivate_emergency()
            .times(1)
            .returning(|| Err(http_error(500)));

        let controller = controller(mock);
        controller.refresh_all().await;
        let err = controller.deactivate_emergency().await.unwrap_err();
        assert_eq!(err.status(), Some(500));

        let view = controller.snapshot();
        assert_eq!(view.emergency_stopped, Some(false));
        assert_eq!(
            view.text(ElementId::EmergencyStatus).unwrap(),
            labels::SYSTEM_ACTIVE
        );
    }

    #[tokio::test]
    async fn test_unpersisted_emergency_change_is_degraded() {
        let mut mock = MockDashboardApi::new();
        mock.expect_deactivate_emergency().returning(|| {
            Ok(EmergencyStatus {
                warning: Some("State not persisted to database".to_string()),
                ..Default::default()
            })
        });

        let (sender, mut receiver) = mpsc::channel(32);
        let controller = RefreshController::new(Arc::new(mock), EventSender::new(sender));
        controller.deactivate_emergency().await.unwrap();
        drop(controller);

        let mut events = Vec::new();
        while let Some(event) = receiver.recv().await {
            events.push(event);
        }
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].event_type, EventType::Degraded);
        assert!(events[1].msg.contains("not persisted"));
    }
}
