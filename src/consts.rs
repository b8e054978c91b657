pub mod dashboard_consts {
    //! Dashboard Configuration Constants
    //!
    //! Defaults and fixed display strings, organized by functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum number of buffered events between the controller and the UI.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// Base URL of a backend running on this machine.
    pub const DEFAULT_API_URL: &str = "http://localhost:8502";

    /// Timeout applied to connect and to each whole request (seconds).
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Polling configuration
    pub mod refresh {
        /// Interval between refresh cycles (milliseconds).
        pub const DEFAULT_INTERVAL_MS: u64 = 10_000;

        /// Shortest interval accepted from configuration (milliseconds).
        pub const MIN_INTERVAL_MS: u64 = 1_000;
    }

    // =============================================================================
    // DISPLAY STRINGS
    // =============================================================================

    /// Localized labels written into the view.
    pub mod labels {
        /// Shown in a section's value cells when its fetch fails.
        pub const ERROR_INDICATOR: &str = "오류";
        /// Overlay message when the refresh cycle itself fails.
        pub const REFRESH_FAILED: &str = "데이터 갱신 중 오류가 발생했습니다.";
        /// Positions table placeholder.
        pub const NO_OPEN_POSITION: &str = "오픈 포지션 없음";
        pub const PROFIT_ZONE: &str = "수익 구간";
        pub const LOSS_ZONE: &str = "손실 구간";
        pub const LAST_UPDATED_PREFIX: &str = "마지막 업데이트";
        /// Placeholder for cells that have not been rendered yet.
        pub const LOADING: &str = "...";
        /// Placeholder for a missing table value.
        pub const MISSING: &str = "-";
        /// Chart series label.
        pub const CHART_SERIES: &str = "김프율 (%)";
        /// Emergency stop is off and auto-trading runs.
        pub const SYSTEM_ACTIVE: &str = "SYSTEM ACTIVE";
        /// Emergency stop is on.
        pub const SYSTEM_STOPPED: &str = "STOPPED";
        /// Reason sent when the stop is triggered from the dashboard.
        pub const MANUAL_STOP_REASON: &str = "dashboard_manual";
    }
}
