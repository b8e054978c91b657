use crate::api::error::ApiError;
use crate::models::{
    EmergencyStatus, HealthStatus, KimpHistoryPoint, KimpSnapshot, PnlSnapshot, PositionSummary,
};

pub(crate) mod client;
pub use client::DashboardClient;
pub mod error;

#[cfg(test)]
use mockall::automock;

/// One method per dashboard resource.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// Base URL requests are sent to.
    fn base_url(&self) -> String;

    /// `GET /api/kimp/current`
    async fn get_current_kimp(&self) -> Result<KimpSnapshot, ApiError>;

    /// `GET /api/kimp`
    async fn get_kimp_history(&self) -> Result<Vec<KimpHistoryPoint>, ApiError>;

    /// `GET /api/position`
    async fn get_position(&self) -> Result<PositionSummary, ApiError>;

    /// `GET /api/pnl`
    async fn get_pnl(&self) -> Result<PnlSnapshot, ApiError>;

    /// `GET /api/health`
    async fn get_health(&self) -> Result<HealthStatus, ApiError>;

    /// `GET /api/emergency/status`
    async fn get_emergency_status(&self) -> Result<EmergencyStatus, ApiError>;

    /// `POST /api/emergency/activate`, halting automated trading.
    async fn activate_emergency(&self, reason: Option<String>) -> Result<EmergencyStatus, ApiError>;

    /// `POST /api/emergency/deactivate`
    async fn deactivate_emergency(&self) -> Result<EmergencyStatus, ApiError>;
}
