//! Dashboard API Client
//!
//! A thin JSON client for the bot's dashboard endpoints.

use crate::api::DashboardApi;
use crate::api::error::ApiError;
use crate::environment::Environment;
use crate::models::{
    EmergencyStatus, HealthStatus, KimpHistoryPoint, KimpSnapshot, PnlSnapshot, PositionSummary,
};
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

// User-Agent string with dashboard version
const USER_AGENT: &str = concat!("kimp-dashboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    environment: Environment,
}

impl DashboardClient {
    pub fn new(environment: Environment, timeout: Duration) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            environment,
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.environment.api_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn decode_response<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
        serde_json::from_slice(bytes).map_err(ApiError::Decode)
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Self::decode_response(&response_bytes)
    }

    async fn post_request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        log::debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Self::decode_response(&response_bytes)
    }
}

#[async_trait::async_trait]
impl DashboardApi for DashboardClient {
    fn base_url(&self) -> String {
        self.environment.api_url()
    }

    async fn get_current_kimp(&self) -> Result<KimpSnapshot, ApiError> {
        self.get_request("/api/kimp/current").await
    }

    async fn get_kimp_history(&self) -> Result<Vec<KimpHistoryPoint>, ApiError> {
        self.get_request("/api/kimp").await
    }

    async fn get_position(&self) -> Result<PositionSummary, ApiError> {
        self.get_request("/api/position").await
    }

    async fn get_pnl(&self) -> Result<PnlSnapshot, ApiError> {
        self.get_request("/api/pnl").await
    }

    async fn get_health(&self) -> Result<HealthStatus, ApiError> {
        self.get_request("/api/health").await
    }

    async fn get_emergency_status(&self) -> Result<EmergencyStatus, ApiError> {
        self.get_request("/api/emergency/status").await
    }

    async fn activate_emergency(&self, reason: Option<String>) -> Result<EmergencyStatus, ApiError> {
        let query: Vec<(&str, String)> = reason.into_iter().map(|r| ("reason", r)).collect();
        self.post_request("/api/emergency/activate", &query).await
    }

    async fn deactivate_emergency(&self) -> Result<EmergencyStatus, ApiError> {
        self.post_request("/api/emergency/deactivate", &[]).await
    }
}
