//! Wire types for the dashboard API
//!
//! Every payload is replaced wholesale on each successful fetch. Fields the
//! dashboard treats as optional are `Option` so a missing value is skipped
//! instead of rendered.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Current kimchi premium reading from `/api/kimp/current`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KimpSnapshot {
    /// Premium in percent.
    #[serde(default, rename = "kimp")]
    pub premium_percent: Option<f64>,
    /// USD/KRW exchange rate.
    #[serde(default, rename = "usd_krw")]
    pub usd_krw_rate: Option<f64>,
}

/// One sample of `/api/kimp`, used as chart input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KimpHistoryPoint {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// `None` for a null or missing sample; drawn as a gap.
    #[serde(default, rename = "kimp")]
    pub premium_percent: Option<f64>,
}

/// A single open position row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Position {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default, rename = "pnl")]
    pub pnl_percent: Option<f64>,
}

fn default_symbol() -> String {
    "BTC".to_string()
}

/// Invested amount and open positions from `/api/position`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PositionSummary {
    #[serde(default)]
    pub total_invested_krw: Option<f64>,
    /// `None` when the field is absent, which leaves the table untouched.
    #[serde(default)]
    pub positions: Option<Vec<Position>>,
}

/// Profit and loss figures from `/api/pnl`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PnlSnapshot {
    #[serde(default)]
    pub entry_kimp: Option<f64>,
    #[serde(default)]
    pub breakeven_kimp: Option<f64>,
    #[serde(default, rename = "kimp_profit")]
    pub kimp_profit_percent: Option<f64>,
    #[serde(default, rename = "net_profit")]
    pub net_profit_percent: Option<f64>,
    #[serde(default)]
    pub is_profitable: Option<bool>,
}

/// Overall status reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(from = "String")]
pub enum ServiceHealth {
    #[strum(serialize = "healthy")]
    Healthy,
    #[default]
    #[strum(serialize = "unhealthy")]
    Unhealthy,
}

impl From<String> for ServiceHealth {
    fn from(value: String) -> Self {
        if value == "healthy" {
            ServiceHealth::Healthy
        } else {
            ServiceHealth::Unhealthy
        }
    }
}

/// Dependency liveness from `/api/health`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: ServiceHealth,
    #[serde(default)]
    pub supabase: bool,
    #[serde(default)]
    pub upbit: bool,
    #[serde(default)]
    pub binance: bool,
}

/// Emergency-stop state, returned by the status, activate and deactivate calls.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EmergencyStatus {
    #[serde(default, alias = "is_active")]
    pub active: bool,
    #[serde(default)]
    pub activated_at: Option<String>,
    #[serde(default)]
    pub deactivated_at: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    /// Set when the backend changed state but could not persist it.
    #[serde(default)]
    pub warning: Option<String>,
}

/// Accepts RFC 3339 timestamps and naive ISO-8601 ones, which are taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid timestamp: {}", raw))
    })
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    // Missing fields should deserialize to None rather than failing.
    fn test_missing_fields_are_skipped() {
        let kimp: KimpSnapshot = serde_json::from_str(r#"{"kimp": 1.23}"#).unwrap();
        assert_eq!(kimp.premium_percent, Some(1.23));
        assert_eq!(kimp.usd_krw_rate, None);

        let pnl: PnlSnapshot = serde_json::from_str(r#"{"has_position": false}"#).unwrap();
        assert_eq!(pnl, PnlSnapshot::default());
    }

    #[test]
    fn test_health_status_parsing() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status": "healthy", "upbit": true}"#).unwrap();
        assert_eq!(health.status, ServiceHealth::Healthy);
        assert!(health.upbit);
        assert!(!health.supabase);
        assert!(!health.binance);

        let degraded: HealthStatus = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert_eq!(degraded.status, ServiceHealth::Unhealthy);
    }

    #[test]
    fn test_emergency_status_parsing() {
        let stopped: EmergencyStatus = serde_json::from_str(
            r#"{"success": true, "active": true, "activated_at": "2025-12-17T12:00:00Z", "reason": "Manual activation"}"#,
        )
        .unwrap();
        assert!(stopped.active);
        assert_eq!(stopped.reason.as_deref(), Some("Manual activation"));
        assert_eq!(stopped.warning, None);

        let legacy: EmergencyStatus = serde_json::from_str(r#"{"is_active": true}"#).unwrap();
        assert!(legacy.active);

        let empty: EmergencyStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, EmergencyStatus::default());
    }

    #[test]
    fn test_position_defaults() {
        let summary: PositionSummary = serde_json::from_str(
            r#"{"total_invested_krw": 28500000, "positions": [{"quantity": 0.1}]}"#,
        )
        .unwrap();
        let positions = summary.positions.unwrap();
        assert_eq!(positions[0].symbol, "BTC");
        assert_eq!(positions[0].pnl_percent, None);
    }

    #[test]
    // Both offset-carrying and naive timestamps should be accepted.
    fn test_history_timestamps() {
        let points: Vec<KimpHistoryPoint> = serde_json::from_str(
            r#"[
                {"timestamp": "2025-12-17T12:00:00Z", "kimp": 3.45, "btc_krw": 1.0},
                {"timestamp": "2025-12-17T12:01:00.123456", "kimp": 3.50},
                {"timestamp": "2025-12-17T21:02:00+09:00", "kimp": 3.55}
            ]"#,
        )
        .unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].timestamp.minute(), 1);
        assert_eq!(points[2].timestamp.hour(), 12);
    }

    #[test]
    // Rows with a null or missing premium still decode; the rest of the series survives.
    fn test_history_null_premium_is_kept_as_gap() {
        let points: Vec<KimpHistoryPoint> = serde_json::from_str(
            r#"[
                {"timestamp": "2025-12-17T12:00:00Z", "kimp": 3.45},
                {"timestamp": "2025-12-17T12:01:00Z", "kimp": null},
                {"timestamp": "2025-12-17T12:02:00Z"}
            ]"#,
        )
        .unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].premium_percent, Some(3.45));
        assert_eq!(points[1].premium_percent, None);
        assert_eq!(points[2].premium_percent, None);
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        let result: Result<Vec<KimpHistoryPoint>, _> =
            serde_json::from_str(r#"[{"timestamp": "yesterday", "kimp": 1.0}]"#);
        assert!(result.is_err());
    }
}
