//! Health Check Endpoints
//!
//! - /Ping - Liveness probe, no dependency checks
//! - /Pong - Readiness probe, one line per registered checker plus a UTC timestamp

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, routing::get, Router};
use chrono::{DateTime, Utc};

/// Timestamp format of the readiness report.
pub const PONG_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Ok,
    Failed,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Ok => f.write_str("Ok"),
            HealthStatus::Failed => f.write_str("Failed"),
        }
    }
}

/// Health check dependencies
#[async_trait]
pub trait HealthChecker: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> HealthStatus;
}

/// Calls every registered checker in registration order.
#[derive(Default, Clone)]
pub struct HealthAggregator {
    checkers: Vec<Arc<dyn HealthChecker>>,
}

impl HealthAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, checker: Arc<dyn HealthChecker>) -> Self {
        self.checkers.push(checker);
        self
    }

    pub async fn check_all(&self) -> Vec<(String, HealthStatus)> {
        let mut results = Vec::with_capacity(self.checkers.len());
        for checker in &self.checkers {
            results.push((checker.name().to_string(), checker.check().await));
        }
        results
    }

    /// `name: status` lines followed by the timestamp.
    pub async fn report(&self, now: DateTime<Utc>) -> String {
        let mut lines: Vec<String> = self
            .check_all()
            .await
            .into_iter()
            .map(|(name, status)| format!("{}: {}", name, status))
            .collect();
        lines.push(now.format(PONG_TIMESTAMP_FORMAT).to_string());
        lines.join("\n")
    }
}

/// Liveness probe
pub async fn ping() -> &'static str {
    "Ok"
}

/// Readiness probe
pub async fn pong(State(health): State<Arc<HealthAggregator>>) -> String {
    health.report(Utc::now()).await
}

pub fn health_router(health: Arc<HealthAggregator>) -> Router {
    Router::new()
        .route("/Ping", get(ping))
        .route("/Pong", get(pong))
        .with_state(health)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Fixed(&'static str, HealthStatus);

    #[async_trait]
    impl HealthChecker for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        async fn check(&self) -> HealthStatus {
            self.1
        }
    }

    #[tokio::test]
    async fn test_report_format() {
        let aggregator = HealthAggregator::new()
            .register(Arc::new(Fixed("Database", HealthStatus::Ok)))
            .register(Arc::new(Fixed("Codes", HealthStatus::Failed)));

        let now = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            aggregator.report(now).await,
            "Database: Ok\nCodes: Failed\n07.03.2024 09:05:01"
        );
    }

    #[tokio::test]
    async fn test_empty_report_is_timestamp_only() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(HealthAggregator::new().report(now).await, "31.12.2024 23:59:59");
    }

    #[tokio::test]
    async fn test_ping() {
        assert_eq!(ping().await, "Ok");
    }
}
