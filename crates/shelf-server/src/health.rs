//! Liveness and readiness checks
//!
//! Readiness pings Postgres. The result is reused for a few seconds so a busy
//! orchestrator does not hold pool connections.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shelf_db::Database;
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    /// Serving, but without a database
    Degraded,
    Down,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseReport {
    pub status: Status,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_connections: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatabaseReport {
    fn not_configured() -> Self {
        Self {
            status: Status::Degraded,
            latency_ms: 0,
            pool_size: None,
            idle_connections: None,
            error: Some("not configured".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Readiness {
    pub status: Status,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub database: DatabaseReport,
    pub checked_at: DateTime<Utc>,
}

impl Readiness {
    pub fn http_status(&self) -> StatusCode {
        if self.status == Status::Down {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::OK
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthConfig {
    pub ping_timeout: Duration,
    /// How long a readiness result is reused
    pub max_age: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            ping_timeout: Duration::from_secs(5),
            max_age: Duration::from_secs(10),
        }
    }
}

pub struct HealthChecker {
    config: HealthConfig,
    started: Instant,
    database: Option<Database>,
    last: Mutex<Option<(Instant, Readiness)>>,
}

impl HealthChecker {
    pub fn new(config: HealthConfig) -> Self {
        Self {
            config,
            started: Instant::now(),
            database: None,
            last: Mutex::new(None),
        }
    }

    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    pub async fn check(&self) -> Readiness {
        // Held across the ping so concurrent checks share one round trip
        let mut last = self.last.lock().await;
        if let Some((at, readiness)) = last.as_ref() {
            if at.elapsed() < self.config.max_age {
                return readiness.clone();
            }
        }

        let database = match &self.database {
            Some(database) => self.ping(database).await,
            None => DatabaseReport::not_configured(),
        };
        let readiness = Readiness {
            status: database.status,
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds: self.started.elapsed().as_secs(),
            database,
            checked_at: Utc::now(),
        };

        *last = Some((Instant::now(), readiness.clone()));
        readiness
    }

    async fn ping(&self, database: &Database) -> DatabaseReport {
        let started = Instant::now();
        let error = match tokio::time::timeout(self.config.ping_timeout, database.ping()).await {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(_) => Some("ping timed out".to_string()),
        };
        if let Some(error) = &error {
            warn!(error = %error, "Database not ready");
        }

        let stats = database.stats();
        DatabaseReport {
            status: if error.is_none() { Status::Ok } else { Status::Down },
            latency_ms: started.elapsed().as_millis() as u64,
            pool_size: Some(stats.size),
            idle_connections: Some(stats.idle),
            error,
        }
    }
}

/// GET /health, GET /health/live
pub async fn liveness() -> &'static str {
    "OK"
}

/// GET /health/ready
pub async fn readiness(State(health): State<Arc<HealthChecker>>) -> (StatusCode, Json<Readiness>) {
    let readiness = health.check().await;
    (readiness.http_status(), Json(readiness))
}
