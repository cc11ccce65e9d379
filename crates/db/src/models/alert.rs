//! ScraperAlert model — persisted circuit-breaker trip record (§4.5, §6).

use chrono::{DateTime, Utc};
use common::SourceSite;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Maintenance,
    CriticalFieldErrorRate,
    SuspiciousUpdateStreak,
    SelectorFailureRate,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScraperAlert {
    pub id: Uuid,
    pub source_site: SourceSite,
    pub alert_type: AlertType,
    pub field_name: Option<String>,
    pub error_count: i32,
    pub error_rate: Option<f64>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CreateScraperAlert {
    pub source_site: SourceSite,
    pub alert_type: AlertType,
    pub field_name: Option<String>,
    pub error_count: i32,
    pub error_rate: Option<f64>,
    pub message: String,
}
