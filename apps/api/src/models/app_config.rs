use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// One global setting. Values are free-form JSON owned by the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppConfigRow {
    pub key: String,
    pub value: Value,
    pub updated_at: DateTime<Utc>,
}
