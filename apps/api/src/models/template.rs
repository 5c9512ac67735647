use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateRow {
    pub id: Uuid,
    pub name: String,
    pub base_width: i32,
    pub base_height: i32,
    pub background_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateSlotRow {
    pub id: Uuid,
    pub template_id: Uuid,
    /// `system_label`, `user_input` or `auto_data`.
    pub slot_type: String,
    pub label_text: Option<String>,
    /// Field kind key for `user_input` slots (`win`, `digit_3`, ...).
    pub data_key: Option<String>,
    pub pos_x: f64,
    pub pos_y: f64,
    pub width: f64,
    pub height: f64,
    pub style_config: Value,
    pub z_index: i32,
    pub created_at: DateTime<Utc>,
}

/// A template with its slots embedded, as served to the editor and the ticket renderer.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateWithSlots {
    #[serde(flatten)]
    pub template: TemplateRow,
    pub template_slots: Vec<TemplateSlotRow>,
}
