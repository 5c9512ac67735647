use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;

/// One slot as sent by the template editor.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotInput {
    #[serde(rename = "type")]
    pub slot_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub data_key: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "empty_style")]
    pub style: Value,
}

/// Body of `POST /api/templates` and `PUT /api/templates/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateInput {
    pub name: String,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub background_url: Option<String>,
    #[serde(default)]
    pub slots: Vec<SlotInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateCreatedResponse {
    pub message: String,
    pub id: Uuid,
}

fn empty_style() -> Value {
    Value::Object(Default::default())
}

impl SlotInput {
    /// Blank keys are stored as NULL.
    pub fn data_key(&self) -> Option<&str> {
        self.data_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

impl TemplateInput {
    pub fn background_url(&self) -> Option<&str> {
        self.background_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name cannot be empty".to_string()));
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(AppError::Validation(format!(
                "template size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.slot_type.trim().is_empty() {
                return Err(AppError::Validation(format!("slot {i} has no type")));
            }
            let geometry = [slot.x, slot.y, slot.width, slot.height];
            if geometry.iter().any(|v| !v.is_finite()) {
                return Err(AppError::Validation(format!(
                    "slot {i} has a non-finite position or size"
                )));
            }
        }
        Ok(())
    }
}
