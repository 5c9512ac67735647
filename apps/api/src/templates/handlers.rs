use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::template::{TemplateRow, TemplateWithSlots};
use crate::state::AppState;
use crate::templates::models::{TemplateCreatedResponse, TemplateInput};
use crate::templates::repository;

/// GET /api/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<TemplateRow>>, AppError> {
    Ok(Json(repository::list_templates(&state.db).await?))
}

/// GET /api/templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<Json<TemplateWithSlots>, AppError> {
    let template = repository::get_template_with_slots(&state.db, template_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Template {template_id} not found")))?;
    Ok(Json(template))
}

/// POST /api/templates
pub async fn handle_create_template(
    State(state): State<AppState>,
    Json(input): Json<TemplateInput>,
) -> Result<Json<TemplateCreatedResponse>, AppError> {
    input.validate()?;
    let id = repository::create_template(&state.db, &input).await?;
    Ok(Json(TemplateCreatedResponse {
        message: "Saved successfully".to_string(),
        id,
    }))
}

/// PUT /api/templates/:id
///
/// Rewrites the template row and replaces its whole slot set.
pub async fn handle_update_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
    Json(input): Json<TemplateInput>,
) -> Result<Json<Value>, AppError> {
    input.validate()?;
    if !repository::update_template(&state.db, template_id, &input).await? {
        return Err(AppError::NotFound(format!(
            "Template {template_id} not found"
        )));
    }
    Ok(Json(json!({ "message": "Updated successfully" })))
}

/// DELETE /api/templates/:id
pub async fn handle_delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !repository::delete_template(&state.db, template_id).await? {
        return Err(AppError::NotFound(format!(
            "Template {template_id} not found"
        )));
    }
    Ok(Json(json!({ "message": "Deleted successfully" })))
}
