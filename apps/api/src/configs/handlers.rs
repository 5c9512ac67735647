use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::app_config::AppConfigRow;
use crate::state::AppState;

/// Longest accepted config key.
const MAX_KEY_LEN: usize = 64;

#[derive(Debug, Deserialize)]
pub struct PutConfigRequest {
    pub value: Value,
}

/// GET /api/configs
pub async fn handle_list_configs(
    State(state): State<AppState>,
) -> Result<Json<Vec<AppConfigRow>>, AppError> {
    let rows = sqlx::query_as::<_, AppConfigRow>("SELECT * FROM app_configs ORDER BY key")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(rows))
}

/// GET /api/configs/:key
pub async fn handle_get_config(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AppConfigRow>, AppError> {
    let row = sqlx::query_as::<_, AppConfigRow>("SELECT * FROM app_configs WHERE key = $1")
        .bind(&key)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Config '{key}' not found")))?;
    Ok(Json(row))
}

/// PUT /api/configs/:key
///
/// Creates or replaces the value stored under `key`.
pub async fn handle_put_config(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<PutConfigRequest>,
) -> Result<Json<AppConfigRow>, AppError> {
    validate_key(&key)?;

    let row = sqlx::query_as::<_, AppConfigRow>(
        r#"
        INSERT INTO app_configs (key, value, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(&key)
    .bind(&req.value)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Config '{key}' updated");
    Ok(Json(row))
}

/// Keys are short identifiers: ASCII letters, digits, `_`, `-` and `.`.
fn validate_key(key: &str) -> Result<(), AppError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("invalid config key '{key}'")))
    }
}
