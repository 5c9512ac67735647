//! Axum route handler for the Generation API.

use axum::Json;
use tracing::info;

use crate::errors::AppError;
use crate::generation::generator::{generate_results, GenerateRequest, GenerateResponse};

/// POST /api/generate
///
/// Builds one win pool from `user_seed` and returns a value for every
/// `user_input` slot, keyed by slot id.
pub async fn handle_generate(
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let results = generate_results(request.user_seed.as_deref(), &request.slot_configs);

    info!(
        "Generated {} values for template {}",
        results.len(),
        request.template_id.as_deref().unwrap_or("-")
    );

    Ok(Json(GenerateResponse { results }))
}
