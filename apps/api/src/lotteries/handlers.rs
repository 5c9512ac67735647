use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::lottery::{LotteryJoinRow, LotteryListItem, LotteryRow};
use crate::models::template::TemplateWithSlots;
use crate::state::AppState;
use crate::templates::repository::get_template_with_slots;

#[derive(Debug, Serialize)]
pub struct LotteryDetailResponse {
    pub lottery: LotteryRow,
    /// None when the lottery is unlinked or its template was deleted; the
    /// frontend then falls back to the user's assigned template.
    pub template: Option<TemplateWithSlots>,
}

/// GET /api/lotteries
///
/// Active lotteries for the menu, each with its template background.
pub async fn handle_list_lotteries(
    State(state): State<AppState>,
) -> Result<Json<Vec<LotteryListItem>>, AppError> {
    let rows = sqlx::query_as::<_, LotteryJoinRow>(
        r#"
        SELECT l.*,
               t.id AS joined_template_id,
               t.background_url AS template_background_url,
               t.base_width AS template_base_width,
               t.base_height AS template_base_height
        FROM lotteries l
        LEFT JOIN templates t ON t.id = l.template_id
        WHERE l.is_active = TRUE
        ORDER BY l.created_at
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows.into_iter().map(LotteryListItem::from).collect()))
}

/// GET /api/lotteries/:id
pub async fn handle_get_lottery(
    State(state): State<AppState>,
    Path(lottery_id): Path<Uuid>,
) -> Result<Json<LotteryDetailResponse>, AppError> {
    let lottery = sqlx::query_as::<_, LotteryRow>("SELECT * FROM lotteries WHERE id = $1")
        .bind(lottery_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lottery {lottery_id} not found")))?;

    let template = match lottery.template_id {
        Some(template_id) => {
            let template = get_template_with_slots(&state.db, template_id).await?;
            if template.is_none() {
                warn!("Lottery {lottery_id} points at missing template {template_id}");
            }
            template
        }
        None => None,
    };

    Ok(Json(LotteryDetailResponse { lottery, template }))
}
