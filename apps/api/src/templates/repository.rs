//! Template persistence. A template owns its slots: slots are never edited in place,
//! an update replaces the whole set inside one transaction.

use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::template::{TemplateRow, TemplateSlotRow, TemplateWithSlots};
use crate::templates::models::{SlotInput, TemplateInput};

/// Slots created from the editor all sit on the same layer.
const DEFAULT_Z_INDEX: i32 = 1;

pub async fn list_templates(pool: &PgPool) -> Result<Vec<TemplateRow>, sqlx::Error> {
    sqlx::query_as::<_, TemplateRow>("SELECT * FROM templates ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn get_template_with_slots(
    pool: &PgPool,
    template_id: Uuid,
) -> Result<Option<TemplateWithSlots>, sqlx::Error> {
    let Some(template) =
        sqlx::query_as::<_, TemplateRow>("SELECT * FROM templates WHERE id = $1")
            .bind(template_id)
            .fetch_optional(pool)
            .await?
    else {
        return Ok(None);
    };

    let template_slots = sqlx::query_as::<_, TemplateSlotRow>(
        "SELECT * FROM template_slots WHERE template_id = $1 ORDER BY z_index, created_at, id",
    )
    .bind(template_id)
    .fetch_all(pool)
    .await?;

    Ok(Some(TemplateWithSlots {
        template,
        template_slots,
    }))
}

pub async fn create_template(pool: &PgPool, input: &TemplateInput) -> Result<Uuid, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let template_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO templates (name, base_width, base_height, background_url, is_active)
        VALUES ($1, $2, $3, $4, TRUE)
        RETURNING id
        "#,
    )
    .bind(input.name.trim())
    .bind(input.width)
    .bind(input.height)
    .bind(input.background_url())
    .fetch_one(&mut *tx)
    .await?;

    insert_slots(&mut tx, template_id, &input.slots).await?;
    tx.commit().await?;

    info!(
        "Created template {template_id} with {} slots",
        input.slots.len()
    );
    Ok(template_id)
}

/// Returns false when no template has this id.
pub async fn update_template(
    pool: &PgPool,
    template_id: Uuid,
    input: &TemplateInput,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE templates
        SET name = $1, base_width = $2, base_height = $3, background_url = $4, updated_at = NOW()
        WHERE id = $5
        "#,
    )
    .bind(input.name.trim())
    .bind(input.width)
    .bind(input.height)
    .bind(input.background_url())
    .bind(template_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query("DELETE FROM template_slots WHERE template_id = $1")
        .bind(template_id)
        .execute(&mut *tx)
        .await?;
    insert_slots(&mut tx, template_id, &input.slots).await?;
    tx.commit().await?;

    info!(
        "Updated template {template_id}, replaced slots with {}",
        input.slots.len()
    );
    Ok(true)
}

/// Slots go with the template through `ON DELETE CASCADE`. Returns false when nothing matched.
pub async fn delete_template(pool: &PgPool, template_id: Uuid) -> Result<bool, sqlx::Error> {
    let deleted = sqlx::query("DELETE FROM templates WHERE id = $1")
        .bind(template_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(deleted > 0)
}

async fn insert_slots(
    conn: &mut PgConnection,
    template_id: Uuid,
    slots: &[SlotInput],
) -> Result<(), sqlx::Error> {
    for slot in slots {
        sqlx::query(
            r#"
            INSERT INTO template_slots
                (template_id, slot_type, label_text, data_key,
                 pos_x, pos_y, width, height, style_config, z_index)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(template_id)
        .bind(&slot.slot_type)
        .bind(&slot.content)
        .bind(slot.data_key())
        .bind(slot.x)
        .bind(slot.y)
        .bind(slot.width)
        .bind(slot.height)
        .bind(&slot.style)
        .bind(DEFAULT_Z_INDEX)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
