use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LotteryRow {
    pub id: Uuid,
    pub name: String,
    pub template_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Background fields of the linked template, enough to draw a menu card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplatePreview {
    pub background_url: Option<String>,
    pub base_width: i32,
    pub base_height: i32,
}

/// Flat result of `lotteries LEFT JOIN templates`.
#[derive(Debug, Clone, FromRow)]
pub struct LotteryJoinRow {
    #[sqlx(flatten)]
    pub lottery: LotteryRow,
    pub joined_template_id: Option<Uuid>,
    pub template_background_url: Option<String>,
    pub template_base_width: Option<i32>,
    pub template_base_height: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LotteryListItem {
    #[serde(flatten)]
    pub lottery: LotteryRow,
    pub template: Option<TemplatePreview>,
}

impl From<LotteryJoinRow> for LotteryListItem {
    fn from(row: LotteryJoinRow) -> Self {
        // The join id is the only reliable signal: background_url is nullable on its own.
        let template = match (
            row.joined_template_id,
            row.template_base_width,
            row.template_base_height,
        ) {
            (Some(_), Some(base_width), Some(base_height)) => Some(TemplatePreview {
                background_url: row.template_background_url,
                base_width,
                base_height,
            }),
            _ => None,
        };
        LotteryListItem {
            lottery: row.lottery,
            template,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lottery() -> LotteryRow {
        LotteryRow {
            id: Uuid::new_v4(),
            name: "Hanoi VIP".to_string(),
            template_id: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unlinked_lottery_has_no_preview() {
        let item = LotteryListItem::from(LotteryJoinRow {
            lottery: lottery(),
            joined_template_id: None,
            template_background_url: None,
            template_base_width: None,
            template_base_height: None,
        });
        assert!(item.template.is_none());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["name"], "Hanoi VIP");
        assert!(json["template"].is_null());
    }

    #[test]
    fn test_linked_lottery_keeps_preview_without_background() {
        let item = LotteryListItem::from(LotteryJoinRow {
            lottery: lottery(),
            joined_template_id: Some(Uuid::new_v4()),
            template_background_url: None,
            template_base_width: Some(800),
            template_base_height: Some(1200),
        });
        assert_eq!(
            item.template,
            Some(TemplatePreview {
                background_url: None,
                base_width: 800,
                base_height: 1200,
            })
        );
    }
}
