use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Full `users` row. Never serialized: the password hash stays inside the service.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: String,
    pub assigned_template_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub role: String,
    pub assigned_template_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for PublicUser {
    fn from(row: UserRow) -> Self {
        PublicUser {
            id: row.id,
            username: row.username,
            name: row.name,
            role: row.role,
            assigned_template_id: row.assigned_template_id,
            created_at: row.created_at,
        }
    }
}
