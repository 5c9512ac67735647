use anyhow::Result;
use sqlx::{FromRow, PgPool};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::users::password::{hash_password_async, is_hashed};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MigrationReport {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(FromRow)]
struct StoredPassword {
    id: Uuid,
    username: String,
    password: String,
}

/// Hashes every plaintext password left in `users`. Rows that already hold a hash
/// are skipped; a failing row is logged and counted, the run continues.
pub async fn migrate_plaintext_passwords(pool: &PgPool) -> Result<MigrationReport> {
    let rows = sqlx::query_as::<_, StoredPassword>("SELECT id, username, password FROM users")
        .fetch_all(pool)
        .await?;
    info!("Checking {} users for plaintext passwords", rows.len());

    let mut report = MigrationReport::default();
    for StoredPassword {
        id,
        username,
        password,
    } in rows
    {
        if is_hashed(&password) {
            report.skipped += 1;
            continue;
        }

        let result = async {
            let hashed = hash_password_async(password).await?;
            sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
                .bind(hashed)
                .bind(id)
                .execute(pool)
                .await?;
            anyhow::Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                info!("{username}: password hashed");
                report.updated += 1;
            }
            Err(e) => {
                error!("{username}: password migration failed: {e}");
                report.failed += 1;
            }
        }
    }

    if report.failed > 0 {
        warn!("{} users could not be migrated", report.failed);
    }
    info!(
        "Password migration finished: {} updated, {} skipped",
        report.updated, report.skipped
    );
    Ok(report)
}
