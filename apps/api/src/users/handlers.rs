use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::models::user::{PublicUser, UserRow};
use crate::state::AppState;
use crate::users::models::{CreateUserRequest, LoginRequest, UpdateUserRequest};
use crate::users::password::{hash_password_async, needs_rehash, verify_password_async};

/// POST /api/login
///
/// Unknown usernames and wrong passwords get the same 401.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<PublicUser>, AppError> {
    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
        .bind(req.username.trim())
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password_async(req.password.clone(), user.password.clone()).await? {
        info!("Rejected login for {}", user.username);
        return Err(AppError::Unauthorized);
    }

    if needs_rehash(&user.password) {
        upgrade_password_hash(&state, &user, req.password).await;
    }

    Ok(Json(PublicUser::from(user)))
}

/// Replaces a verified legacy hash with the current scheme. Failures only log; the
/// login itself already succeeded.
async fn upgrade_password_hash(state: &AppState, user: &UserRow, password: String) {
    let hashed = match hash_password_async(password).await {
        Ok(hashed) => hashed,
        Err(e) => {
            warn!("Could not re-hash password for {}: {e}", user.username);
            return;
        }
    };

    match sqlx::query("UPDATE users SET password = $1 WHERE id = $2 AND password = $3")
        .bind(hashed)
        .bind(user.id)
        .bind(&user.password)
        .execute(&state.db)
        .await
    {
        Ok(_) => info!("Upgraded password hash for {}", user.username),
        Err(e) => warn!("Could not store upgraded hash for {}: {e}", user.username),
    }
}

/// GET /api/users
pub async fn handle_list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

/// POST /api/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<Value>, AppError> {
    req.validate()?;
    let hashed = hash_password_async(req.password.clone()).await?;

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, password, name, role, assigned_template_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(req.username.trim())
    .bind(hashed)
    .bind(req.name.trim())
    .bind(req.role.trim())
    .bind(req.assigned_template_id)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("Username '{}' is already taken", req.username.trim()))
        } else {
            AppError::Database(e)
        }
    })?;

    info!("Created user {id} ({})", req.username.trim());
    Ok(Json(json!({ "message": "User created successfully", "id": id })))
}

/// PUT /api/users/:id
pub async fn handle_update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<Value>, AppError> {
    if req.is_empty() {
        return Ok(Json(json!({ "message": "Nothing to update" })));
    }

    let hashed = match req.password() {
        Some(password) => Some(hash_password_async(password.to_string()).await?),
        None => None,
    };

    let updated = sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE($1, name),
            password = COALESCE($2, password),
            assigned_template_id = COALESCE($3, assigned_template_id)
        WHERE id = $4
        "#,
    )
    .bind(req.name())
    .bind(hashed)
    .bind(req.assigned_template_id)
    .bind(user_id)
    .execute(&state.db)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }
    Ok(Json(json!({ "message": "User updated successfully" })))
}

/// DELETE /api/users/:id
pub async fn handle_delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&state.db)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
