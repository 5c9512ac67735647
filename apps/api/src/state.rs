use std::sync::Arc;

use sqlx::PgPool;

use crate::uploads::store::AssetStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Object storage for uploaded template backgrounds. Default: S3AssetStore.
    pub assets: Arc<dyn AssetStore>,
}
