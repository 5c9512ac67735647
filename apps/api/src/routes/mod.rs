pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::configs::handlers as configs;
use crate::generation::handlers as generation;
use crate::lotteries::handlers as lotteries;
use crate::state::AppState;
use crate::templates::handlers as templates;
use crate::uploads::handlers::{self as uploads, MAX_UPLOAD_BYTES};
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Generation
        .route("/api/generate", post(generation::handle_generate))
        // Templates
        .route(
            "/api/templates",
            get(templates::handle_list_templates).post(templates::handle_create_template),
        )
        .route(
            "/api/templates/:id",
            get(templates::handle_get_template)
                .put(templates::handle_update_template)
                .delete(templates::handle_delete_template),
        )
        .route(
            "/api/upload",
            post(uploads::handle_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Lotteries
        .route("/api/lotteries", get(lotteries::handle_list_lotteries))
        .route("/api/lotteries/:id", get(lotteries::handle_get_lottery))
        // Users
        .route("/api/login", post(users::handle_login))
        .route(
            "/api/users",
            get(users::handle_list_users).post(users::handle_create_user),
        )
        .route(
            "/api/users/:id",
            put(users::handle_update_user).delete(users::handle_delete_user),
        )
        // Global configuration
        .route("/api/configs", get(configs::handle_list_configs))
        .route(
            "/api/configs/:key",
            get(configs::handle_get_config).put(configs::handle_put_config),
        )
        .with_state(state)
}

/// CORS restricted to the configured frontend origins, with credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
