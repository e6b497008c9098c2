pub mod config;
pub mod db;
pub mod document_id;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{AppError, Result};
pub use store::Store;

pub struct AppState {
    pub store: Store,
    pub config: Config,
}

impl AppState {
    pub async fn from_config(config: Config) -> Self {
        let store = Store::from_config(&config).await;
        AppState { store, config }
    }
}

/// Any origin, method and header, with credentials. A literal `*` cannot be
/// combined with credentials, so the request's values are echoed back.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/hello", get(handlers::hello))
        // Diagnostics
        .route("/test", get(handlers::diagnostics::test_database))
        // Video API
        .route(
            "/api/videos",
            post(handlers::videos::create_video).get(handlers::videos::list_videos),
        )
        .route("/api/videos/:video_id", get(handlers::videos::get_video))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
