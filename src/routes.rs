use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;

pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::public::home::home))
        .route("/health", get(health))
        .merge(public_routes())
        // Admin (Basic-Auth gated)
        .merge(admin_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router {
    use handlers::public::{contact, properties};

    Router::new()
        .route("/properties/search", get(properties::search))
        .route("/properties/:slug", get(properties::detail))
        .route("/properties/:slug/inquiry", post(contact::inquiry))
        .route("/contact", post(contact::contact))
}

fn admin_routes() -> Router {
    use handlers::admin::{agents, properties};

    Router::new()
        .route(
            "/admin/properties",
            get(properties::list).post(properties::create),
        )
        .route("/admin/properties/:id", post(properties::update))
        .route("/admin/properties/:id/delete", post(properties::delete))
        .route("/admin/properties/:id/feature", post(properties::toggle))
        .route("/admin/agents", get(agents::list).post(agents::create))
        .route("/admin/agents/:id", post(agents::update))
        .route("/admin/agents/:id/delete", post(agents::delete))
        // Every admin route re-validates credentials; there is no session
        .route_layer(middleware::from_fn(
            crate::middleware::basic_auth_middleware,
        ))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
