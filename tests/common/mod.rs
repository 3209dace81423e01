use std::sync::Once;

use anyhow::Result;
use axum::{body::Body, http::Request, response::Response, Router};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use http_body_util::BodyExt;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::ServiceExt;

static INIT: Once = Once::new();

/// Build the router with a known admin credential pair and no database
/// configured, so store-backed routes exercise their degraded paths.
pub fn app() -> Router {
    INIT.call_once(|| {
        std::env::remove_var("DATABASE_URL");
        std::env::set_var("ADMIN_USERNAME", "admin");
        std::env::set_var("ADMIN_PASSWORD", "secret");
        std::env::set_var("ADMIN_REALM", "Admin Area");
    });
    immokraini_api::routes::app()
}

/// One request through a fresh router instance.
pub async fn send(request: Request<Body>) -> Result<Response> {
    Ok(app().oneshot(request).await?)
}

pub async fn body_json(response: Response) -> Result<serde_json::Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:{}", username, password)))
}

/// Live-database gate: store-backed tests skip themselves unless
/// `DATABASE_URL` points at a reachable Postgres instance.
pub async fn try_pool() -> Result<Option<PgPool>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        return Ok(None);
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await?;
    Ok(Some(pool))
}
