use axum::{response::IntoResponse, Json};
use serde_json::json;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Agent, PropertySummary};

async fn featured_properties(pool: &PgPool) -> Result<Vec<PropertySummary>, DatabaseError> {
    let limit = crate::config::config().search.featured_limit;
    let rows = sqlx::query_as::<_, PropertySummary>(&format!(
        "SELECT {} FROM properties WHERE is_featured \
         ORDER BY created_at DESC LIMIT $1",
        PropertySummary::COLUMNS
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn agent_roster(pool: &PgPool) -> Result<Vec<Agent>, DatabaseError> {
    let rows = sqlx::query_as::<_, Agent>("SELECT * FROM agents ORDER BY name ASC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// GET / - landing page payload.
///
/// The two reads are independent, so they run concurrently and join before
/// the response is shaped. A store failure degrades to an empty payload
/// plus an advisory rather than failing the page shell.
pub async fn home() -> impl IntoResponse {
    let payload = async {
        let pool = DatabaseManager::pool().await?;
        tokio::try_join!(featured_properties(&pool), agent_roster(&pool))
    }
    .await;

    match payload {
        Ok((featured, agents)) => Json(json!({
            "success": true,
            "data": {
                "featuredProperties": featured,
                "agents": agents,
            }
        })),
        Err(e) => {
            tracing::error!("failed to load landing page data: {}", e);
            Json(json!({
                "success": true,
                "data": {
                    "featuredProperties": [],
                    "agents": [],
                },
                "error": "Could not load featured properties."
            }))
        }
    }
}
