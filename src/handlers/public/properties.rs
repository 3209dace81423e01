use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Agent, Property};
use crate::error::ApiError;
use crate::search::SearchCriteria;

/// GET /properties/search - filtered, sorted, paginated property list.
///
/// Malformed filter input never fails the request; a data-source failure
/// degrades to an empty result plus an advisory so the page shell stays up.
pub async fn search(Query(criteria): Query<SearchCriteria>) -> impl IntoResponse {
    let query = criteria.normalize();

    let results = async {
        let pool = DatabaseManager::pool().await?;
        query.execute(&pool).await
    }
    .await;

    match results {
        Ok(results) => Json(json!({
            "success": true,
            "data": {
                "properties": results.properties,
                "pagination": results.pagination,
                "searchCriteria": criteria,
            }
        })),
        Err(e) => {
            tracing::error!("property search failed: {}", e);
            Json(json!({
                "success": true,
                "data": {
                    "properties": [],
                    "pagination": null,
                    "searchCriteria": criteria,
                },
                "error": "Failed to load properties - please try again later."
            }))
        }
    }
}

/// GET /properties/:slug - property detail with its agent joined.
pub async fn detail(Path(slug): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let property: Property = sqlx::query_as("SELECT * FROM properties WHERE slug = $1")
        .bind(&slug)
        .fetch_optional(&pool)
        .await
        .map_err(crate::database::manager::DatabaseError::from)?
        .ok_or_else(|| ApiError::not_found("Property not found"))?;

    let agent: Option<Agent> = match property.agent_id {
        Some(agent_id) => sqlx::query_as("SELECT * FROM agents WHERE id = $1")
            .bind(agent_id)
            .fetch_optional(&pool)
            .await
            .map_err(crate::database::manager::DatabaseError::from)?,
        None => None,
    };

    Ok(Json(json!({
        "success": true,
        "data": {
            "property": property,
            "agent": agent,
        }
    })))
}
