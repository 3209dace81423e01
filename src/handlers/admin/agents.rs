use axum::{
    extract::{Multipart, Path},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use super::forms::AdminForm;
use crate::database::manager::DatabaseManager;
use crate::database::models::Agent;
use crate::error::ApiError;
use crate::handlers::failure_with_values;
use crate::media::CloudinaryUploader;
use crate::workflows::agent::{create_agent, delete_agent, update_agent, AgentInput};

fn input_from_form(form: &AdminForm) -> AgentInput {
    AgentInput {
        name: form.text_or_empty("name"),
        email: form.text_or_empty("email"),
        phone: form.non_empty("phone"),
    }
}

/// GET /admin/agents - roster, name ascending.
pub async fn list() -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let agents = sqlx::query_as::<_, Agent>("SELECT * FROM agents ORDER BY name ASC")
        .fetch_all(&pool)
        .await
        .map_err(crate::database::manager::DatabaseError::from)?;

    Ok(Json(json!({ "success": true, "data": { "agents": agents } })))
}

/// POST /admin/agents - create from a multipart form.
pub async fn create(multipart: Multipart) -> Response {
    let form = match AdminForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    let input = input_from_form(&form);
    let image = form.file("imageUrl");
    let values = form.values();

    let result = async {
        let pool = DatabaseManager::pool().await?;
        create_agent(&pool, CloudinaryUploader::shared(), input, image).await
    }
    .await;

    match result {
        Ok(agent) => Json(json!({
            "success": true,
            "data": { "addedName": agent.name, "id": agent.id }
        }))
        .into_response(),
        Err(e) => failure_with_values(ApiError::from(e), values),
    }
}

/// POST /admin/agents/:id - update; the stored portrait is retained unless
/// a new file is uploaded.
pub async fn update(Path(id): Path<Uuid>, multipart: Multipart) -> Response {
    let form = match AdminForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    let input = input_from_form(&form);
    let image = form.file("imageUrl");
    let values = form.values();

    let result = async {
        let pool = DatabaseManager::pool().await?;
        update_agent(&pool, CloudinaryUploader::shared(), id, input, image).await
    }
    .await;

    match result {
        Ok(agent) => Json(json!({
            "success": true,
            "data": { "updatedName": agent.name, "id": agent.id }
        }))
        .into_response(),
        Err(e) => failure_with_values(ApiError::from(e), values),
    }
}

/// POST /admin/agents/:id/delete - transactional delete: unassign owned
/// properties and remove the agent together, or not at all.
pub async fn delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let deletion = delete_agent(&pool, id).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "deleteSuccess": true,
            "deletedName": deletion.name,
            "unassignedProperties": deletion.unassigned_properties,
        }
    })))
}
