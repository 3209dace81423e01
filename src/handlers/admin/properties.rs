use axum::{
    extract::{Multipart, Path},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use super::forms::AdminForm;
use crate::database::manager::DatabaseManager;
use crate::database::models::PropertySummary;
use crate::error::ApiError;
use crate::handlers::failure_with_values;
use crate::media::CloudinaryUploader;
use crate::workflows::property::{
    create_property, delete_property, toggle_featured, update_property, PropertyImages,
    PropertyInput,
};

fn input_from_form(form: &AdminForm) -> PropertyInput {
    PropertyInput {
        title: form.text_or_empty("title"),
        slug: form.text_or_empty("slug"),
        address: form.text_or_empty("address"),
        price: form.parse_i32("price").unwrap_or(0),
        beds: form.parse_i32("beds"),
        baths: form.parse_i32("baths"),
        area: form.parse_i32("area"),
        year_built: form.parse_i32("yearBuilt"),
        description: form.non_empty("description"),
        property_type: form.non_empty("propertyType"),
        latitude: form.parse_f64("latitude"),
        longitude: form.parse_f64("longitude"),
        video_url: form.non_empty("videoUrl"),
        features_csv: form.text_or_empty("features"),
        agent_id: form.parse_uuid("agentId"),
    }
}

fn images_from_form(form: &AdminForm) -> PropertyImages {
    PropertyImages {
        primary: form.file("imageUrl"),
        gallery: form.all_files("galleryImages"),
    }
}

/// GET /admin/properties - list view, newest first.
pub async fn list() -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let properties = sqlx::query_as::<_, PropertySummary>(&format!(
        "SELECT {} FROM properties ORDER BY created_at DESC",
        PropertySummary::COLUMNS
    ))
    .fetch_all(&pool)
    .await
    .map_err(crate::database::manager::DatabaseError::from)?;

    Ok(Json(json!({ "success": true, "data": { "properties": properties } })))
}

/// POST /admin/properties - create from a multipart form.
pub async fn create(multipart: Multipart) -> Response {
    let form = match AdminForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    let input = input_from_form(&form);
    let images = images_from_form(&form);
    let values = form.values();

    let result = async {
        let pool = DatabaseManager::pool().await?;
        create_property(&pool, CloudinaryUploader::shared(), input, images).await
    }
    .await;

    match result {
        Ok(property) => Json(json!({
            "success": true,
            "data": { "addedTitle": property.title, "id": property.id }
        }))
        .into_response(),
        Err(e) => failure_with_values(ApiError::from(e), values),
    }
}

/// POST /admin/properties/:id - update from a multipart form.
///
/// `imagesToDelete` entries remove matching stored gallery URLs (or clear
/// the primary image) before new uploads are applied.
pub async fn update(Path(id): Path<Uuid>, multipart: Multipart) -> Response {
    let form = match AdminForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    let input = input_from_form(&form);
    let images = images_from_form(&form);
    let images_to_delete = form.texts("imagesToDelete");
    let values = form.values();

    let result = async {
        let pool = DatabaseManager::pool().await?;
        update_property(
            &pool,
            CloudinaryUploader::shared(),
            id,
            input,
            images,
            images_to_delete,
        )
        .await
    }
    .await;

    match result {
        Ok(property) => Json(json!({
            "success": true,
            "data": { "updatedTitle": property.title, "id": property.id }
        }))
        .into_response(),
        Err(e) => failure_with_values(ApiError::from(e), values),
    }
}

/// POST /admin/properties/:id/delete
pub async fn delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let deleted_title = delete_property(&pool, id).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "deleteSuccess": true, "deletedTitle": deleted_title }
    })))
}

/// POST /admin/properties/:id/feature - atomic featured-flag flip.
pub async fn toggle(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let (title, is_featured) = toggle_featured(&pool, id).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "toggleSuccess": true,
            "updatedTitle": title,
            "updatedStatus": is_featured,
        }
    })))
}
