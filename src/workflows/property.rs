use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::{is_valid_slug, merge_gallery, parse_features_csv, WorkflowError};
use crate::database::models::Property;
use crate::database::sql::{bind_param_as, SqlParam, UpdateBuilder};
use crate::media::{ImageFile, ImageUploader};

/// Scalar form fields for property create/update.
#[derive(Debug, Clone, Default)]
pub struct PropertyInput {
    pub title: String,
    pub slug: String,
    pub address: String,
    pub price: i32,
    pub beds: Option<i32>,
    pub baths: Option<i32>,
    pub area: Option<i32>,
    pub year_built: Option<i32>,
    pub description: Option<String>,
    pub property_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub video_url: Option<String>,
    pub features_csv: String,
    pub agent_id: Option<Uuid>,
}

/// Uploaded files accompanying a property form.
#[derive(Debug, Clone, Default)]
pub struct PropertyImages {
    pub primary: Option<ImageFile>,
    pub gallery: Vec<ImageFile>,
}

fn validate(input: &PropertyInput) -> Result<(), WorkflowError> {
    let mut field_errors = HashMap::new();
    if input.title.trim().is_empty() {
        field_errors.insert("title".to_string(), "Title is required".to_string());
    }
    if input.slug.trim().is_empty() {
        field_errors.insert("slug".to_string(), "Slug is required".to_string());
    }
    if input.address.trim().is_empty() {
        field_errors.insert("address".to_string(), "Address is required".to_string());
    }
    if input.price <= 0 {
        field_errors.insert(
            "price".to_string(),
            "Price must be a positive integer".to_string(),
        );
    }
    if !field_errors.is_empty() {
        return Err(WorkflowError::validation(
            "Missing required fields",
            field_errors,
        ));
    }

    if !is_valid_slug(&input.slug) {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            "slug".to_string(),
            "Slug must be lowercase alphanumeric with single hyphens".to_string(),
        );
        return Err(WorkflowError::validation("Invalid slug format", field_errors));
    }

    Ok(())
}

/// Reject a slug already held by a different property.
async fn check_slug_conflict(
    pool: &PgPool,
    slug: &str,
    exclude_id: Option<Uuid>,
) -> Result<(), WorkflowError> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM properties WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;

    match existing {
        Some((id,)) if Some(id) != exclude_id => Err(WorkflowError::Conflict(format!(
            "Slug \"{}\" is already taken",
            slug
        ))),
        _ => Ok(()),
    }
}

/// Upload the primary image (fatal on failure) and the gallery
/// (best-effort per file). Zero-size files are ignored.
async fn upload_images(
    uploader: &dyn ImageUploader,
    images: PropertyImages,
) -> Result<(Option<String>, Vec<String>), WorkflowError> {
    let folder = &crate::config::config().cloudinary.property_folder;

    let mut primary_url = None;
    if let Some(file) = images.primary {
        if !file.is_empty() {
            primary_url = Some(uploader.upload(file.bytes, folder).await?);
        }
    }

    let mut gallery_urls = Vec::new();
    for file in images.gallery {
        if file.is_empty() {
            continue;
        }
        let file_name = file.file_name.clone().unwrap_or_default();
        match uploader.upload(file.bytes, folder).await {
            Ok(url) => gallery_urls.push(url),
            Err(e) => warn!(file = %file_name, error = %e, "skipping failed gallery upload"),
        }
    }

    Ok((primary_url, gallery_urls))
}

/// Create a property: validate, check slug uniqueness, upload, persist.
pub async fn create_property(
    pool: &PgPool,
    uploader: &dyn ImageUploader,
    input: PropertyInput,
    images: PropertyImages,
) -> Result<Property, WorkflowError> {
    validate(&input)?;
    check_slug_conflict(pool, &input.slug, None).await?;

    let (image_url, gallery_urls) = upload_images(uploader, images).await?;
    let features = parse_features_csv(&input.features_csv);

    let property: Property = sqlx::query_as(
        "INSERT INTO properties \
         (slug, title, address, price, beds, baths, area, year_built, description, \
          property_type, latitude, longitude, image_url, gallery_images, features, \
          video_url, agent_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
         RETURNING *",
    )
    .bind(&input.slug)
    .bind(&input.title)
    .bind(&input.address)
    .bind(input.price)
    .bind(input.beds)
    .bind(input.baths)
    .bind(input.area)
    .bind(input.year_built)
    .bind(input.description.as_deref())
    .bind(input.property_type.as_deref())
    .bind(input.latitude)
    .bind(input.longitude)
    .bind(image_url.as_deref())
    .bind(&gallery_urls)
    .bind(&features)
    .bind(input.video_url.as_deref())
    .bind(input.agent_id)
    .fetch_one(pool)
    .await?;

    info!(id = %property.id, title = %property.title, "created property");
    Ok(property)
}

/// Update a property in place.
///
/// Image columns are only written when something actually changed: a new
/// primary upload replaces the old URL, a primary listed in
/// `images_to_delete` without a replacement clears it, and the gallery is
/// rewritten only when uploads or deletions touched it.
pub async fn update_property(
    pool: &PgPool,
    uploader: &dyn ImageUploader,
    id: Uuid,
    input: PropertyInput,
    images: PropertyImages,
    images_to_delete: Vec<String>,
) -> Result<Property, WorkflowError> {
    validate(&input)?;
    check_slug_conflict(pool, &input.slug, Some(id)).await?;

    let existing: Property = sqlx::query_as("SELECT * FROM properties WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| WorkflowError::NotFound("Property not found".to_string()))?;

    let (new_primary, new_gallery) = upload_images(uploader, images).await?;
    let features = parse_features_csv(&input.features_csv);

    let mut update = UpdateBuilder::new();
    update
        .set("slug", SqlParam::Text(input.slug))
        .set("title", SqlParam::Text(input.title))
        .set("address", SqlParam::Text(input.address))
        .set("price", SqlParam::Int(input.price))
        .set("beds", SqlParam::OptInt(input.beds))
        .set("baths", SqlParam::OptInt(input.baths))
        .set("area", SqlParam::OptInt(input.area))
        .set("year_built", SqlParam::OptInt(input.year_built))
        .set("description", SqlParam::OptText(input.description))
        .set("property_type", SqlParam::OptText(input.property_type))
        .set("latitude", SqlParam::Float(input.latitude))
        .set("longitude", SqlParam::Float(input.longitude))
        .set("video_url", SqlParam::OptText(input.video_url))
        .set("features", SqlParam::TextArray(features))
        // empty agent id disconnects, a value reconnects
        .set("agent_id", SqlParam::OptUuid(input.agent_id));

    if let Some(url) = new_primary {
        update.set("image_url", SqlParam::OptText(Some(url)));
    } else if existing
        .image_url
        .as_ref()
        .is_some_and(|url| images_to_delete.contains(url))
    {
        update.set("image_url", SqlParam::OptText(None));
    }

    let gallery_touched = !new_gallery.is_empty()
        || existing
            .gallery_images
            .iter()
            .any(|url| images_to_delete.contains(url));
    if gallery_touched {
        let merged = merge_gallery(&existing.gallery_images, &images_to_delete, new_gallery);
        update.set("gallery_images", SqlParam::TextArray(merged));
    }

    let sql = update.into_sql("properties", id, "*");
    let mut query = sqlx::query_as::<_, Property>(&sql.query);
    for p in sql.params.iter() {
        query = bind_param_as(query, p);
    }
    let property = query
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| WorkflowError::NotFound("Property not found".to_string()))?;

    info!(id = %property.id, title = %property.title, "updated property");
    Ok(property)
}

/// Delete one property; reports a distinct not-found.
pub async fn delete_property(pool: &PgPool, id: Uuid) -> Result<String, WorkflowError> {
    let deleted: Option<(String,)> =
        sqlx::query_as("DELETE FROM properties WHERE id = $1 RETURNING title")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    match deleted {
        Some((title,)) => {
            info!(%id, %title, "deleted property");
            Ok(title)
        }
        None => Err(WorkflowError::NotFound("Property not found".to_string())),
    }
}

/// Flip the featured flag in a single atomic statement, so two concurrent
/// toggles always produce two transitions.
pub async fn toggle_featured(pool: &PgPool, id: Uuid) -> Result<(String, bool), WorkflowError> {
    let updated: Option<(String, bool)> = sqlx::query_as(
        "UPDATE properties SET is_featured = NOT is_featured \
         WHERE id = $1 RETURNING title, is_featured",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some((title, is_featured)) => {
            info!(%id, %title, is_featured, "toggled featured flag");
            Ok((title, is_featured))
        }
        None => Err(WorkflowError::NotFound("Property not found".to_string())),
    }
}
