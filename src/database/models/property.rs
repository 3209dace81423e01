use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Full property row, including gallery and feature arrays.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
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
    pub image_url: Option<String>,
    pub gallery_images: Vec<String>,
    pub features: Vec<String>,
    pub video_url: Option<String>,
    pub is_featured: bool,
    pub agent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// The card-sized subset used by list and search responses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub address: String,
    pub price: i32,
    pub beds: Option<i32>,
    pub baths: Option<i32>,
    pub area: Option<i32>,
    pub image_url: Option<String>,
    pub property_type: Option<String>,
    pub is_featured: bool,
}

impl PropertySummary {
    /// Column list matching the struct, for hand-written SELECTs.
    pub const COLUMNS: &'static str =
        "id, slug, title, address, price, beds, baths, area, image_url, property_type, is_featured";
}
