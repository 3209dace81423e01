pub mod agent;
pub mod contact;
pub mod property;

use std::collections::HashMap;
use thiserror::Error;

use crate::database::manager::DatabaseError;
use crate::email::DeliveryError;
use crate::media::UploadError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for WorkflowError {
    fn from(err: sqlx::Error) -> Self {
        WorkflowError::Database(DatabaseError::Sqlx(err))
    }
}

impl WorkflowError {
    pub fn validation(
        message: impl Into<String>,
        field_errors: HashMap<String, String>,
    ) -> Self {
        WorkflowError::Validation {
            message: message.into(),
            field_errors,
        }
    }
}

/// Slug format: lowercase alphanumeric runs joined by single hyphens
/// (`^[a-z0-9]+(?:-[a-z0-9]+)*$`).
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.split('-').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

/// Basic email shape check (`^[^\s@]+@[^\s@]+\.[^\s@]+$`).
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.find('.') {
        Some(pos) => pos > 0 && pos < domain.len() - 1,
        None => false,
    }
}

/// Split a comma-separated features string into trimmed, non-empty labels.
pub fn parse_features_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Final gallery after an update: survivors (existing minus deletions,
/// original order preserved) followed by the newly uploaded URLs.
pub fn merge_gallery(
    existing: &[String],
    to_delete: &[String],
    new_urls: Vec<String>,
) -> Vec<String> {
    let mut merged: Vec<String> = existing
        .iter()
        .filter(|url| !to_delete.contains(url))
        .cloned()
        .collect();
    merged.extend(new_urls);
    merged
}
