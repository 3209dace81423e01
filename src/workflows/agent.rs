use std::collections::HashMap;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{is_valid_email, WorkflowError};
use crate::database::models::Agent;
use crate::media::{ImageFile, ImageUploader};

#[derive(Debug, Clone, Default)]
pub struct AgentInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Outcome of a transactional agent deletion.
#[derive(Debug, Clone)]
pub struct AgentDeletion {
    pub name: String,
    pub unassigned_properties: u64,
}

fn validate(input: &AgentInput) -> Result<(), WorkflowError> {
    let mut field_errors = HashMap::new();
    if input.name.trim().is_empty() {
        field_errors.insert("name".to_string(), "Name is required".to_string());
    }
    if input.email.trim().is_empty() {
        field_errors.insert("email".to_string(), "Email is required".to_string());
    } else if !is_valid_email(&input.email) {
        field_errors.insert("email".to_string(), "Invalid email format".to_string());
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(WorkflowError::validation(
            "Name and a valid email are required",
            field_errors,
        ))
    }
}

async fn check_email_conflict(
    pool: &PgPool,
    email: &str,
    exclude_id: Option<Uuid>,
) -> Result<(), WorkflowError> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM agents WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    match existing {
        Some((id,)) if Some(id) != exclude_id => Err(WorkflowError::Conflict(format!(
            "Email \"{}\" is already in use",
            email
        ))),
        _ => Ok(()),
    }
}

/// Upload the optional portrait; unlike property galleries this is a
/// primary image, so failure aborts the workflow.
async fn upload_portrait(
    uploader: &dyn ImageUploader,
    image: Option<ImageFile>,
) -> Result<Option<String>, WorkflowError> {
    let folder = &crate::config::config().cloudinary.agent_folder;
    match image {
        Some(file) if !file.is_empty() => Ok(Some(uploader.upload(file.bytes, folder).await?)),
        _ => Ok(None),
    }
}

pub async fn create_agent(
    pool: &PgPool,
    uploader: &dyn ImageUploader,
    input: AgentInput,
    image: Option<ImageFile>,
) -> Result<Agent, WorkflowError> {
    validate(&input)?;
    check_email_conflict(pool, &input.email, None).await?;

    let image_url = upload_portrait(uploader, image).await?;

    let agent: Agent = sqlx::query_as(
        "INSERT INTO agents (name, email, phone, image_url) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&input.name)
    .bind(&input.email)
    .bind(input.phone.as_deref())
    .bind(image_url.as_deref())
    .fetch_one(pool)
    .await?;

    info!(id = %agent.id, name = %agent.name, "created agent");
    Ok(agent)
}

/// Update an agent; a freshly uploaded portrait replaces the stored URL,
/// otherwise the existing URL is retained unchanged.
pub async fn update_agent(
    pool: &PgPool,
    uploader: &dyn ImageUploader,
    id: Uuid,
    input: AgentInput,
    image: Option<ImageFile>,
) -> Result<Agent, WorkflowError> {
    validate(&input)?;
    check_email_conflict(pool, &input.email, Some(id)).await?;

    let new_image_url = upload_portrait(uploader, image).await?;

    let agent: Option<Agent> = sqlx::query_as(
        "UPDATE agents SET name = $1, email = $2, phone = $3, \
         image_url = COALESCE($4, image_url) \
         WHERE id = $5 RETURNING *",
    )
    .bind(&input.name)
    .bind(&input.email)
    .bind(input.phone.as_deref())
    .bind(new_image_url.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match agent {
        Some(agent) => {
            info!(id = %agent.id, name = %agent.name, "updated agent");
            Ok(agent)
        }
        None => Err(WorkflowError::NotFound("Agent not found".to_string())),
    }
}

/// Delete an agent in one transaction: unassign every property referencing
/// it, then remove the row. A missing agent rolls back the unassignment.
pub async fn delete_agent(pool: &PgPool, id: Uuid) -> Result<AgentDeletion, WorkflowError> {
    let mut tx = pool.begin().await?;

    let unassigned = sqlx::query("UPDATE properties SET agent_id = NULL WHERE agent_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let deleted: Option<(String,)> =
        sqlx::query_as("DELETE FROM agents WHERE id = $1 RETURNING name")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

    let Some((name,)) = deleted else {
        tx.rollback().await?;
        return Err(WorkflowError::NotFound("Agent not found".to_string()));
    };

    tx.commit().await?;

    info!(%id, %name, unassigned, "deleted agent and unassigned properties");
    Ok(AgentDeletion {
        name,
        unassigned_properties: unassigned,
    })
}
