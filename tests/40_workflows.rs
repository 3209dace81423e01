mod common;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use immokraini_api::media::{ImageUploader, UploadError};
use immokraini_api::workflows::agent::{create_agent, delete_agent, AgentInput};
use immokraini_api::workflows::property::{create_property, PropertyImages, PropertyInput};
use immokraini_api::workflows::WorkflowError;

/// These workflows submit no files, so the uploader must never be called.
struct NoUploads;

#[async_trait]
impl ImageUploader for NoUploads {
    async fn upload(&self, _bytes: Vec<u8>, _folder: &str) -> Result<String, UploadError> {
        Err(UploadError::NotConfigured)
    }
}

fn property_input(slug: &str) -> PropertyInput {
    PropertyInput {
        title: "Test Villa".to_string(),
        slug: slug.to_string(),
        address: "Midoun, Djerba".to_string(),
        price: 450_000,
        features_csv: "Pool, Sea View".to_string(),
        ..PropertyInput::default()
    }
}

#[tokio::test]
async fn duplicate_slug_creation_conflicts_and_keeps_one_record() -> Result<()> {
    let Some(pool) = common::try_pool().await? else {
        return Ok(());
    };

    let slug = format!("conflict-{}", Uuid::new_v4().simple());
    let first = create_property(
        &pool,
        &NoUploads,
        property_input(&slug),
        PropertyImages::default(),
    )
    .await?;

    let second = create_property(
        &pool,
        &NoUploads,
        property_input(&slug),
        PropertyImages::default(),
    )
    .await;
    assert!(
        matches!(second, Err(WorkflowError::Conflict(_))),
        "second create with the same slug must conflict"
    );

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM properties WHERE slug = $1")
        .bind(&slug)
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 1);

    sqlx::query("DELETE FROM properties WHERE id = $1")
        .bind(first.id)
        .execute(&pool)
        .await?;
    Ok(())
}

#[tokio::test]
async fn agent_delete_unassigns_and_removes_together() -> Result<()> {
    let Some(pool) = common::try_pool().await? else {
        return Ok(());
    };

    let agent = create_agent(
        &pool,
        &NoUploads,
        AgentInput {
            name: "Test Agent".to_string(),
            email: format!("agent-{}@example.com", Uuid::new_v4().simple()),
            phone: None,
        },
        None,
    )
    .await?;

    let mut property_ids = Vec::new();
    for _ in 0..2 {
        let mut input = property_input(&format!("listing-{}", Uuid::new_v4().simple()));
        input.agent_id = Some(agent.id);
        let property =
            create_property(&pool, &NoUploads, input, PropertyImages::default()).await?;
        property_ids.push(property.id);
    }

    let deletion = delete_agent(&pool, agent.id).await?;
    assert_eq!(deletion.name, "Test Agent");
    assert_eq!(deletion.unassigned_properties, 2);

    let (agents_left,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM agents WHERE id = $1")
        .bind(agent.id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(agents_left, 0);

    for id in &property_ids {
        let (assigned,): (Option<Uuid>,) =
            sqlx::query_as("SELECT agent_id FROM properties WHERE id = $1")
                .bind(id)
                .fetch_one(&pool)
                .await?;
        assert_eq!(assigned, None);
    }

    sqlx::query("DELETE FROM properties WHERE id = ANY($1)")
        .bind(&property_ids)
        .execute(&pool)
        .await?;
    Ok(())
}

#[tokio::test]
async fn missing_agent_delete_rolls_back_without_side_effects() -> Result<()> {
    let Some(pool) = common::try_pool().await? else {
        return Ok(());
    };

    let agent = create_agent(
        &pool,
        &NoUploads,
        AgentInput {
            name: "Kept Agent".to_string(),
            email: format!("agent-{}@example.com", Uuid::new_v4().simple()),
            phone: None,
        },
        None,
    )
    .await?;

    let mut input = property_input(&format!("listing-{}", Uuid::new_v4().simple()));
    input.agent_id = Some(agent.id);
    let property = create_property(&pool, &NoUploads, input, PropertyImages::default()).await?;

    let err = delete_agent(&pool, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(_)));

    // The transaction rolled back; the existing assignment is untouched
    let (assigned,): (Option<Uuid>,) =
        sqlx::query_as("SELECT agent_id FROM properties WHERE id = $1")
            .bind(property.id)
            .fetch_one(&pool)
            .await?;
    assert_eq!(assigned, Some(agent.id));

    sqlx::query("DELETE FROM properties WHERE id = $1")
        .bind(property.id)
        .execute(&pool)
        .await?;
    delete_agent(&pool, agent.id).await?;
    Ok(())
}
