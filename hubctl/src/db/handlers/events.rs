//! Database repository for community events.

use sqlx::PgConnection;
use tracing::instrument;

use crate::db::errors::Result;
use crate::db::handlers::Repository;
use crate::db::models::events::{Event, EventUpsertDBRequest};
use crate::types::{EventId, abbrev_uuid};

/// Repository for event operations.
pub struct Events<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Events<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Events<'_> {
    type UpsertRequest = EventUpsertDBRequest;
    type Response = Event;
    type Id = EventId;

    #[instrument(skip(self, request), err)]
    async fn create(&mut self, request: &EventUpsertDBRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, location, starts_at, ends_at, status, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.location)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.status)
        .bind(&request.image_url)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(event)
    }

    #[instrument(skip(self), fields(event_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: EventId) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(event)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY created_at DESC")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(events)
    }

    #[instrument(skip(self, request), fields(event_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: EventId, request: &EventUpsertDBRequest) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET title = $2,
                description = $3,
                location = $4,
                starts_at = $5,
                ends_at = $6,
                status = $7,
                image_url = $8,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.location)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.status)
        .bind(&request.image_url)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(event)
    }

    #[instrument(skip(self), fields(event_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: EventId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
