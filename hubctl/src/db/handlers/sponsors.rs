//! Database repository for sponsors.

use sqlx::PgConnection;
use tracing::instrument;

use crate::db::errors::Result;
use crate::db::handlers::Repository;
use crate::db::models::sponsors::{Sponsor, SponsorUpsertDBRequest};
use crate::types::{SponsorId, abbrev_uuid};

/// Repository for sponsor operations.
pub struct Sponsors<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Sponsors<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Sponsors<'_> {
    type UpsertRequest = SponsorUpsertDBRequest;
    type Response = Sponsor;
    type Id = SponsorId;

    #[instrument(skip(self, request), err)]
    async fn create(&mut self, request: &SponsorUpsertDBRequest) -> Result<Sponsor> {
        let sponsor = sqlx::query_as::<_, Sponsor>(
            r#"
            INSERT INTO sponsors (name, description, website_url, contact_name, contact_email, logo_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.website_url)
        .bind(&request.contact_name)
        .bind(&request.contact_email)
        .bind(&request.logo_url)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(sponsor)
    }

    #[instrument(skip(self), fields(sponsor_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: SponsorId) -> Result<Option<Sponsor>> {
        let sponsor = sqlx::query_as::<_, Sponsor>("SELECT * FROM sponsors WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(sponsor)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self) -> Result<Vec<Sponsor>> {
        let sponsors = sqlx::query_as::<_, Sponsor>("SELECT * FROM sponsors ORDER BY created_at DESC")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(sponsors)
    }

    #[instrument(skip(self, request), fields(sponsor_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: SponsorId, request: &SponsorUpsertDBRequest) -> Result<Option<Sponsor>> {
        let sponsor = sqlx::query_as::<_, Sponsor>(
            r#"
            UPDATE sponsors
            SET name = $2,
                description = $3,
                website_url = $4,
                contact_name = $5,
                contact_email = $6,
                logo_url = $7,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.website_url)
        .bind(&request.contact_name)
        .bind(&request.contact_email)
        .bind(&request.logo_url)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(sponsor)
    }

    #[instrument(skip(self), fields(sponsor_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: SponsorId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sponsors WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
