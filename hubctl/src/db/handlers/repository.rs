//! Base repository trait for database operations.

use crate::db::errors::Result;

/// Base repository trait providing common database operations.
///
/// A repository is a data access layer for one postgres table. The API has
/// whole-record write semantics, so a single upsert request type serves both
/// create and replace.
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating and replacing entities
    type UpsertRequest;

    /// The record type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// Create a new entity
    async fn create(&mut self, request: &Self::UpsertRequest) -> Result<Self::Response>;

    /// Get an entity by ID
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List all entities, newest first
    async fn list(&mut self) -> Result<Vec<Self::Response>>;

    /// Replace an entity by ID; None when no such entity exists
    async fn update(&mut self, id: Self::Id, request: &Self::UpsertRequest) -> Result<Option<Self::Response>>;

    /// Delete an entity by ID; true when a row was removed
    async fn delete(&mut self, id: Self::Id) -> Result<bool>;
}
