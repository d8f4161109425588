//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL,
//! following the repository pattern: each entity has a repository in
//! [`handlers`] that encapsulates all queries for its table, returning record
//! structs from [`models`]. Constraint failures are translated into the
//! [`errors::DbError`] taxonomy so the API layer can map them to status codes.
//!
//! Migrations live in the crate's `migrations/` directory and run at startup
//! via [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;
