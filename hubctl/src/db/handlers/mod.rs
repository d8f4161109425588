//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection, provides strongly-typed CRUD
//! operations over one table, and returns domain models from
//! [`crate::db::models`]. All repositories implement the [`Repository`]
//! trait.

pub mod events;
pub mod repository;
pub mod sponsors;

pub use events::Events;
pub use repository::Repository;
pub use sponsors::Sponsors;
