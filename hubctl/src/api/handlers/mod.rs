//! HTTP request handlers for all API endpoints.
//!
//! Handlers are responsible for request validation and deserialization,
//! business logic via the database repositories and the media bridge, and
//! response serialization. Errors convert to status codes through
//! [`crate::errors::Error`]'s `IntoResponse` implementation.
//!
//! - [`events`]: event CRUD
//! - [`sponsors`]: sponsor CRUD, with logo bridging on multipart create
//! - [`uploads`]: direct media bridge exposure

pub mod events;
pub mod sponsors;
pub mod uploads;
