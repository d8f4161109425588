//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! The management API lives under `/admin/api/v1/*`:
//!
//! - **Events** (`/admin/api/v1/events/*`): event management
//! - **Sponsors** (`/admin/api/v1/sponsors/*`): sponsor management
//! - **Uploads** (`/admin/api/v1/uploads`): media upload bridging
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`;
//! the rendered documentation is served at `/admin/docs`.

pub mod handlers;
pub mod models;
