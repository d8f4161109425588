//! # hubctl: Administrative Backend for the Community Hub
//!
//! `hubctl` is the management backend behind the community platform's admin
//! interface. Staff create, list, edit, and delete **events** and
//! **sponsors** through browser forms; those forms call this service's REST
//! API. Uploaded images (event headers, sponsor logos) are not stored here:
//! they are bridged to an external media host, which assigns each payload a
//! durable public URL that the records then reference.
//!
//! ## Overview
//!
//! The service exposes a management API under `/admin/api/v1/*` with
//! conventional REST semantics. Records are plain rows with scalar fields,
//! manipulated only through whole-record create/replace/delete - there are no
//! partial updates and no relational invariants between the two collections.
//! List endpoints support a `search` term applied as a case-insensitive
//! substring scan over the fetched collection, matching what the admin UI's
//! search box does.
//!
//! The one contract-bearing component is the **upload bridge**
//! ([`media`]): it accepts a fully buffered binary payload plus a
//! destination category and resolves exactly once, with either the absolute
//! URL the host assigned or the host's error. It performs no retries, no
//! caching, and no deduplication, and defines no timeout. Size and
//! content-type ceilings are enforced at the API boundary before the bridge
//! is invoked; the bridge itself trusts its caller.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL for persistence. Authentication is
//! assumed to be handled externally (e.g. an SSO proxy in front of this
//! service); no auth logic lives here.
//!
//! The **API layer** ([`api`]) holds the route handlers and the
//! request/response models, including the upload validation that guards the
//! bridge. The **database layer** ([`db`]) follows the repository pattern:
//! each collection has a repository encapsulating its queries, returning
//! record structs that handlers convert to API models. The **media layer**
//! ([`media`]) abstracts the external host behind the `MediaStore` trait
//! with a real Cloudinary-backed implementation and an in-process dummy for
//! development and tests.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use hubctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Parse CLI arguments and load configuration
//!     let args = hubctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     // Initialize telemetry (structured logging and optional OTLP export)
//!     hubctl::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     // Create and start the application
//!     let app = Application::new(config).await?;
//!
//!     // Run with graceful shutdown on Ctrl+C
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! The service requires a PostgreSQL database and runs its migrations on
//! startup.

use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use bon::Builder;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod media;
pub mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use errors::{Error, Result};

use crate::config::CorsOrigin;
use crate::media::MediaStore;
use crate::openapi::ApiDoc;

/// Shared application state passed to all handlers.
///
/// Cloning is cheap: the pool and media store are handles.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub media: Arc<dyn MediaStore>,
}

/// Get the hubctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().trim_end_matches('/').parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.cors.allow_credentials)
        .expose_headers(vec![axum::http::header::LOCATION]);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// Multipart routes (uploads, sponsor creation) get a body limit derived from
/// the configured upload ceiling; everything else uses axum's default.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    // Slack on top of the file ceiling for multipart framing and text fields;
    // the authoritative per-file check lives in the handlers
    let multipart_body_limit = (state.config.uploads.max_file_size as usize).saturating_add(64 * 1024);

    let multipart_routes = Router::new()
        .route("/uploads", post(api::handlers::uploads::create_upload))
        .route("/sponsors", post(api::handlers::sponsors::create_sponsor))
        .layer(DefaultBodyLimit::max(multipart_body_limit));

    let api_routes = Router::new()
        // Events management
        .route("/events", get(api::handlers::events::list_events))
        .route("/events", post(api::handlers::events::create_event))
        .route("/events/{id}", get(api::handlers::events::get_event))
        .route("/events/{id}", put(api::handlers::events::replace_event))
        .route("/events/{id}", delete(api::handlers::events::delete_event))
        // Sponsors management (creation is multipart, merged below)
        .route("/sponsors", get(api::handlers::sponsors::list_sponsors))
        .route("/sponsors/{id}", get(api::handlers::sponsors::get_sponsor))
        .route("/sponsors/{id}", put(api::handlers::sponsors::replace_sponsor))
        .route("/sponsors/{id}", delete(api::handlers::sponsors::delete_sponsor))
        .merge(multipart_routes)
        .with_state(state.clone());

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/admin/api/v1", api_routes)
        .merge(Scalar::with_url("/admin/docs", ApiDoc::openapi()))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

/// The assembled application: router, configuration, and database pool.
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting hubctl with configuration: {:#?}", config);

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
            .connect(&config.database.url)
            .await
            .context("Failed to connect to the database")?;

        migrator().run(&pool).await.context("Failed to run database migrations")?;

        let media = media::create_store(config.media.clone());

        let state = AppState::builder().db(pool.clone()).config(config.clone()).media(media).build();

        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("hubctl listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
