//! Shared helpers for in-process handler tests.
//!
//! The router is exercised through `axum_test::TestServer` with the dummy
//! media store and a lazily-connected pool: routes that never touch the
//! database (the upload bridge surface) run without any infrastructure.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use crate::{AppState, Config, build_router, media::MediaStore};

/// A default configuration suitable for handler tests.
pub fn test_config() -> Config {
    Config::default()
}

/// Build a test server over the full router with the given media store.
///
/// The database pool is created lazily and never connects unless a handler
/// actually issues a query.
pub fn test_server(config: Config, media: Arc<dyn MediaStore>) -> axum_test::TestServer {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database.url)
        .expect("lazy pool from a valid URL");

    let state = AppState::builder().db(pool).config(config).media(media).build();

    let router = build_router(state).expect("test router builds");
    axum_test::TestServer::new(router).expect("test server starts")
}
