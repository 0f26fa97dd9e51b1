//! # bookshelf: users and their books over HTTP
//!
//! `bookshelf` is a CRUD backend for two related resources: **users** (stored in the `person`
//! table) and the **books** they own. It exposes a JSON API built on
//! [Axum](https://github.com/tokio-rs/axum) and persists to PostgreSQL through SQLx.
//!
//! ## Architecture
//!
//! A request travels handler → service → repository → PostgreSQL:
//!
//! - The **API layer** ([`api`]) parses paths, headers and bodies into request models and turns
//!   service results into responses. Failures of any layer become JSON error bodies through the
//!   `IntoResponse` impl on [`errors::Error`].
//! - The **service layer** ([`services`]) runs each user-with-books operation in a single
//!   transaction and carries created ids forward.
//! - The **database layer** ([`db`]) defines one repository trait per table and three
//!   implementations of each: entity mapping with an insert-or-update `save`, hand-written SQL with
//!   positional columns, and a small statement helper with named-column row mappers. The
//!   `persistence.strategy` setting picks one at startup.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use bookshelf::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Parse CLI arguments and load configuration
//!     let args = bookshelf::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     // Initialize telemetry (structured logging and optional OpenTelemetry)
//!     bookshelf::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     // Create and start the application
//!     let app = Application::new(config).await?;
//!
//!     // Run with graceful shutdown on Ctrl+C
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! The application requires a PostgreSQL database and automatically runs migrations on startup:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//! bookshelf::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

#[cfg(test)]
pub mod test_utils;

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod services;
pub mod telemetry;
pub mod types;
pub mod validation;

use crate::api::handlers::{books, users};
use crate::services::{BookService, UserBookService};
use axum::http::HeaderValue;
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use bon::Builder;
pub use config::Config;
use regex::Regex;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};

pub use types::{BookId, UserId};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .request_id_pattern(Regex::new(&config.api.request_id_pattern)?)
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Compiled from `config.api.request_id_pattern`
    pub request_id_pattern: Regex,
}

impl AppState {
    pub fn book_service(&self) -> BookService {
        BookService::new(self.db.clone(), self.config.persistence.strategy)
    }

    pub fn user_book_service(&self) -> UserBookService {
        UserBookService::new(self.db.clone(), self.config.persistence.strategy)
    }
}

/// Get the bookshelf database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors = &config.cors;

    let allow_origin = if cors.allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins = cors
            .allowed_origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(cors.allow_credentials))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/book/create", post(books::create_book))
        .route("/book/update/{book_id}", put(books::update_book))
        .route("/book/get/{book_id}", get(books::get_book))
        .route("/book/delete/{book_id}", delete(books::delete_book))
        .route("/user/create", post(users::create_user_with_books))
        .route("/user/update/{user_id}", put(users::update_user_with_books))
        .route("/user/get/{user_id}", get(users::get_user_with_books))
        .route("/user/delete/{user_id}", delete(users::delete_user_with_books))
}

/// Build the main application router with all endpoints and middleware.
///
/// The book and user routes are nested under `config.api.base_path`; `/healthz` stays at the
/// root. CORS and request tracing wrap everything.
///
/// # Errors
///
/// Returns an error if the CORS configuration is invalid.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let base_path = state.config.api.base_path.clone();
    let cors_layer = create_cors_layer(&state.config)?;

    let api = api_routes();
    let router = Router::new().route("/healthz", get(|| async { "OK" }));
    let router = if base_path == "/" {
        router.merge(api)
    } else {
        router.nest(&base_path, api)
    };

    let router = router.with_state(state).layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The assembled service.
///
/// 1. **Create**: [`Application::new`] connects the pool, runs migrations and builds the router
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown signal is received, closes the pool and flushes telemetry
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create an application, reusing `pool` when given instead of connecting a new one
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        debug!("Starting bookshelf with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => pool,
            None => db::pool::create_pool(&config.database.url, &config.database.pool).await?,
        };
        migrator().run(&pool).await?;

        info!(strategy = ?config.persistence.strategy, "Using persistence strategy");

        let state = AppState::builder()
            .db(pool.clone())
            .request_id_pattern(Regex::new(&config.api.request_id_pattern)?)
            .config(config.clone())
            .build();

        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "bookshelf listening on http://{}, API under {}",
            bind_addr, self.config.api.base_path
        );

        // Run the server with graceful shutdown
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        // Close database connections
        info!("Closing database connections...");
        self.pool.close().await;

        // Shutdown telemetry
        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::PersistenceStrategy;
    use crate::test_utils::*;
    use axum::http::StatusCode;

    #[sqlx::test]
    #[test_log::test]
    async fn test_healthz(pool: PgPool) {
        let server = create_test_app(pool, PersistenceStrategy::Orm).await;

        let response = server.get("/healthz").await;

        response.assert_status_ok();
        assert_eq!(response.text(), "OK");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_routes_follow_base_path(pool: PgPool) {
        let mut config = create_test_config(PersistenceStrategy::RawSql);
        config.api.base_path = "/library".to_string();
        let server = Application::new_with_pool(config, Some(pool.clone()))
            .await
            .expect("Failed to create application")
            .into_test_server();
        let owner = create_test_user(&pool, "Test Test").await;

        let response = server
            .post("/library/book/create")
            .add_header(REQUEST_ID_HEADER, TEST_REQUEST_ID)
            .json(&serde_json::json!({ "userId": owner, "title": "moved", "author": "a", "pageCount": 1 }))
            .await;
        response.assert_status_ok();

        server.get("/api/v1/book/get/1").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_custom_request_id_header(pool: PgPool) {
        let mut config = create_test_config(PersistenceStrategy::SqlHelper);
        config.api.request_id_header = "x-request-id".to_string();
        config.api.request_id_pattern = "^[0-9]{4}$".to_string();
        let server = Application::new_with_pool(config, Some(pool.clone()))
            .await
            .expect("Failed to create application")
            .into_test_server();
        let owner = create_test_user(&pool, "Test Test").await;
        let body = serde_json::json!({ "userId": owner, "title": "custom", "author": "a", "pageCount": 1 });

        server
            .post("/api/v1/book/create")
            .add_header("x-request-id", "abcdef")
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/api/v1/book/create")
            .add_header("x-request-id", "1234")
            .json(&body)
            .await
            .assert_status_ok();
    }

    #[test]
    fn test_cors_layer_rejects_bad_origin() {
        let mut config = create_test_config(PersistenceStrategy::Orm);
        config.cors.allowed_origins = vec!["https://ok.example".to_string(), "bad\norigin".to_string()];

        assert!(create_cors_layer(&config).is_err());

        config.cors.allowed_origins = vec!["https://ok.example".to_string()];
        assert!(create_cors_layer(&config).is_ok());
    }
}
